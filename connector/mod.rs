// Harmony Wallet Connector - generic connector capability set over the extension
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::provider::{parse_int, HmyWalletProvider, RpcResponse, ETH_CHAIN_ID};
use crate::wallet::{
    HarmonyAddressConverter, HarmonyExtension, HttpTransportFactory, TransportFactory,
    WalletExtension,
};

/// Chain id reported while no provider is active.
pub const NO_CHAIN_ID: i64 = -1;

/// What a successful activation hands back to the framework.
///
/// Both fields are empty when the extension handle was replaced while the
/// login was in flight.
pub struct ConnectorUpdate<P> {
    pub provider: Option<Arc<P>>,
    pub account: Option<String>,
}

impl<P> Default for ConnectorUpdate<P> {
    fn default() -> Self {
        Self {
            provider: None,
            account: None,
        }
    }
}

/// Capability set a dapp-connection framework expects from every wallet.
#[async_trait]
pub trait Connector: Send + Sync {
    type Provider: Send + Sync;

    /// Log into the wallet and build the provider
    ///
    /// # Returns
    /// * `Result<ConnectorUpdate<Self::Provider>, ConnectorError>` - The provider and
    ///   the account in hex form, or the login/binding failure
    async fn activate(&self) -> Result<ConnectorUpdate<Self::Provider>, ConnectorError>;

    /// The provider built by the last activation, if any
    async fn get_provider(&self) -> Option<Arc<Self::Provider>>;

    /// Query the chain id from the active provider
    ///
    /// # Returns
    /// * `Result<i64, ConnectorError>` - The chain id, `NO_CHAIN_ID` when nothing is
    ///   active, or the RPC failure
    async fn get_chain_id(&self) -> Result<i64, ConnectorError>;

    /// The authenticated account in hex form, if any
    async fn get_account(&self) -> Option<String>;

    /// Start tearing the session down without waiting for it
    ///
    /// # Returns
    /// * `Option<JoinHandle<()>>` - Handle of the background logout, or `None`
    ///   when there is no async runtime to run it on
    fn deactivate(&self) -> Option<JoinHandle<()>>;

    /// Whether the last login is still in force; no I/O
    async fn is_authorized(&self) -> bool;
}

#[derive(Default)]
struct Session {
    ext: Option<Arc<HarmonyExtension>>,
    provider: Option<Arc<HmyWalletProvider>>,
    account: Option<String>,
    auth: bool,
}

pub struct HmyWalletConnector {
    wallet: Arc<dyn WalletExtension>,
    config: ConnectorConfig,
    factory: Arc<dyn TransportFactory>,
    session: Arc<RwLock<Session>>,
    activation: Mutex<()>,
}

impl HmyWalletConnector {
    /// Create a connector talking to nodes over HTTP
    ///
    /// # Arguments
    /// * `wallet` - The object the extension injects into the page
    /// * `config` - Connector configuration, validated here
    ///
    /// # Returns
    /// * `Result<Self, ConnectorError>` - An inactive connector, or the config error
    pub fn new(wallet: Arc<dyn WalletExtension>, config: ConnectorConfig) -> Result<Self, ConnectorError> {
        Self::with_transport_factory(wallet, config, Arc::new(HttpTransportFactory::new()))
    }

    /// Same as `new`, with the transports built by `factory`
    pub fn with_transport_factory(
        wallet: Arc<dyn WalletExtension>,
        config: ConnectorConfig,
        factory: Arc<dyn TransportFactory>,
    ) -> Result<Self, ConnectorError> {
        config.validate()?;

        Ok(Self {
            wallet,
            config,
            factory,
            session: Arc::new(RwLock::new(Session::default())),
            activation: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }
}

#[async_trait]
impl Connector for HmyWalletConnector {
    type Provider = HmyWalletProvider;

    async fn activate(&self) -> Result<ConnectorUpdate<HmyWalletProvider>, ConnectorError> {
        // Overlapping activations run one after another; the last one wins.
        let _activation = self.activation.lock().await;

        // Fresh handle on every activation, published before the login
        let ext = Arc::new(HarmonyExtension::new(Arc::clone(&self.wallet), self.factory.as_ref())?);
        self.session.write().await.ext = Some(Arc::clone(&ext));

        tracing::info!("requesting wallet login");
        let account = ext.login().await?;

        // Bail out if the handle was swapped while the user was answering
        let current = self.session.read().await.ext.clone();
        match current {
            Some(current) if Arc::ptr_eq(&current, &ext) => {}
            _ => {
                tracing::warn!("extension handle replaced during login");
                return Ok(ConnectorUpdate::default());
            }
        }

        // Translate the account and bind the provider before touching session state
        let account = HarmonyAddressConverter::from_bech32(&account.address)?;
        let provider = Arc::new(HmyWalletProvider::new(ext, &self.config, self.factory.as_ref()).await?);

        {
            let mut session = self.session.write().await;
            session.account = Some(account.clone());
            session.auth = true;
            session.provider = Some(Arc::clone(&provider));
        }

        tracing::info!(account = %account, "wallet connector activated");
        Ok(ConnectorUpdate {
            provider: Some(provider),
            account: Some(account),
        })
    }

    async fn get_provider(&self) -> Option<Arc<HmyWalletProvider>> {
        self.session.read().await.provider.clone()
    }

    async fn get_chain_id(&self) -> Result<i64, ConnectorError> {
        let provider = self.session.read().await.provider.clone();
        match provider {
            Some(provider) => parse_chain_id(provider.send_eth(ETH_CHAIN_ID).await?),
            None => Ok(NO_CHAIN_ID),
        }
    }

    async fn get_account(&self) -> Option<String> {
        self.session.read().await.account.clone()
    }

    fn deactivate(&self) -> Option<JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(error) => {
                tracing::warn!(%error, "no async runtime, skipping wallet logout");
                return None;
            }
        };
        let session = Arc::clone(&self.session);

        Some(runtime.spawn(async move {
            let ext = session.read().await.ext.clone();
            let Some(ext) = ext else {
                return;
            };

            match ext.logout().await {
                Ok(()) => {
                    session.write().await.auth = false;
                    tracing::info!("wallet connector deactivated");
                }
                Err(error) => {
                    tracing::warn!(%error, "wallet logout failed");
                }
            }
        }))
    }

    async fn is_authorized(&self) -> bool {
        self.session.read().await.auth
    }
}

/// Chain id out of an `eth_chainId` answer
///
/// # Arguments
/// * `response` - The node's answer; `result` may be a hex string, a decimal string or a number
///
/// # Returns
/// * `Result<i64, ConnectorError>` - The chain id, or `ConnectorError::Rpc` for an
///   error object or an unparseable result
pub fn parse_chain_id(response: RpcResponse) -> Result<i64, ConnectorError> {
    // An error object wins over any result
    let result = response.into_result()?;
    let parsed = match &result {
        Value::String(raw) => parse_int(raw),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };

    parsed.ok_or_else(|| ConnectorError::rpc(-32603, format!("Unparseable chain id: {}", result)))
}
