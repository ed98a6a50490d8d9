// Harmony wallet extension handle
//
// Wraps the in-page wallet object and holds the transport references of its
// sub-systems, which the provider repoints to its own chain client.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::client::ChainClient;
use super::messenger::{ChainType, Messenger};
use super::transport::{Transport, TransportFactory};
use crate::error::ConnectorError;
use crate::provider::transaction::{HarmonyTransaction, TxParams};

/// Network the extension is currently pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_url: String,
    pub chain_type: ChainType,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionAccount {
    /// bech32 `one1...` address.
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    pub raw_transaction: String,
}

/// The wallet object the browser extension injects into the page.
///
/// Key custody and signing happen inside the extension; the connector only
/// ever sees accounts and signed payloads.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    fn network(&self) -> NetworkConfig;

    async fn get_account(&self) -> Result<ExtensionAccount, ConnectorError>;

    async fn forget_identity(&self) -> Result<(), ConnectorError>;

    async fn sign_transaction(&self, tx: &HarmonyTransaction) -> Result<SignedTransaction, ConnectorError>;
}

/// Transport references of the extension and its sub-systems.
#[derive(Clone)]
pub struct Bindings {
    pub provider: Arc<dyn Transport>,
    pub messenger: Arc<Messenger>,
    pub shard_id: u32,
    pub wallet: Arc<Messenger>,
    pub blockchain: Arc<Messenger>,
    pub transactions: Arc<Messenger>,
    pub contracts: Arc<Messenger>,
}

impl Bindings {
    fn uniform(messenger: Arc<Messenger>) -> Self {
        Self {
            provider: messenger.provider(),
            shard_id: messenger.shard_id(),
            wallet: Arc::clone(&messenger),
            blockchain: Arc::clone(&messenger),
            transactions: Arc::clone(&messenger),
            contracts: Arc::clone(&messenger),
            messenger,
        }
    }

    /// True when every sub-system routes through `messenger`.
    pub fn routes_through(&self, messenger: &Arc<Messenger>) -> bool {
        Arc::ptr_eq(&self.messenger, messenger)
            && Arc::ptr_eq(&self.wallet, messenger)
            && Arc::ptr_eq(&self.blockchain, messenger)
            && Arc::ptr_eq(&self.transactions, messenger)
            && Arc::ptr_eq(&self.contracts, messenger)
            && self.shard_id == messenger.shard_id()
    }
}

pub struct HarmonyExtension {
    wallet: Arc<dyn WalletExtension>,
    bindings: RwLock<Bindings>,
}

impl HarmonyExtension {
    /// Wrap the injected wallet, wired to the extension's own network.
    pub fn new(
        wallet: Arc<dyn WalletExtension>,
        factory: &dyn TransportFactory,
    ) -> Result<Self, ConnectorError> {
        let network = wallet.network();
        let transport = factory.connect(&network.chain_url)?;
        let messenger = Arc::new(Messenger::new(transport, network.chain_type, network.chain_id));

        Ok(Self {
            wallet,
            bindings: RwLock::new(Bindings::uniform(messenger)),
        })
    }

    pub async fn login(&self) -> Result<ExtensionAccount, ConnectorError> {
        let account = self.wallet.get_account().await?;
        tracing::debug!(address = %account.address, "extension login resolved");
        Ok(account)
    }

    pub async fn logout(&self) -> Result<(), ConnectorError> {
        self.wallet.forget_identity().await
    }

    pub async fn sign_transaction(&self, tx: &HarmonyTransaction) -> Result<SignedTransaction, ConnectorError> {
        self.wallet.sign_transaction(tx).await
    }

    /// Repoint every sub-system at `client`.
    ///
    /// The new references are swapped in under a single write; on error the
    /// previous bindings stay in place untouched.
    pub async fn bind(&self, client: &ChainClient) -> Result<(), ConnectorError> {
        let messenger = client.messenger();
        let mut bindings = self.bindings.write().await;

        if messenger.chain_type() != bindings.messenger.chain_type() {
            return Err(ConnectorError::Binding(format!(
                "Chain client speaks {:?}, extension speaks {:?}",
                messenger.chain_type(),
                bindings.messenger.chain_type()
            )));
        }

        *bindings = Bindings::uniform(messenger);
        tracing::info!(url = %client.url(), shard_id = bindings.shard_id, "extension bound to chain client");
        Ok(())
    }

    pub async fn bindings(&self) -> Bindings {
        self.bindings.read().await.clone()
    }

    pub async fn provider(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.bindings.read().await.provider)
    }

    pub async fn messenger(&self) -> Arc<Messenger> {
        Arc::clone(&self.bindings.read().await.messenger)
    }

    pub async fn shard_id(&self) -> u32 {
        self.bindings.read().await.shard_id
    }

    /// Build a transaction on the chain the transactions sub-system is bound to.
    pub async fn new_tx(&self, params: TxParams) -> HarmonyTransaction {
        let chain_id = self.bindings.read().await.transactions.chain_id();
        HarmonyTransaction::new(params, chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::payload::{RpcPayload, RpcResponse};
    use crate::wallet::client::ChainClientOptions;
    use serde_json::json;

    struct EchoTransport {
        url: String,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        fn url(&self) -> &str {
            &self.url
        }

        async fn send(&self, payload: &RpcPayload) -> Result<RpcResponse, ConnectorError> {
            Ok(RpcResponse::success(payload.id.clone(), json!(payload.method)))
        }
    }

    struct EchoFactory;

    impl TransportFactory for EchoFactory {
        fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, ConnectorError> {
            Ok(Arc::new(EchoTransport { url: url.to_string() }))
        }
    }

    struct StaticWallet;

    #[async_trait]
    impl WalletExtension for StaticWallet {
        fn network(&self) -> NetworkConfig {
            NetworkConfig {
                chain_url: "https://api.s0.t.hmny.io".to_string(),
                chain_type: ChainType::Harmony,
                chain_id: 1666600000,
            }
        }

        async fn get_account(&self) -> Result<ExtensionAccount, ConnectorError> {
            Ok(ExtensionAccount {
                address: "one1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqquzw7vz".to_string(),
                name: None,
            })
        }

        async fn forget_identity(&self) -> Result<(), ConnectorError> {
            Ok(())
        }

        async fn sign_transaction(&self, _tx: &HarmonyTransaction) -> Result<SignedTransaction, ConnectorError> {
            Err(ConnectorError::Extension("User rejected".to_string()))
        }
    }

    fn extension() -> HarmonyExtension {
        HarmonyExtension::new(Arc::new(StaticWallet), &EchoFactory).unwrap()
    }

    fn client(url: &str, chain_type: ChainType) -> ChainClient {
        let options = ChainClientOptions { chain_type, chain_id: 1, shard_id: 0 };
        ChainClient::new(url, options, &EchoFactory).unwrap()
    }

    #[tokio::test]
    async fn test_new_uses_extension_network() {
        let ext = extension();
        assert_eq!(ext.provider().await.url(), "https://api.s0.t.hmny.io");
        assert_eq!(ext.messenger().await.chain_id(), 1666600000);
    }

    #[tokio::test]
    async fn test_bind_repoints_every_subsystem() {
        let ext = extension();
        let client = client("http://localhost:9500", ChainType::Harmony);

        ext.bind(&client).await.unwrap();

        let bindings = ext.bindings().await;
        assert!(bindings.routes_through(&client.messenger()));
        assert_eq!(ext.provider().await.url(), "http://localhost:9500");
        assert_eq!(ext.shard_id().await, 0);
    }

    #[tokio::test]
    async fn test_bind_failure_leaves_bindings_untouched() {
        let ext = extension();
        let before = ext.messenger().await;
        let client = client("http://localhost:9500", ChainType::Ethereum);

        let result = ext.bind(&client).await;

        assert!(matches!(result, Err(ConnectorError::Binding(_))));
        assert!(ext.bindings().await.routes_through(&before));
    }

    #[tokio::test]
    async fn test_new_tx_uses_bound_chain_id() {
        let ext = extension();
        ext.bind(&client("http://localhost:9500", ChainType::Harmony)).await.unwrap();

        let tx = ext.new_tx(TxParams {
            from: "one1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqquzw7vz".to_string(),
            to: "one1zg69v7yszg69v7yszg69v7yszg69v7ys660ttt".to_string(),
            data: "0x".to_string(),
            gas_limit: 21000,
            gas_price: "0x00000000001".to_string(),
            shard_id: 0,
            to_shard_id: 0,
        }).await;

        assert_eq!(tx.chain_id, 1);
    }

    #[tokio::test]
    async fn test_sign_rejection_propagates() {
        let ext = extension();
        let tx = ext.new_tx(TxParams::default()).await;
        let result = ext.sign_transaction(&tx).await;
        assert_eq!(result, Err(ConnectorError::Extension("User rejected".to_string())));
    }
}
