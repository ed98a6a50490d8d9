// In-memory wallet extension and node transport shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hmy_wallet_connector::provider::HarmonyTransaction;
use hmy_wallet_connector::wallet::{
    ChainType, ExtensionAccount, NetworkConfig, SignedTransaction, Transport, TransportFactory,
    WalletExtension,
};
use hmy_wallet_connector::{ConnectorError, RpcPayload, RpcResponse};

pub const EXTENSION_URL: &str = "https://api.s0.t.hmny.io";
pub const OVERRIDE_URL: &str = "http://localhost:9500";

pub const ACCOUNT_ONE: &str = "one1t2htvpfl862vnwdqnuekd9p4ulh3h6hdcksx2z";
pub const ACCOUNT_HEX: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

pub const RECIPIENT_ONE: &str = "one1ld53vz2u580kpwmee6fvu048fsmut56esfxp2h";
pub const RECIPIENT_HEX: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

pub const RAW_TRANSACTION: &str = "0xf86c808501dcd65000825208";

pub struct MockWallet {
    pub account: String,
    pub login_error: Option<ConnectorError>,
    pub logout_error: Option<ConnectorError>,
    pub sign_error: Option<ConnectorError>,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub signed: Mutex<Vec<HarmonyTransaction>>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            account: ACCOUNT_ONE.to_string(),
            login_error: None,
            logout_error: None,
            sign_error: None,
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn signed(&self) -> Vec<HarmonyTransaction> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletExtension for MockWallet {
    fn network(&self) -> NetworkConfig {
        NetworkConfig {
            chain_url: EXTENSION_URL.to_string(),
            chain_type: ChainType::Harmony,
            chain_id: 1666600000,
        }
    }

    async fn get_account(&self) -> Result<ExtensionAccount, ConnectorError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        match &self.login_error {
            Some(error) => Err(error.clone()),
            None => Ok(ExtensionAccount {
                address: self.account.clone(),
                name: Some("main".to_string()),
            }),
        }
    }

    async fn forget_identity(&self) -> Result<(), ConnectorError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);

        match &self.logout_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn sign_transaction(&self, tx: &HarmonyTransaction) -> Result<SignedTransaction, ConnectorError> {
        self.signed.lock().unwrap().push(tx.clone());

        match &self.sign_error {
            Some(error) => Err(error.clone()),
            None => Ok(SignedTransaction {
                raw_transaction: RAW_TRANSACTION.to_string(),
            }),
        }
    }
}

/// Answers by method name; unknown methods answer `null`.
pub struct MockTransport {
    url: String,
    results: Arc<Mutex<HashMap<String, RpcResponse>>>,
    pub sent: Mutex<Vec<RpcPayload>>,
}

impl MockTransport {
    pub fn sent(&self) -> Vec<RpcPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, payload: &RpcPayload) -> Result<RpcResponse, ConnectorError> {
        self.sent.lock().unwrap().push(payload.clone());

        let canned = self.results.lock().unwrap().get(&payload.method).cloned();
        let mut response = canned.unwrap_or_else(|| RpcResponse::success(Value::Null, Value::Null));
        response.id = payload.id.clone();
        Ok(response)
    }
}

#[derive(Default)]
pub struct MockFactory {
    results: Arc<Mutex<HashMap<String, RpcResponse>>>,
    transports: Mutex<Vec<Arc<MockTransport>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        let factory = Self::default();
        factory.respond("eth_chainId", json!("0x1"));
        factory.respond("hmy_sendRawTransaction", json!("0xabcdef"));
        factory
    }

    pub fn respond(&self, method: &str, result: Value) {
        self.results
            .lock()
            .unwrap()
            .insert(method.to_string(), RpcResponse::success(Value::Null, result));
    }

    pub fn fail(&self, method: &str, code: i64, message: &str) {
        self.results
            .lock()
            .unwrap()
            .insert(method.to_string(), RpcResponse::failure(Value::Null, code, message));
    }

    /// Most recent transport connected to `url`.
    pub fn transport(&self, url: &str) -> Option<Arc<MockTransport>> {
        self.transports
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|t| t.url == url)
            .cloned()
    }

    pub fn connections(&self) -> usize {
        self.transports.lock().unwrap().len()
    }
}

impl TransportFactory for MockFactory {
    fn connect(&self, url: &str) -> Result<Arc<dyn Transport>, ConnectorError> {
        let transport = Arc::new(MockTransport {
            url: url.to_string(),
            results: Arc::clone(&self.results),
            sent: Mutex::new(Vec::new()),
        });
        self.transports.lock().unwrap().push(Arc::clone(&transport));
        Ok(transport)
    }
}
