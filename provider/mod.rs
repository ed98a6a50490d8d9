// Harmony Wallet Provider - JSON-RPC surface over the wallet extension
//
// Presents the Ethereum-style `send` entry point dapp tooling expects and
// maps `eth_sendTransaction` onto a wallet-signed `hmy_sendRawTransaction`.

pub mod payload;
pub mod transaction;

use serde_json::Value;
use std::sync::Arc;

use crate::config::{ConnectorConfig, DEFAULT_SHARD_ID};
use crate::error::ConnectorError;
use crate::wallet::{
    ChainClient, ChainClientOptions, HarmonyAddressConverter, HarmonyExtension, RpcPrefix,
    TransportFactory,
};

pub use payload::{
    EthQuery, EthTransactionRequest, RpcErrorObject, RpcPayload, RpcRequest, RpcResponse,
    ETH_CHAIN_ID, ETH_SEND_TRANSACTION, HMY_SEND_RAW_TRANSACTION,
};
pub use transaction::{parse_gas, parse_int, HarmonyTransaction, TxParams};

/// Completion callback for `send`, called once with the provider's answer.
pub type RpcCallback = Box<dyn FnOnce(Result<&RpcResponse, &ConnectorError>) + Send>;

pub struct HmyWalletProvider {
    ext: Arc<HarmonyExtension>,
    client: ChainClient,
    gas_price: String,
}

impl HmyWalletProvider {
    /// Build a chain client and bind the extension to it
    ///
    /// # Arguments
    /// * `ext` - Extension handle returned by a successful login
    /// * `config` - Connector configuration; `config.rpc` overrides the extension's endpoint
    /// * `factory` - Builds the transport for the chain client
    ///
    /// # Returns
    /// * `Result<Self, ConnectorError>` - A provider whose extension routes every
    ///   sub-system through the new chain client, or the binding error
    pub async fn new(
        ext: Arc<HarmonyExtension>,
        config: &ConnectorConfig,
        factory: &dyn TransportFactory,
    ) -> Result<Self, ConnectorError> {
        // Fall back to the endpoint the extension is already pointed at
        let url = match &config.rpc {
            Some(rpc) => rpc.clone(),
            None => ext.provider().await.url().to_string(),
        };

        // Keep the extension's chain type, pin chain id and shard
        let options = ChainClientOptions {
            chain_type: ext.messenger().await.chain_type(),
            chain_id: config.chain_id,
            shard_id: DEFAULT_SHARD_ID,
        };
        let client = ChainClient::new(&url, options, factory)?;

        // Swap all transport references in one step
        ext.bind(&client).await?;

        Ok(Self {
            ext,
            client,
            gas_price: config.gas_price.clone(),
        })
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    pub fn extension(&self) -> &Arc<HarmonyExtension> {
        &self.ext
    }

    /// Send a call under the `eth` namespace through the extension's messenger
    ///
    /// # Arguments
    /// * `query` - A bare method name (sent with empty params) or a full payload
    ///
    /// # Returns
    /// * `Result<RpcResponse, ConnectorError>` - The node's answer, as returned by the transport
    pub async fn send_eth(&self, query: impl Into<EthQuery>) -> Result<RpcResponse, ConnectorError> {
        let (method, params) = query.into().into_call();
        self.ext
            .messenger()
            .await
            .send(&method, params, RpcPrefix::Eth, DEFAULT_SHARD_ID)
            .await
    }

    /// Generic JSON-RPC entry point
    ///
    /// `eth_sendTransaction` is rebuilt as a Harmony transaction, signed by the
    /// wallet and submitted as `hmy_sendRawTransaction`; every other method goes
    /// to the extension's provider untouched.
    ///
    /// # Arguments
    /// * `payload` - The request as issued by dapp tooling
    /// * `callback` - Optional completion callback, invoked with the submission outcome
    ///
    /// # Returns
    /// * `Result<RpcResponse, ConnectorError>` - The node's answer, or the first
    ///   validation, signing or transport failure
    pub async fn send(
        &self,
        payload: RpcPayload,
        callback: Option<RpcCallback>,
    ) -> Result<RpcResponse, ConnectorError> {
        match RpcRequest::try_from(payload)? {
            RpcRequest::SendTransaction { request, id, jsonrpc } => {
                self.send_transaction(request, id, jsonrpc, callback).await
            }
            RpcRequest::Passthrough(payload) => self.dispatch(payload, callback).await,
        }
    }

    async fn send_transaction(
        &self,
        request: EthTransactionRequest,
        id: Value,
        jsonrpc: String,
        callback: Option<RpcCallback>,
    ) -> Result<RpcResponse, ConnectorError> {
        // Translate addresses and gas before the wallet prompts the user
        let tx = self.ext.new_tx(TxParams {
            from: HarmonyAddressConverter::to_bech32(&request.from)?,
            to: HarmonyAddressConverter::to_bech32(&request.to)?,
            data: request.data.unwrap_or_else(|| "0x".to_string()),
            gas_limit: parse_gas(request.gas.as_ref())?,
            gas_price: self.gas_price.clone(),
            shard_id: DEFAULT_SHARD_ID,
            to_shard_id: DEFAULT_SHARD_ID,
        }).await;

        tracing::info!(from = %tx.from, to = %tx.to, gas_limit = tx.gas_limit, "requesting wallet signature");
        let signed = self.ext.sign_transaction(&tx).await?;

        // Submit the signed bytes under the caller's id
        let raw = RpcPayload {
            jsonrpc,
            id,
            method: HMY_SEND_RAW_TRANSACTION.to_string(),
            params: vec![Value::String(signed.raw_transaction)],
        };
        self.dispatch(raw, callback).await
    }

    async fn dispatch(
        &self,
        payload: RpcPayload,
        callback: Option<RpcCallback>,
    ) -> Result<RpcResponse, ConnectorError> {
        let outcome = self.ext.provider().await.send(&payload).await;
        if let Some(callback) = callback {
            callback(outcome.as_ref());
        }
        outcome
    }
}
