// Messenger - prefixes, numbers and dispatches RPC calls over a transport
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::transport::Transport;
use crate::error::ConnectorError;
use crate::provider::payload::{RpcPayload, RpcResponse, JSONRPC_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Harmony,
    Ethereum,
}

/// Method namespace a call is sent under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcPrefix {
    Hmy,
    Eth,
}

impl RpcPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcPrefix::Hmy => "hmy",
            RpcPrefix::Eth => "eth",
        }
    }
}

pub struct Messenger {
    transport: Arc<dyn Transport>,
    chain_type: ChainType,
    chain_id: u64,
    shard_id: u32,
    next_id: AtomicU64,
}

impl Messenger {
    pub fn new(transport: Arc<dyn Transport>, chain_type: ChainType, chain_id: u64) -> Self {
        Self::with_shard(transport, chain_type, chain_id, 0)
    }

    pub fn with_shard(
        transport: Arc<dyn Transport>,
        chain_type: ChainType,
        chain_id: u64,
        shard_id: u32,
    ) -> Self {
        Self {
            transport,
            chain_type,
            chain_id,
            shard_id,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn provider(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn shard_id(&self) -> u32 {
        self.shard_id
    }

    /// Send `method` under `prefix` to the node serving `shard_id`.
    ///
    /// # Arguments
    /// * `method` - A `<namespace>_<name>` RPC method
    /// * `params` - Positional parameters, sent as given
    /// * `prefix` - Namespace the method is rewritten to
    /// * `shard_id` - Must match the shard this messenger serves
    ///
    /// # Returns
    /// * `Result<RpcResponse, ConnectorError>` - The node's reply, or a
    ///   transport error when the shard has no provider here
    pub async fn send(
        &self,
        method: &str,
        params: Vec<Value>,
        prefix: RpcPrefix,
        shard_id: u32,
    ) -> Result<RpcResponse, ConnectorError> {
        // Only one shard is wired per messenger
        if shard_id != self.shard_id {
            return Err(ConnectorError::Transport(format!(
                "No provider for shard {} (messenger serves shard {})", shard_id, self.shard_id
            )));
        }

        let payload = RpcPayload {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(self.next_id.fetch_add(1, Ordering::Relaxed)),
            method: set_rpc_prefix(method, prefix)?,
            params,
        };

        tracing::debug!(method = %payload.method, shard_id, "messenger send");
        self.transport.send(&payload).await
    }
}

/// Replace the namespace of a `<namespace>_<name>` method.
pub fn set_rpc_prefix(method: &str, prefix: RpcPrefix) -> Result<String, ConnectorError> {
    let mut parts = method.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
            Ok(format!("{}_{}", prefix.as_str(), name))
        }
        _ => Err(ConnectorError::InvalidPayload(format!(
            "Could not set prefix on method '{}'", method
        ))),
    }
}
