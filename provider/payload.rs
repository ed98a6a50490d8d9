// JSON-RPC payload model for the provider surface
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConnectorError;

pub const JSONRPC_VERSION: &str = "2.0";

pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const HMY_SEND_RAW_TRANSACTION: &str = "hmy_sendRawTransaction";
pub const ETH_CHAIN_ID: &str = "eth_chainId";

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcPayload {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcPayload {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id: Value::from(1),
            method: method.into(),
            params,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = id.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// The `result` field, or the node's error object as `ConnectorError::Rpc`.
    pub fn into_result(self) -> Result<Value, ConnectorError> {
        if let Some(error) = self.error {
            return Err(ConnectorError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// `params[0]` of an `eth_sendTransaction` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthTransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub gas: Option<Value>,
}

/// Provider request, classified by method.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcRequest {
    SendTransaction {
        request: EthTransactionRequest,
        id: Value,
        jsonrpc: String,
    },
    Passthrough(RpcPayload),
}

impl TryFrom<RpcPayload> for RpcRequest {
    type Error = ConnectorError;

    fn try_from(payload: RpcPayload) -> Result<Self, Self::Error> {
        if payload.method != ETH_SEND_TRANSACTION {
            return Ok(RpcRequest::Passthrough(payload));
        }

        let first = payload.params.into_iter().next().ok_or_else(|| {
            ConnectorError::InvalidPayload(format!("{} requires a transaction object", ETH_SEND_TRANSACTION))
        })?;

        let request: EthTransactionRequest = serde_json::from_value(first)
            .map_err(|e| ConnectorError::InvalidPayload(format!("Malformed transaction object: {}", e)))?;

        Ok(RpcRequest::SendTransaction {
            request,
            id: payload.id,
            jsonrpc: payload.jsonrpc,
        })
    }
}

/// Input of `send_eth`: a bare method name or a full payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EthQuery {
    Method(String),
    Payload(RpcPayload),
}

impl EthQuery {
    pub fn into_call(self) -> (String, Vec<Value>) {
        match self {
            EthQuery::Method(method) => (method, Vec::new()),
            EthQuery::Payload(payload) => (payload.method, payload.params),
        }
    }
}

impl From<&str> for EthQuery {
    fn from(method: &str) -> Self {
        EthQuery::Method(method.to_string())
    }
}

impl From<String> for EthQuery {
    fn from(method: String) -> Self {
        EthQuery::Method(method)
    }
}

impl From<RpcPayload> for EthQuery {
    fn from(payload: RpcPayload) -> Self {
        EthQuery::Payload(payload)
    }
}
