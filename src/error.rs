// Connector errors shared by the wallet, provider and connector layers
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    /// Login, logout or signing was rejected by the wallet extension.
    #[error("Wallet extension error: {0}")]
    Extension(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object, or with no usable result.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Transport binding failed: {0}")]
    Binding(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ConnectorError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        ConnectorError::Rpc {
            code,
            message: message.into(),
        }
    }
}

impl From<url::ParseError> for ConnectorError {
    fn from(error: url::ParseError) -> Self {
        ConnectorError::Config(format!("Invalid RPC url: {}", error))
    }
}
