// Connector configuration
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;

/// Chain id the provider's chain client is bound to.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Gas price attached to every transaction built by the provider.
pub const DEFAULT_GAS_PRICE: &str = "0x00000000001";

/// Shard every call and transaction is pinned to.
pub const DEFAULT_SHARD_ID: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// RPC endpoint override; the extension's own endpoint is used when absent.
    pub rpc: Option<String>,
    pub chain_id: u64,
    pub gas_price: String,
    pub supported_chain_ids: Option<Vec<u64>>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            rpc: None,
            chain_id: DEFAULT_CHAIN_ID,
            gas_price: DEFAULT_GAS_PRICE.to_string(),
            supported_chain_ids: None,
        }
    }
}

impl ConnectorConfig {
    pub fn with_rpc(mut self, rpc: impl Into<String>) -> Self {
        self.rpc = Some(rpc.into());
        self
    }

    pub fn with_supported_chain_ids(mut self, chain_ids: Vec<u64>) -> Self {
        self.supported_chain_ids = Some(chain_ids);
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ConnectorError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ConnectorError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if let Some(rpc) = &self.rpc {
            let url = url::Url::parse(rpc)?;
            if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
                return Err(ConnectorError::Config(format!(
                    "Unsupported RPC scheme: {}", url.scheme()
                )));
            }
        }

        if !self.gas_price.starts_with("0x")
            || self.gas_price.len() <= 2
            || !self.gas_price[2..].chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ConnectorError::Config(format!(
                "Gas price must be a 0x-prefixed hex quantity, got '{}'", self.gas_price
            )));
        }

        if let Some(chain_ids) = &self.supported_chain_ids {
            if chain_ids.is_empty() {
                return Err(ConnectorError::Config(
                    "supportedChainIds must not be empty when set".to_string()
                ));
            }
        }

        Ok(())
    }

    /// Every chain is accepted when no list is configured.
    pub fn is_supported_chain_id(&self, chain_id: u64) -> bool {
        match &self.supported_chain_ids {
            Some(chain_ids) => chain_ids.contains(&chain_id),
            None => true,
        }
    }
}
