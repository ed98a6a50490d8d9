// Harmony Wallet Connector - Library
// Lets a dapp drive the Harmony browser wallet through a generic connector interface

pub mod config;
pub mod error;
pub mod telemetry;

#[path = "../wallet/mod.rs"]
pub mod wallet;

#[path = "../provider/mod.rs"]
pub mod provider;

#[path = "../connector/mod.rs"]
pub mod connector;

// Re-exports for convenience
pub use config::ConnectorConfig;
pub use connector::{Connector, ConnectorUpdate, HmyWalletConnector, NO_CHAIN_ID};
pub use error::ConnectorError;
pub use provider::{EthQuery, HmyWalletProvider, RpcCallback, RpcPayload, RpcRequest, RpcResponse};
pub use wallet::{HarmonyAddressConverter, HarmonyExtension, WalletExtension};
