// Harmony Wallet - extension handle, chain client and transports
//
// Everything here models the outbound side: the wallet object injected by the
// browser extension and the node it talks to.

pub mod address;
pub mod client;
pub mod extension;
pub mod messenger;
pub mod transport;

pub use address::HarmonyAddressConverter;
pub use client::{ChainClient, ChainClientOptions};
pub use extension::{
    Bindings, ExtensionAccount, HarmonyExtension, NetworkConfig, SignedTransaction, WalletExtension,
};
pub use messenger::{ChainType, Messenger, RpcPrefix};
pub use transport::{HttpTransport, HttpTransportFactory, Transport, TransportFactory};
