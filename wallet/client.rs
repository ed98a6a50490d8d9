// Chain client - owns the messenger all rewired extension traffic flows through
use std::sync::Arc;

use super::messenger::{ChainType, Messenger};
use super::transport::{Transport, TransportFactory};
use crate::error::ConnectorError;

#[derive(Debug, Clone, Copy)]
pub struct ChainClientOptions {
    pub chain_type: ChainType,
    pub chain_id: u64,
    pub shard_id: u32,
}

pub struct ChainClient {
    url: String,
    messenger: Arc<Messenger>,
}

impl ChainClient {
    pub fn new(
        url: &str,
        options: ChainClientOptions,
        factory: &dyn TransportFactory,
    ) -> Result<Self, ConnectorError> {
        let transport = factory.connect(url)?;
        Ok(Self::with_transport(transport, options))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, options: ChainClientOptions) -> Self {
        let url = transport.url().to_string();
        let messenger = Messenger::with_shard(
            transport,
            options.chain_type,
            options.chain_id,
            options.shard_id,
        );

        Self {
            url,
            messenger: Arc::new(messenger),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn messenger(&self) -> Arc<Messenger> {
        Arc::clone(&self.messenger)
    }
}
