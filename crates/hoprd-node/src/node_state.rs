//! In-process [`NodeStateAccess`] backed by the peer registry.
//!
//! Identity, listening addresses and connectivity health are read from
//! the shared [`Network`]; the remaining fields are fixed at startup.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use hoprd_network::Network;
use hoprd_types::{Health, Multiaddr, PeerId, Result};

use crate::collaborators::{NodeStateAccess, SmartContractInfo};

/// Node state served from the running node's own bookkeeping.
pub struct LocalNodeState {
    network_id: String,
    contracts: SmartContractInfo,
    announced: Vec<Multiaddr>,
    /// `None` when the network registry is disabled and every peer is admitted.
    registry: Option<HashSet<PeerId>>,
    network: Arc<RwLock<Network>>,
}

impl LocalNodeState {
    pub fn new(
        network_id: impl Into<String>,
        contracts: SmartContractInfo,
        network: Arc<RwLock<Network>>,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            contracts,
            announced: Vec::new(),
            registry: None,
            network,
        }
    }

    /// Sets the addresses announced to other nodes.
    pub fn with_announced(mut self, addrs: Vec<Multiaddr>) -> Self {
        self.announced = addrs;
        self
    }

    /// Restricts network access to the given peers.
    pub fn with_registry(mut self, allowed: impl IntoIterator<Item = PeerId>) -> Self {
        self.registry = Some(allowed.into_iter().collect());
        self
    }

    /// The peer registry the health is derived from.
    pub fn network(&self) -> &Arc<RwLock<Network>> {
        &self.network
    }
}

#[async_trait]
impl NodeStateAccess for LocalNodeState {
    async fn network_id(&self) -> Result<String> {
        Ok(self.network_id.clone())
    }

    async fn smart_contract_info(&self) -> Result<SmartContractInfo> {
        Ok(self.contracts.clone())
    }

    async fn announced_addresses(&self) -> Result<Vec<Multiaddr>> {
        Ok(self.announced.clone())
    }

    async fn listening_addresses(&self) -> Result<Vec<Multiaddr>> {
        Ok(self.network.read().config().listen_addrs.clone())
    }

    async fn own_id(&self) -> Result<PeerId> {
        Ok(self.network.read().me())
    }

    async fn is_allowed_access_to_network(&self, peer: &PeerId) -> Result<bool> {
        Ok(self
            .registry
            .as_ref()
            .map_or(true, |allowed| allowed.contains(peer)))
    }

    async fn connectivity_health(&self) -> Result<Health> {
        Ok(self.network.read().health())
    }
}
