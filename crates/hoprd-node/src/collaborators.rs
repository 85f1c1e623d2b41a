//! Subsystems consumed by the diagnostic read-path.
//!
//! Each accessor is independently failable. Production code backs these
//! traits with the chain client and the running node; tests substitute
//! hand-written fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use hoprd_types::{Balance, ChainAddress, Health, Multiaddr, PeerId, Result};

/// Contract addresses and chain parameters the node is configured with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartContractInfo {
    /// Chain name, e.g. `gnosis`.
    pub chain: String,
    pub hopr_token_address: ChainAddress,
    pub hopr_channels_address: ChainAddress,
    pub hopr_network_registry_address: ChainAddress,
    pub hopr_node_safe_registry_address: ChainAddress,
    /// Channel closure notice period, in seconds.
    pub notice_period_channel_closure: u64,
}

impl SmartContractInfo {
    /// The notice period as a [`Duration`].
    pub fn notice_period(&self) -> Duration {
        Duration::from_secs(self.notice_period_channel_closure)
    }
}

/// Balance queries against the ledger.
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Balance in the chain's native currency.
    async fn native_balance(&self) -> Result<Balance>;

    /// Balance of the protocol token.
    async fn hopr_balance(&self) -> Result<Balance>;
}

/// State of the running node.
#[async_trait]
pub trait NodeStateAccess: Send + Sync {
    /// Identifier of the network the node participates in.
    async fn network_id(&self) -> Result<String>;

    async fn smart_contract_info(&self) -> Result<SmartContractInfo>;

    /// Addresses announced to the DHT. May wait for discovery.
    async fn announced_addresses(&self) -> Result<Vec<Multiaddr>>;

    /// Addresses the transport is bound to.
    async fn listening_addresses(&self) -> Result<Vec<Multiaddr>>;

    async fn own_id(&self) -> Result<PeerId>;

    /// Whether the network registry admits `peer`.
    async fn is_allowed_access_to_network(&self, peer: &PeerId) -> Result<bool>;

    async fn connectivity_health(&self) -> Result<Health>;
}
