//! Subsystem snapshot aggregation.
//!
//! Two groups with different failure policies:
//!
//! - **balances**: all-or-nothing. Both balances are fetched
//!   concurrently; if either fails the group fails and no balance is
//!   returned.
//! - **node info**: the address lists degrade to empty on failure, every
//!   other field is required and fails the group.
//!
//! Dropping the returned futures abandons all in-flight fetches.

use std::sync::Arc;

use hoprd_types::{AggregationError, Balance, HoprdError, Health, Multiaddr, PeerId};

use crate::collaborators::{LedgerAccess, NodeStateAccess, SmartContractInfo};

const BALANCES: &str = "balances";
const NODE_INFO: &str = "node info";

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Both balances of the node, always fetched together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub native: Balance,
    pub hopr: Balance,
}

/// Composite view of the node's chain and network state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub network: String,
    pub id: PeerId,
    pub announced_addresses: Vec<Multiaddr>,
    pub listening_addresses: Vec<Multiaddr>,
    pub contracts: SmartContractInfo,
    pub is_eligible: bool,
    pub connectivity_status: Health,
}

impl NodeInfo {
    /// Channel closure notice period in whole minutes, truncated.
    pub fn channel_closure_period_minutes(&self) -> u64 {
        self.contracts.notice_period_channel_closure / 60
    }
}

// ---------------------------------------------------------------------------
// SnapshotAggregator
// ---------------------------------------------------------------------------

/// Fans out to the subsystem collaborators and assembles snapshots.
#[derive(Clone)]
pub struct SnapshotAggregator {
    ledger: Arc<dyn LedgerAccess>,
    state: Arc<dyn NodeStateAccess>,
}

impl SnapshotAggregator {
    pub fn new(ledger: Arc<dyn LedgerAccess>, state: Arc<dyn NodeStateAccess>) -> Self {
        Self { ledger, state }
    }

    /// Fetches native and token balance. Fails if either fetch fails.
    pub async fn balance_snapshot(&self) -> Result<BalanceSnapshot, AggregationError> {
        let (native, hopr) = tokio::join!(self.ledger.native_balance(), self.ledger.hopr_balance());

        let native = native.map_err(required(BALANCES, "native"))?;
        let hopr = hopr.map_err(required(BALANCES, "hopr"))?;

        Ok(BalanceSnapshot { native, hopr })
    }

    /// Fetches the node-info group.
    ///
    /// The own id is fetched first because eligibility is checked for it;
    /// the remaining accessors run concurrently.
    pub async fn node_info_snapshot(&self) -> Result<NodeInfo, AggregationError> {
        let id = self.state.own_id().await.map_err(required(NODE_INFO, "id"))?;

        let (network, contracts, announced, listening, eligible, health) = tokio::join!(
            self.state.network_id(),
            self.state.smart_contract_info(),
            self.state.announced_addresses(),
            self.state.listening_addresses(),
            self.state.is_allowed_access_to_network(&id),
            self.state.connectivity_health(),
        );

        Ok(NodeInfo {
            network: network.map_err(required(NODE_INFO, "network"))?,
            contracts: contracts.map_err(required(NODE_INFO, "smart contract info"))?,
            is_eligible: eligible.map_err(required(NODE_INFO, "eligibility"))?,
            connectivity_status: health.map_err(required(NODE_INFO, "connectivity health"))?,
            announced_addresses: or_empty(announced, "announced addresses"),
            listening_addresses: or_empty(listening, "listening addresses"),
            id,
        })
    }
}

fn required(
    group: &'static str,
    field: &'static str,
) -> impl FnOnce(HoprdError) -> AggregationError {
    move |source| AggregationError::PartialFailure {
        group,
        field,
        source,
    }
}

fn or_empty(result: hoprd_types::Result<Vec<Multiaddr>>, field: &'static str) -> Vec<Multiaddr> {
    result.unwrap_or_else(|e| {
        tracing::warn!(field, error = %e, "address list unavailable, reporting none");
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
