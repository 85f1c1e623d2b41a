//! Diagnostic read-path of a hoprd node.
//!
//! # Architecture
//!
//! - [`alias`]: owned alias → peer id cache
//! - [`resolver`]: turns operator input into a [`PeerId`](hoprd_types::PeerId)
//! - [`collaborators`]: traits for the ledger and node-state subsystems
//! - [`node_state`]: node state read from the running node's peer registry
//! - [`aggregator`]: balance and node-info snapshots with their failure policies
//! - [`ping`]: resolve, probe and render one line of output

pub mod aggregator;
pub mod alias;
pub mod collaborators;
pub mod node_state;
pub mod ping;
pub mod resolver;

pub use aggregator::{BalanceSnapshot, NodeInfo, SnapshotAggregator};
pub use alias::AliasCache;
pub use collaborators::{LedgerAccess, NodeStateAccess, SmartContractInfo};
pub use node_state::LocalNodeState;
pub use ping::PingRunner;
pub use resolver::Resolver;
