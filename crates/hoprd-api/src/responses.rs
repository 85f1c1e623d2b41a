//! Response bodies and their conversion from internal values.
//!
//! Addresses use their canonical string forms, health uses its label
//! table and balances their decimal form. Conversions are pure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hoprd_network::ProbeOutcome;
use hoprd_node::{BalanceSnapshot, NodeInfo};
use hoprd_types::PeerId;

/// `GET /account/balances`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancesResponse {
    pub native: String,
    pub hopr: String,
}

impl From<BalanceSnapshot> for BalancesResponse {
    fn from(snapshot: BalanceSnapshot) -> Self {
        Self {
            native: snapshot.native.to_string(),
            hopr: snapshot.hopr.to_string(),
        }
    }
}

/// `GET /node/info`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfoResponse {
    pub network: String,
    pub announced_address: Vec<String>,
    pub listening_address: Vec<String>,
    pub chain: String,
    pub hopr_token: String,
    pub hopr_channels: String,
    pub hopr_network_registry: String,
    pub hopr_node_safe_registry: String,
    pub is_eligible: bool,
    pub connectivity_status: String,
    /// Minutes.
    pub channel_closure_period: u64,
}

impl From<&NodeInfo> for NodeInfoResponse {
    fn from(info: &NodeInfo) -> Self {
        Self {
            network: info.network.clone(),
            announced_address: info.announced_addresses.iter().map(|a| a.to_string()).collect(),
            listening_address: info.listening_addresses.iter().map(|a| a.to_string()).collect(),
            chain: info.contracts.chain.clone(),
            hopr_token: info.contracts.hopr_token_address.to_string(),
            hopr_channels: info.contracts.hopr_channels_address.to_string(),
            hopr_network_registry: info.contracts.hopr_network_registry_address.to_string(),
            hopr_node_safe_registry: info.contracts.hopr_node_safe_registry_address.to_string(),
            is_eligible: info.is_eligible,
            connectivity_status: info.connectivity_status.label().to_string(),
            channel_closure_period: info.channel_closure_period_minutes(),
        }
    }
}

/// `GET /peers/:peer/ping` on success or timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    /// Round-trip time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
}

impl PingResponse {
    /// Converts a probe outcome. Transport errors have no response body
    /// and are returned unchanged.
    pub fn from_outcome(outcome: ProbeOutcome) -> Result<Self, String> {
        match outcome {
            ProbeOutcome::Success { latency } => Ok(Self {
                latency: Some(latency.as_millis() as u64),
                timed_out: false,
            }),
            ProbeOutcome::Timeout => Ok(Self {
                latency: None,
                timed_out: true,
            }),
            ProbeOutcome::TransportError { reason } => Err(reason),
        }
    }
}

/// `GET /aliases`
pub type AliasesResponse = BTreeMap<String, String>;

pub fn aliases_response(entries: Vec<(String, PeerId)>) -> AliasesResponse {
    entries
        .into_iter()
        .map(|(alias, peer)| (alias, peer.to_base58()))
        .collect()
}
