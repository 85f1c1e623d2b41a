//! Network-side diagnostics for a hoprd node.
//!
//! # Architecture
//!
//! - [`config`]: heartbeat and peer-quality configuration with defaults
//! - [`health`]: peer registry that derives the connectivity [`Health`]
//! - [`ping`]: the [`Pinger`] collaborator seam and the single-shot
//!   [`ReachabilityProber`]
//!
//! [`Health`]: hoprd_types::Health

pub mod config;
pub mod health;
pub mod ping;

pub use config::NetworkConfig;
pub use health::{Network, NetworkExternalActions, PeerOrigin, PeerStatus};
pub use ping::{PingReply, Pinger, ProbeOutcome, ReachabilityProber};
