//! Single-shot reachability probing.
//!
//! The transport that actually exchanges ping frames is abstracted as
//! [`Pinger`]. [`ReachabilityProber`] wraps one ping attempt in a
//! deadline and classifies the result. No retries are performed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hoprd_types::{PeerId, Result};

// ---------------------------------------------------------------------------
// Pinger
// ---------------------------------------------------------------------------

/// Raw answer of the transport to a ping request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PingReply {
    /// The peer answered. A negative latency is the transport's way of
    /// signalling that no answer arrived in time.
    Pong { latency_ms: i64 },
    /// The transport gave up waiting.
    TimedOut,
}

/// Sends one ping to a peer.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, peer: &PeerId) -> Result<PingReply>;
}

#[async_trait]
impl<T: Pinger + ?Sized> Pinger for Arc<T> {
    async fn ping(&self, peer: &PeerId) -> Result<PingReply> {
        (**self).ping(peer).await
    }
}

// ---------------------------------------------------------------------------
// ReachabilityProber
// ---------------------------------------------------------------------------

/// Classified result of one probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { latency: Duration },
    Timeout,
    TransportError { reason: String },
}

/// Probes peers through a [`Pinger`], at most one attempt per call.
pub struct ReachabilityProber<P> {
    pinger: P,
}

impl<P: Pinger> ReachabilityProber<P> {
    pub fn new(pinger: P) -> Self {
        Self { pinger }
    }

    /// Sends a single ping and waits at most `timeout` for it.
    pub async fn probe(&self, peer: &PeerId, timeout: Duration) -> ProbeOutcome {
        let outcome = match tokio::time::timeout(timeout, self.pinger.ping(peer)).await {
            Err(_) => ProbeOutcome::Timeout,
            Ok(Ok(PingReply::Pong { latency_ms })) if latency_ms >= 0 => ProbeOutcome::Success {
                latency: Duration::from_millis(latency_ms as u64),
            },
            Ok(Ok(_)) => ProbeOutcome::Timeout,
            Ok(Err(e)) => ProbeOutcome::TransportError {
                reason: e.to_string(),
            },
        };

        tracing::debug!(%peer, ?outcome, "probe finished");
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
