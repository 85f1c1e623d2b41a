//! Operator ping flow: resolve, probe once, render one line.

use std::time::Duration;

use hoprd_network::{Pinger, ProbeOutcome, ReachabilityProber};
use hoprd_types::ResolutionError;

use crate::resolver::Resolver;

/// Renders a probe outcome as the single line shown to the operator.
pub fn render_outcome(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Success { latency } => {
            format!("Pong received in {} ms", latency.as_millis())
        }
        ProbeOutcome::Timeout => "Could not ping node. Timeout.".to_string(),
        ProbeOutcome::TransportError { reason } => reason.clone(),
    }
}

/// Runs the full ping flow against a [`Pinger`].
pub struct PingRunner<P> {
    resolver: Resolver,
    prober: ReachabilityProber<P>,
    timeout: Duration,
}

impl<P: Pinger> PingRunner<P> {
    pub fn new(resolver: Resolver, pinger: P, timeout: Duration) -> Self {
        Self {
            resolver,
            prober: ReachabilityProber::new(pinger),
            timeout,
        }
    }

    /// Resolves `input` and probes the peer.
    pub async fn probe(&self, input: &str) -> Result<ProbeOutcome, ResolutionError> {
        let peer = self.resolver.resolve(input)?;
        tracing::debug!(input, %peer, "pinging");
        Ok(self.prober.probe(&peer, self.timeout).await)
    }

    /// Resolves, probes and renders. Every failure becomes the line itself.
    pub async fn run(&self, input: &str) -> String {
        match self.probe(input).await {
            Ok(outcome) => render_outcome(&outcome),
            Err(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use hoprd_network::PingReply;
    use hoprd_types::{HoprdError, PeerId};

    use super::*;
    use crate::alias::AliasCache;

    struct FixedPinger(std::result::Result<PingReply, &'static str>);

    #[async_trait]
    impl Pinger for FixedPinger {
        async fn ping(&self, _peer: &PeerId) -> hoprd_types::Result<PingReply> {
            self.0.map_err(|reason| HoprdError::NetworkError {
                reason: reason.into(),
            })
        }
    }

    fn runner(reply: std::result::Result<PingReply, &'static str>) -> PingRunner<FixedPinger> {
        let cache = AliasCache::default();
        cache.insert("bob", PeerId::random()).unwrap();
        PingRunner::new(
            Resolver::new(Arc::new(cache)),
            FixedPinger(reply),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn render_lines() {
        assert_eq!(
            render_outcome(&ProbeOutcome::Success {
                latency: Duration::from_millis(7)
            }),
            "Pong received in 7 ms"
        );
        assert_eq!(
            render_outcome(&ProbeOutcome::Timeout),
            "Could not ping node. Timeout."
        );
        assert_eq!(
            render_outcome(&ProbeOutcome::TransportError {
                reason: "boom".into()
            }),
            "boom"
        );
    }

    #[tokio::test]
    async fn zero_latency_renders_as_pong() {
        let line = runner(Ok(PingReply::Pong { latency_ms: 0 })).run("bob").await;
        assert_eq!(line, "Pong received in 0 ms");
    }

    #[tokio::test]
    async fn unknown_alias_renders_error_message() {
        let line = runner(Ok(PingReply::Pong { latency_ms: 1 }))
            .run("carol")
            .await;
        assert_eq!(
            line,
            ResolutionError::UnknownAlias {
                alias: "carol".into()
            }
            .to_string()
        );
    }

    #[tokio::test]
    async fn transport_error_renders_unmodified() {
        let line = runner(Err("connection refused")).run("bob").await;
        assert_eq!(line, "network error: connection refused");
    }
}
