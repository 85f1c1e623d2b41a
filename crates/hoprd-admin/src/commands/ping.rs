//! Ping command: resolve locally, ping through the node, print one line.
//!
//! Every failure is rendered as the printed line; the command itself
//! never fails.

use std::sync::Arc;
use std::time::Duration;

use hoprd_node::resolver::looks_like_peer_id;
use hoprd_node::{AliasCache, PingRunner, Resolver};
use hoprd_types::PeerId;

use crate::api_client::{ApiClient, HttpPinger};
use crate::output;
use crate::GlobalOpts;

const USAGE: &str = "usage: hopr-admin ping <PEER_ID_OR_ALIAS>";

pub async fn run(address: Option<String>, opts: &GlobalOpts) -> std::result::Result<(), String> {
    let line = match address {
        Some(address) => ping_line(&address, opts).await,
        None => USAGE.to_string(),
    };
    output::print_line(&line, opts.json);
    Ok(())
}

async fn ping_line(input: &str, opts: &GlobalOpts) -> String {
    let client = match ApiClient::new(
        &opts.api_endpoint,
        opts.api_token.clone(),
        http_timeout_secs(opts.timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => return e.to_string(),
    };

    let cache = AliasCache::default();
    match client.aliases().await {
        Ok(entries) => fill_cache(&cache, entries),
        Err(e) if !looks_like_peer_id(input.trim()) => return e.to_string(),
        Err(e) => tracing::warn!(error = %e, "alias list unavailable"),
    }

    let runner = PingRunner::new(
        Resolver::new(Arc::new(cache)),
        HttpPinger::new(client),
        Duration::from_secs(opts.timeout_secs),
    );
    runner.run(input).await
}

/// HTTP deadline for a probe of `probe_secs`: one second longer so the
/// probe deadline fires first.
fn http_timeout_secs(probe_secs: u64) -> u64 {
    probe_secs.saturating_add(1)
}

fn fill_cache(cache: &AliasCache, entries: impl IntoIterator<Item = (String, String)>) {
    for (alias, peer) in entries {
        let peer = match peer.parse::<PeerId>() {
            Ok(peer) => peer,
            Err(e) => {
                tracing::warn!(%alias, error = %e, "skipping alias with undecodable peer id");
                continue;
            }
        };
        if let Err(e) = cache.insert(&alias, peer) {
            tracing::warn!(%alias, error = %e, "skipping alias");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_timeout_outlasts_probe() {
        assert_eq!(http_timeout_secs(10), 11);
        assert_eq!(http_timeout_secs(u64::MAX), u64::MAX);
    }

    #[test]
    fn fill_cache_skips_bad_entries() {
        let bob = PeerId::random();
        let cache = AliasCache::default();
        fill_cache(
            &cache,
            vec![
                ("bob".to_string(), bob.to_base58()),
                ("eve".to_string(), "not-a-peer".to_string()),
                (" ".to_string(), PeerId::random().to_base58()),
            ],
        );
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("bob"), Some(bob));
    }
}
