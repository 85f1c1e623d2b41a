//! Identifier resolution.
//!
//! Operator input is either a base58 peer id or an alias. Anything that
//! decodes as a peer id is returned directly and never looked up in the
//! alias cache. Input that only has the shape of a peer id is rejected
//! as malformed; everything else is treated as an alias.
//! Resolution is local and never performs I/O.

use std::str::FromStr;
use std::sync::Arc;

use hoprd_types::{PeerId, ResolutionError};

use crate::alias::AliasCache;

/// Bitcoin base58 alphabet used by libp2p peer ids.
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Leading characters of every base58 peer id: `1` for identity
/// multihashes (inlined public keys), `Qm` for sha2-256 multihashes.
const PEER_ID_PREFIXES: [&str; 2] = ["1", "Qm"];

/// Returns `true` if `input` has the shape of a base58 peer id.
///
/// This is a syntactic check only; the string may still fail to decode.
pub fn looks_like_peer_id(input: &str) -> bool {
    PEER_ID_PREFIXES.iter().any(|p| input.starts_with(p))
        && input.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// Maps operator input to a [`PeerId`].
#[derive(Clone)]
pub struct Resolver {
    aliases: Arc<AliasCache>,
}

impl Resolver {
    pub fn new(aliases: Arc<AliasCache>) -> Self {
        Self { aliases }
    }

    /// Resolves a peer id string or an alias.
    pub fn resolve(&self, input: &str) -> Result<PeerId, ResolutionError> {
        let input = input.trim();

        match PeerId::from_str(input) {
            Ok(peer) => return Ok(peer),
            Err(e) if looks_like_peer_id(input) => {
                return Err(ResolutionError::InvalidFormat {
                    input: input.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {}
        }

        self.aliases
            .get(input)
            .ok_or_else(|| ResolutionError::UnknownAlias {
                alias: input.to_string(),
            })
    }

    /// The alias cache consulted for non-peer-id input.
    pub fn aliases(&self) -> &Arc<AliasCache> {
        &self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(entries: &[(&str, PeerId)]) -> Resolver {
        let cache = AliasCache::default();
        for (alias, peer) in entries {
            cache.insert(alias, *peer).unwrap();
        }
        Resolver::new(Arc::new(cache))
    }

    #[test]
    fn canonical_peer_id_is_decoded_directly() {
        let peer = PeerId::random();
        let resolver = resolver_with(&[]);
        assert_eq!(resolver.resolve(&peer.to_base58()), Ok(peer));
    }

    #[test]
    fn keypair_peer_ids_are_decoded_directly() {
        let resolver = resolver_with(&[]);
        let ed25519 = libp2p::identity::Keypair::generate_ed25519()
            .public()
            .to_peer_id();
        let secp256k1 = libp2p::identity::Keypair::generate_secp256k1()
            .public()
            .to_peer_id();
        let random = PeerId::random();

        assert!(ed25519.to_base58().starts_with("12D3KooW"));
        assert!(secp256k1.to_base58().starts_with("16Uiu2"));
        assert!(random.to_base58().starts_with('1'));
        for peer in [ed25519, secp256k1, random] {
            assert_eq!(resolver.resolve(&peer.to_base58()), Ok(peer));
        }
    }

    #[test]
    fn alias_cache_never_shadows_a_peer_id() {
        let target = PeerId::random();
        let other = PeerId::random();
        let cache = AliasCache::default();
        // Rejected on insert, so a lookup by the id string cannot divert.
        assert!(cache.insert(&target.to_base58(), other).is_err());
        let resolver = Resolver::new(Arc::new(cache));
        assert_eq!(resolver.resolve(&target.to_base58()), Ok(target));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let peer = PeerId::random();
        let resolver = resolver_with(&[("alice", peer)]);
        assert_eq!(resolver.resolve(&format!("  {peer}\n")), Ok(peer));
        assert_eq!(resolver.resolve(" alice "), Ok(peer));
    }

    #[test]
    fn alias_is_looked_up() {
        let bob = PeerId::random();
        let resolver = resolver_with(&[("bob", bob)]);
        assert_eq!(resolver.resolve("bob"), Ok(bob));
    }

    #[test]
    fn unknown_alias_is_reported() {
        let resolver = resolver_with(&[("bob", PeerId::random())]);
        assert_eq!(
            resolver.resolve("carol"),
            Err(ResolutionError::UnknownAlias {
                alias: "carol".into()
            })
        );
    }

    #[test]
    fn near_miss_alias_is_unknown() {
        let long = "x".repeat(64);
        let resolver = resolver_with(&[
            ("bob", PeerId::random()),
            (long.as_str(), PeerId::random()),
        ]);
        for input in ["bo\u{7}b".to_string(), format!("{long}yyyy")] {
            assert_eq!(
                resolver.resolve(&input),
                Err(ResolutionError::UnknownAlias { alias: input.clone() })
            );
        }
    }

    #[test]
    fn truncated_peer_id_is_invalid_format() {
        let peer = PeerId::random().to_base58();
        let resolver = resolver_with(&[]);
        let truncated = &peer[..peer.len() - 5];
        assert!(matches!(
            resolver.resolve(truncated),
            Err(ResolutionError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn garbage_never_resolves() {
        let resolver = resolver_with(&[("bob", PeerId::random())]);
        for input in ["", "Qm", "12D3KooW", "16Uiu2zz", "b0b", "12D3KooW!!"] {
            assert!(resolver.resolve(input).is_err(), "{input:?} resolved");
        }
    }

    #[test]
    fn peer_id_shape_detection() {
        assert!(looks_like_peer_id(
            "12D3KooWEyoppNCUx8Yx66oV9fJnriXwCcXwDDUA2kj6vnc6iDEp"
        ));
        assert!(looks_like_peer_id(
            "16Uiu2HAmPLM9DHF1T2vv5s5Qxbn3BUFhwqEYzBXH5tpw7Kkkx3f"
        ));
        assert!(looks_like_peer_id("QmYyQSo1c1Ym7orWxLYvCrM2EmxFTANf8wXmmE7DWjhx5N"));
        assert!(looks_like_peer_id(&PeerId::random().to_base58()));
        assert!(!looks_like_peer_id("bob"));
        assert!(!looks_like_peer_id(""));
        // '0' and 'l' are not part of base58.
        assert!(!looks_like_peer_id("Qm0l"));
    }
}
