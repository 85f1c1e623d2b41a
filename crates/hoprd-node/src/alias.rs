//! Alias → peer id cache.
//!
//! The cache is an owned value injected into the [`Resolver`]. It is
//! filled at startup and read during request handling. Entries carry
//! no freshness guarantee.
//!
//! [`Resolver`]: crate::resolver::Resolver

use std::collections::HashMap;
use std::str::FromStr;

use parking_lot::RwLock;

use hoprd_types::{HoprdError, PeerId, Result};

use crate::resolver::looks_like_peer_id;

/// Default maximum alias length in characters.
pub const DEFAULT_MAX_ALIAS_LEN: usize = 64;

/// Trims, strips control characters and bounds the length of an alias.
pub fn sanitize_alias(s: &str, max_len: usize) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect()
}

// ---------------------------------------------------------------------------
// AliasCache
// ---------------------------------------------------------------------------

/// Thread-safe alias store with unique alias keys.
pub struct AliasCache {
    entries: RwLock<HashMap<String, PeerId>>,
    max_len: usize,
}

impl Default for AliasCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ALIAS_LEN)
    }
}

impl AliasCache {
    /// Creates an empty cache accepting aliases up to `max_len` characters.
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_len,
        }
    }

    /// Builds a cache from `(alias, peer)` pairs.
    ///
    /// Fails on the first invalid alias.
    pub fn from_entries<I, S>(max_len: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, PeerId)>,
        S: AsRef<str>,
    {
        let cache = Self::new(max_len);
        for (alias, peer) in entries {
            cache.insert(alias.as_ref(), peer)?;
        }
        Ok(cache)
    }

    /// Inserts or replaces an alias. Returns the sanitised name.
    pub fn insert(&self, alias: &str, peer: PeerId) -> Result<String> {
        let name = sanitize_alias(alias, self.max_len);
        if name.is_empty() {
            return Err(HoprdError::InvalidAlias {
                reason: "alias is empty".into(),
            });
        }
        if looks_like_peer_id(&name) || PeerId::from_str(&name).is_ok() {
            return Err(HoprdError::InvalidAlias {
                reason: format!("alias {name:?} is indistinguishable from a peer id"),
            });
        }

        if let Some(previous) = self.entries.write().insert(name.clone(), peer) {
            tracing::debug!(alias = %name, %previous, %peer, "alias re-pointed");
        }
        Ok(name)
    }

    /// Removes an alias, returning the peer it pointed to.
    ///
    /// `alias` must match a stored name exactly.
    pub fn remove(&self, alias: &str) -> Option<PeerId> {
        self.entries.write().remove(alias)
    }

    /// Looks up an alias by its exact stored name.
    pub fn get(&self, alias: &str) -> Option<PeerId> {
        self.entries.read().get(alias).copied()
    }

    /// All entries, sorted by alias.
    pub fn entries(&self) -> Vec<(String, PeerId)> {
        let mut entries: Vec<(String, PeerId)> = self
            .entries
            .read()
            .iter()
            .map(|(alias, peer)| (alias.clone(), *peer))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
