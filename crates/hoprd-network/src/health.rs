//! Peer registry and connectivity-health derivation.
//!
//! [`Network`] tracks every known peer together with a heartbeat
//! quality score. The aggregate [`Health`] is recomputed whenever a
//! peer entry changes:
//!
//! ```text
//! no peers / only offline non-public ──▶ RED
//! any low-quality public peer        ──▶ ORANGE
//! any high-quality public peer       ──▶ YELLOW
//!   + high-quality non-public peer
//!     or this node is public         ──▶ GREEN
//! ```
//!
//! Side effects towards the transport (closing connections, health
//! change notifications) go through [`NetworkExternalActions`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hoprd_types::{Health, PeerId};

use crate::config::NetworkConfig;

// ---------------------------------------------------------------------------
// PeerOrigin
// ---------------------------------------------------------------------------

/// How a peer entered the registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PeerOrigin {
    Initialization,
    NetworkRegistry,
    IncomingConnection,
    OutgoingConnection,
    StrategyExistingChannel,
    StrategyConsideringChannel,
    StrategyNewChannel,
    ManualPing,
    Testing,
}

impl fmt::Display for PeerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::Initialization => "node initialization",
            Self::NetworkRegistry => "network registry",
            Self::IncomingConnection => "incoming connection",
            Self::OutgoingConnection => "outgoing connection attempt",
            Self::StrategyExistingChannel => "strategy monitors existing channel",
            Self::StrategyConsideringChannel => "strategy considers opening a channel",
            Self::StrategyNewChannel => "strategy decided to open new channel",
            Self::ManualPing => "manual ping",
            Self::Testing => "testing",
        };
        f.write_str(description)
    }
}

// ---------------------------------------------------------------------------
// NetworkExternalActions
// ---------------------------------------------------------------------------

/// Callbacks into the transport layer owning the actual connections.
pub trait NetworkExternalActions: Send + Sync {
    /// Whether the peer is publicly reachable (not behind a NAT).
    fn is_public(&self, peer: &PeerId) -> bool;

    /// Close any open connection to the peer.
    fn close_connection(&self, peer: &PeerId);

    /// The peer's quality dropped below the offline threshold.
    fn on_peer_offline(&self, peer: &PeerId);

    /// The aggregate health changed.
    fn on_network_health_change(&self, old: Health, new: Health);
}

// ---------------------------------------------------------------------------
// PeerStatus
// ---------------------------------------------------------------------------

/// Heartbeat bookkeeping for one peer.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerStatus {
    pub id: PeerId,
    pub origin: PeerOrigin,
    pub is_public: bool,
    /// Unix timestamp (milliseconds) of the last successful heartbeat.
    pub last_seen: u64,
    pub quality: f64,
    pub heartbeats_sent: u64,
    pub heartbeats_succeeded: u64,
    pub backoff: f64,
}

impl PeerStatus {
    fn new(id: PeerId, origin: PeerOrigin, backoff: f64) -> Self {
        Self {
            id,
            origin,
            is_public: false,
            last_seen: 0,
            quality: 0.0,
            heartbeats_sent: 0,
            heartbeats_succeeded: 0,
            backoff,
        }
    }
}

impl fmt::Display for PeerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entry: [id={}, origin={}, last seen on={}, quality={}, heartbeats sent={}, heartbeats succeeded={}, backoff={}]",
            self.id,
            self.origin,
            self.last_seen,
            self.quality,
            self.heartbeats_sent,
            self.heartbeats_succeeded,
            self.backoff
        )
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Registry of known peers and the health derived from them.
pub struct Network {
    me: PeerId,
    cfg: NetworkConfig,
    entries: HashMap<PeerId, PeerStatus>,
    /// Peer → unix timestamp (ms) when it was put on the ignore list.
    ignored: HashMap<PeerId, u64>,
    good_quality_public: HashSet<PeerId>,
    bad_quality_public: HashSet<PeerId>,
    good_quality_non_public: HashSet<PeerId>,
    bad_quality_non_public: HashSet<PeerId>,
    last_health: Health,
    actions: Box<dyn NetworkExternalActions>,
}

impl Network {
    /// Creates an empty registry for the node `me`.
    ///
    /// `cfg` is expected to have passed [`NetworkConfig::validate`].
    pub fn new(me: PeerId, cfg: NetworkConfig, actions: Box<dyn NetworkExternalActions>) -> Self {
        Self {
            me,
            cfg,
            entries: HashMap::new(),
            ignored: HashMap::new(),
            good_quality_public: HashSet::new(),
            bad_quality_public: HashSet::new(),
            good_quality_non_public: HashSet::new(),
            bad_quality_non_public: HashSet::new(),
            last_health: Health::Unknown,
            actions,
        }
    }

    /// Current aggregate connectivity health.
    pub fn health(&self) -> Health {
        self.last_health
    }

    /// The id of the node owning this registry.
    pub fn me(&self) -> PeerId {
        self.me
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.cfg
    }

    /// Whether the peer is present in the registry.
    pub fn has(&self, peer: &PeerId) -> bool {
        self.entries.contains_key(peer)
    }

    /// Number of tracked peers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no peers are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a peer using the current wall-clock time for ignore checks.
    pub fn add(&mut self, peer: &PeerId, origin: PeerOrigin) {
        self.add_at(peer, origin, current_timestamp());
    }

    /// Adds a peer unless it is this node, already known, or still ignored at `now`.
    pub fn add_at(&mut self, peer: &PeerId, origin: PeerOrigin, now: u64) {
        if *peer == self.me || self.entries.contains_key(peer) {
            return;
        }

        if let Some(since) = self.ignored.get(peer).copied() {
            if Duration::from_millis(now.saturating_sub(since)) > self.cfg.ignore_timeframe() {
                self.ignored.remove(peer);
            } else {
                tracing::debug!(%peer, "not adding ignored peer");
                return;
            }
        }

        let mut entry = PeerStatus::new(*peer, origin, self.cfg.backoff_min);
        entry.is_public = self.actions.is_public(peer);
        tracing::debug!(%peer, %origin, "adding peer");
        self.refresh_network_status(&entry);
        self.entries.insert(*peer, entry);
    }

    /// Removes a peer and its contribution to the health.
    pub fn remove(&mut self, peer: &PeerId) {
        self.prune_from_network_status(peer);
        self.entries.remove(peer);
        self.recompute_health();
    }

    /// Records a heartbeat result for a known peer.
    ///
    /// `result` is `Some(timestamp_ms)` for a successful heartbeat and
    /// `None` for a failed one.
    pub fn update(&mut self, peer: &PeerId, result: Option<u64>) {
        let Some(existing) = self.entries.get(peer) else {
            tracing::info!(%peer, "ignoring update request for unknown peer");
            return;
        };

        let mut entry = existing.clone();
        entry.heartbeats_sent += 1;
        entry.is_public = self.actions.is_public(peer);

        match result {
            Some(timestamp) => {
                entry.last_seen = timestamp;
                entry.heartbeats_succeeded += 1;
                entry.backoff = self.cfg.backoff_min;
                entry.quality = (entry.quality + self.cfg.quality_step).min(1.0);
            }
            None => {
                entry.backoff = entry
                    .backoff
                    .powf(self.cfg.backoff_exponent)
                    .min(self.cfg.backoff_max);
                entry.quality = (entry.quality - self.cfg.quality_step).max(0.0);

                if entry.quality < self.cfg.quality_step / 2.0 {
                    tracing::info!(%peer, "dropping peer with no remaining quality");
                    self.actions.close_connection(peer);
                    self.remove(peer);
                    return;
                } else if entry.quality < self.cfg.quality_bad_threshold {
                    self.ignored.insert(*peer, current_timestamp());
                } else if entry.quality < self.cfg.quality_offline_threshold {
                    self.actions.on_peer_offline(peer);
                }
            }
        }

        self.refresh_network_status(&entry);
        self.entries.insert(*peer, entry);
    }

    /// Returns a copy of the peer's status, if known.
    pub fn get_peer_status(&self, peer: &PeerId) -> Option<PeerStatus> {
        self.entries.get(peer).cloned()
    }

    /// Peers matching the predicate.
    pub fn filter<F>(&self, f: F) -> Vec<PeerId>
    where
        F: FnMut(&&PeerStatus) -> bool,
    {
        self.entries.values().filter(f).map(|s| s.id).collect()
    }

    /// Peers whose next heartbeat is due before `threshold` (unix ms),
    /// least recently seen first.
    pub fn find_peers_to_ping(&self, threshold: u64) -> Vec<PeerId> {
        let mut due: Vec<&PeerStatus> = self
            .entries
            .values()
            .filter(|s| {
                let backoff = s.backoff.powf(self.cfg.backoff_exponent);
                let delay = self
                    .cfg
                    .min_delay()
                    .mul_f64(backoff)
                    .min(self.cfg.max_delay());
                s.last_seen.saturating_add(delay.as_millis() as u64) < threshold
            })
            .collect();
        due.sort_by_key(|s| s.last_seen);
        due.into_iter().map(|s| s.id).collect()
    }

    fn refresh_network_status(&mut self, entry: &PeerStatus) {
        self.prune_from_network_status(&entry.id);

        let good = entry.quality >= self.cfg.quality_offline_threshold;
        let bucket = match (good, entry.is_public) {
            (true, true) => &mut self.good_quality_public,
            (true, false) => &mut self.good_quality_non_public,
            (false, true) => &mut self.bad_quality_public,
            (false, false) => &mut self.bad_quality_non_public,
        };
        bucket.insert(entry.id);

        self.recompute_health();
    }

    fn recompute_health(&mut self) {
        let mut health = Health::Red;

        if !self.bad_quality_public.is_empty() {
            health = Health::Orange;
        }

        if !self.good_quality_public.is_empty() {
            health = if !self.good_quality_non_public.is_empty() || self.actions.is_public(&self.me)
            {
                Health::Green
            } else {
                Health::Yellow
            };
        }

        if health != self.last_health {
            tracing::info!(old = %self.last_health, new = %health, "network health changed");
            self.actions.on_network_health_change(self.last_health, health);
            self.last_health = health;
        }
    }

    fn prune_from_network_status(&mut self, peer: &PeerId) {
        self.good_quality_public.remove(peer);
        self.good_quality_non_public.remove(peer);
        self.bad_quality_public.remove(peer);
        self.bad_quality_non_public.remove(peer);
    }
}

/// Current unix timestamp in milliseconds.
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
