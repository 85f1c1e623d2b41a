//! Network configuration for peer-quality tracking.
//!
//! All values have documented defaults. Validation rejects threshold
//! combinations that would make the health derivation meaningless.

use std::time::Duration;

use libp2p::multiaddr::Protocol;
use libp2p::Multiaddr;
use serde::{Deserialize, Serialize};

use hoprd_types::{HoprdError, Result};

/// Heartbeat and peer-quality configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Addresses the node listens on.
    ///
    /// Default: `/ip4/0.0.0.0/tcp/9091`.
    #[serde(with = "multiaddr_vec_serde")]
    pub listen_addrs: Vec<Multiaddr>,

    /// Minimum heartbeat delay in seconds. Multiplied by the peer backoff.
    pub min_delay_secs: u64,

    /// Maximum heartbeat delay in seconds.
    pub max_delay_secs: u64,

    /// Quality below which a peer is ignored for `ignore_timeframe_secs`.
    pub quality_bad_threshold: f64,

    /// Quality below which a peer counts as offline.
    pub quality_offline_threshold: f64,

    /// Quality gained on a successful heartbeat and lost on a failed one.
    pub quality_step: f64,

    /// Seconds an ignored peer is refused re-entry into the registry.
    pub ignore_timeframe_secs: u64,

    /// Exponent applied to the backoff after each failed heartbeat.
    pub backoff_exponent: f64,

    /// Backoff assigned to fresh and recovered peers.
    pub backoff_min: f64,

    /// Upper bound for the backoff.
    pub backoff_max: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut listen_addr = Multiaddr::empty();
        listen_addr.push(Protocol::Ip4(std::net::Ipv4Addr::UNSPECIFIED));
        listen_addr.push(Protocol::Tcp(9091));

        let min_delay_secs = 1;
        let max_delay_secs = 300;

        Self {
            listen_addrs: vec![listen_addr],
            min_delay_secs,
            max_delay_secs,
            quality_bad_threshold: 0.2,
            quality_offline_threshold: 0.5,
            quality_step: 0.1,
            ignore_timeframe_secs: 600,
            backoff_exponent: 1.5,
            backoff_min: 2.0,
            backoff_max: max_delay_secs as f64 / min_delay_secs as f64,
        }
    }
}

impl NetworkConfig {
    /// Minimum heartbeat delay.
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs(self.min_delay_secs)
    }

    /// Maximum heartbeat delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    /// Ignore window for peers that fell below the bad threshold.
    pub fn ignore_timeframe(&self) -> Duration {
        Duration::from_secs(self.ignore_timeframe_secs)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.min_delay_secs == 0 {
            return Err(HoprdError::ConfigError {
                reason: "min_delay_secs must be greater than 0".into(),
            });
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(HoprdError::ConfigError {
                reason: "min_delay_secs must not exceed max_delay_secs".into(),
            });
        }
        if !(self.quality_step > 0.0 && self.quality_step <= 1.0) {
            return Err(HoprdError::ConfigError {
                reason: "quality_step must be within (0.0, 1.0]".into(),
            });
        }
        if self.quality_offline_threshold < self.quality_bad_threshold {
            return Err(HoprdError::ConfigError {
                reason: format!(
                    "bad quality threshold {} must be lower than offline threshold {}",
                    self.quality_bad_threshold, self.quality_offline_threshold
                ),
            });
        }
        if self.backoff_min < 1.0 || self.backoff_max < self.backoff_min {
            return Err(HoprdError::ConfigError {
                reason: "backoff bounds must satisfy 1.0 <= backoff_min <= backoff_max".into(),
            });
        }
        if self.backoff_exponent < 1.0 {
            return Err(HoprdError::ConfigError {
                reason: "backoff_exponent must be at least 1.0".into(),
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Serde helpers: Multiaddr is (de)serialized through its string form
// ---------------------------------------------------------------------------

mod multiaddr_vec_serde {
    use libp2p::Multiaddr;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(addrs: &[Multiaddr], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(addrs.len()))?;
        for addr in addrs {
            seq.serialize_element(&addr.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<Multiaddr>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| s.parse().map_err(serde::de::Error::custom))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
