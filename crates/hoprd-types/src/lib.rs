//! Core shared types for the hoprd diagnostic read-path.
//!
//! This crate defines the value types that cross crate boundaries:
//! peer identities, chain addresses, balances, connectivity health and
//! the error taxonomy. Collaborator crates convert their failures into
//! [`HoprdError`]; the resolver and aggregator layers use the narrower
//! [`ResolutionError`] and [`AggregationError`].

pub mod config;

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

pub use libp2p::{Multiaddr, PeerId};

// ---------------------------------------------------------------------------
// ChainAddress
// ---------------------------------------------------------------------------

/// 20-byte on-chain account or contract address.
///
/// Rendered in the EIP-55 mixed-case checksummed form so the output is
/// stable and can be fed back into [`ChainAddress::from_str`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChainAddress([u8; 20]);

impl ChainAddress {
    /// The fixed byte length of an address.
    pub const LEN: usize = 20;

    /// Creates a new `ChainAddress` from raw bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the EIP-55 checksummed hex form, including the `0x` prefix.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl From<[u8; 20]> for ChainAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ChainAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for ChainAddress {
    type Err = HoprdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != Self::LEN * 2 {
            return Err(HoprdError::InvalidChainAddress {
                reason: format!("expected 40 hex characters, got {}", digits.len()),
            });
        }

        let bytes = hex::decode(digits).map_err(|_| HoprdError::InvalidChainAddress {
            reason: "invalid hex encoding".into(),
        })?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        let addr = Self(arr);

        // Single-case input carries no checksum; mixed case must match it.
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && addr.to_checksum()[2..] != *digits {
            return Err(HoprdError::InvalidChainAddress {
                reason: "checksum mismatch".into(),
            });
        }

        Ok(addr)
    }
}

impl Serialize for ChainAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for ChainAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Denomination of a [`Balance`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BalanceType {
    /// Native currency of the chain (pays for gas).
    Native,
    /// Protocol token.
    Hopr,
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Hopr => write!(f, "hopr"),
        }
    }
}

/// Arbitrary-precision on-chain balance in the smallest unit.
///
/// `Display` yields the plain decimal amount with no rounding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Balance {
    amount: U256,
    balance_type: BalanceType,
}

impl Balance {
    /// Creates a balance of the given denomination.
    pub fn new(amount: impl Into<U256>, balance_type: BalanceType) -> Self {
        Self {
            amount: amount.into(),
            balance_type,
        }
    }

    /// Zero balance of the given denomination.
    pub fn zero(balance_type: BalanceType) -> Self {
        Self::new(U256::zero(), balance_type)
    }

    /// Parses a decimal amount string.
    pub fn from_dec_str(s: &str, balance_type: BalanceType) -> Result<Self> {
        let amount = U256::from_dec_str(s).map_err(|e| HoprdError::InvalidBalance {
            reason: format!("{s:?} is not a decimal amount: {e:?}"),
        })?;
        Ok(Self::new(amount, balance_type))
    }

    /// Returns the raw amount.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    /// Returns the denomination.
    pub fn balance_type(&self) -> BalanceType {
        self.balance_type
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount)
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Connectivity quality of the node, ordered from worst to best.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Health {
    /// Not yet determined.
    #[default]
    Unknown = 0,
    /// No connection.
    Red = 1,
    /// Low quality connection to at least one public relay.
    Orange = 2,
    /// High quality connection to at least one public relay.
    Yellow = 3,
    /// High quality connection to at least one public relay and one NAT node.
    Green = 4,
}

impl Health {
    const LABELS: [&'static str; 5] = ["UNKNOWN", "RED", "ORANGE", "YELLOW", "GREEN"];

    /// All levels, worst first.
    pub const ALL: [Health; 5] = [
        Health::Unknown,
        Health::Red,
        Health::Orange,
        Health::Yellow,
        Health::Green,
    ];

    /// Stable external label for this level.
    pub fn label(&self) -> &'static str {
        Self::LABELS[*self as usize]
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Health {
    type Err = HoprdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.label() == s)
            .ok_or_else(|| HoprdError::InvalidHealth {
                reason: format!("unknown label {s:?}"),
            })
    }
}

// ---------------------------------------------------------------------------
// HoprdError
// ---------------------------------------------------------------------------

/// Central error type for collaborator and configuration failures.
#[derive(Debug, Error)]
pub enum HoprdError {
    /// The provided peer id string could not be decoded.
    #[error("invalid peer id: {reason}")]
    InvalidPeerId {
        /// Why decoding failed.
        reason: String,
    },

    /// The provided chain address is malformed or fails checksum validation.
    #[error("invalid chain address: {reason}")]
    InvalidChainAddress {
        /// Why the address is invalid.
        reason: String,
    },

    /// An alias name is empty after sanitising or collides with peer id syntax.
    #[error("invalid alias: {reason}")]
    InvalidAlias {
        /// Why the alias was rejected.
        reason: String,
    },

    /// A connectivity health label could not be parsed.
    #[error("invalid health: {reason}")]
    InvalidHealth {
        /// Why the label was rejected.
        reason: String,
    },

    /// A balance amount could not be parsed.
    #[error("invalid balance: {reason}")]
    InvalidBalance {
        /// Why the amount is invalid.
        reason: String,
    },

    /// A call into the chain/ledger collaborator failed.
    #[error("chain error: {reason}")]
    ChainError {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A networking or transport operation failed.
    #[error("network error: {reason}")]
    NetworkError {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },

    /// The HTTP API returned an unexpected response.
    #[error("api error: {reason}")]
    ApiError {
        /// Human-readable description of the failure.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// ResolutionError
// ---------------------------------------------------------------------------

/// Failure to turn an operator-supplied string into a [`PeerId`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResolutionError {
    /// The input looks like a peer id but does not decode.
    #[error("invalid peer id {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Decoder message.
        reason: String,
    },

    /// The input is not a peer id and no alias with that name is known.
    #[error("unknown alias {alias:?}")]
    UnknownAlias {
        /// The alias that was looked up.
        alias: String,
    },
}

// ---------------------------------------------------------------------------
// AggregationError
// ---------------------------------------------------------------------------

/// Failure of a coupled group of subsystem fetches.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// A required accessor of the group failed, so the group produced nothing.
    #[error("{group} unavailable: fetching {field} failed: {source}")]
    PartialFailure {
        /// Logical group name, e.g. `balances`.
        group: &'static str,
        /// The accessor that failed.
        field: &'static str,
        /// Underlying collaborator error.
        #[source]
        source: HoprdError,
    },
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`HoprdError`].
pub type Result<T> = std::result::Result<T, HoprdError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
