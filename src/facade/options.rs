//! Bucket write options

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Expiry applied when a caller passes a non-positive TTL.
pub const DEFAULT_TTL_SECS: u64 = 60;

// == TTL Unit ==
/// Unit a TTL amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlUnit {
    Milliseconds,
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TtlUnit {
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TtlUnit::Milliseconds => Duration::from_millis(amount),
            TtlUnit::Seconds => Duration::from_secs(amount),
            TtlUnit::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            TtlUnit::Hours => Duration::from_secs(amount.saturating_mul(3_600)),
            TtlUnit::Days => Duration::from_secs(amount.saturating_mul(86_400)),
        }
    }
}

// == Set Options ==
/// How a bucket value is stored.
///
/// The default stores the value without expiry. When a TTL is given, any
/// amount `<= 0` is replaced by [`DEFAULT_TTL_SECS`] seconds whatever the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    pub ttl: Option<i64>,
    pub unit: TtlUnit,
}

impl SetOptions {
    pub fn persistent() -> Self {
        Self::default()
    }

    /// TTL in seconds.
    pub fn with_ttl(ttl: i64) -> Self {
        Self::with_ttl_unit(ttl, TtlUnit::Seconds)
    }

    pub fn with_ttl_unit(ttl: i64, unit: TtlUnit) -> Self {
        Self {
            ttl: Some(ttl),
            unit,
        }
    }

    /// Resolved expiry, `None` for a persistent value.
    pub fn expiry(&self) -> Option<Duration> {
        self.ttl.map(|ttl| match u64::try_from(ttl) {
            Ok(amount) if amount > 0 => self.unit.to_duration(amount),
            _ => Duration::from_secs(DEFAULT_TTL_SECS),
        })
    }
}
