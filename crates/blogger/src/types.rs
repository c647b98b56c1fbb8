//! Shared value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Milliseconds elapsed between `self` and `later`, clamped at zero.
    pub fn millis_until(self, later: Timestamp) -> u64 {
        let delta = later.0.signed_duration_since(self.0).num_milliseconds();
        u64::try_from(delta).unwrap_or(0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn millis_until_measures_forward_time() {
        let start = Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let end = Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 2).unwrap());
        assert_eq!(start.millis_until(end), 2_000);
    }

    #[test]
    fn millis_until_clamps_backwards_time_to_zero() {
        let start = Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 2).unwrap());
        let end = Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(start.millis_until(end), 0);
    }

    #[test]
    fn display_is_rfc3339() {
        let ts = Timestamp(Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap());
        assert_eq!(ts.to_string(), "2024-03-09T12:30:00+00:00");
    }
}
