//! # Temporal Types: Unix Timestamps and Clocks
//!
//! Defines `UnixTimestamp`, the integer-seconds nonce that binds an OTP and
//! its proof to the moment the vehicle generated them, and the [`Clock`]
//! trait through which every wall-clock read in the workspace flows.
//!
//! ## Hash Encoding
//!
//! A timestamp enters the OTP and proof hashes as its ASCII decimal form
//! (`1700000000` → the ten bytes `b"1700000000"`), so digests are
//! reproducible from any language that concatenates the secret and the
//! integer as text.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// Wrap a seconds value.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The seconds value.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// ASCII decimal rendering used in hash inputs.
    pub fn to_decimal(&self) -> String {
        self.0.to_string()
    }

    /// Render as ISO8601 with Z suffix, or `None` if out of chrono's range.
    pub fn to_iso8601(&self) -> Option<String> {
        let secs = i64::try_from(self.0).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    /// Signed distance `self - earlier` in seconds, saturating at the i64 range.
    pub fn seconds_since(&self, earlier: UnixTimestamp) -> i64 {
        let diff = i128::from(self.0) - i128::from(earlier.0);
        i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UnixTimestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// Source of the current time.
///
/// Vehicles sample it when generating an OTP; roadside units sample it only
/// when a freshness window is configured.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ClockBeforeEpoch`] if the underlying clock
    /// reports a pre-epoch instant.
    fn now(&self) -> Result<UnixTimestamp, CoreError>;
}

/// The host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<UnixTimestamp, CoreError> {
        let secs = Utc::now().timestamp();
        u64::try_from(secs)
            .map(UnixTimestamp)
            .map_err(|_| CoreError::ClockBeforeEpoch(secs))
    }
}

/// A manually driven clock for tests and replayable simulations.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    /// Clock frozen at `secs`.
    pub fn new(secs: u64) -> Self {
        Self(AtomicU64::new(secs))
    }

    /// Move the clock to `secs`.
    pub fn set(&self, secs: u64) {
        self.0.store(secs, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<UnixTimestamp, CoreError> {
        Ok(UnixTimestamp(self.0.load(Ordering::SeqCst)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_rendering() {
        assert_eq!(UnixTimestamp::from_secs(1_700_000_000).to_decimal(), "1700000000");
        assert_eq!(UnixTimestamp::from_secs(0).to_decimal(), "0");
    }

    #[test]
    fn iso8601_rendering() {
        let ts = UnixTimestamp::from_secs(1_700_000_000);
        assert_eq!(ts.to_iso8601().as_deref(), Some("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn iso8601_out_of_range_is_none() {
        assert!(UnixTimestamp::from_secs(u64::MAX).to_iso8601().is_none());
    }

    #[test]
    fn seconds_since_signed() {
        let a = UnixTimestamp::from_secs(100);
        let b = UnixTimestamp::from_secs(130);
        assert_eq!(b.seconds_since(a), 30);
        assert_eq!(a.seconds_since(b), -30);
    }

    #[test]
    fn seconds_since_saturates() {
        let a = UnixTimestamp::from_secs(0);
        let b = UnixTimestamp::from_secs(u64::MAX);
        assert_eq!(b.seconds_since(a), i64::MAX);
        assert_eq!(a.seconds_since(b), i64::MIN);
    }

    #[test]
    fn system_clock_is_after_2020() {
        let now = SystemClock.now().unwrap();
        assert!(now.as_secs() > 1_577_836_800);
    }

    #[test]
    fn fixed_clock_set_and_advance() {
        let clock = FixedClock::new(10);
        assert_eq!(clock.now().unwrap().as_secs(), 10);
        clock.advance(5);
        assert_eq!(clock.now().unwrap().as_secs(), 15);
        clock.set(1);
        assert_eq!(clock.now().unwrap().as_secs(), 1);
    }

    #[test]
    fn serde_is_plain_integer() {
        let ts = UnixTimestamp::from_secs(42);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "42");
    }
}
