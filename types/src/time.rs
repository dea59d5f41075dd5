//! Chain time.
//!
//! Timestamps are Unix epoch seconds taken from block headers. Nothing in the
//! governance core reads the wall clock; "now" is always the head block time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). Also used as "never happened" for last-update fields.
    pub const EPOCH: Self = Self(0);

    /// The "infinite" sentinel: a deadline that is never reached.
    pub const MAX: Self = Self(u64::MAX);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether this is the infinite sentinel.
    pub fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    /// Add a duration, saturating at the sentinel.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_max() {
            write!(f, "never")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_saturates() {
        assert_eq!(Timestamp::MAX.plus_secs(10), Timestamp::MAX);
        assert_eq!(Timestamp::new(5).plus_secs(10), Timestamp::new(15));
    }

    #[test]
    fn sentinel_displays_as_never() {
        assert_eq!(Timestamp::MAX.to_string(), "never");
        assert_eq!(Timestamp::new(3).to_string(), "3s");
    }
}
