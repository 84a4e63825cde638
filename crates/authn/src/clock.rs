//! Time source for issuance and verification.

use std::fmt;

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// The authority reads the clock once per operation. Tests substitute
/// [`ManualClock`](crate::testutil::ManualClock) to move past expiry without
/// sleeping.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as seconds since the Unix epoch.
    fn now_secs(&self) -> i64 {
        self.now().timestamp()
    }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
