use serde::{Deserialize, Serialize};

/// Monotonic clock value in seconds, supplied by whoever drives `tick`.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub fn add_seconds(self, seconds: f64) -> Self { Self(self.0 + seconds) }

    pub fn add_millis(self, millis: f64) -> Self { self.add_seconds(millis / 1000.0) }

    /// Seconds elapsed since `earlier`. Negative if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> f64 { self.0 - earlier.0 }
}
