//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from system time. Enables deterministic tests
//! with a manually advanced clock and production use with real system
//! resources.

use std::time::Duration;

/// Abstract environment providing monotonic and wall-clock time.
///
/// Implementations MUST guarantee that `now()` never goes backwards within a
/// single execution context.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while test
    /// environments use a manually advanced clock.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current monotonic time, used for debounce deadlines.
    fn now(&self) -> Self::Instant;

    /// Current wall-clock time as milliseconds since the unix epoch, used
    /// for message timestamps.
    fn unix_millis(&self) -> u64;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait, and it should only be
    /// used by driver code (not session logic).
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
