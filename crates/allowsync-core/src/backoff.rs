//! Jittered backoff for retry desynchronization
//!
//! Concurrent callers racing for the same version token will keep
//! colliding if they retry in lockstep. A uniform random delay before each
//! retry spreads them out.

use rand::Rng;
use std::time::Duration;

/// Default jitter ceiling between prefix-list retry attempts
pub const DEFAULT_JITTER_MAX: Duration = Duration::from_secs(2);

/// Pick a uniform random delay in `[0, max)`
pub fn jitter_delay(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..max.as_secs_f64()))
}
