//! Per-move time budget from a game clock.

use std::time::Duration;

/// Reserved for process and I/O latency on every move.
const MOVE_OVERHEAD_MS: u64 = 10;

/// Soft and hard limits for one move.
///
/// The hard limit is `(remaining - overhead) / divisor` plus three quarters
/// of the increment, capped at what is actually left. The soft limit is half
/// the hard limit: past it, a new iteration is unlikely to finish.
pub fn compute_limits(remaining: Duration, increment: Duration, divisor: u32) -> (Duration, Duration) {
    let remaining_ms = remaining.as_millis() as u64;
    let increment_ms = increment.as_millis() as u64;

    let usable = remaining_ms.saturating_sub(MOVE_OVERHEAD_MS).max(1);
    let hard = (usable / u64::from(divisor.max(1)) + increment_ms * 3 / 4)
        .min(usable)
        .max(1);
    let soft = (hard / 2).max(1);

    (Duration::from_millis(soft), Duration::from_millis(hard))
}
