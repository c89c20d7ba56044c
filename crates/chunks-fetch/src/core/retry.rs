use std::time::Duration;

/// Longest wait before re-expressing an Interest after a Congestion Nack.
pub const MAX_CONGESTION_BACKOFF: Duration = Duration::from_secs(10);

const CONGESTION_BACKOFF_BASE: Duration = Duration::from_millis(1);

/// Calculate the delay before a retry attempt using exponential backoff.
///
/// The delay formula is: `base * 2^retry_count`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use chunks_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry_count);
    base.saturating_mul(multiplier)
}

/// Wait after the `retry_count`-th consecutive Congestion Nack: `2^n` ms,
/// capped at [`MAX_CONGESTION_BACKOFF`].
pub fn congestion_backoff(retry_count: u32) -> Duration {
    retry_delay(retry_count, CONGESTION_BACKOFF_BASE).min(MAX_CONGESTION_BACKOFF)
}
