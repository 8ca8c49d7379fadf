//! The shared retry-and-send primitive.

use std::future::Future;
use std::time::Duration;

/// Retry policy shared by every retrying send in the system.
///
/// The backoff is flat: the same delay between every failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay between failed attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// Attempts `op` up to `policy.max_attempts` times, sleeping
/// `policy.backoff` between failures.
///
/// Returns `true` on the first success and `false` once all attempts are
/// exhausted. Errors never propagate past this boundary; each failure is
/// logged against `destination` and the caller decides what the final
/// boolean means.
pub async fn send_with_retry<F, Fut, E>(policy: RetryPolicy, destination: &str, mut op: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(()) => {
                if attempt > 1 {
                    tracing::info!(destination, attempt, "send succeeded after retry");
                }
                return true;
            }
            Err(e) => {
                tracing::warn!(destination, attempt, error = %e, "send attempt failed");
                metrics::counter!("send_attempt_failures_total").increment(1);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }
    false
}
