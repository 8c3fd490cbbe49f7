// Fixed-interval retry for Twitter API calls.
//
// The v1.1 rate-limit window is 15 minutes, so a rate-limited or transient
// failure sleeps for one full window before trying again. Terminal errors
// are returned immediately so the caller can abandon that unit of work.

use std::future::Future;

use tokio::time::Duration;
use tracing::warn;

use super::error::{ErrorKind, TwitterError};

/// Length of one Twitter rate-limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of attempts per request (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Sleep between attempts
    pub backoff: Duration,
    /// Total attempts before giving up, including the first
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: RATE_LIMIT_WINDOW,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Run `operation` until it succeeds, fails terminally, or runs out of attempts.
///
/// `label` identifies the request in log output (usually the screen name).
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> Result<T, TwitterError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, TwitterError>>,
{
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let kind = err.kind();
                if kind == ErrorKind::Terminal || attempt >= policy.max_attempts {
                    return Err(err);
                }

                warn!(
                    target_user = label,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    kind = ?kind,
                    at = %chrono::Local::now().format("%H:%M:%S %d-%m-%Y"),
                    "{err}, sleeping {}s before retry",
                    policy.backoff.as_secs()
                );

                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
        }
    }
}
