use std::time::Duration;

use super::error::{Error, Result};
use crate::store::AdminStore;
use tracing::{debug, warn};

/// Bounded poll of the server with doubling backoff between failed pings.
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        ReadinessPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl ReadinessPolicy {
    /// Delay slept after the `attempt`-th failed ping (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Returns the number of pings it took for the server to answer.
pub async fn wait_until_ready(store: &impl AdminStore, policy: &ReadinessPolicy) -> Result<u32> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match store.ping().await {
            Ok(()) => {
                debug!("{:<12} - server answered ping #{attempt}", "READINESS");
                return Ok(attempt);
            }
            Err(last) if attempt >= max_attempts => {
                return Err(Error::NotReady {
                    attempts: attempt,
                    last,
                })
            }
            Err(err) => {
                let delay = policy.backoff(attempt);
                warn!(
                    "{:<12} - ping #{attempt} failed ({err}), retrying in {delay:?}",
                    "READINESS"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

// endregion: --- Test
