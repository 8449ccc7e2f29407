//! Bounded readiness polling for the freshly booted server.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use che_core::error::{CheError, Result};
use che_messages::messages::MESSAGES;

/// How many times the liveness probe is attempted after boot.
pub const DEFAULT_ATTEMPTS: u32 = 30;

/// Pause between two probe attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Polls `probe` until it reports success, up to `attempts` times with
/// `interval` between tries.
///
/// The probe result is binary on purpose: any transport or protocol
/// failure counts as "not ready yet". Exhausting the budget yields a
/// timeout error carrying the user-facing ping message.
pub async fn wait_until_ready<F, Fut>(mut probe: F, attempts: u32, interval: Duration) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 1..=attempts {
        if probe().await {
            debug!("Server answered after {} attempt(s)", attempt);
            return Ok(());
        }
        debug!("Server not ready, attempt {}/{}", attempt, attempts);
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(CheError::Timeout(MESSAGES.up_ping_timeout.to_string()))
}
