//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::error::ClientError;

/// How often and how many times to reconnect after losing the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub interval: Duration,
    /// 0 = unlimited
    pub max_reconnects: u32,
}

impl ReconnectPolicy {
    /// Whether another reconnect is allowed after `reconnects` earlier ones
    pub fn allows(&self, reconnects: u32) -> bool {
        self.max_reconnects == 0 || reconnects < self.max_reconnects
    }
}

/// Run `session` until it ends normally, reconnecting after transport loss.
///
/// Errors that are not about the transport (for example a refused seed role)
/// end the loop immediately. A session that connected before failing resets
/// the attempt counter, so `max_reconnects` bounds consecutive failures.
pub async fn run_with_reconnect(
    policy: ReconnectPolicy,
    mut session: impl AsyncFnMut() -> Result<(), ClientError>,
) -> Result<(), ClientError> {
    let mut reconnects = 0;

    loop {
        match session().await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("{}", e);

                if matches!(e, ClientError::ConnectionLost(_)) {
                    reconnects = 0;
                }

                if !policy.allows(reconnects) {
                    tracing::error!("Failed to reconnect after {} attempts. Exiting.", reconnects);
                    return Err(e);
                }
                reconnects += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {})",
                    policy.interval.as_secs(),
                    reconnects
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
