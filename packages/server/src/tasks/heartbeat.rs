//! Heartbeat background task.
//!
//! Sends a `ping` to every open connection on a fixed interval. The probe only
//! keeps idle sockets alive through intermediaries and gives clients an
//! application-level signal; eviction is left to transport close detection.
//!
//! The task exits when the cancellation token is triggered.

use std::{sync::Arc, time::Duration};

use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;

use crate::usecase::LivenessUseCase;

/// Start the heartbeat task.
///
/// The first probe is sent one `period` after start, not immediately.
///
/// # Arguments
///
/// * `liveness` - Liveness usecase used to probe connections
/// * `period` - Interval between probes
/// * `cancel_token` - Token for graceful shutdown
pub async fn start_heartbeat(
    liveness: Arc<LivenessUseCase>,
    period: Duration,
    cancel_token: CancellationToken,
) {
    tracing::info!("Starting heartbeat task (every {:?})", period);

    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let sent = liveness.probe_all().await;
                tracing::debug!("Heartbeat ping sent to {} connection(s)", sent);
            }
            _ = cancel_token.cancelled() => {
                tracing::info!("Heartbeat task received shutdown signal, exiting");
                break;
            }
        }
    }

    tracing::info!("Heartbeat task stopped");
}
