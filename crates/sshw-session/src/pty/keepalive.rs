//! Connection keepalive and liveness watch
//!
//! The `keepalive@openssh.com` requests themselves come from russh's session
//! loop, configured with [`KEEPALIVE_INTERVAL`] when dialing. russh 0.45
//! sends them with want-reply set and disconnects once too many go
//! unanswered. This task checks the connection on the same cadence and ends
//! when the transport is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

use super::channel::Connection;

/// Interval between `keepalive@openssh.com` requests
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

/// Check the connection every ten seconds until cancelled or it has closed
pub async fn keepalive_loop<C: Connection>(conn: Arc<C>, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + KEEPALIVE_INTERVAL, KEEPALIVE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if conn.is_closed() {
                    tracing::warn!("Connection closed, keepalive stopped");
                    break;
                }
                tracing::trace!("Connection alive");
            }
        }
    }
}
