//! Periodic terminal resize detection

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::terminal::{LocalTerminal, TerminalSize};

/// How often the local terminal is re-measured
pub const RESIZE_INTERVAL: Duration = Duration::from_secs(1);

/// Remembers the last dimensions sent to the remote PTY
#[derive(Debug, Clone, Copy)]
pub struct ResizeTracker {
    last: TerminalSize,
}

impl ResizeTracker {
    pub fn new(initial: TerminalSize) -> Self {
        Self { last: initial }
    }

    /// Record a reading, returning it if it differs from the last known size
    pub fn observe(&mut self, current: TerminalSize) -> Option<TerminalSize> {
        if current == self.last {
            return None;
        }
        self.last = current;
        Some(current)
    }
}

/// Re-measure the terminal every second and forward changed sizes to `tx`.
///
/// Stops quietly on cancellation, when the receiver is gone, or when the
/// size query starts failing.
pub async fn watch_resize(
    terminal: Arc<dyn LocalTerminal>,
    initial: TerminalSize,
    tx: mpsc::Sender<TerminalSize>,
    cancel: CancellationToken,
) {
    let mut tracker = ResizeTracker::new(initial);
    let mut ticker = interval_at(Instant::now() + RESIZE_INTERVAL, RESIZE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let current = match terminal.size() {
                    Ok(size) => size,
                    Err(e) => {
                        tracing::debug!("Resize watch stopped: {}", e);
                        break;
                    }
                };
                if let Some(size) = tracker.observe(current) {
                    tracing::debug!("Terminal resized to {}x{}", size.cols, size.rows);
                    if tx.send(size).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pty::terminal::testing::ScriptedTerminal;

    fn size(cols: u16, rows: u16) -> TerminalSize {
        TerminalSize::new(cols, rows)
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let readings = [size(80, 24), size(80, 24), size(100, 30)];
        let mut tracker = ResizeTracker::new(readings[0]);

        // reading numbers start at 1; the first one seeds the tracker
        let changes: Vec<_> = readings
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, r)| tracker.observe(*r).map(|s| (i + 1, s)))
            .collect();

        assert_eq!(changes, vec![(3, size(100, 30))]);
    }

    #[test]
    fn test_tracker_updates_last_known() {
        let mut tracker = ResizeTracker::new(size(80, 24));
        assert_eq!(tracker.observe(size(100, 30)), Some(size(100, 30)));
        assert_eq!(tracker.observe(size(100, 30)), None);
        assert_eq!(tracker.observe(size(80, 24)), Some(size(80, 24)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_sends_single_change_then_stops_on_size_error() {
        let terminal = Arc::new(ScriptedTerminal::new(vec![Ok(size(80, 24)), Ok(size(100, 30))]));
        let (tx, mut rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(watch_resize(terminal, size(80, 24), tx, cancel));

        assert_eq!(rx.recv().await, Some(size(100, 30)));
        // third size query fails, loop exits and drops the sender
        assert_eq!(rx.recv().await, None);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_on_cancel() {
        let readings = (0..100).map(|_| Ok(size(80, 24))).collect();
        let terminal = Arc::new(ScriptedTerminal::new(readings));
        let (tx, mut rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(watch_resize(terminal, size(80, 24), tx, cancel.clone()));
        tokio::time::sleep(Duration::from_secs(3)).await;
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(rx.recv().await, None);
    }
}
