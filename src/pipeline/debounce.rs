//! Debounce coordinator for the free-text query
//!
//! Decouples rapid query updates (one per keystroke) from pipeline
//! recomputation: a new raw value re-arms a single pending timer, and
//! only a value whose timer fires uninterrupted becomes the committed
//! query consumed by the filter stage.
//!
//! Uses the actor pattern with an mpsc command channel: at most one
//! timer is outstanding per coordinator, and dropping the handle
//! cancels any pending timer so a discarded view can never produce a
//! stale commit.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::warn;

/// Raw input buffer size; updates arrive one keystroke at a time, so a
/// small buffer is plenty
const RAW_INPUT_BUFFER: usize = 64;

/// Actor that owns the pending timer and the committed value
struct DebounceActor {
    receiver: mpsc::Receiver<String>,
    committed_tx: watch::Sender<String>,
    pending_tx: watch::Sender<bool>,
    delay: Duration,
}

impl DebounceActor {
    async fn run(mut self) {
        let sleep = time::sleep(Duration::ZERO);
        tokio::pin!(sleep);

        // Idle: None. Pending: Some(value) with the timer armed.
        let mut pending: Option<String> = None;

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    match msg {
                        Some(value) => {
                            // Re-enter Pending: the previous timer is
                            // superseded, never queued.
                            pending = Some(value);
                            let _ = self.pending_tx.send(true);
                            sleep.as_mut().reset(Instant::now() + self.delay);
                        }
                        // All handles dropped: tear down without
                        // committing whatever was pending.
                        None => break,
                    }
                }
                () = &mut sleep, if pending.is_some() => {
                    if let Some(value) = pending.take() {
                        let _ = self.committed_tx.send(value);
                    }
                    let _ = self.pending_tx.send(false);
                }
            }
        }
    }
}

/// Handle to a running debounce coordinator.
///
/// Clones share the same coordinator; the actor shuts down when the
/// last clone is dropped.
#[derive(Clone)]
pub struct DebounceHandle {
    raw_tx: mpsc::Sender<String>,
    committed_rx: watch::Receiver<String>,
    pending_rx: watch::Receiver<bool>,
}

impl DebounceHandle {
    /// Feed a new raw query value, restarting the quiet-period timer.
    ///
    /// Non-blocking; if the input buffer is somehow full the value is
    /// dropped with a warning rather than stalling the caller.
    pub fn update(&self, value: impl Into<String>) {
        if self.raw_tx.try_send(value.into()).is_err() {
            warn!("Debounce input buffer full, dropping query update");
        }
    }

    /// The last committed query value
    pub fn committed(&self) -> String {
        self.committed_rx.borrow().clone()
    }

    /// True while a raw value is waiting out its quiet period
    pub fn is_pending(&self) -> bool {
        *self.pending_rx.borrow()
    }

    /// Watch the committed value, for consumers that react to changes
    /// rather than polling
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed_rx.clone()
    }
}

/// Factory for the debounce actor
pub struct Debouncer;

impl Debouncer {
    /// Spawn a coordinator committing values after `delay` of quiet
    pub fn spawn(delay: Duration) -> DebounceHandle {
        let (raw_tx, receiver) = mpsc::channel(RAW_INPUT_BUFFER);
        let (committed_tx, committed_rx) = watch::channel(String::new());
        let (pending_tx, pending_rx) = watch::channel(false);

        let actor = DebounceActor {
            receiver,
            committed_tx,
            pending_tx,
            delay,
        };

        tokio::spawn(actor.run());

        DebounceHandle {
            raw_tx,
            committed_rx,
            pending_rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::yield_now;

    const DELAY: Duration = Duration::from_millis(300);

    /// Let the actor drain its input channel before advancing the clock
    async fn settle() {
        yield_now().await;
        yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_commits_after_quiet_period() {
        let handle = Debouncer::spawn(DELAY);

        handle.update("rust");
        settle().await;
        assert!(handle.is_pending());
        assert_eq!(handle.committed(), "");

        time::advance(Duration::from_millis(301)).await;
        settle().await;
        assert_eq!(handle.committed(), "rust");
        assert!(!handle.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_commits_only_final_value() {
        let handle = Debouncer::spawn(DELAY);

        // "a" at t=0, "ab" at t=100, "abc" at t=150
        handle.update("a");
        settle().await;
        time::advance(Duration::from_millis(100)).await;

        handle.update("ab");
        settle().await;
        time::advance(Duration::from_millis(50)).await;

        handle.update("abc");
        settle().await;

        // t=449: still pending, intermediate values never committed
        time::advance(Duration::from_millis(299)).await;
        settle().await;
        assert_eq!(handle.committed(), "");
        assert!(handle.is_pending());

        // t=450: exactly one commit, the final value
        time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(handle.committed(), "abc");
        assert!(!handle.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_input_restarts_timer() {
        let handle = Debouncer::spawn(DELAY);

        handle.update("first");
        settle().await;
        time::advance(Duration::from_millis(299)).await;

        handle.update("second");
        settle().await;

        // 299ms after the restart nothing has committed yet
        time::advance(Duration::from_millis(299)).await;
        settle().await;
        assert_eq!(handle.committed(), "");

        time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(handle.committed(), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_commit() {
        let handle = Debouncer::spawn(DELAY);
        let committed = handle.subscribe();

        handle.update("doomed");
        settle().await;
        drop(handle);
        settle().await;

        time::advance(Duration::from_millis(301)).await;
        settle().await;
        assert_eq!(*committed.borrow(), "");
    }
}
