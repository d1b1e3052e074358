//! Coalescing of rapid input changes.
//!
//! Every [`Debouncer::trigger`] restarts the quiet-period timer. Once the
//! timer runs out, [`Debounced::next`] yields the most recent value; the
//! values it replaced are dropped without being delivered. When every
//! trigger handle is gone, a pending value is delivered immediately and the
//! stream then ends.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

/// Trigger side of a debounced channel. Cheap to clone.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Receiving side of a debounced channel.
#[derive(Debug)]
pub struct Debounced<T> {
    rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
}

impl<T> Debouncer<T> {
    /// Creates a debounced channel with the given quiet period.
    pub fn channel(quiet: Duration) -> (Debouncer<T>, Debounced<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Debouncer { tx }, Debounced { rx, quiet })
    }

    /// Submits a new value, superseding any value still waiting.
    ///
    /// Returns `false` if the receiving side has been dropped.
    pub fn trigger(
        &self,
        value: T,
    ) -> bool {
        self.tx.send(value).is_ok()
    }
}

impl<T> Debounced<T> {
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Waits for the next burst of triggers to settle and returns its last
    /// value, or `None` once all triggers are dropped and nothing is pending.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        let mut superseded = 0u32;

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(value) => {
                        latest = value;
                        superseded += 1;
                    }
                    None => {
                        debug!(superseded, "trigger side closed; flushing pending value");
                        return Some(latest);
                    }
                },
                _ = sleep(self.quiet) => {
                    debug!(superseded, "input settled");
                    return Some(latest);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_delivers_only_last_value() {
        let (trigger, mut debounced) = Debouncer::channel(QUIET);

        trigger.trigger(1);
        trigger.trigger(2);
        trigger.trigger(3);

        assert_eq!(debounced.next().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn each_trigger_restarts_the_timer() {
        let (trigger, mut debounced) = Debouncer::channel(QUIET);
        let start = Instant::now();

        tokio::spawn(async move {
            trigger.trigger("a");
            sleep(Duration::from_millis(200)).await;
            trigger.trigger("b");
            sleep(Duration::from_millis(200)).await;
            trigger.trigger("c");
            // Keep the sender alive past the quiet period.
            sleep(Duration::from_secs(5)).await;
        });

        assert_eq!(debounced.next().await, Some("c"));
        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn values_separated_by_quiet_period_are_all_delivered() {
        let (trigger, mut debounced) = Debouncer::channel(QUIET);

        trigger.trigger(10);
        assert_eq!(debounced.next().await, Some(10));

        trigger.trigger(20);
        assert_eq!(debounced.next().await, Some(20));
    }

    #[tokio::test(start_paused = true)]
    async fn closing_flushes_pending_value_then_ends() {
        let (trigger, mut debounced) = Debouncer::channel(QUIET);
        let start = Instant::now();

        trigger.trigger(7);
        drop(trigger);

        assert_eq!(debounced.next().await, Some(7));
        assert!(start.elapsed() < QUIET);
        assert_eq!(debounced.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_reports_closed_receiver() {
        let (trigger, debounced) = Debouncer::channel(QUIET);
        drop(debounced);

        assert!(!trigger.trigger(1));
    }
}
