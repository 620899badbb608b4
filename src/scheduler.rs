//! Fixed-cadence refresh scheduling.
//!
//! The scheduler drives the roster fetcher on a tokio runtime: one
//! immediate fetch on start, then one per period. Every fetch carries a
//! monotonic sequence number so the consumer can discard a completion
//! that arrives after a newer one has already been applied. A generation
//! token, bumped on `stop()`, makes in-flight completions no-ops — they
//! are not cancelled, just discarded before delivery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::fetch::{FetchError, RosterFetcher};
use crate::source::{RosterSnapshot, ScheduledSource};

/// Default period between fetch ticks.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(5);

/// Outcome of one scheduled fetch, delivered to the consumer in
/// completion order.
#[derive(Debug)]
pub struct FetchEvent {
    /// Monotonic sequence number of the fetch that produced this event.
    pub seq: u64,
    /// Capture instant shared by every reading of this tick.
    pub captured_at: DateTime<Local>,
    /// The roster, or the failure that prevented it.
    pub result: Result<RosterSnapshot, FetchError>,
}

/// Drives periodic roster fetches and owns their lifecycle.
///
/// Created together with the [`ScheduledSource`] that consumes its
/// events. At most one driver may run per scheduler: `start()` on a
/// running scheduler is a precondition violation and panics.
pub struct RefreshScheduler<F> {
    fetcher: Arc<F>,
    period: Duration,
    tx: mpsc::Sender<FetchEvent>,
    generation: Arc<AtomicU64>,
    /// Next fetch sequence number; strictly increasing across restarts.
    seq: Arc<AtomicU64>,
    driver: Option<JoinHandle<()>>,
}

impl<F: RosterFetcher + 'static> RefreshScheduler<F> {
    /// Create a scheduler and the source that consumes its events.
    pub fn channel(fetcher: F, period: Duration) -> (Self, ScheduledSource) {
        let (tx, rx) = mpsc::channel(16);
        let scheduler = Self {
            fetcher: Arc::new(fetcher),
            period,
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            seq: Arc::new(AtomicU64::new(0)),
            driver: None,
        };
        let source = ScheduledSource::new(rx, &format!("poll every {:?}", period));
        (scheduler, source)
    }

    /// Start the refresh loop: one immediate fetch, then one per period.
    ///
    /// Must be called from within a tokio runtime. Panics if the
    /// scheduler is already running.
    pub fn start(&mut self) {
        assert!(self.driver.is_none(), "refresh scheduler already running");

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let generation = Arc::clone(&self.generation);
        let token = generation.load(Ordering::SeqCst);
        let seq = Arc::clone(&self.seq);
        let period = self.period;

        self.driver = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                // A slow fetch may still be running when the next tick
                // fires; each fetch is its own task so ticks never block.
                let fetcher = Arc::clone(&fetcher);
                let tx = tx.clone();
                let generation = Arc::clone(&generation);
                let fetch_seq = seq.fetch_add(1, Ordering::SeqCst);

                tokio::spawn(async move {
                    debug!(seq = fetch_seq, "fetching roster");
                    let result = fetcher.fetch_roster().await;

                    if generation.load(Ordering::SeqCst) != token {
                        debug!(seq = fetch_seq, "discarding completion after stop");
                        return;
                    }

                    if let Err(ref err) = result {
                        warn!(seq = fetch_seq, "roster fetch failed: {err}");
                    }

                    let event = FetchEvent {
                        seq: fetch_seq,
                        captured_at: Local::now(),
                        result,
                    };
                    // Receiver gone means the UI is shutting down
                    let _ = tx.send(event).await;
                });
            }
        }));
    }
}

impl<F> RefreshScheduler<F> {
    /// Stop the refresh loop.
    ///
    /// No further fetch is issued. In-flight fetches are not cancelled;
    /// their completions observe the bumped generation and are discarded.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }

    /// Whether the refresh loop is currently running.
    pub fn is_running(&self) -> bool {
        self.driver.is_some()
    }
}

impl<F> Drop for RefreshScheduler<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RosterSource, SerializedReading};
    use std::sync::atomic::AtomicUsize;

    /// Fetcher that counts calls and optionally delays each fetch.
    #[derive(Debug)]
    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl CountingFetcher {
        fn new(delay: Duration) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    delay,
                },
                calls,
            )
        }
    }

    #[async_trait::async_trait]
    impl RosterFetcher for CountingFetcher {
        async fn fetch_roster(&self) -> Result<RosterSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(vec![SerializedReading {
                soldier_id: "S1".to_string(),
                body_temperature: 36.6,
                heart_rate: 72.0,
                respiration_rate: 16.0,
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_is_immediate() {
        let (fetcher, calls) = CountingFetcher::new(Duration::ZERO);
        let (mut scheduler, mut source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
        scheduler.start();

        // Give the driver a moment of virtual time, well under one period
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let event = source.poll().expect("expected an immediate event");
        assert_eq!(event.seq, 0);
        assert!(event.result.is_ok());

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_once_per_period() {
        let (fetcher, calls) = CountingFetcher::new(Duration::ZERO);
        let (mut scheduler, mut source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Sequence numbers are strictly increasing in issue order
        let seqs: Vec<u64> = std::iter::from_fn(|| source.poll()).map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);

        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_fetches() {
        let (fetcher, calls) = CountingFetcher::new(Duration::ZERO);
        let (mut scheduler, mut source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        scheduler.stop();
        assert!(!scheduler.is_running());

        // Drain the immediate event, then wait several periods
        let _ = source.poll();
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(source.poll().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_fetch_discarded_on_stop() {
        let (fetcher, calls) = CountingFetcher::new(Duration::from_secs(2));
        let (mut scheduler, mut source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
        scheduler.start();

        // The immediate fetch is now sleeping; stop while it is in flight
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        scheduler.stop();

        // Let the in-flight fetch complete
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(source.poll().is_none());
    }

    #[tokio::test(start_paused = true)]
    #[should_panic(expected = "already running")]
    async fn starting_twice_panics() {
        let (fetcher, _calls) = CountingFetcher::new(Duration::ZERO);
        let (mut scheduler, _source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));
        scheduler.start();
        scheduler.start();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_is_allowed() {
        let (fetcher, calls) = CountingFetcher::new(Duration::ZERO);
        let (mut scheduler, mut source) = RefreshScheduler::channel(fetcher, Duration::from_secs(5));

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        scheduler.stop();
        let _ = source.poll();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        scheduler.stop();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(source.poll().is_some());
    }
}
