//! Poller: periodically refreshes the status store from a reading source

use crate::constants::POLL_INTERVAL;
use crate::reading_source::SharedReadingSource;
use crate::status_store::StatusStore;
use log::{debug, error, info, trace};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Background task that keeps the [`StatusStore`] current.
///
/// This is the only writer of the store. Each cycle asks the source for the
/// latest reading on the blocking pool; a reading replaces the record, while
/// `None` leaves the previous record in place.
pub struct Poller {
    source: SharedReadingSource,
    store: Arc<StatusStore>,
    interval: Duration,
}

impl Poller {
    /// Create a poller running at the default 5 Hz
    pub fn new(source: SharedReadingSource, store: Arc<StatusStore>) -> Self {
        Self {
            source,
            store,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the polling period
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one poll cycle. Returns `true` if the store was replaced.
    pub async fn poll_once(&self) -> bool {
        let source = self.source.clone();
        let latest = match tokio::task::spawn_blocking(move || source.fetch_latest()).await {
            Ok(latest) => latest,
            Err(e) => {
                error!("Reading source {} failed: {}", self.source.describe(), e);
                return false;
            }
        };

        match latest {
            Some(reading) => {
                let next = self.store.snapshot().with_reading(reading);
                trace!("New reading: {}", next.reading());
                self.store.replace(next);
                true
            }
            None => false,
        }
    }

    /// Start the polling loop
    ///
    /// Runs until `shutdown` is cancelled. Source failures never end the loop.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Polling {} every {:?}",
            self.source.describe(),
            self.interval
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            let start = Instant::now();
            self.poll_once().await;
            trace!("Poll cycle took {:?}", start.elapsed());
        }

        debug!("Poller stopped");
    }

    /// Spawn the polling loop onto the current runtime
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
