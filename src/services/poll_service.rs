use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::live_data::{ApiError, LiveDataSource};
use crate::services::chart_service::{Chart, ChartRenderer};

/// Time between two refresh cycles
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Outcome counters since the poller was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: u64,
    pub failed: u64,
}

/// Drives refresh cycles: fetch, then refresh the chart on success
pub struct Poller<S: LiveDataSource, R: ChartRenderer> {
    source: S,
    chart: Chart<R>,
    stats: PollStats,
}

impl<S: LiveDataSource, R: ChartRenderer> Poller<S, R> {
    pub fn new(source: S, chart: Chart<R>) -> Self {
        Self {
            source,
            chart,
            stats: PollStats::default(),
        }
    }

    #[cfg(test)]
    pub fn chart(&self) -> &Chart<R> {
        &self.chart
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Run one refresh cycle.
    ///
    /// The chart is only touched when the fetch succeeds. A failed redraw is
    /// logged here and does not count as a failed cycle.
    pub async fn poll_once(&mut self) -> Result<(), ApiError> {
        match self.source.fetch().await {
            Ok(series) => {
                self.stats.succeeded += 1;
                let points = series.len();
                if series.is_empty() {
                    debug!("Live data endpoint returned no points");
                }
                match self.chart.refresh(series) {
                    Ok(()) => debug!("Live chart redrawn with {} points", points),
                    Err(e) => error!("Failed to redraw live chart: {}", e),
                }
                Ok(())
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    /// Poll every [`POLL_INTERVAL`] until `cancel` fires.
    ///
    /// The first cycle starts immediately. Cycles never overlap; ticks missed
    /// while a cycle is still running are skipped.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Polling live data every {}ms", POLL_INTERVAL.as_millis());

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.poll_once() => {
                    if let Err(e) = result {
                        error!("Error fetching live data: {}", e);
                    }
                }
            }
        }

        let stats = self.stats();
        info!(
            "Polling stopped ({} succeeded, {} failed)",
            stats.succeeded, stats.failed
        );
    }
}
