//! Wall-clock budget shared by the wait loop and the navigator

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::trace;

/// Smallest accepted poll interval; a zero interval would never drain the budget
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Countdown charged with the wall-clock time of every iteration that did
/// not advance, at least one poll interval each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBudget {
    initial: Duration,
    remaining: Duration,
    poll_interval: Duration,
}

impl NavigationBudget {
    pub fn new(total: Duration, poll_interval: Duration) -> Self {
        Self {
            initial: total,
            remaining: total,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Charge `spent`, never less than one poll interval
    pub fn charge(&mut self, spent: Duration) {
        self.remaining = self.remaining.saturating_sub(spent.max(self.poll_interval));
    }

    /// Sleep one poll interval, then charge everything since `started`
    pub async fn backoff_since(&mut self, started: Instant) {
        sleep(self.poll_interval).await;
        let spent = started.elapsed();
        self.charge(spent);
        trace!(spent = ?spent, remaining = ?self.remaining, "backoff");
    }
}
