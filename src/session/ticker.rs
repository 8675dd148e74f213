//! Cancellable one-second tick source for the test countdown.

use std::future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval};

/// A recurring tick that can be armed and cancelled.
///
/// A cancelled (or never armed) ticker is pending forever, so it can sit in
/// a `select!` next to input events without ever firing.
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Schedule ticks every period, starting one period from now. Arming an
    /// armed ticker keeps the existing schedule.
    pub fn arm(&mut self) {
        if self.interval.is_none() {
            self.interval = Some(interval_at(Instant::now() + self.period, self.period));
        }
    }

    /// Drop the schedule; pending and future ticks never fire.
    pub fn cancel(&mut self) {
        self.interval = None;
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
