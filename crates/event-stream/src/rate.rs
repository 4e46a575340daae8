//! Drift-free event pacing.
//!
//! The interval between events is computed once and every deadline is
//! derived from the previous deadline, never from "now", so time spent
//! generating and delivering does not accumulate into the schedule. A run
//! that falls behind catches up by skipping sleeps until it is back on
//! schedule.

use crate::error::InvalidRate;
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Target emission rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// No pacing at all.
    Unlimited,
    /// Events per second, always positive and finite.
    PerSecond(f64),
}

impl Rate {
    /// Validated per-second rate. The interval between events must fit in
    /// a [`Duration`].
    pub fn per_second(events: f64) -> Result<Self, InvalidRate> {
        if events.is_finite() && events > 0.0 && Duration::try_from_secs_f64(1.0 / events).is_ok() {
            Ok(Rate::PerSecond(events))
        } else {
            Err(InvalidRate(events))
        }
    }

    /// Time between two events, `None` when unlimited.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Rate::Unlimited => None,
            Rate::PerSecond(events) => {
                Some(Duration::try_from_secs_f64(1.0 / events).unwrap_or(Duration::MAX))
            }
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Unlimited => f.write_str("unlimited"),
            Rate::PerSecond(events) => write!(f, "{events} events/s"),
        }
    }
}

/// Creates per-run [`RateState`]s for a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct RateScheduler {
    rate: Rate,
}

impl RateScheduler {
    pub fn new(rate: Rate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Start the clock for one run.
    pub fn start(&self) -> RateState {
        let interval = self.rate.interval();
        let start_time = Instant::now();
        RateState {
            rate: self.rate,
            interval,
            start_time,
            events_emitted: 0,
            next_deadline: start_time + interval.unwrap_or_default(),
        }
    }
}

/// Pacing state for one run.
#[derive(Debug)]
pub struct RateState {
    rate: Rate,
    interval: Option<Duration>,
    start_time: Instant,
    events_emitted: u64,
    next_deadline: Instant,
}

impl RateState {
    /// Record one emitted event and wait until the next slot.
    pub async fn pace(&mut self) {
        self.events_emitted += 1;
        if let Some(interval) = self.interval {
            sleep_until(self.next_deadline).await;
            self.next_deadline += interval;
        }
    }

    /// Like [`pace`](Self::pace), but a cancelled token interrupts the
    /// sleep. Returns `false` if the token was cancelled.
    pub async fn pace_until_cancelled(&mut self, cancel: &CancellationToken) -> bool {
        self.events_emitted += 1;
        let Some(interval) = self.interval else {
            return !cancel.is_cancelled();
        };

        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = sleep_until(self.next_deadline) => {}
        }
        self.next_deadline += interval;
        true
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
