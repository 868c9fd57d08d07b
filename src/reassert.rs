//! Recurring reassertion of the lock surface.
//!
//! The run loop owns time; this scheduler only keeps the deadline
//! bookkeeping for the re-present/re-focus tick and stops handing out
//! deadlines once the lock leaves the `Locked` state.

use std::time::{Duration, Instant};

/// Deadline tracker for the periodic surface reassertion.
#[derive(Debug)]
pub struct ReassertionScheduler {
    interval: Duration,
    next_due: Instant,
    running: bool,
}

impl ReassertionScheduler {
    /// Start the scheduler with the given tick interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: Instant::now() + interval,
            running: true,
        }
    }

    /// Whether a tick is due at `now`. A due tick re-arms the deadline.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        if !self.running || now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    /// Time until the next tick, or `None` once stopped.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    /// Stop scheduling further ticks. There is no restart: the lock
    /// surface is gone once reassertion stops.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the scheduler still hands out deadlines.
    pub fn is_running(&self) -> bool {
        self.running
    }
}
