//! Deadline-based countdown.
//!
//! The clock engine does not own a thread or a timer. `start()` fixes an
//! absolute deadline and opens polling; the caller invokes `tick()` roughly
//! every [`POLL_INTERVAL`]. Remaining time is always recomputed as
//! `deadline - now`, so late or skipped polls (a suspended laptop, a busy
//! runtime) never accumulate drift.
//!
//! Every `start()` opens a new poll handle, numbered by a generation counter.
//! A caller that captured [`ClockEngine::poll_generation`] can tell whether
//! the countdown it scheduled against is still the current one.
//!
//! ```text
//! Stopped --start--> Polling --tick(remaining == 0)--> Stopped (Expired)
//!                       |
//!                       +--pause/stop--> Stopped
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Poll resolution: fine enough for a seconds display, coarse enough to be cheap.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Durations past this are treated as this; keeps deadline math in chrono's range.
const MAX_DURATION_SECS: u64 = u32::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum ClockSignal {
    Tick { remaining_secs: u64 },
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct ClockEngine {
    deadline: Option<DateTime<Utc>>,
    polling: bool,
    generation: u64,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Number of the most recent poll handle; 0 before the first `start()`.
    pub fn poll_generation(&self) -> u64 {
        self.generation
    }

    /// Fix the deadline at `now + duration_secs` and open polling.
    ///
    /// Any previous countdown is discarded first.
    pub fn start(&mut self, duration_secs: u64, now: DateTime<Utc>) -> DateTime<Utc> {
        self.stop();
        let secs = duration_secs.min(MAX_DURATION_SECS) as i64;
        let deadline = now + chrono::Duration::seconds(secs);
        self.deadline = Some(deadline);
        self.polling = true;
        self.generation = self.generation.wrapping_add(1);
        deadline
    }

    /// Remaining whole seconds at `now`, if a deadline is set.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<u64> {
        self.deadline.map(|deadline| remaining_secs(deadline, now))
    }

    /// Recompute remaining time.
    ///
    /// Returns `None` when polling is closed, so a poll that races a
    /// `pause()`/`stop()` is a no-op. `Expired` is returned at most once per
    /// `start()`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ClockSignal> {
        if !self.polling {
            return None;
        }
        let remaining = self.remaining_at(now)?;
        if remaining == 0 {
            self.stop();
            return Some(ClockSignal::Expired);
        }
        Some(ClockSignal::Tick {
            remaining_secs: remaining,
        })
    }

    /// Close polling and return the frozen remaining time.
    ///
    /// Returns `None` when nothing was counting down.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<u64> {
        self.polling = false;
        let deadline = self.deadline.take()?;
        Some(remaining_secs(deadline, now))
    }

    pub fn stop(&mut self) {
        self.polling = false;
        self.deadline = None;
    }
}

/// `max(round((deadline - now) / 1s), 0)`, rounding halves up.
fn remaining_secs(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (deadline - now).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    ((ms + 500) / 1000) as u64
}
