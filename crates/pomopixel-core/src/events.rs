use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cue::AlertCue;
use crate::format::SessionCounter;
use crate::session::TimerStatus;
use crate::timer::Mode;

/// Every state change in the session machine produces an Event.
/// Presentation layers render from these; nothing else writes the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        duration_secs: u64,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time changed while running.
    Tick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; the session alert is showing.
    SessionExpired {
        finished_mode: Mode,
        next_mode: Mode,
        automatic: bool,
        at: DateTime<Utc>,
    },
    /// The alert was dismissed and the next mode started.
    SessionContinued {
        finished_mode: Mode,
        mode: Mode,
        counter: SessionCounter,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        remaining_secs: u64,
        counter: SessionCounter,
        at: DateTime<Utc>,
    },
    DurationAdjusted {
        mode: Mode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    EditingToggled {
        editing: bool,
        at: DateTime<Utc>,
    },
    LongBreakIntervalChanged {
        interval: u32,
        counter: SessionCounter,
        at: DateTime<Utc>,
    },
    AutomaticSequenceToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    AlertCueSelected {
        cue: AlertCue,
        at: DateTime<Utc>,
    },
    MuteToggled {
        muted: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot(Snapshot),
}

/// Everything a view needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub status: TimerStatus,
    pub remaining_secs: u64,
    /// `HH:MM:SS` or `MM:SS`.
    pub remaining_text: String,
    pub title: String,
    pub running: bool,
    pub editing: bool,
    pub counter: SessionCounter,
    pub focus_sessions_completed: u32,
    pub long_break_interval: u32,
    pub alert: Option<AlertView>,
    pub automatic_sequence: bool,
    pub alert_cue: AlertCue,
    pub muted: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertView {
    pub finished_mode: Mode,
    pub next_mode: Mode,
    /// "Focus session" or "Break".
    pub label: String,
    /// True when only an explicit confirm will continue.
    pub awaiting_confirmation: bool,
}
