//! Typed user intents and their outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cue::AlertCue;
use crate::timer::Mode;

/// Everything a presentation layer can ask the session machine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Start, or pause when already running.
    Start,
    Pause,
    Stop,
    Reset,
    ToggleEdit,
    IncreaseDuration,
    DecreaseDuration,
    SwitchMode { mode: Mode },
    IncreaseLongBreakInterval,
    DecreaseLongBreakInterval,
    ToggleAutomaticSequence,
    ConfirmContinue,
    SelectAlertCue { cue: AlertCue },
    ToggleMute,
}

/// Why an intent changed nothing.
///
/// Rejections are not failures; the user-visible effect is simply that
/// nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    #[error("timer is running")]
    Running,
    #[error("timer is not running")]
    NotRunning,
    #[error("value is already at its limit")]
    AtBound,
    #[error("no finished session is waiting")]
    NoPendingAlert,
    #[error("automatic sequence will continue on its own")]
    AutomaticSequence,
    #[error("a finished session is waiting to continue")]
    AlertPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Rejected(RejectReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            Outcome::Applied => None,
            Outcome::Rejected(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_exposes_the_reason() {
        assert_eq!(Outcome::Applied.rejection(), None);
        let outcome = Outcome::Rejected(RejectReason::AtBound);
        assert!(!outcome.is_applied());
        assert_eq!(outcome.rejection(), Some(RejectReason::AtBound));
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            serde_json::json!({"outcome": "rejected", "reason": "at_bound"})
        );
    }
}
