//! Session state machine.
//!
//! Owns the whole timer state in one [`SessionState`] aggregate and is the
//! only writer of it. Presentation layers send [`Intent`]s and read back
//! [`Event`]s and [`Snapshot`]s. Like the clock engine, the machine has no
//! thread of its own: the caller invokes [`SessionMachine::poll`] about every
//! [`POLL_INTERVAL`](crate::timer::POLL_INTERVAL) while
//! [`SessionMachine::needs_poll`] is true.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused/Editing --start--> Running --start/pause--> Paused
//! Running --expire--> SessionAlert --continue--> Running (next mode)
//! any --stop--> Idle          any --reset--> Idle(Focus)
//! any --switch_mode--> Idle(target)
//! Idle/Paused <--toggle_edit--> Editing
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cue::{AlertCue, CuePlayer};
use crate::events::{AlertView, Event, Snapshot};
use crate::format::{format_time, SessionCounter, APP_TITLE};
use crate::intent::{Intent, Outcome, RejectReason};
use crate::policy::{DurationPolicy, LongBreakInterval};
use crate::storage::Config;
use crate::timer::{
    to_delta, Clock, ClockEngine, ClockSignal, Deferred, Mode, ADJUST_STEP_SECS,
};

/// Delay before an automatic sequence moves past a finished session.
pub const AUTO_CONTINUE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Editing,
    Running,
    Paused,
    /// A session finished and is waiting to continue.
    SessionAlert,
}

/// The finished session and what comes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAlert {
    pub finished_mode: Mode,
    pub next_mode: Mode,
}

/// Complete timer state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    mode: Mode,
    status: TimerStatus,
    remaining_secs: u64,
    deadline: Option<DateTime<Utc>>,
    durations: DurationPolicy,
    long_break_interval: LongBreakInterval,
    focus_sessions_completed: u32,
    automatic_advance: bool,
    alert: Option<SessionAlert>,
    alert_cue: AlertCue,
}

impl SessionState {
    pub fn new() -> Self {
        let durations = DurationPolicy::new();
        Self {
            mode: Mode::Focus,
            status: TimerStatus::Idle,
            remaining_secs: durations.get(Mode::Focus),
            deadline: None,
            durations,
            long_break_interval: LongBreakInterval::new(),
            focus_sessions_completed: 0,
            automatic_advance: true,
            alert: None,
            alert_cue: AlertCue::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Set only while running.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn durations(&self) -> &DurationPolicy {
        &self.durations
    }

    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval.get()
    }

    pub fn focus_sessions_completed(&self) -> u32 {
        self.focus_sessions_completed
    }

    pub fn automatic_advance(&self) -> bool {
        self.automatic_advance
    }

    pub fn alert(&self) -> Option<SessionAlert> {
        self.alert
    }

    pub fn alert_cue(&self) -> AlertCue {
        self.alert_cue
    }

    pub fn counter(&self) -> SessionCounter {
        SessionCounter::new(self.focus_sessions_completed, self.long_break_interval.get())
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_editing(&self) -> bool {
        self.status == TimerStatus::Editing
    }

    fn set_remaining(&mut self, secs: u64) {
        self.remaining_secs = secs.min(self.mode.bounds().max);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a [`SessionState`] from intents and clock polls.
pub struct SessionMachine {
    state: SessionState,
    engine: ClockEngine,
    continuation: Deferred<SessionAlert>,
    clock: Arc<dyn Clock>,
    cue_player: Arc<dyn CuePlayer>,
    auto_continue_delay: Duration,
    outbox: Vec<Event>,
}

impl SessionMachine {
    /// Create a machine in Focus mode with default durations.
    pub fn new(clock: Arc<dyn Clock>, cue_player: Arc<dyn CuePlayer>) -> Self {
        Self {
            state: SessionState::new(),
            engine: ClockEngine::new(),
            continuation: Deferred::new(),
            clock,
            cue_player,
            auto_continue_delay: AUTO_CONTINUE_DELAY,
            outbox: Vec::new(),
        }
    }

    /// Create a machine with the startup preferences from `config`.
    pub fn with_config(
        clock: Arc<dyn Clock>,
        cue_player: Arc<dyn CuePlayer>,
        config: &Config,
    ) -> Self {
        let mut machine = Self::new(clock, cue_player);
        machine.auto_continue_delay = config.auto_continue_delay();
        machine.state.automatic_advance = config.timer.automatic_sequence;
        machine.state.alert_cue = config.alerts.cue;
        machine.cue_player.mute(config.alerts.muted);
        machine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True while a countdown or a deferred continuation needs polling.
    pub fn needs_poll(&self) -> bool {
        self.engine.is_polling() || self.continuation.pending().is_some()
    }

    /// Take all events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let alert = state.alert.map(|alert| AlertView {
            finished_mode: alert.finished_mode,
            next_mode: alert.next_mode,
            label: alert.finished_mode.alert_label().to_string(),
            awaiting_confirmation: self.continuation.pending().is_none(),
        });
        let title = match (&alert, state.status) {
            (Some(alert), _) => format!("{} finished!", alert.label),
            (None, TimerStatus::Running) => {
                format!("{APP_TITLE} - {}", format_time(state.remaining_secs))
            }
            _ => APP_TITLE.to_string(),
        };
        Snapshot {
            mode: state.mode,
            status: state.status,
            remaining_secs: state.remaining_secs,
            remaining_text: format_time(state.remaining_secs),
            title,
            running: state.is_running(),
            editing: state.is_editing(),
            counter: state.counter(),
            focus_sessions_completed: state.focus_sessions_completed,
            long_break_interval: state.long_break_interval.get(),
            alert,
            automatic_sequence: state.automatic_advance,
            alert_cue: state.alert_cue,
            muted: self.cue_player.is_muted(),
            deadline: state.deadline,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        let outcome = match intent {
            Intent::Start => self.start(),
            Intent::Pause => self.pause(),
            Intent::Stop => self.stop(),
            Intent::Reset => self.reset(),
            Intent::ToggleEdit => self.toggle_edit(),
            Intent::IncreaseDuration => self.increase_duration(),
            Intent::DecreaseDuration => self.decrease_duration(),
            Intent::SwitchMode { mode } => self.switch_mode(mode),
            Intent::IncreaseLongBreakInterval => self.increase_long_break_interval(),
            Intent::DecreaseLongBreakInterval => self.decrease_long_break_interval(),
            Intent::ToggleAutomaticSequence => self.toggle_automatic_sequence(),
            Intent::ConfirmContinue => self.confirm_continue(),
            Intent::SelectAlertCue { cue } => self.select_alert_cue(cue),
            Intent::ToggleMute => self.toggle_mute(),
        };
        if let Outcome::Rejected(reason) = outcome {
            debug!(?intent, %reason, "intent rejected");
        }
        outcome
    }

    /// Start the countdown, or pause it when already running.
    pub fn start(&mut self) -> Outcome {
        match self.state.status {
            TimerStatus::Running => return self.pause(),
            TimerStatus::SessionAlert => return Outcome::Rejected(RejectReason::AlertPending),
            TimerStatus::Editing => self.set_editing(false),
            TimerStatus::Idle | TimerStatus::Paused => {}
        }
        if self.state.mode == Mode::Focus && self.state.focus_sessions_completed == 0 {
            // Count the session that is about to begin.
            self.state.focus_sessions_completed = 1;
        }
        self.begin_countdown();
        Outcome::Applied
    }

    pub fn pause(&mut self) -> Outcome {
        if self.state.status != TimerStatus::Running {
            return Outcome::Rejected(RejectReason::NotRunning);
        }
        let now = self.clock.now();
        let remaining = self
            .engine
            .pause(now)
            .unwrap_or(self.state.remaining_secs);
        self.state.set_remaining(remaining);
        self.state.deadline = None;
        self.state.status = TimerStatus::Paused;
        info!(mode = self.state.mode.as_str(), remaining, "timer paused");
        self.emit(Event::TimerPaused {
            remaining_secs: self.state.remaining_secs,
            at: now,
        });
        Outcome::Applied
    }

    /// Cancel any countdown or pending continuation and restore the mode's
    /// full duration. Editing stays on if it was on.
    pub fn stop(&mut self) -> Outcome {
        self.halt();
        self.state.remaining_secs = self.state.durations.get(self.state.mode);
        info!(mode = self.state.mode.as_str(), "timer stopped");
        self.emit(Event::TimerStopped {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    /// Back to Focus with every setting at its default.
    ///
    /// The selected alert cue and mute flag are presentation preferences and
    /// survive a reset.
    pub fn reset(&mut self) -> Outcome {
        if self.state.is_editing() {
            self.set_editing(false);
        }
        self.halt();
        let state = &mut self.state;
        state.status = TimerStatus::Idle;
        state.mode = Mode::Focus;
        state.durations.restore_defaults();
        state.remaining_secs = state.durations.get(Mode::Focus);
        state.focus_sessions_completed = 0;
        state.long_break_interval.reset();
        state.automatic_advance = true;
        info!("session reset");
        self.emit(Event::TimerReset {
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    pub fn toggle_edit(&mut self) -> Outcome {
        if self.state.is_running() {
            return Outcome::Rejected(RejectReason::Running);
        }
        let editing = !self.state.is_editing();
        self.stop();
        self.set_editing(editing);
        Outcome::Applied
    }

    pub fn increase_duration(&mut self) -> Outcome {
        self.adjust_duration(|durations, mode| durations.increase(mode, ADJUST_STEP_SECS))
    }

    pub fn decrease_duration(&mut self) -> Outcome {
        self.adjust_duration(|durations, mode| durations.decrease(mode, ADJUST_STEP_SECS))
    }

    /// Stop, then select `target` at its configured duration.
    pub fn switch_mode(&mut self, target: Mode) -> Outcome {
        self.enter_mode(target);
        if target == Mode::Focus && self.state.focus_sessions_completed == 0 {
            self.state.focus_sessions_completed = 1;
        }
        self.emit(Event::ModeSwitched {
            mode: target,
            remaining_secs: self.state.remaining_secs,
            counter: self.state.counter(),
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    pub fn increase_long_break_interval(&mut self) -> Outcome {
        if !self.state.long_break_interval.increase() {
            return Outcome::Rejected(RejectReason::AtBound);
        }
        self.emit_interval_changed();
        Outcome::Applied
    }

    pub fn decrease_long_break_interval(&mut self) -> Outcome {
        if !self.state.long_break_interval.decrease() {
            return Outcome::Rejected(RejectReason::AtBound);
        }
        self.emit_interval_changed();
        Outcome::Applied
    }

    /// Flip automatic sequencing. A continuation that is already scheduled
    /// still fires.
    pub fn toggle_automatic_sequence(&mut self) -> Outcome {
        self.state.automatic_advance = !self.state.automatic_advance;
        self.emit(Event::AutomaticSequenceToggled {
            enabled: self.state.automatic_advance,
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    /// Continue past a finished session that is waiting for confirmation.
    pub fn confirm_continue(&mut self) -> Outcome {
        let Some(alert) = self.state.alert else {
            return Outcome::Rejected(RejectReason::NoPendingAlert);
        };
        if self.continuation.pending().is_some() {
            return Outcome::Rejected(RejectReason::AutomaticSequence);
        }
        self.continue_sequence(alert);
        Outcome::Applied
    }

    /// Select the cue played on expiry, unmuting and playing it as a preview.
    pub fn select_alert_cue(&mut self, cue: AlertCue) -> Outcome {
        self.state.alert_cue = cue;
        if self.cue_player.is_muted() {
            self.cue_player.mute(false);
            self.emit(Event::MuteToggled {
                muted: false,
                at: self.clock.now(),
            });
        }
        self.cue_player.play(cue);
        self.emit(Event::AlertCueSelected {
            cue,
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    pub fn toggle_mute(&mut self) -> Outcome {
        let muted = !self.cue_player.is_muted();
        self.cue_player.mute(muted);
        self.emit(Event::MuteToggled {
            muted,
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    /// Recompute remaining time and fire a due continuation.
    ///
    /// Safe to call at any time; does nothing when [`Self::needs_poll`] is false.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        match self.engine.tick(now) {
            Some(ClockSignal::Tick { remaining_secs }) => {
                if remaining_secs != self.state.remaining_secs {
                    self.state.set_remaining(remaining_secs);
                    self.emit(Event::Tick {
                        remaining_secs: self.state.remaining_secs,
                        at: now,
                    });
                }
            }
            Some(ClockSignal::Expired) => self.expire(now),
            None => {}
        }
        if let Some(task) = self.continuation.take_due(now) {
            debug!(task = ?task.id, "auto-continue fired");
            self.continue_sequence(task.payload);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_countdown(&mut self) {
        let now = self.clock.now();
        let duration_secs = self.state.remaining_secs;
        let deadline = self.engine.start(duration_secs, now);
        self.state.deadline = Some(deadline);
        self.state.status = TimerStatus::Running;
        info!(
            mode = self.state.mode.as_str(),
            duration_secs,
            %deadline,
            generation = self.engine.poll_generation(),
            "timer started"
        );
        self.emit(Event::TimerStarted {
            mode: self.state.mode,
            duration_secs,
            deadline,
            at: now,
        });
    }

    fn expire(&mut self, now: DateTime<Utc>) {
        let finished_mode = self.state.mode;
        self.state.remaining_secs = 0;
        self.state.deadline = None;
        self.cue_player.play(self.state.alert_cue);

        let next_mode = match finished_mode {
            Mode::Focus => {
                if self
                    .state
                    .long_break_interval
                    .is_long_break_due(self.state.focus_sessions_completed)
                {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::LongBreak => {
                self.state.focus_sessions_completed = 0;
                Mode::Focus
            }
            Mode::ShortBreak => Mode::Focus,
        };

        let alert = SessionAlert {
            finished_mode,
            next_mode,
        };
        self.state.alert = Some(alert);
        self.state.status = TimerStatus::SessionAlert;
        let automatic = self.state.automatic_advance;
        if automatic {
            let fire_at = now
                .checked_add_signed(to_delta(self.auto_continue_delay))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            let id = self.continuation.schedule(fire_at, alert);
            debug!(task = ?id, "auto-continue scheduled");
        }
        info!(
            finished = finished_mode.as_str(),
            next = next_mode.as_str(),
            automatic,
            "session finished"
        );
        self.emit(Event::SessionExpired {
            finished_mode,
            next_mode,
            automatic,
            at: now,
        });
    }

    fn continue_sequence(&mut self, alert: SessionAlert) {
        if self.state.alert != Some(alert) {
            debug!("stale continuation ignored");
            return;
        }
        if alert.finished_mode.is_break() {
            self.state.focus_sessions_completed += 1;
        }
        self.enter_mode(alert.next_mode);
        self.emit(Event::SessionContinued {
            finished_mode: alert.finished_mode,
            mode: alert.next_mode,
            counter: self.state.counter(),
            at: self.clock.now(),
        });
        self.begin_countdown();
    }

    /// Stop everything and select `mode` at its configured duration.
    fn enter_mode(&mut self, mode: Mode) {
        self.halt();
        self.state.mode = mode;
        self.state.remaining_secs = self.state.durations.get(mode);
    }

    /// Cancel the countdown and any pending continuation; dismiss the alert.
    fn halt(&mut self) {
        self.engine.stop();
        if let Some(id) = self.continuation.cancel() {
            debug!(task = ?id, "auto-continue cancelled");
        }
        self.state.alert = None;
        self.state.deadline = None;
        if matches!(
            self.state.status,
            TimerStatus::Running | TimerStatus::Paused | TimerStatus::SessionAlert
        ) {
            self.state.status = TimerStatus::Idle;
        }
    }

    fn set_editing(&mut self, editing: bool) {
        self.state.status = if editing {
            TimerStatus::Editing
        } else {
            TimerStatus::Idle
        };
        self.emit(Event::EditingToggled {
            editing,
            at: self.clock.now(),
        });
    }

    fn adjust_duration(&mut self, adjust: impl FnOnce(&mut DurationPolicy, Mode) -> u64) -> Outcome {
        match self.state.status {
            TimerStatus::Running => return Outcome::Rejected(RejectReason::Running),
            TimerStatus::SessionAlert => return Outcome::Rejected(RejectReason::AlertPending),
            TimerStatus::Idle | TimerStatus::Editing | TimerStatus::Paused => {}
        }
        let mode = self.state.mode;
        let before = self.state.durations.get(mode);
        let after = adjust(&mut self.state.durations, mode);
        if after == before && self.state.remaining_secs == after {
            return Outcome::Rejected(RejectReason::AtBound);
        }
        self.state.remaining_secs = after;
        self.emit(Event::DurationAdjusted {
            mode,
            duration_secs: after,
            at: self.clock.now(),
        });
        Outcome::Applied
    }

    fn emit_interval_changed(&mut self) {
        self.emit(Event::LongBreakIntervalChanged {
            interval: self.state.long_break_interval.get(),
            counter: self.state.counter(),
            at: self.clock.now(),
        });
    }

    fn emit(&mut self, event: Event) {
        self.outbox.push(event);
    }
}
