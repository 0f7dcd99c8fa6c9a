//! # PomoPixel Core Library
//!
//! This library provides the session logic for the PomoPixel Pomodoro timer:
//! focus sessions alternating with short breaks, with a long break after every
//! N focus sessions. Rendering, audio and input handling live in presentation
//! layers such as the `pomopixel-cli` binary.
//!
//! ## Architecture
//!
//! - **Clock Engine**: a wall-clock deadline countdown; the caller polls it
//! - **Session Machine**: owns all state, reacts to typed intents, emits events
//! - **Policies**: per-mode duration bounds and the long-break interval
//! - **Runtime**: a tokio task that owns a machine and polls it
//! - **Storage**: TOML-based startup configuration
//!
//! ## Key Components
//!
//! - [`SessionMachine`]: Core session state machine
//! - [`ClockEngine`]: Deadline-based countdown
//! - [`Intent`] / [`Event`]: What goes in, what comes out
//! - [`CuePlayer`]: Injected alert playback
//! - [`Config`]: Application configuration

pub mod cue;
pub mod error;
pub mod events;
pub mod format;
pub mod intent;
pub mod policy;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod timer;

pub use cue::{AlertCue, CuePlayer, RecordingPlayer, SilentPlayer};
pub use error::{ConfigError, CoreError};
pub use events::{AlertView, Event, Snapshot};
pub use format::{format_time, SessionCounter};
pub use intent::{Intent, Outcome, RejectReason};
pub use policy::{DurationPolicy, LongBreakInterval};
pub use runtime::DriverHandle;
pub use session::{SessionAlert, SessionMachine, SessionState, TimerStatus};
pub use storage::Config;
pub use timer::{Clock, ClockEngine, ClockSignal, ManualClock, Mode, SystemClock, TokioClock};
