//! Alert cues.
//!
//! The core only decides *which* cue to play and *when*. Playback and muting
//! belong to whoever implements [`CuePlayer`] (a terminal bell, an audio
//! backend, a test recorder).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertCue {
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "medium_01")]
    Medium01,
    #[serde(rename = "medium_02")]
    Medium02,
    #[serde(rename = "long")]
    Long,
}

impl AlertCue {
    pub const ALL: [AlertCue; 4] = [
        AlertCue::Short,
        AlertCue::Medium01,
        AlertCue::Medium02,
        AlertCue::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCue::Short => "short",
            AlertCue::Medium01 => "medium_01",
            AlertCue::Medium02 => "medium_02",
            AlertCue::Long => "long",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cue| cue.as_str() == s.trim().to_lowercase())
    }
}

impl Default for AlertCue {
    fn default() -> Self {
        AlertCue::Short
    }
}

/// Playback capability injected into the session machine.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: AlertCue);
    fn mute(&self, muted: bool);
    fn is_muted(&self) -> bool;
}

/// Plays nothing; only tracks the mute flag.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    muted: AtomicBool,
}

impl CuePlayer for SilentPlayer {
    fn play(&self, _cue: AlertCue) {}

    fn mute(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }
}

/// Remembers every cue it was asked to play, muted or not.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<AlertCue>>,
    muted: AtomicBool,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<AlertCue> {
        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl CuePlayer for RecordingPlayer {
    fn play(&self, cue: AlertCue) {
        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(cue);
    }

    fn mute(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }
}
