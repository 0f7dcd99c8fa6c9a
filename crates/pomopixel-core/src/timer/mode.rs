use serde::{Deserialize, Serialize};

/// Seconds added or removed by a single duration adjustment.
pub const ADJUST_STEP_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Allowed range and default length of a mode, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub default: u64,
    pub min: u64,
    pub max: u64,
}

impl DurationBounds {
    pub fn clamp(&self, secs: u64) -> u64 {
        secs.clamp(self.min, self.max)
    }
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    pub fn bounds(&self) -> DurationBounds {
        match self {
            Mode::Focus => DurationBounds {
                default: 25 * 60,
                min: 5 * 60,
                max: 480 * 60,
            },
            Mode::ShortBreak => DurationBounds {
                default: 5 * 60,
                min: 5 * 60,
                max: 30 * 60,
            },
            Mode::LongBreak => DurationBounds {
                default: 15 * 60,
                min: 10 * 60,
                max: 90 * 60,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Accepts the serialized name as well as the short forms `short` and `long`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "focus" => Some(Mode::Focus),
            "short_break" | "short" => Some(Mode::ShortBreak),
            "long_break" | "long" => Some(Mode::LongBreak),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Mode::Focus)
    }

    /// Label shown on the finished-session alert.
    pub fn alert_label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus session",
            Mode::ShortBreak | Mode::LongBreak => "Break",
        }
    }
}
