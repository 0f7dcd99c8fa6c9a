//! Duration and long-break interval policies.
//!
//! Both policies are plain data with clamping rules. Whether an adjustment
//! is allowed at all (the timer must not be running) is decided by the
//! session state machine, not here.

use serde::Serialize;

use crate::timer::{DurationBounds, Mode};

/// Currently configured length of each mode, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationPolicy {
    focus: u64,
    short_break: u64,
    long_break: u64,
}

impl DurationPolicy {
    pub fn new() -> Self {
        Self {
            focus: Mode::Focus.bounds().default,
            short_break: Mode::ShortBreak.bounds().default,
            long_break: Mode::LongBreak.bounds().default,
        }
    }

    pub fn bounds(&self, mode: Mode) -> DurationBounds {
        mode.bounds()
    }

    pub fn get(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Focus => self.focus,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// Store `secs` for `mode`, clamped to the mode's bounds. Returns the stored value.
    pub fn set(&mut self, mode: Mode, secs: u64) -> u64 {
        let clamped = mode.bounds().clamp(secs);
        *self.slot_mut(mode) = clamped;
        clamped
    }

    pub fn increase(&mut self, mode: Mode, step: u64) -> u64 {
        let current = self.get(mode);
        self.set(mode, current.saturating_add(step))
    }

    pub fn decrease(&mut self, mode: Mode, step: u64) -> u64 {
        let current = self.get(mode);
        self.set(mode, current.saturating_sub(step))
    }

    pub fn restore_defaults(&mut self) {
        *self = Self::new();
    }

    fn slot_mut(&mut self, mode: Mode) -> &mut u64 {
        match mode {
            Mode::Focus => &mut self.focus,
            Mode::ShortBreak => &mut self.short_break,
            Mode::LongBreak => &mut self.long_break,
        }
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// How many focus sessions run before a long break is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongBreakInterval {
    value: u32,
}

impl LongBreakInterval {
    pub const MIN: u32 = 2;
    pub const MAX: u32 = 8;
    pub const DEFAULT: u32 = 4;

    pub fn new() -> Self {
        Self {
            value: Self::DEFAULT,
        }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    /// Returns `false` when already at [`Self::MAX`].
    pub fn increase(&mut self) -> bool {
        if self.value >= Self::MAX {
            return false;
        }
        self.value += 1;
        true
    }

    /// Returns `false` when already at [`Self::MIN`].
    pub fn decrease(&mut self) -> bool {
        if self.value <= Self::MIN {
            return false;
        }
        self.value -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.value = Self::DEFAULT;
    }

    /// A long break is due when `completed` is a positive multiple of the interval.
    pub fn is_long_break_due(&self, completed: u32) -> bool {
        completed > 0 && completed % self.value == 0
    }
}

impl Default for LongBreakInterval {
    fn default() -> Self {
        Self::new()
    }
}
