use std::fmt;

use serde::{Deserialize, Serialize};

pub const APP_TITLE: &str = "PomoPixel";

/// `HH:MM:SS` from one hour up, `MM:SS` below.
pub fn format_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Progress toward the next long break, shown as `current / total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounter {
    pub current: u32,
    pub total: u32,
}

impl SessionCounter {
    /// `current` is the completed count (at least 1), wrapped into `1..=total`
    /// once it exceeds `total`.
    pub fn new(completed: u32, total: u32) -> Self {
        let total = total.max(1);
        let mut current = completed.max(1);
        if current > total {
            current = match current % total {
                0 => total,
                rest => rest,
            };
        }
        Self { current, total }
    }
}

impl fmt::Display for SessionCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_times_omit_hours() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn long_times_show_hours() {
        assert_eq!(format_time(3600), "01:00:00");
        assert_eq!(format_time(480 * 60), "08:00:00");
        assert_eq!(format_time(3725), "01:02:05");
    }

    #[test]
    fn counter_starts_at_one() {
        assert_eq!(SessionCounter::new(0, 4).to_string(), "1 / 4");
        assert_eq!(SessionCounter::new(3, 4).to_string(), "3 / 4");
        assert_eq!(SessionCounter::new(4, 4).to_string(), "4 / 4");
    }

    #[test]
    fn counter_wraps_past_total() {
        assert_eq!(SessionCounter::new(5, 4).current, 1);
        assert_eq!(SessionCounter::new(8, 4).current, 4);
        assert_eq!(SessionCounter::new(7, 2).current, 1);
    }
}
