//! Time conversion and formatting helpers.
//!
//! Disc navigation data counts time in 90 kHz ticks. Reports show it in
//! milliseconds, both as `secs.ms` and as `hh:mm:ss.ms`.

use std::fmt;
use std::path::Path;

/// Number of ticks in one second of the 90 kHz disc clock.
pub const TICKS_PER_SECOND: u64 = 90_000;

/// A timestamp or duration in 90 kHz ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(pub u64);

impl Ticks {
    /// Converts to milliseconds as `(ticks * 100 / 90) / 100`, flooring at each step.
    #[must_use]
    pub fn to_millis(self) -> Millis {
        Millis(self.0.saturating_mul(100) / 90 / 100)
    }
}

/// A duration in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(pub u64);

impl Millis {
    #[must_use]
    pub fn secs(self) -> u64 {
        self.0 / 1000
    }

    #[must_use]
    pub fn subsec_millis(self) -> u64 {
        self.0 % 1000
    }

    /// Splits into `(hours, minutes, seconds, millis)`. Hours are not wrapped.
    #[must_use]
    pub fn hms(self) -> (u64, u64, u64, u64) {
        let secs = self.secs();
        (secs / 3600, (secs / 60) % 60, secs % 60, self.subsec_millis())
    }

    /// `secs.ms3` rendering, e.g. `3725.040`.
    #[must_use]
    pub fn seconds_display(self) -> SecondsDisplay {
        SecondsDisplay(self)
    }

    /// `hh:mm:ss.ms3` rendering, e.g. `01:02:05.040`.
    #[must_use]
    pub fn clock_display(self) -> ClockDisplay {
        ClockDisplay(self)
    }
}

/// Displays a [`Millis`] as `secs.ms3`. Honours width on the seconds part.
pub struct SecondsDisplay(Millis);

impl fmt::Display for SecondsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.width() {
            Some(width) => write!(f, "{:>width$}.{:03}", self.0.secs(), self.0.subsec_millis()),
            None => write!(f, "{}.{:03}", self.0.secs(), self.0.subsec_millis()),
        }
    }
}

/// Displays a [`Millis`] as `hh:mm:ss.ms3`.
pub struct ClockDisplay(Millis);

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s, ms) = self.0.hms();
        write!(f, "{h:02}:{m:02}:{s:02}.{ms:03}")
    }
}

/// Last non-empty component of a path, used as a fallback disc id and name.
/// Returns the whole path when it has no such component (e.g. `/`).
#[must_use]
pub fn path_tail(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
