//! Working-hour availability with fencepost and wrap-around rules.
//!
//! All arithmetic is integer minute-of-day. Ranges are half-open: the minute
//! at `end` is never available. A range whose start is after its end wraps
//! past midnight. A zero-length range (`start == end`) is never available.

use serde::Serialize;

use crate::error::TimesyncError;
use crate::time::MINUTES_PER_DAY;

/// Half of the day; the farthest any two minutes can be on the daily cycle.
pub const HALF_DAY_MINUTES: u32 = MINUTES_PER_DAY / 2;

/// Decide whether `local_minute` falls inside `[work_start, work_end)`.
///
/// - Same-day (`start < end`): `start <= m < end`
/// - Overnight (`start > end`): `m >= start || m < end`
/// - Degenerate (`start == end`): never available
///
/// # Examples
///
/// ```
/// use timesync_engine::availability::is_available;
///
/// assert!(is_available(540, 540, 1020));
/// assert!(!is_available(1020, 540, 1020));
/// // 22:00-06:00 overnight shift
/// assert!(is_available(23 * 60 + 30, 22 * 60, 6 * 60));
/// assert!(!is_available(12 * 60, 22 * 60, 6 * 60));
/// ```
pub fn is_available(local_minute: u32, work_start: u32, work_end: u32) -> bool {
    use std::cmp::Ordering;

    match work_start.cmp(&work_end) {
        Ordering::Less => work_start <= local_minute && local_minute < work_end,
        Ordering::Greater => local_minute >= work_start || local_minute < work_end,
        Ordering::Equal => false,
    }
}

/// Shortest distance between two minute-of-day values on the 1440-minute cycle.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let day = f64::from(MINUTES_PER_DAY);
    let d = (a - b).rem_euclid(day);
    d.min(day - d)
}

/// A participant's local working range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkingHours {
    start: u32,
    end: u32,
}

impl WorkingHours {
    /// Construct a working range, validating both bounds are in `[0, 1440)`.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidTimeRange`] if either bound is out of range.
    pub fn new(start: u32, end: u32) -> Result<Self, TimesyncError> {
        for (label, value) in [("start", start), ("end", end)] {
            if value >= MINUTES_PER_DAY {
                return Err(TimesyncError::InvalidTimeRange(format!(
                    "working {label} {value} is outside [0, {MINUTES_PER_DAY})"
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(self) -> u32 {
        self.start
    }

    pub fn end(self) -> u32 {
        self.end
    }

    pub fn is_overnight(self) -> bool {
        self.start > self.end
    }

    pub fn is_degenerate(self) -> bool {
        self.start == self.end
    }

    /// Length of the range in minutes (0 for a degenerate range).
    pub fn length(self) -> u32 {
        if self.is_overnight() {
            self.end + MINUTES_PER_DAY - self.start
        } else {
            self.end - self.start
        }
    }

    pub fn contains(self, local_minute: u32) -> bool {
        is_available(local_minute, self.start, self.end)
    }

    /// The centre of the range as a minute-of-day, wrap-aware.
    ///
    /// A 22:00-06:00 shift is centred on 02:00, not 14:00.
    pub fn midpoint(self) -> f64 {
        let mid = f64::from(self.start) + f64::from(self.length()) / 2.0;
        mid.rem_euclid(f64::from(MINUTES_PER_DAY))
    }
}
