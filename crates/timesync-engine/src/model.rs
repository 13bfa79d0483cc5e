//! Validated inputs to the engine: participants, the baseline frame, and tunables.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::availability::WorkingHours;
use crate::error::TimesyncError;
use crate::time::{parse_timezone, MINUTES_PER_DAY};

// ── Participant ─────────────────────────────────────────────────────────────

/// Someone who must attend, with their zone and local working hours.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Display name only; never used for identity.
    pub name: String,
    pub zone: Tz,
    pub hours: WorkingHours,
}

impl Participant {
    /// Build a participant from raw inputs, validating the zone and range.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidTimezone`] or [`TimesyncError::InvalidTimeRange`].
    pub fn new(name: &str, zone: &str, work_start: u32, work_end: u32) -> Result<Self, TimesyncError> {
        Ok(Self {
            name: name.trim().to_string(),
            zone: parse_timezone(zone)?,
            hours: WorkingHours::new(work_start, work_end)?,
        })
    }
}

// ── Baseline ────────────────────────────────────────────────────────────────

/// The reference zone, day, and working frame all windows are anchored to.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    pub zone: Tz,
    /// Reference calendar day in the baseline zone.
    pub date: NaiveDate,
    window_start: u32,
    window_end: u32,
    duration: u32,
}

impl BaselineConfig {
    /// Build a baseline frame.
    ///
    /// `window_start` must be in `[0, 1440)`, `window_end` in
    /// `(window_start, 1440]`, and `duration` in `[1, 1440]`.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidTimezone`] or [`TimesyncError::InvalidTimeRange`].
    pub fn new(
        zone: &str,
        date: NaiveDate,
        window_start: u32,
        window_end: u32,
        duration: u32,
    ) -> Result<Self, TimesyncError> {
        Self::with_zone(parse_timezone(zone)?, date, window_start, window_end, duration)
    }

    /// Same as [`BaselineConfig::new`] with an already-parsed zone.
    pub fn with_zone(
        zone: Tz,
        date: NaiveDate,
        window_start: u32,
        window_end: u32,
        duration: u32,
    ) -> Result<Self, TimesyncError> {
        if window_start >= MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "baseline start {window_start} is outside [0, {MINUTES_PER_DAY})"
            )));
        }
        if window_end <= window_start || window_end > MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "baseline end {window_end} must be after start {window_start} and at most {MINUTES_PER_DAY}"
            )));
        }
        if duration == 0 || duration > MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "duration {duration} must be between 1 and {MINUTES_PER_DAY} minutes"
            )));
        }
        Ok(Self {
            zone,
            date,
            window_start,
            window_end,
            duration,
        })
    }

    /// UTC, 09:00-17:00, one-hour meetings on `date`.
    pub fn default_for(date: NaiveDate) -> Self {
        Self {
            zone: chrono_tz::UTC,
            date,
            window_start: 9 * 60,
            window_end: 17 * 60,
            duration: 60,
        }
    }

    pub fn window_start(&self) -> u32 {
        self.window_start
    }

    pub fn window_end(&self) -> u32 {
        self.window_end
    }

    /// Requested meeting length in minutes.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// The frame expanded by `margin` on both sides, clipped to the day.
    pub fn scan_window(&self, margin: u32) -> ScanWindow {
        ScanWindow {
            start: self.window_start.saturating_sub(margin),
            end: self.window_end.saturating_add(margin).min(MINUTES_PER_DAY),
        }
    }
}

/// Baseline-relative `[start, end)` range that ticks are generated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanWindow {
    pub start: u32,
    pub end: u32,
}

impl ScanWindow {
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

// ── Options ─────────────────────────────────────────────────────────────────

/// Tunables for mask construction, ranking, and fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Tick spacing in minutes.
    pub granularity: u32,
    /// Minutes added on both sides of the baseline frame.
    pub margin: u32,
    /// Maximum number of ranked candidates returned.
    pub top_n: usize,
    /// How many of the top candidates are flagged as highlighted.
    pub highlight: usize,
    /// Number of near-miss slots returned when nothing fully overlaps.
    pub fallback_slots: usize,
    /// Coarse tick spacing for the fallback scan, in minutes.
    pub fallback_step: u32,
    /// Score penalty per hour of distance from `preferred_midpoint`.
    pub fallback_weight: f64,
    /// Business-hours centre in the baseline zone (minute-of-day).
    pub preferred_midpoint: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            granularity: 15,
            margin: 120,
            top_n: 8,
            highlight: 3,
            fallback_slots: 3,
            fallback_step: 60,
            fallback_weight: 0.05,
            preferred_midpoint: 13 * 60,
        }
    }
}

impl EngineOptions {
    /// Reject options the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidTimeRange`] for a zero tick or fallback
    /// step, a margin longer than a day, or a preferred midpoint outside the
    /// day, and [`TimesyncError::InvalidConfig`] for limits that would leave
    /// nothing to return or a fallback weight that is negative or not finite.
    pub fn validate(&self) -> Result<(), TimesyncError> {
        if self.granularity == 0 || self.granularity > MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "granularity {} must be between 1 and {MINUTES_PER_DAY} minutes",
                self.granularity
            )));
        }
        if self.fallback_step == 0 || self.fallback_step > MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "fallback step {} must be between 1 and {MINUTES_PER_DAY} minutes",
                self.fallback_step
            )));
        }
        if self.margin > MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "margin {} must be at most {MINUTES_PER_DAY} minutes",
                self.margin
            )));
        }
        if self.top_n == 0 {
            return Err(TimesyncError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.fallback_slots == 0 {
            return Err(TimesyncError::InvalidConfig(
                "fallback_slots must be at least 1".to_string(),
            ));
        }
        if !self.fallback_weight.is_finite() || self.fallback_weight < 0.0 {
            return Err(TimesyncError::InvalidConfig(format!(
                "fallback_weight {} must be a non-negative number",
                self.fallback_weight
            )));
        }
        if self.preferred_midpoint >= MINUTES_PER_DAY {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "preferred midpoint {} is outside [0, {MINUTES_PER_DAY})",
                self.preferred_midpoint
            )));
        }
        Ok(())
    }
}
