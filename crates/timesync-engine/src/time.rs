//! Time conversion between a baseline timeline and participant wall clocks.
//!
//! All functions take explicit inputs (no system clock access). The baseline
//! timeline is measured in wall-clock minutes of a reference day in the
//! baseline zone: minute 540 is 09:00 on the baseline clock, DST or not.
//!
//! # Functions
//!
//! - [`parse_timezone`] — Validate an IANA zone name against the bundled database
//! - [`wall_clock`] — Absolute instant → local hour/minute in a zone
//! - [`instant_at_baseline_minute`] — Baseline wall-clock minute → absolute instant

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};
use serde::Serialize;

use crate::error::TimesyncError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Step used to probe forward when a local time falls inside a DST gap.
const GAP_PROBE_STEP_MINUTES: i64 = 15;

/// Longest gap we are willing to probe across (no zone has skipped more than a day).
const GAP_PROBE_LIMIT: usize = 96;

// ── Wall clock ──────────────────────────────────────────────────────────────

/// Local wall-clock time in some zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WallClock {
    pub hour: u32,
    pub minute: u32,
}

impl WallClock {
    /// Minutes since local midnight, in `[0, 1440)`.
    pub fn minute_of_day(self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl std::fmt::Display for WallClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse an IANA timezone string into `Tz`.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidTimezone`] if the name is not in the IANA database.
///
/// # Examples
///
/// ```
/// use timesync_engine::time::parse_timezone;
///
/// assert!(parse_timezone("Asia/Kathmandu").is_ok());
/// assert!(parse_timezone("Mars/Olympus_Mons").is_err());
/// ```
pub fn parse_timezone(s: &str) -> Result<Tz, TimesyncError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| TimesyncError::InvalidTimezone(format!("'{}'", s)))
}

/// All IANA zone names known to the engine, in database order.
pub fn zone_names() -> impl Iterator<Item = &'static str> {
    TZ_VARIANTS.iter().map(|tz| tz.name())
}

/// Convert an absolute instant to the wall clock of `zone`.
///
/// Uses the zone's offset at that instant, so DST and non-integral offsets
/// (Asia/Kolkata +05:30, Asia/Kathmandu +05:45) are honored.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use timesync_engine::time::{parse_timezone, wall_clock};
///
/// let tz = parse_timezone("Asia/Kathmandu").unwrap();
/// let instant = Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap();
/// let local = wall_clock(instant, tz);
/// assert_eq!((local.hour, local.minute), (5, 45));
/// ```
pub fn wall_clock(instant: DateTime<Utc>, zone: Tz) -> WallClock {
    let local = instant.with_timezone(&zone);
    WallClock {
        hour: local.hour(),
        minute: local.minute(),
    }
}

/// Local minute-of-day of `instant` in `zone`.
pub fn local_minute(instant: DateTime<Utc>, zone: Tz) -> u32 {
    wall_clock(instant, zone).minute_of_day()
}

/// Local minute-of-day including the seconds fraction.
///
/// Window midpoints of odd durations land on half minutes; scoring needs them.
pub fn local_minute_precise(instant: DateTime<Utc>, zone: Tz) -> f64 {
    let local = instant.with_timezone(&zone);
    f64::from(local.hour() * 60 + local.minute()) + f64::from(local.second()) / 60.0
}

// ── Baseline timeline ───────────────────────────────────────────────────────

/// The absolute instant at wall-clock `minute` of `reference_day` in `baseline`.
///
/// Minute 1440 is midnight of the following day. A repeated local time
/// (fall-back) resolves to its earliest mapping; a skipped one (spring-forward)
/// resolves to the first valid local time after it, probing in 15-minute
/// steps, so on 2026-03-08 in New York minute 150 (02:30) is 03:00 EDT.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidDatetime`] if the local time cannot be
/// resolved.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use timesync_engine::time::{instant_at_baseline_minute, parse_timezone};
///
/// let tz = parse_timezone("Asia/Singapore").unwrap();
/// let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
/// let instant = instant_at_baseline_minute(540, tz, day).unwrap();
/// // 09:00 in Singapore (UTC+8) is 01:00 UTC
/// assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 16, 1, 0, 0).unwrap());
/// ```
pub fn instant_at_baseline_minute(
    minute: u32,
    baseline: Tz,
    reference_day: NaiveDate,
) -> Result<DateTime<Utc>, TimesyncError> {
    let midnight = reference_day.and_hms_opt(0, 0, 0).ok_or_else(|| {
        TimesyncError::InvalidDatetime(format!("no midnight for {reference_day}"))
    })?;
    resolve_local(baseline, midnight + chrono::Duration::minutes(i64::from(minute)))
}

/// Baseline wall-clock minute of `instant`, counted from midnight of
/// `reference_day` (the inverse of [`instant_at_baseline_minute`]).
///
/// Instants on the following local day continue past 1440.
pub fn baseline_minute_of(instant: DateTime<Utc>, baseline: Tz, reference_day: NaiveDate) -> f64 {
    let local = instant.with_timezone(&baseline);
    let days = (local.date_naive() - reference_day).num_days();
    days as f64 * f64::from(MINUTES_PER_DAY) + local_minute_precise(instant, baseline)
}

/// Map a local date-time in `zone` to a UTC instant, shifting forward out of gaps.
fn resolve_local(zone: Tz, mut naive: NaiveDateTime) -> Result<DateTime<Utc>, TimesyncError> {
    let requested = naive;
    for _ in 0..GAP_PROBE_LIMIT {
        if let Some(dt) = zone.from_local_datetime(&naive).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
        naive += chrono::Duration::minutes(GAP_PROBE_STEP_MINUTES);
    }

    Err(TimesyncError::InvalidDatetime(format!(
        "local time {requested} does not exist in {}",
        zone.name()
    )))
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// Format the UTC offset as a string (e.g., "-05:00", "+05:45").
pub fn format_utc_offset<T: TimeZone>(dt: &DateTime<T>) -> String {
    let offset_secs = dt.offset().fix().local_minus_utc();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tz(name: &str) -> Tz {
        parse_timezone(name).unwrap()
    }

    // ── parse_timezone ──────────────────────────────────────────────────

    #[test]
    fn test_parse_known_zone() {
        assert_eq!(tz("Europe/Berlin").name(), "Europe/Berlin");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(tz("  UTC ").name(), "UTC");
    }

    #[test]
    fn test_parse_invalid_zone_returns_error() {
        let err = parse_timezone("Invalid/Zone").unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_zone_names_contains_common_zones() {
        let names: Vec<_> = zone_names().collect();
        assert!(names.contains(&"America/New_York"));
        assert!(names.contains(&"Asia/Singapore"));
    }

    // ── wall_clock ──────────────────────────────────────────────────────

    #[test]
    fn test_wall_clock_new_york_winter_and_summer() {
        let winter = Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 14, 0, 0).unwrap();
        // EST (UTC-5) vs EDT (UTC-4)
        assert_eq!(wall_clock(winter, tz("America/New_York")).hour, 9);
        assert_eq!(wall_clock(summer, tz("America/New_York")).hour, 10);
    }

    #[test]
    fn test_wall_clock_half_and_three_quarter_offsets() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(wall_clock(instant, tz("Asia/Kolkata")).to_string(), "17:30");
        assert_eq!(wall_clock(instant, tz("Asia/Kathmandu")).to_string(), "17:45");
        assert_eq!(wall_clock(instant, tz("Australia/Eucla")).to_string(), "20:45");
    }

    #[test]
    fn test_wall_clock_crosses_local_date() {
        // 22:00 UTC is already the next morning in Tokyo
        let instant = Utc.with_ymd_and_hms(2026, 3, 16, 22, 0, 0).unwrap();
        assert_eq!(local_minute(instant, tz("Asia/Tokyo")), 7 * 60);
    }

    #[test]
    fn test_local_minute_precise_keeps_seconds() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 16, 9, 15, 30).unwrap();
        let m = local_minute_precise(instant, tz("UTC"));
        assert!((m - 555.5).abs() < 1e-9);
    }

    // ── instant_at_baseline_minute ──────────────────────────────────────

    #[test]
    fn test_baseline_minute_zero_is_local_midnight() {
        let instant = instant_at_baseline_minute(0, tz("America/New_York"), day(2026, 1, 15)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 1, 15, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_baseline_minute_spring_forward_is_wall_clock() {
        // March 8, 2026: New York skips 02:00 → 03:00. 09:00 is already EDT.
        let ny = tz("America/New_York");
        let instant = instant_at_baseline_minute(540, ny, day(2026, 3, 8)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 8, 13, 0, 0).unwrap());
        assert_eq!(wall_clock(instant, ny).to_string(), "09:00");
    }

    #[test]
    fn test_baseline_minute_fall_back_is_wall_clock() {
        // November 1, 2026: New York repeats 01:00-02:00
        let ny = tz("America/New_York");
        let instant = instant_at_baseline_minute(600, ny, day(2026, 11, 1)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 11, 1, 15, 0, 0).unwrap());
        assert_eq!(wall_clock(instant, ny).to_string(), "10:00");
    }

    #[test]
    fn test_baseline_minute_repeated_hour_takes_earliest() {
        // 01:30 happens first in EDT (05:30 UTC), then again in EST
        let ny = tz("America/New_York");
        let instant = instant_at_baseline_minute(90, ny, day(2026, 11, 1)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_baseline_minute_inside_gap_shifts_forward() {
        let ny = tz("America/New_York");
        let instant = instant_at_baseline_minute(150, ny, day(2026, 3, 8)).unwrap();
        assert_eq!(wall_clock(instant, ny).to_string(), "03:00");
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_baseline_minute_end_of_day_is_next_midnight() {
        let instant = instant_at_baseline_minute(1440, tz("UTC"), day(2026, 3, 16)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_baseline_minute_of_inverts_conversion() {
        let ny = tz("America/New_York");
        let d = day(2026, 3, 8);
        for minute in [0, 540, 1020, 1439] {
            let instant = instant_at_baseline_minute(minute, ny, d).unwrap();
            assert!((baseline_minute_of(instant, ny, d) - f64::from(minute)).abs() < 1e-9);
        }
        let next = Utc.with_ymd_and_hms(2026, 3, 9, 4, 30, 0).unwrap();
        // 00:30 EDT on the following day
        assert!((baseline_minute_of(next, ny, d) - 1470.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_midnight_inside_dst_gap() {
        // Santiago springs forward at local midnight (00:00 → 01:00) on 2026-09-06
        let santiago = tz("America/Santiago");
        let instant = instant_at_baseline_minute(0, santiago, day(2026, 9, 6)).unwrap();
        assert_eq!(wall_clock(instant, santiago).to_string(), "01:00");
    }

    #[test]
    fn test_baseline_minute_is_deterministic() {
        let sg = tz("Asia/Singapore");
        let a = instant_at_baseline_minute(735, sg, day(2026, 3, 16)).unwrap();
        let b = instant_at_baseline_minute(735, sg, day(2026, 3, 16)).unwrap();
        assert_eq!(a, b);
    }

    // ── formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_utc_offset_negative_and_fractional() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_utc_offset(&instant.with_timezone(&tz("America/New_York"))), "-05:00");
        assert_eq!(format_utc_offset(&instant.with_timezone(&tz("Asia/Kathmandu"))), "+05:45");
    }
}
