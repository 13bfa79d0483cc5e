//! Best-effort coverage when no window fits everyone.
//!
//! Every coarse tick (hourly by default) in the scan window is scored by how
//! many participants are inside their working hours, minus a small penalty
//! for distance from the preferred business-hours centre. The best few are
//! returned so the caller always has something actionable.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::error::TimesyncError;
use crate::model::{BaselineConfig, EngineOptions, Participant};
use crate::time::{baseline_minute_of, instant_at_baseline_minute, wall_clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageLabel {
    BestCoverage,
    Consider,
}

/// Someone outside their working hours at a coverage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Absentee {
    pub name: String,
    /// Their local wall clock at the slot, `HH:MM`.
    pub local_time: String,
}

/// A near-miss slot ranked by how many participants it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageWindow {
    pub start_minute: u32,
    pub end_minute: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available_count: usize,
    pub total: usize,
    pub available: Vec<String>,
    pub unavailable: Vec<Absentee>,
    pub score: f64,
    pub label: CoverageLabel,
}

/// Rank coarse slots by participant coverage.
///
/// Slot starts step by `options.fallback_step` from the scan window start and
/// each slot spans the meeting, `[start, start + duration)`. Score is
/// `available - weight * |slot_mid - preferred_mid|` where `slot_mid` is the
/// midpoint of that span on the baseline wall clock and the distance is in
/// hours. Returns at most `options.fallback_slots`, best first
/// (ties to the earliest); empty only when `participants` is empty.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidTimeRange`] for invalid options, or
/// [`TimesyncError::InvalidDatetime`] if the baseline day cannot be anchored.
pub fn best_coverage(
    participants: &[Participant],
    baseline: &BaselineConfig,
    options: &EngineOptions,
) -> Result<Vec<CoverageWindow>, TimesyncError> {
    options.validate()?;
    if participants.is_empty() {
        return Ok(Vec::new());
    }

    let scan = baseline.scan_window(options.margin);
    let step = options.fallback_step;
    let duration = baseline.duration();
    let preferred_hours = f64::from(options.preferred_midpoint) / 60.0;

    let mut slots = Vec::new();
    let mut offset = scan.start;
    while offset < scan.end {
        let start = instant_at_baseline_minute(offset, baseline.zone, baseline.date)?;

        let mut available = Vec::new();
        let mut unavailable = Vec::new();
        for p in participants {
            let local = wall_clock(start, p.zone);
            if p.hours.contains(local.minute_of_day()) {
                available.push(p.name.clone());
            } else {
                unavailable.push(Absentee {
                    name: p.name.clone(),
                    local_time: local.to_string(),
                });
            }
        }

        let end = start + chrono::Duration::minutes(i64::from(duration));
        let mid = start + chrono::Duration::seconds(i64::from(duration) * 30);
        let mid_hours = baseline_minute_of(mid, baseline.zone, baseline.date) / 60.0;
        let score =
            available.len() as f64 - options.fallback_weight * (mid_hours - preferred_hours).abs();

        slots.push(CoverageWindow {
            start_minute: offset,
            end_minute: offset + duration,
            start,
            end,
            available_count: available.len(),
            total: participants.len(),
            available,
            unavailable,
            score,
            label: CoverageLabel::Consider,
        });
        offset += step;
    }

    slots.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start_minute.cmp(&b.start_minute))
    });
    slots.truncate(options.fallback_slots);
    if let Some(best) = slots.first_mut() {
        best.label = CoverageLabel::BestCoverage;
    }

    debug!(
        "fallback: {} slots, best covers {:?} of {}",
        slots.len(),
        slots.first().map(|s| s.available_count),
        participants.len()
    );
    Ok(slots)
}
