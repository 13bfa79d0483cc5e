//! Fairness scoring and ranking of candidate windows.
//!
//! A window scores well when its midpoint lands near the centre of every
//! participant's own working range. Per participant the score is
//! `1 - d / 720`, where `d` is the circular distance in minutes between the
//! window midpoint (in their local time) and their range midpoint. The
//! window score is the mean across participants, in `[0, 1]`.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::availability::{circular_distance, HALF_DAY_MINUTES};
use crate::error::TimesyncError;
use crate::model::{BaselineConfig, EngineOptions, Participant};
use crate::time::{format_utc_offset, instant_at_baseline_minute, local_minute_precise};

/// How one participant experiences a candidate window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeSpan {
    pub name: String,
    pub zone: String,
    /// Local start (RFC 3339 with offset).
    pub local_start: String,
    /// Local end (RFC 3339 with offset).
    pub local_end: String,
    pub utc_offset: String,
}

/// A proposed meeting slot that every participant can attend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateWindow {
    /// Baseline wall-clock minute of the start.
    pub start_minute: u32,
    /// `start_minute + duration`, exact rather than tick-quantized.
    pub end_minute: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: f64,
    pub highlighted: bool,
    pub attendees: Vec<AttendeeSpan>,
}

impl CandidateWindow {
    /// Materialize and score the window `[start_minute, start_minute + duration)`.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidDatetime`] if the baseline day cannot be anchored.
    pub fn new(
        start_minute: u32,
        participants: &[Participant],
        baseline: &BaselineConfig,
    ) -> Result<Self, TimesyncError> {
        let duration = baseline.duration();
        let start = instant_at_baseline_minute(start_minute, baseline.zone, baseline.date)?;
        let end = start + chrono::Duration::minutes(i64::from(duration));

        let attendees = participants
            .iter()
            .map(|p| {
                let local_start = start.with_timezone(&p.zone);
                AttendeeSpan {
                    name: p.name.clone(),
                    zone: p.zone.name().to_string(),
                    local_start: local_start.to_rfc3339(),
                    local_end: end.with_timezone(&p.zone).to_rfc3339(),
                    utc_offset: format_utc_offset(&local_start),
                }
            })
            .collect();

        Ok(Self {
            start_minute,
            end_minute: start_minute + duration,
            start,
            end,
            score: score_midpoint(midpoint(start, duration), participants),
            highlighted: false,
            attendees,
        })
    }
}

/// Fairness score of a window starting at baseline `start_minute`.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidDatetime`] if the baseline day cannot be anchored.
pub fn score_window(
    start_minute: u32,
    participants: &[Participant],
    baseline: &BaselineConfig,
) -> Result<f64, TimesyncError> {
    let start = instant_at_baseline_minute(start_minute, baseline.zone, baseline.date)?;
    Ok(score_midpoint(midpoint(start, baseline.duration()), participants))
}

fn midpoint(start: DateTime<Utc>, duration: u32) -> DateTime<Utc> {
    start + chrono::Duration::seconds(i64::from(duration) * 30)
}

/// Mean centrality of `mid` across participants; 0 with nobody to score.
fn score_midpoint(mid: DateTime<Utc>, participants: &[Participant]) -> f64 {
    if participants.is_empty() {
        return 0.0;
    }
    let total: f64 = participants
        .iter()
        .map(|p| {
            let local = local_minute_precise(mid, p.zone);
            let d = circular_distance(local, p.hours.midpoint());
            1.0 - d / f64::from(HALF_DAY_MINUTES)
        })
        .sum();
    total / participants.len() as f64
}

/// Sort by score (descending, ties to the earliest start), drop duplicate
/// starts, keep the top `options.top_n`, and flag the first
/// `options.highlight`.
pub fn rank(mut candidates: Vec<CandidateWindow>, options: &EngineOptions) -> Vec<CandidateWindow> {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start_minute.cmp(&b.start_minute))
    });

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.start_minute));
    candidates.truncate(options.top_n);

    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.highlighted = i < options.highlight;
    }

    debug!(
        "ranked {} candidates, best score {:?}",
        candidates.len(),
        candidates.first().map(|c| c.score)
    );
    candidates
}
