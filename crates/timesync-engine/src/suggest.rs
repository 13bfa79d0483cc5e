//! End-to-end suggestion pipeline: mask → scan → score → rank, with fallback.

use log::debug;
use serde::Serialize;

use crate::error::TimesyncError;
use crate::fallback::{best_coverage, CoverageWindow};
use crate::mask::{build_availability_grid, AvailabilityGrid};
use crate::model::{BaselineConfig, EngineOptions, Participant};
use crate::scanner::{feasible_starts, qualifying_runs};
use crate::scoring::{rank, score_window, CandidateWindow};

/// Outcome of [`compute_suggestions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestions {
    /// At least one window fits every participant.
    Overlap { candidates: Vec<CandidateWindow> },
    /// Nothing fits everyone; best-coverage near misses instead.
    Fallback { coverage: Vec<CoverageWindow> },
    /// There was nobody to schedule.
    NoParticipants,
}

impl Suggestions {
    pub fn len(&self) -> usize {
        match self {
            Suggestions::Overlap { candidates } => candidates.len(),
            Suggestions::Fallback { coverage } => coverage.len(),
            Suggestions::NoParticipants => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Suggestions::Fallback { .. })
    }
}

/// Rank meeting windows for `participants` with [`EngineOptions::default`].
///
/// # Errors
///
/// See [`compute_suggestions_with_options`].
pub fn compute_suggestions(
    participants: &[Participant],
    baseline: &BaselineConfig,
) -> Result<Suggestions, TimesyncError> {
    compute_suggestions_with_options(participants, baseline, &EngineOptions::default())
}

/// Rank meeting windows for `participants`.
///
/// Returns [`Suggestions::Overlap`] when any contiguous stretch of the mask
/// holds `baseline.duration()` minutes, [`Suggestions::Fallback`] otherwise,
/// and [`Suggestions::NoParticipants`] for an empty list.
///
/// Each qualifying run contributes its earliest window plus, when it
/// differs, its most central tick-aligned window.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidTimeRange`] or [`TimesyncError::InvalidConfig`]
/// for invalid options, or [`TimesyncError::InvalidDatetime`] if the baseline
/// day cannot be anchored.
pub fn compute_suggestions_with_options(
    participants: &[Participant],
    baseline: &BaselineConfig,
    options: &EngineOptions,
) -> Result<Suggestions, TimesyncError> {
    if participants.is_empty() {
        debug!("no participants; nothing to suggest");
        return Ok(Suggestions::NoParticipants);
    }

    let grid = build_availability_grid(participants, baseline, options)?;
    let candidates = scan_candidates(&grid, participants, baseline)?;

    if candidates.is_empty() {
        let coverage = best_coverage(participants, baseline, options)?;
        return Ok(Suggestions::Fallback { coverage });
    }

    Ok(Suggestions::Overlap {
        candidates: rank(candidates, options),
    })
}

/// Unranked candidates: earliest and most central start of every qualifying run.
fn scan_candidates(
    grid: &AvailabilityGrid,
    participants: &[Participant],
    baseline: &BaselineConfig,
) -> Result<Vec<CandidateWindow>, TimesyncError> {
    let duration = baseline.duration();
    let mut candidates = Vec::new();

    for run in qualifying_runs(&grid.mask, grid.granularity, duration) {
        let starts = feasible_starts(run, grid.granularity, duration, grid.scan.start);
        let Some(&earliest) = starts.first() else {
            continue;
        };

        let mut central = earliest;
        let mut central_score = score_window(earliest, participants, baseline)?;
        for &start in &starts[1..] {
            let score = score_window(start, participants, baseline)?;
            if score > central_score {
                central = start;
                central_score = score;
            }
        }

        candidates.push(CandidateWindow::new(earliest, participants, baseline)?);
        if central != earliest {
            candidates.push(CandidateWindow::new(central, participants, baseline)?);
        }
    }

    debug!("scan: {} candidates before ranking", candidates.len());
    Ok(candidates)
}
