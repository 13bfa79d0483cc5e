//! Per-tick availability over the baseline scan window.
//!
//! The scan window is sampled every `granularity` minutes. At each tick the
//! absolute instant is converted to every participant's wall clock and
//! checked against their working hours. The combined mask is the AND across
//! participants.

use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::Serialize;

use crate::error::TimesyncError;
use crate::model::{BaselineConfig, EngineOptions, Participant, ScanWindow};
use crate::time::{instant_at_baseline_minute, local_minute};

/// One sample of the baseline timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tick {
    pub index: usize,
    /// Baseline wall-clock minute (ticks inside a DST gap share the instant after it).
    pub offset: u32,
    pub instant: DateTime<Utc>,
}

/// One participant's view of every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantRow {
    pub name: String,
    pub zone: String,
    /// Local minute-of-day at each tick.
    pub local_minutes: Vec<u32>,
    pub available: Vec<bool>,
}

impl ParticipantRow {
    /// Contiguous available stretches as baseline `(start, end)` offsets.
    pub fn blocks(&self, ticks: &[Tick], granularity: u32) -> Vec<(u32, u32)> {
        crate::scanner::find_runs(&self.available)
            .into_iter()
            .map(|run| {
                let start = ticks[run.start].offset;
                (start, start + run.len as u32 * granularity)
            })
            .collect()
    }
}

/// Availability of every participant across the scan window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityGrid {
    pub scan: ScanWindow,
    pub granularity: u32,
    pub ticks: Vec<Tick>,
    pub rows: Vec<ParticipantRow>,
    /// `true` at tick `i` iff every participant is available there.
    pub mask: Vec<bool>,
}

impl AvailabilityGrid {
    /// Number of participants available at tick `i`.
    pub fn available_count(&self, i: usize) -> usize {
        self.rows.iter().filter(|row| row.available[i]).count()
    }
}

/// Build the availability grid for `participants` over the baseline scan window.
///
/// Ticks start at the scan window start and step by `options.granularity`;
/// there are `ceil(len / granularity)` of them. With no participants the mask
/// is all `false`.
///
/// # Errors
///
/// Returns [`TimesyncError::InvalidTimeRange`] for invalid options, or
/// [`TimesyncError::InvalidDatetime`] if the baseline day cannot be anchored.
pub fn build_availability_grid(
    participants: &[Participant],
    baseline: &BaselineConfig,
    options: &EngineOptions,
) -> Result<AvailabilityGrid, TimesyncError> {
    options.validate()?;

    let g = options.granularity;
    let scan = baseline.scan_window(options.margin);
    let tick_count = scan.len().div_ceil(g) as usize;

    let ticks = (0..tick_count)
        .map(|index| {
            let offset = scan.start + index as u32 * g;
            let instant = instant_at_baseline_minute(offset, baseline.zone, baseline.date)?;
            Ok(Tick {
                index,
                offset,
                instant,
            })
        })
        .collect::<Result<Vec<_>, TimesyncError>>()?;

    let rows: Vec<ParticipantRow> = participants
        .iter()
        .map(|p| {
            let local_minutes: Vec<u32> =
                ticks.iter().map(|t| local_minute(t.instant, p.zone)).collect();
            let available = local_minutes.iter().map(|&m| p.hours.contains(m)).collect();
            ParticipantRow {
                name: p.name.clone(),
                zone: p.zone.name().to_string(),
                local_minutes,
                available,
            }
        })
        .collect();

    let mask: Vec<bool> = (0..tick_count)
        .map(|i| !rows.is_empty() && rows.iter().all(|row| row.available[i]))
        .collect();

    for (tick, ok) in ticks.iter().zip(&mask) {
        trace!("tick {} (+{}m) all available: {}", tick.index, tick.offset, ok);
    }
    debug!(
        "grid: {} ticks x {} participants, {} fully available",
        tick_count,
        rows.len(),
        mask.iter().filter(|&&ok| ok).count()
    );

    Ok(AvailabilityGrid {
        scan,
        granularity: g,
        ticks,
        rows,
        mask,
    })
}
