//! Contiguous-run detection over an availability mask.
//!
//! A run of `len` ticks at granularity `g` covers `len * g` minutes. Runs at
//! least as long as the meeting qualify as candidate sources; each yields
//! tick-aligned start offsets whose full duration stays inside the run.

use serde::Serialize;

/// A maximal stretch of consecutive `true` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    /// Index of the first tick in the run.
    pub start: usize,
    /// Number of ticks in the run.
    pub len: usize,
}

impl Run {
    /// Length of the run in minutes.
    pub fn minutes(self, granularity: u32) -> u32 {
        self.len as u32 * granularity
    }
}

/// Find maximal runs of `true`, left to right.
///
/// # Examples
///
/// ```
/// use timesync_engine::scanner::{find_runs, Run};
///
/// let runs = find_runs(&[false, true, true, false, true]);
/// assert_eq!(runs, vec![Run { start: 1, len: 2 }, Run { start: 4, len: 1 }]);
/// ```
pub fn find_runs(mask: &[bool]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < mask.len() {
        if !mask[i] {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < mask.len() && mask[j] {
            j += 1;
        }
        runs.push(Run { start: i, len: j - i });
        i = j;
    }
    runs
}

/// Runs long enough to hold a meeting of `duration` minutes.
pub fn qualifying_runs(mask: &[bool], granularity: u32, duration: u32) -> Vec<Run> {
    find_runs(mask)
        .into_iter()
        .filter(|run| run.minutes(granularity) >= duration)
        .collect()
}

/// Baseline start offsets, tick-aligned, whose `[start, start + duration)`
/// fits inside `run`. The first element is the earliest start.
///
/// `scan_start` is the baseline offset of tick 0.
pub fn feasible_starts(run: Run, granularity: u32, duration: u32, scan_start: u32) -> Vec<u32> {
    let run_start = scan_start + run.start as u32 * granularity;
    let run_end = run_start + run.minutes(granularity);
    (0..run.len as u32)
        .map(|k| run_start + k * granularity)
        .take_while(|&start| start + duration <= run_end)
        .collect()
}
