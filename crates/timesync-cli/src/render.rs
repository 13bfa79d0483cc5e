//! Plain-text rendering of suggestions and the availability timeline.

use chrono::{DateTime, Utc};
use timesync_engine::{
    AttendeeSpan, AvailabilityGrid, BaselineConfig, CoverageLabel, CoverageWindow,
    CandidateWindow, Session, Suggestions,
};

const AVAILABLE: char = '█';
const UNAVAILABLE: char = '·';

fn header(session: &Session) -> String {
    let baseline = session.baseline();
    format!(
        "Baseline {} · {} · {} min meeting\n\n",
        baseline.zone.name(),
        baseline.date,
        baseline.duration()
    )
}

/// `HH:MM-HH:MM` on the baseline clock.
fn span(start: DateTime<Utc>, end: DateTime<Utc>, baseline: &BaselineConfig) -> String {
    format!(
        "{}-{}",
        start.with_timezone(&baseline.zone).format("%H:%M"),
        end.with_timezone(&baseline.zone).format("%H:%M")
    )
}

/// `HH:MM` of an RFC 3339 timestamp, keeping its own offset.
fn clock(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}

fn attendee_line(a: &AttendeeSpan) -> String {
    format!(
        "      {} ({})  {}-{} UTC{}\n",
        a.name,
        a.zone,
        clock(&a.local_start),
        clock(&a.local_end),
        a.utc_offset
    )
}

fn candidate_block(c: &CandidateWindow, baseline: &BaselineConfig) -> String {
    let marker = if c.highlighted { '★' } else { ' ' };
    let mut out = format!(
        "  {marker} {}  score {:.2}\n",
        span(c.start, c.end, baseline),
        c.score
    );
    for a in &c.attendees {
        out.push_str(&attendee_line(a));
    }
    out
}

fn coverage_block(c: &CoverageWindow, baseline: &BaselineConfig) -> String {
    let tag = match c.label {
        CoverageLabel::BestCoverage => "best coverage",
        CoverageLabel::Consider => "consider",
    };
    let available = if c.available.is_empty() {
        "none".to_string()
    } else {
        c.available.join(", ")
    };
    let absent = if c.unavailable.is_empty() {
        "none".to_string()
    } else {
        c.unavailable
            .iter()
            .map(|a| format!("{} at {}", a.name, a.local_time))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "  [{tag}] {}  {} of {} available\n      available: {available}\n      not ideal: {absent}\n",
        span(c.start, c.end, baseline),
        c.available_count,
        c.total
    )
}

pub fn suggestions(session: &Session, suggestions: &Suggestions) -> String {
    let mut out = header(session);
    match suggestions {
        Suggestions::NoParticipants => out.push_str("Add at least one participant.\n"),
        Suggestions::Overlap { candidates } => {
            for c in candidates {
                out.push_str(&candidate_block(c, session.baseline()));
            }
        }
        Suggestions::Fallback { coverage } => {
            out.push_str("No window fits everyone. Closest options:\n");
            for c in coverage {
                out.push_str(&coverage_block(c, session.baseline()));
            }
        }
    }
    out
}

/// One bar per participant plus the combined overlap, on the baseline axis.
pub fn timeline(session: &Session, grid: &AvailabilityGrid) -> String {
    let mut out = header(session);
    if grid.rows.is_empty() {
        out.push_str("No participants yet.\n");
        return out;
    }

    let labels: Vec<String> = grid
        .rows
        .iter()
        .map(|row| format!("{} {}", row.name, row.zone))
        .collect();
    let width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("everyone".len());

    let mut axis = vec![' '; grid.ticks.len()];
    for (i, tick) in grid.ticks.iter().enumerate() {
        if tick.offset % 60 == 0 && i + 1 < axis.len() {
            let hour = format!("{:02}", (tick.offset / 60) % 24);
            for (j, ch) in hour.chars().enumerate() {
                axis[i + j] = ch;
            }
        }
    }
    out.push_str(&format!("{:width$}  {}\n", "", axis.iter().collect::<String>()));

    let bar = |cells: &[bool]| -> String {
        cells
            .iter()
            .map(|&ok| if ok { AVAILABLE } else { UNAVAILABLE })
            .collect()
    };
    for (label, row) in labels.iter().zip(&grid.rows) {
        out.push_str(&format!("{label:width$}  {}\n", bar(&row.available)));
    }
    out.push_str(&format!("{:width$}  {}\n", "everyone", bar(&grid.mask)));
    out
}
