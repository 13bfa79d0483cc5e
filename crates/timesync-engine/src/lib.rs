//! # timesync-engine
//!
//! Deterministic meeting-overlap computation across time zones.
//!
//! Given participants with local working hours in arbitrary IANA zones and a
//! baseline zone/day, the engine samples the baseline timeline, finds the
//! stretches where everyone is working, and ranks meeting windows by how
//! close they fall to the centre of each participant's day. When nobody
//! fully overlaps it proposes best-coverage near misses instead.
//!
//! ## Modules
//!
//! - [`time`] — Zone validation, instant ↔ wall clock, baseline minute → instant
//! - [`availability`] — Working-hour inclusion with overnight and fencepost rules
//! - [`model`] — Validated participants, baseline frame, and engine options
//! - [`mask`] — Per-tick availability grid and the combined overlap mask
//! - [`scanner`] — Contiguous runs in the mask and feasible window starts
//! - [`scoring`] — Fairness score and ranking of candidate windows
//! - [`fallback`] — Best-coverage slots when no window fits everyone
//! - [`suggest`] — The end-to-end suggestion pipeline
//! - [`session`] — Explicit session state and mutation commands
//! - [`config`] — JSON exchange record with fail-closed import
//! - [`error`] — Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod fallback;
pub mod mask;
pub mod model;
pub mod scanner;
pub mod scoring;
pub mod session;
pub mod suggest;
pub mod time;

pub use availability::{is_available, WorkingHours};
pub use config::{ConfigRecord, Imported, MinuteValue, ParticipantRecord};
pub use error::{Result, TimesyncError};
pub use fallback::{best_coverage, Absentee, CoverageLabel, CoverageWindow};
pub use mask::{build_availability_grid, AvailabilityGrid, ParticipantRow, Tick};
pub use model::{BaselineConfig, EngineOptions, Participant, ScanWindow};
pub use scoring::{AttendeeSpan, CandidateWindow};
pub use session::{Command, Session};
pub use suggest::{compute_suggestions, compute_suggestions_with_options, Suggestions};
pub use time::{instant_at_baseline_minute, parse_timezone, wall_clock, WallClock};
