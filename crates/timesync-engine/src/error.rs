//! Error types for timesync-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimesyncError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown participant: index {index} (have {count})")]
    UnknownParticipant { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, TimesyncError>;
