//! The exchange record used for file export/import and share links.
//!
//! The record is accepted verbatim:
//!
//! ```json
//! {
//!   "baselineZone": "Asia/Singapore",
//!   "baselineStart": 540,
//!   "baselineEnd": "17:00",
//!   "durationMinutes": 60,
//!   "date": "2026-03-16",
//!   "participants": [{ "name": "Ana", "zone": "Europe/Lisbon", "start": 540, "end": 1020 }]
//! }
//! ```
//!
//! Minute fields take a minute-of-day integer or an `"HH:MM"` string.
//! `date` and `options` are optional. Transport (files, URL blobs) is the
//! caller's concern; this module only maps JSON to a validated [`Session`].

use chrono::{NaiveDate, NaiveTime, Timelike};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::TimesyncError;
use crate::model::{BaselineConfig, EngineOptions, Participant};
use crate::session::Session;
use crate::time::MINUTES_PER_DAY;

/// A minute-of-day as written in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinuteValue {
    Minutes(i64),
    Clock(String),
}

impl From<u32> for MinuteValue {
    fn from(minute: u32) -> Self {
        MinuteValue::Minutes(i64::from(minute))
    }
}

impl MinuteValue {
    /// Resolve to a minute-of-day in `[0, 1440)`, or `[0, 1440]` when
    /// `allow_end_of_day` (which also accepts `"24:00"`).
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidTimeRange`] for non-numeric or
    /// out-of-bounds values.
    pub fn resolve(&self, field: &str, allow_end_of_day: bool) -> Result<u32, TimesyncError> {
        let max = if allow_end_of_day {
            MINUTES_PER_DAY
        } else {
            MINUTES_PER_DAY - 1
        };
        let minute = match self {
            MinuteValue::Minutes(m) => *m,
            MinuteValue::Clock(s) if allow_end_of_day && s.trim() == "24:00" => {
                i64::from(MINUTES_PER_DAY)
            }
            MinuteValue::Clock(s) => {
                let t = NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| {
                    TimesyncError::InvalidTimeRange(format!("{field}: '{s}' is not HH:MM"))
                })?;
                i64::from(t.hour() * 60 + t.minute())
            }
        };
        if !(0..=i64::from(max)).contains(&minute) {
            return Err(TimesyncError::InvalidTimeRange(format!(
                "{field}: {minute} is outside [0, {max}]"
            )));
        }
        Ok(minute as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
    pub zone: String,
    pub start: MinuteValue,
    pub end: MinuteValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub baseline_zone: String,
    pub baseline_start: MinuteValue,
    pub baseline_end: MinuteValue,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub participants: Vec<ParticipantRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EngineOptions>,
}

impl Default for ConfigRecord {
    /// UTC, 09:00-17:00, one-hour meetings, nobody invited.
    fn default() -> Self {
        Self {
            baseline_zone: "UTC".to_string(),
            baseline_start: MinuteValue::from(9 * 60),
            baseline_end: MinuteValue::from(17 * 60),
            duration_minutes: 60,
            date: None,
            participants: Vec::new(),
            options: None,
        }
    }
}

/// Result of a fail-closed import: a usable session plus what went wrong, if anything.
#[derive(Debug, Clone)]
pub struct Imported {
    pub session: Session,
    pub issue: Option<TimesyncError>,
}

impl ConfigRecord {
    /// Strictly parse a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::InvalidConfig`] for malformed JSON or missing fields.
    pub fn from_json(json: &str) -> Result<Self, TimesyncError> {
        serde_json::from_str(json).map_err(|e| TimesyncError::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, TimesyncError> {
        serde_json::to_string_pretty(self).map_err(|e| TimesyncError::InvalidConfig(e.to_string()))
    }

    /// Validate into a [`Session`]. `fallback_day` is used when the record
    /// carries no `date`.
    ///
    /// # Errors
    ///
    /// Returns the first validation error: zone, minute range, or options.
    pub fn into_session(self, fallback_day: NaiveDate) -> Result<Session, TimesyncError> {
        let baseline = BaselineConfig::new(
            &self.baseline_zone,
            self.date.unwrap_or(fallback_day),
            self.baseline_start.resolve("baselineStart", false)?,
            self.baseline_end.resolve("baselineEnd", true)?,
            self.duration_minutes,
        )?;

        let participants = self
            .participants
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Participant::new(
                    &p.name,
                    &p.zone,
                    p.start.resolve(&format!("participants[{i}].start"), false)?,
                    p.end.resolve(&format!("participants[{i}].end"), false)?,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Session::from_parts(baseline, participants, self.options.unwrap_or_default())
    }

    /// Parse and validate, falling back to the default session on any problem.
    ///
    /// Never fails: a corrupt import yields [`ConfigRecord::default`] on
    /// `fallback_day` and reports the cause in [`Imported::issue`].
    pub fn import_or_default(json: &str, fallback_day: NaiveDate) -> Imported {
        match Self::from_json(json).and_then(|record| record.into_session(fallback_day)) {
            Ok(session) => Imported {
                session,
                issue: None,
            },
            Err(issue) => {
                warn!("rejected imported configuration: {issue}");
                Imported {
                    session: Session::default_for(fallback_day),
                    issue: Some(issue),
                }
            }
        }
    }
}

impl Session {
    /// Export the session in the exchange shape, with minutes as integers.
    pub fn to_record(&self) -> ConfigRecord {
        let baseline = self.baseline();
        let options = self.options();
        ConfigRecord {
            baseline_zone: baseline.zone.name().to_string(),
            baseline_start: baseline.window_start().into(),
            baseline_end: baseline.window_end().into(),
            duration_minutes: baseline.duration(),
            date: Some(baseline.date),
            participants: self
                .participants()
                .iter()
                .map(|p| ParticipantRecord {
                    name: p.name.clone(),
                    zone: p.zone.name().to_string(),
                    start: p.hours.start().into(),
                    end: p.hours.end().into(),
                })
                .collect(),
            options: (options != &EngineOptions::default()).then(|| options.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
    }

    const SAMPLE: &str = r#"{
        "baselineZone": "Asia/Singapore",
        "baselineStart": 540,
        "baselineEnd": "17:00",
        "durationMinutes": 45,
        "participants": [
            {"name": "Ana", "zone": "Europe/Lisbon", "start": "09:00", "end": 1020},
            {"name": "Nox", "zone": "America/Chicago", "start": 1320, "end": 360}
        ]
    }"#;

    #[test]
    fn test_parse_mixed_minute_forms() {
        let session = ConfigRecord::from_json(SAMPLE).unwrap().into_session(day()).unwrap();
        assert_eq!(session.baseline().zone.name(), "Asia/Singapore");
        assert_eq!(session.baseline().window_end(), 1020);
        assert_eq!(session.baseline().duration(), 45);
        assert_eq!(session.baseline().date, day());
        assert_eq!(session.participants()[0].hours.start(), 540);
        assert!(session.participants()[1].hours.is_overnight());
    }

    #[test]
    fn test_record_date_overrides_fallback() {
        let json = r#"{"baselineZone":"UTC","baselineStart":0,"baselineEnd":"24:00",
            "durationMinutes":30,"date":"2026-07-01"}"#;
        let session = ConfigRecord::from_json(json).unwrap().into_session(day()).unwrap();
        assert_eq!(session.baseline().date, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        assert_eq!(session.baseline().window_end(), 1440);
    }

    #[test]
    fn test_missing_field_is_invalid_config() {
        let err = ConfigRecord::from_json(r#"{"baselineZone":"UTC"}"#).unwrap_err();
        assert!(matches!(err, TimesyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_numeric_minute_is_invalid_time_range() {
        let json = r#"{"baselineZone":"UTC","baselineStart":"nine","baselineEnd":1020,"durationMinutes":60}"#;
        let err = ConfigRecord::from_json(json).unwrap().into_session(day()).unwrap_err();
        assert!(matches!(err, TimesyncError::InvalidTimeRange(_)), "got {err:?}");
    }

    #[test]
    fn test_out_of_bounds_participant_minute() {
        let json = r#"{"baselineZone":"UTC","baselineStart":540,"baselineEnd":1020,"durationMinutes":60,
            "participants":[{"name":"Ana","zone":"UTC","start":540,"end":1440}]}"#;
        let err = ConfigRecord::from_json(json).unwrap().into_session(day()).unwrap_err();
        assert!(err.to_string().contains("participants[0].end"), "got {err}");
    }

    #[test]
    fn test_invalid_zone_reported() {
        let json = r#"{"baselineZone":"Mars/Base","baselineStart":540,"baselineEnd":1020,"durationMinutes":60}"#;
        let err = ConfigRecord::from_json(json).unwrap().into_session(day()).unwrap_err();
        assert!(matches!(err, TimesyncError::InvalidTimezone(_)));
    }

    #[test]
    fn test_import_or_default_fails_closed() {
        let imported = ConfigRecord::import_or_default("{not json", day());
        assert!(matches!(imported.issue, Some(TimesyncError::InvalidConfig(_))));
        assert_eq!(imported.session, Session::default_for(day()));
    }

    #[test]
    fn test_import_rejects_overflowing_margin() {
        let json = r#"{"baselineZone":"UTC","baselineStart":540,"baselineEnd":1020,"durationMinutes":60,
            "participants":[{"name":"Ana","zone":"UTC","start":540,"end":1020}],
            "options":{"margin":4294967295}}"#;
        let imported = ConfigRecord::import_or_default(json, day());
        assert!(matches!(imported.issue, Some(TimesyncError::InvalidTimeRange(_))));
        assert_eq!(imported.session, Session::default_for(day()));
        assert!(imported.session.suggestions().is_ok());
        assert!(imported.session.grid().is_ok());
    }

    #[test]
    fn test_import_rejects_zero_top_n() {
        let json = r#"{"baselineZone":"UTC","baselineStart":540,"baselineEnd":1020,"durationMinutes":60,
            "options":{"top_n":0}}"#;
        let imported = ConfigRecord::import_or_default(json, day());
        assert!(matches!(imported.issue, Some(TimesyncError::InvalidConfig(_))));
    }

    #[test]
    fn test_import_or_default_passes_valid_record() {
        let imported = ConfigRecord::import_or_default(SAMPLE, day());
        assert!(imported.issue.is_none());
        assert_eq!(imported.session.participants().len(), 2);
    }

    #[test]
    fn test_export_then_import_preserves_session() {
        let session = ConfigRecord::from_json(SAMPLE).unwrap().into_session(day()).unwrap();
        let json = session.to_record().to_json().unwrap();
        assert!(json.contains("\"baselineEnd\": 1020"));
        let back = ConfigRecord::from_json(&json).unwrap().into_session(day()).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_options_in_record() {
        let json = r#"{"baselineZone":"UTC","baselineStart":540,"baselineEnd":1020,"durationMinutes":60,
            "options":{"granularity":30,"topN":1}}"#;
        // Options use snake_case field names; unknown keys are rejected.
        assert!(ConfigRecord::from_json(json).is_err());

        let json = r#"{"baselineZone":"UTC","baselineStart":540,"baselineEnd":1020,"durationMinutes":60,
            "options":{"granularity":30,"top_n":1}}"#;
        let session = ConfigRecord::from_json(json).unwrap().into_session(day()).unwrap();
        assert_eq!(session.options().granularity, 30);
        assert_eq!(session.options().top_n, 1);
    }
}
