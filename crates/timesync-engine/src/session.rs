//! Explicit session state and the commands that mutate it.
//!
//! A [`Session`] owns the participant list, baseline frame, and options.
//! Callers mutate it through [`Command`]s and then ask for fresh
//! suggestions or a grid; nothing derived is cached between calls.

use chrono::NaiveDate;
use log::info;

use crate::error::TimesyncError;
use crate::mask::{build_availability_grid, AvailabilityGrid};
use crate::model::{BaselineConfig, EngineOptions, Participant};
use crate::suggest::{compute_suggestions_with_options, Suggestions};

/// A mutation of session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddParticipant(Participant),
    UpdateParticipant { index: usize, participant: Participant },
    RemoveParticipant { index: usize },
    SetBaseline(BaselineConfig),
    SetOptions(EngineOptions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    baseline: BaselineConfig,
    participants: Vec<Participant>,
    options: EngineOptions,
}

impl Session {
    pub fn new(baseline: BaselineConfig) -> Self {
        Self {
            baseline,
            participants: Vec::new(),
            options: EngineOptions::default(),
        }
    }

    /// A session with explicit participants and options.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `options`.
    pub fn from_parts(
        baseline: BaselineConfig,
        participants: Vec<Participant>,
        options: EngineOptions,
    ) -> Result<Self, TimesyncError> {
        options.validate()?;
        Ok(Self {
            baseline,
            participants,
            options,
        })
    }

    /// An empty session on `date`: UTC, 09:00-17:00, one-hour meetings.
    pub fn default_for(date: NaiveDate) -> Self {
        Self::new(BaselineConfig::default_for(date))
    }

    pub fn baseline(&self) -> &BaselineConfig {
        &self.baseline
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Apply one command.
    ///
    /// # Errors
    ///
    /// Returns [`TimesyncError::UnknownParticipant`] for an index past the end
    /// of the list, or the validation error of new options. State is left
    /// untouched on error.
    pub fn apply(&mut self, command: Command) -> Result<(), TimesyncError> {
        match command {
            Command::AddParticipant(participant) => {
                info!("add participant '{}' ({})", participant.name, participant.zone.name());
                self.participants.push(participant);
            }
            Command::UpdateParticipant { index, participant } => {
                let count = self.participants.len();
                let slot = self
                    .participants
                    .get_mut(index)
                    .ok_or(TimesyncError::UnknownParticipant { index, count })?;
                info!("update participant {index} → '{}'", participant.name);
                *slot = participant;
            }
            Command::RemoveParticipant { index } => {
                let count = self.participants.len();
                if index >= count {
                    return Err(TimesyncError::UnknownParticipant { index, count });
                }
                let removed = self.participants.remove(index);
                info!("remove participant '{}'", removed.name);
            }
            Command::SetBaseline(baseline) => {
                self.baseline = baseline;
            }
            Command::SetOptions(options) => {
                options.validate()?;
                self.options = options;
            }
        }
        Ok(())
    }

    /// Ranked suggestions for the current state.
    pub fn suggestions(&self) -> Result<Suggestions, TimesyncError> {
        compute_suggestions_with_options(&self.participants, &self.baseline, &self.options)
    }

    /// Availability grid for the current state at the session granularity.
    pub fn grid(&self) -> Result<AvailabilityGrid, TimesyncError> {
        build_availability_grid(&self.participants, &self.baseline, &self.options)
    }
}
