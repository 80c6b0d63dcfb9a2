//! Error types for scheduling operations.
//!
//! Conflicts are never errors: they come back as [`ScheduleConflict`] data.
//! Only malformed input and store failures use this enum.
//!
//! [`ScheduleConflict`]: crate::core::ScheduleConflict

use thiserror::Error;

use crate::util::{EventId, StaffId};

/// Errors produced by scheduling components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// Interval start is not strictly before its end.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),
    /// Interval crosses a calendar day boundary (other than ending at midnight).
    #[error("interval spans more than one calendar day: {0}")]
    MultiDayInterval(String),
    /// Time-of-day string was not a valid `HH:MM` value.
    #[error("invalid time of day `{0}`, expected HH:MM")]
    InvalidTimeOfDay(String),
    /// Job duration is zero, negative or not a finite number.
    #[error("invalid duration: {0} hours")]
    InvalidDuration(f64),
    /// Referenced staff member is not in the supplied snapshot.
    #[error("unknown staff member: {0}")]
    UnknownStaff(StaffId),
    /// Referenced event does not exist in the store.
    #[error("unknown schedule event: {0}")]
    UnknownEvent(EventId),
    /// Event id already present in the store.
    #[error("duplicate schedule event: {0}")]
    DuplicateEvent(EventId),
    /// Auto-schedule options failed validation.
    #[error("invalid auto-schedule options: {0}")]
    InvalidOptions(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
