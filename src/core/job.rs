//! Job records and committed schedule events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::time::TimeInterval;
use crate::core::SchedulingError;
use crate::util::{EventId, JobId, MachineId, StaffId};

/// Workflow status of a job. Display-only as far as scheduling is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Received, not yet scheduled.
    #[default]
    Pending,
    /// Placed on the calendar.
    Scheduled,
    /// On the press.
    InProgress,
    /// Finished.
    Completed,
    /// Abandoned.
    Cancelled,
    /// Archived out of the active board.
    Archived,
}

/// Job priority. Display-only as far as scheduling is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    /// Whenever there is room.
    Low,
    /// Normal turnaround.
    #[default]
    Medium,
    /// Rush order.
    High,
    /// Drop everything.
    Urgent,
}

/// A print job as supplied by the job provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier.
    pub id: JobId,
    /// Short title shown on the board.
    #[serde(default)]
    pub title: String,
    /// Job type tag matched against staff capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// Estimated hours of work; drives the required slot length.
    pub estimated_hours: f64,
    /// Latest acceptable start for any suggested slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Workflow status.
    #[serde(default)]
    pub status: JobStatus,
    /// Priority.
    #[serde(default)]
    pub priority: JobPriority,
    /// Machine the job must run on, if fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<MachineId>,
}

impl Job {
    /// A pending job with the given duration.
    pub fn new(id: impl Into<JobId>, estimated_hours: f64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            job_type: None,
            estimated_hours,
            deadline: None,
            status: JobStatus::Pending,
            priority: JobPriority::Medium,
            machine_id: None,
        }
    }

    /// Builder-style deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder-style job type.
    #[must_use]
    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    /// Builder-style machine requirement.
    #[must_use]
    pub fn with_machine(mut self, machine: impl Into<MachineId>) -> Self {
        self.machine_id = Some(machine.into());
        self
    }
}

/// A committed assignment on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    /// Unique identifier.
    pub id: EventId,
    /// Scheduled job.
    pub job_id: JobId,
    /// Assigned staff member, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    /// Machine in use, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<MachineId>,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Exclusive end.
    pub end_time: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether the slot came from the auto-scheduler.
    #[serde(default)]
    pub is_auto_scheduled: bool,
}

impl ScheduleEvent {
    /// A manual event with a fresh id.
    pub fn new(job_id: impl Into<JobId>, staff_id: Option<StaffId>, interval: TimeInterval) -> Self {
        Self {
            id: EventId::generate(),
            job_id: job_id.into(),
            staff_id,
            machine_id: None,
            start_time: interval.start(),
            end_time: interval.end(),
            notes: None,
            is_auto_scheduled: false,
        }
    }

    /// Builder-style machine.
    #[must_use]
    pub fn with_machine(mut self, machine: impl Into<MachineId>) -> Self {
        self.machine_id = Some(machine.into());
        self
    }

    /// Builder-style explicit id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = id.into();
        self
    }

    /// The event's time span.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] if the event violates `start < end`.
    pub fn interval(&self) -> Result<TimeInterval, SchedulingError> {
        TimeInterval::new(self.start_time, self.end_time)
    }

    /// Move the event to a new interval.
    pub fn set_interval(&mut self, interval: TimeInterval) {
        self.start_time = interval.start();
        self.end_time = interval.end();
    }

    /// Whether the event is assigned to `staff`.
    #[must_use]
    pub fn is_for_staff(&self, staff: &StaffId) -> bool {
        self.staff_id.as_ref() == Some(staff)
    }
}
