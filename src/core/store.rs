//! Schedule event store abstraction.
//!
//! The store is the sole authority over committed events. The detector only
//! reads snapshots; [`ScheduleStore::commit_checked`] re-runs it under the
//! store's write lock so that of two overlapping commits at most one wins.

use serde::{Deserialize, Serialize};

use crate::core::availability::AvailabilityPolicy;
use crate::core::conflict::{ConflictKind, ScheduleConflict};
use crate::core::job::ScheduleEvent;
use crate::core::staff::StaffMember;
use crate::core::time::TimeInterval;
use crate::core::SchedulingError;
use crate::util::{EventId, JobId, StaffId};

/// How a checked commit treats conflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Refuse on any conflict.
    #[default]
    Strict,
    /// Refuse double bookings; commit availability problems as warnings.
    WarnOnAvailability,
    /// Commit regardless, reporting every conflict as a warning.
    Force,
}

impl CommitPolicy {
    /// Whether a conflict of `kind` blocks the commit.
    #[must_use]
    pub const fn blocks(self, kind: ConflictKind) -> bool {
        match self {
            Self::Strict => true,
            Self::WarnOnAvailability => kind.is_double_booking(),
            Self::Force => false,
        }
    }
}

/// Result of a checked commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// The event is now on the schedule.
    Committed {
        /// The stored event.
        event: ScheduleEvent,
        /// Non-blocking conflicts that were accepted.
        warnings: Vec<ScheduleConflict>,
    },
    /// Nothing was written.
    Rejected {
        /// Every conflict found, blocking or not.
        conflicts: Vec<ScheduleConflict>,
    },
}

impl CommitOutcome {
    /// Whether the event was written.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Split conflicts into an outcome according to `policy`.
    #[must_use]
    pub fn decide(event: ScheduleEvent, conflicts: Vec<ScheduleConflict>, policy: CommitPolicy) -> Self {
        if conflicts.iter().any(|c| policy.blocks(c.kind)) {
            Self::Rejected { conflicts }
        } else {
            Self::Committed {
                event,
                warnings: conflicts,
            }
        }
    }
}

/// Read/write access to committed schedule events.
///
/// Implementations use interior locking so a single store can be shared
/// across request handlers.
pub trait ScheduleStore: Send + Sync {
    /// Every event, in insertion order.
    fn snapshot(&self) -> Vec<ScheduleEvent>;

    /// Events for one staff member, optionally restricted to those overlapping `range`.
    fn events_for_staff(&self, staff_id: &StaffId, range: Option<&TimeInterval>) -> Vec<ScheduleEvent>;

    /// Events for one job.
    fn events_for_job(&self, job_id: &JobId) -> Vec<ScheduleEvent>;

    /// Look up a single event.
    fn get(&self, id: &EventId) -> Option<ScheduleEvent>;

    /// Insert without conflict checks.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate id or an event with `start_time >= end_time`.
    fn insert(&self, event: ScheduleEvent) -> Result<(), SchedulingError>;

    /// Replace an existing event with the same id, returning the previous version.
    ///
    /// # Errors
    ///
    /// Fails when the id is unknown or the new times are inverted.
    fn replace(&self, event: ScheduleEvent) -> Result<ScheduleEvent, SchedulingError>;

    /// Remove an event, returning it.
    ///
    /// # Errors
    ///
    /// Fails when the id is unknown.
    fn remove(&self, id: &EventId) -> Result<ScheduleEvent, SchedulingError>;

    /// Re-check conflicts against the current contents and write atomically.
    ///
    /// An event whose id already exists is treated as a move of that event.
    ///
    /// # Errors
    ///
    /// Fails on invalid input only (unknown staff, inverted or multi-day
    /// interval). Conflicts are reported through [`CommitOutcome::Rejected`].
    fn commit_checked(
        &self,
        event: ScheduleEvent,
        staff: &[StaffMember],
        policy: &AvailabilityPolicy,
        commit_policy: CommitPolicy,
    ) -> Result<CommitOutcome, SchedulingError>;

    /// Number of stored events.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
