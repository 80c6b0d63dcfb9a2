//! Bulk actions over many jobs with per-item isolation.
//!
//! Each job is processed on its own: one job's conflict or failure never
//! stops the others, and the report lists one outcome per requested job.

use serde::{Deserialize, Serialize};

use crate::core::availability::AvailabilityPolicy;
use crate::core::conflict::ScheduleConflict;
use crate::core::staff::{find_staff, StaffMember};
use crate::core::store::{CommitOutcome, CommitPolicy, ScheduleStore};
use crate::core::SchedulingError;
use crate::util::{EventId, JobId, StaffId};

/// Outcome for a single job in a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkItemStatus {
    /// Every event of the job was updated.
    #[serde(rename_all = "camelCase")]
    Applied {
        /// Events touched.
        event_ids: Vec<EventId>,
        /// Non-blocking conflicts accepted under the commit policy.
        #[serde(default)]
        warnings: Vec<ScheduleConflict>,
    },
    /// Conflicts prevented the change; nothing was written for this job.
    #[serde(rename_all = "camelCase")]
    Rejected {
        /// Conflicts found.
        conflicts: Vec<ScheduleConflict>,
    },
    /// The job could not be processed.
    #[serde(rename_all = "camelCase")]
    Failed {
        /// Error description.
        error: String,
    },
}

/// Per-job entry of a [`BulkReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemOutcome {
    /// Job processed.
    pub job_id: JobId,
    /// What happened.
    #[serde(flatten)]
    pub status: BulkItemStatus,
}

impl BulkItemOutcome {
    /// Whether the job was updated.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self.status, BulkItemStatus::Applied { .. })
    }
}

/// Aggregate result of a bulk action, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// One entry per requested job.
    pub outcomes: Vec<BulkItemOutcome>,
}

impl BulkReport {
    /// Jobs that were updated.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Jobs that were rejected or failed.
    #[must_use]
    pub fn unapplied_count(&self) -> usize {
        self.outcomes.len() - self.applied_count()
    }

    /// True only when every requested job was applied.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(BulkItemOutcome::is_applied)
    }

    /// Applied jobs that carried accepted warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.status, BulkItemStatus::Applied { warnings, .. } if !warnings.is_empty()))
            .count()
    }

    /// Short summary for toasts and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_complete_success() {
            match self.warning_count() {
                0 => format!("{} job(s) updated", self.outcomes.len()),
                warned => format!("{} job(s) updated, {warned} with warnings", self.outcomes.len()),
            }
        } else {
            format!(
                "{} of {} job(s) updated, {} not applied",
                self.applied_count(),
                self.outcomes.len(),
                self.unapplied_count()
            )
        }
    }

    fn push(&mut self, job_id: &JobId, status: BulkItemStatus) {
        self.outcomes.push(BulkItemOutcome {
            job_id: job_id.clone(),
            status,
        });
    }

    fn log(&self, action: &str) {
        if self.is_complete_success() {
            tracing::info!(action, jobs = self.outcomes.len(), "bulk action applied");
        } else {
            tracing::warn!(
                action,
                applied = self.applied_count(),
                unapplied = self.unapplied_count(),
                "bulk action partially applied"
            );
        }
    }
}

/// Reassign every scheduled event of each job to `target`.
///
/// Each job is checked against the live store, so reassignments made earlier
/// in the same batch count as existing bookings. A job with several events is
/// all-or-nothing: if a later event is refused, earlier ones are restored.
///
/// # Errors
///
/// Returns [`SchedulingError::UnknownStaff`] when `target` is not in `staff`.
/// Per-job problems are reported in the [`BulkReport`] instead.
pub fn bulk_reassign<S: ScheduleStore + ?Sized>(
    store: &S,
    job_ids: &[JobId],
    target: &StaffId,
    staff: &[StaffMember],
    policy: &AvailabilityPolicy,
    commit_policy: CommitPolicy,
) -> Result<BulkReport, SchedulingError> {
    if find_staff(staff, target).is_none() {
        return Err(SchedulingError::UnknownStaff(target.clone()));
    }

    let mut report = BulkReport::default();
    for job_id in job_ids {
        let status = reassign_job(store, job_id, target, staff, policy, commit_policy);
        report.push(job_id, status);
    }
    report.log("reassign");
    Ok(report)
}

fn reassign_job<S: ScheduleStore + ?Sized>(
    store: &S,
    job_id: &JobId,
    target: &StaffId,
    staff: &[StaffMember],
    policy: &AvailabilityPolicy,
    commit_policy: CommitPolicy,
) -> BulkItemStatus {
    let events = store.events_for_job(job_id);
    if events.is_empty() {
        return BulkItemStatus::Failed {
            error: format!("job {job_id} has no scheduled events"),
        };
    }

    let mut applied = Vec::with_capacity(events.len());
    let mut accepted = Vec::new();
    for original in &events {
        let mut moved = original.clone();
        moved.staff_id = Some(target.clone());

        match store.commit_checked(moved, staff, policy, commit_policy) {
            Ok(CommitOutcome::Committed { event, warnings }) => {
                applied.push(event.id);
                accepted.extend(warnings);
            }
            Ok(CommitOutcome::Rejected { conflicts }) => {
                restore(store, &events, &applied);
                return BulkItemStatus::Rejected { conflicts };
            }
            Err(err) => {
                restore(store, &events, &applied);
                return BulkItemStatus::Failed { error: err.to_string() };
            }
        }
    }

    BulkItemStatus::Applied {
        event_ids: applied,
        warnings: accepted,
    }
}

fn restore<S: ScheduleStore + ?Sized>(
    store: &S,
    originals: &[crate::core::job::ScheduleEvent],
    applied: &[EventId],
) {
    for original in originals.iter().filter(|e| applied.contains(&e.id)) {
        if let Err(err) = store.replace(original.clone()) {
            tracing::error!(event_id = %original.id, "failed to restore event after rejected reassignment: {}", err);
        }
    }
}

/// Remove every scheduled event of each job.
pub fn bulk_unschedule<S: ScheduleStore + ?Sized>(store: &S, job_ids: &[JobId]) -> BulkReport {
    let mut report = BulkReport::default();
    for job_id in job_ids {
        let events = store.events_for_job(job_id);
        if events.is_empty() {
            report.push(
                job_id,
                BulkItemStatus::Failed {
                    error: format!("job {job_id} has no scheduled events"),
                },
            );
            continue;
        }

        let mut removed = Vec::with_capacity(events.len());
        let mut failure = None;
        for event in events {
            match store.remove(&event.id) {
                Ok(event) => removed.push(event.id),
                Err(err) => {
                    failure = Some(err.to_string());
                    break;
                }
            }
        }
        let status = match failure {
            None => BulkItemStatus::Applied {
                event_ids: removed,
                warnings: Vec::new(),
            },
            Some(error) => BulkItemStatus::Failed { error },
        };
        report.push(job_id, status);
    }
    report.log("unschedule");
    report
}
