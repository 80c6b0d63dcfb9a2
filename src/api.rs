//! Request/response models for the dashboard's scheduling views, and thin
//! handlers mapping them onto a [`Scheduler`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    AutoScheduleOptions, BulkReport, Candidate, CommitOutcome, Job, ScheduleConflict, ScheduleEvent,
    ScheduleStore, Scheduler, SchedulingError, StaffMember, TimeInterval,
};
use crate::util::{JobId, MachineId, StaffId};

/// Manual assignment to validate or commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    /// Job being placed.
    pub job_id: JobId,
    /// Staff member, or `None` to leave unassigned.
    #[serde(default)]
    pub staff_id: Option<StaffId>,
    /// Machine to occupy.
    #[serde(default)]
    pub machine_id: Option<MachineId>,
    /// Start instant.
    pub start_time: DateTime<Utc>,
    /// End instant.
    pub end_time: DateTime<Utc>,
    /// Free-form notes stored with the event.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AssignmentRequest {
    fn interval(&self) -> Result<TimeInterval, SchedulingError> {
        TimeInterval::new(self.start_time, self.end_time)
    }

    fn candidate(&self) -> Result<Candidate, SchedulingError> {
        Ok(Candidate {
            staff_id: self.staff_id.clone(),
            machine_id: self.machine_id.clone(),
            interval: self.interval()?,
            replaces: None,
        })
    }

    fn into_event(self) -> Result<ScheduleEvent, SchedulingError> {
        let mut event = ScheduleEvent::new(self.job_id.clone(), self.staff_id.clone(), self.interval()?);
        event.machine_id = self.machine_id;
        event.notes = self.notes;
        Ok(event)
    }
}

/// Conflicts for a manual assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    /// Whether the assignment can be committed without any conflict.
    pub safe_to_commit: bool,
    /// Conflicts, double bookings first.
    pub conflicts: Vec<ScheduleConflict>,
}

/// Auto-schedule request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Job to place.
    pub job: Job,
    /// Search options.
    #[serde(default)]
    pub options: AutoScheduleOptions,
}

/// Auto-schedule response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    /// Uncommitted candidate events, best first.
    pub suggestions: Vec<ScheduleEvent>,
    /// Message for the empty case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Bulk reassignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReassignRequest {
    /// Jobs to move.
    pub job_ids: Vec<JobId>,
    /// New staff member.
    pub target_staff_id: StaffId,
}

/// Bulk reassignment response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReassignResponse {
    /// True only when every job was reassigned.
    pub complete: bool,
    /// Human-readable summary.
    pub summary: String,
    /// Per-job detail.
    pub report: BulkReport,
}

/// Validate a manual assignment.
///
/// # Errors
///
/// Invalid input (inverted times, unknown staff, multi-day interval).
pub fn check_assignment<S: ScheduleStore>(
    scheduler: &Scheduler<S>,
    req: &AssignmentRequest,
    staff: &[StaffMember],
) -> Result<ConflictReport, SchedulingError> {
    let conflicts = scheduler.check_assignment(&req.candidate()?, staff)?;
    Ok(ConflictReport {
        safe_to_commit: conflicts.is_empty(),
        conflicts,
    })
}

/// Commit a manual assignment using the scheduler's commit policy.
///
/// # Errors
///
/// Same as [`check_assignment`].
pub fn commit_assignment<S: ScheduleStore>(
    scheduler: &Scheduler<S>,
    req: AssignmentRequest,
    staff: &[StaffMember],
) -> Result<CommitOutcome, SchedulingError> {
    scheduler.commit(req.into_event()?, staff)
}

/// Produce auto-schedule suggestions as seen from `now`.
///
/// # Errors
///
/// Invalid duration or options.
pub fn suggest<S: ScheduleStore>(
    scheduler: &Scheduler<S>,
    req: &SuggestionRequest,
    staff_pool: &[StaffMember],
    now: DateTime<Utc>,
) -> Result<SuggestionResponse, SchedulingError> {
    let suggestions = scheduler.suggest_at(&req.job, &req.options, staff_pool, now)?;
    let message = suggestions
        .is_empty()
        .then(|| "no availability found".to_owned());
    Ok(SuggestionResponse { suggestions, message })
}

/// Reassign jobs in bulk.
///
/// # Errors
///
/// Unknown target staff member.
pub fn bulk_reassign<S: ScheduleStore>(
    scheduler: &Scheduler<S>,
    req: &BulkReassignRequest,
    staff: &[StaffMember],
) -> Result<BulkReassignResponse, SchedulingError> {
    let report = scheduler.bulk_reassign(&req.job_ids, &req.target_staff_id, staff)?;
    Ok(BulkReassignResponse {
        complete: report.is_complete_success(),
        summary: report.summary(),
        report,
    })
}
