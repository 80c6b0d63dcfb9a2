//! Scheduler facade tying configuration, policy and a store together.
//!
//! The facade holds no staff state of its own: every call takes the staff
//! snapshot explicitly, and event data is read from the store at call time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::SchedulingConfig;
use crate::core::audit::{AuditEvent, InMemoryAuditSink};
use crate::core::availability::AvailabilityPolicy;
use crate::core::bulk::{self, BulkReport};
use crate::core::conflict::{check_conflicts, Candidate, ScheduleConflict};
use crate::core::job::{Job, ScheduleEvent};
use crate::core::staff::StaffMember;
use crate::core::store::{CommitOutcome, CommitPolicy, ScheduleStore};
use crate::core::suggest::{suggest_slots, AutoScheduleOptions, SuggestionDefaults};
use crate::core::time::TimeInterval;
use crate::core::workload::{staff_workload, StaffWorkload};
use crate::core::SchedulingError;
use crate::util::clock;
use crate::util::{EventId, JobId, StaffId};

/// High-level entry point used by the dashboard's scheduling views.
pub struct Scheduler<S: ScheduleStore> {
    config: SchedulingConfig,
    policy: AvailabilityPolicy,
    defaults: SuggestionDefaults,
    store: Arc<S>,
    audit_log: Option<Arc<Mutex<InMemoryAuditSink>>>,
}

impl<S: ScheduleStore> Scheduler<S> {
    /// Create a scheduler over `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::Config`] when `config` does not validate.
    pub fn new(config: SchedulingConfig, store: Arc<S>) -> Result<Self, SchedulingError> {
        config.validate().map_err(SchedulingError::Config)?;
        let policy = config.availability_policy().map_err(SchedulingError::Config)?;
        let defaults = config.suggestion_defaults();
        Ok(Self {
            config,
            policy,
            defaults,
            store,
            audit_log: None,
        })
    }

    /// Attach a readable audit log (the same sink the store writes to).
    #[must_use]
    pub fn with_audit_log(mut self, log: Arc<Mutex<InMemoryAuditSink>>) -> Self {
        self.audit_log = Some(log);
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Availability policy derived from the configuration.
    #[must_use]
    pub const fn policy(&self) -> &AvailabilityPolicy {
        &self.policy
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recent audit entries, oldest first. Empty when no log is attached.
    #[must_use]
    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_log
            .as_ref()
            .map(|log| log.lock().events())
            .unwrap_or_default()
    }

    /// Validate a manual assignment against the current schedule.
    ///
    /// # Errors
    ///
    /// Invalid input only; conflicts are returned as data.
    pub fn check_assignment(
        &self,
        candidate: &Candidate,
        staff: &[StaffMember],
    ) -> Result<Vec<ScheduleConflict>, SchedulingError> {
        check_conflicts(candidate, &self.store.snapshot(), staff, &self.policy)
    }

    /// Suggest slots for a job starting from the current time.
    ///
    /// # Errors
    ///
    /// Same as [`suggest_slots`].
    pub fn suggest(
        &self,
        job: &Job,
        options: &AutoScheduleOptions,
        staff_pool: &[StaffMember],
    ) -> Result<Vec<ScheduleEvent>, SchedulingError> {
        self.suggest_at(job, options, staff_pool, clock::now())
    }

    /// Suggest slots for a job as seen from `now`.
    ///
    /// # Errors
    ///
    /// Same as [`suggest_slots`].
    pub fn suggest_at(
        &self,
        job: &Job,
        options: &AutoScheduleOptions,
        staff_pool: &[StaffMember],
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduleEvent>, SchedulingError> {
        suggest_slots(
            job,
            options,
            &self.store.snapshot(),
            staff_pool,
            &self.policy,
            &self.defaults,
            now,
        )
    }

    /// Commit an event using the configured commit policy.
    ///
    /// # Errors
    ///
    /// Invalid input only; refusals come back as [`CommitOutcome::Rejected`].
    pub fn commit(&self, event: ScheduleEvent, staff: &[StaffMember]) -> Result<CommitOutcome, SchedulingError> {
        self.commit_with(event, staff, self.config.commit_policy)
    }

    /// Commit an event with an explicit commit policy.
    ///
    /// # Errors
    ///
    /// Same as [`Scheduler::commit`].
    pub fn commit_with(
        &self,
        event: ScheduleEvent,
        staff: &[StaffMember],
        commit_policy: CommitPolicy,
    ) -> Result<CommitOutcome, SchedulingError> {
        self.store.commit_checked(event, staff, &self.policy, commit_policy)
    }

    /// Move an existing event to `interval`, optionally reassigning it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::UnknownEvent`] when the event does not exist.
    pub fn reschedule(
        &self,
        event_id: &EventId,
        interval: TimeInterval,
        staff_id: Option<StaffId>,
        staff: &[StaffMember],
    ) -> Result<CommitOutcome, SchedulingError> {
        let mut event = self
            .store
            .get(event_id)
            .ok_or_else(|| SchedulingError::UnknownEvent(event_id.clone()))?;
        event.set_interval(interval);
        if staff_id.is_some() {
            event.staff_id = staff_id;
        }
        self.commit(event, staff)
    }

    /// Remove an event from the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::UnknownEvent`] when the event does not exist.
    pub fn unschedule(&self, event_id: &EventId) -> Result<ScheduleEvent, SchedulingError> {
        self.store.remove(event_id)
    }

    /// Reassign many jobs to one staff member, reporting per job.
    ///
    /// # Errors
    ///
    /// Same as [`bulk::bulk_reassign`].
    pub fn bulk_reassign(
        &self,
        job_ids: &[JobId],
        target: &StaffId,
        staff: &[StaffMember],
    ) -> Result<BulkReport, SchedulingError> {
        bulk::bulk_reassign(
            self.store.as_ref(),
            job_ids,
            target,
            staff,
            &self.policy,
            self.config.commit_policy,
        )
    }

    /// Unschedule many jobs, reporting per job.
    #[must_use]
    pub fn bulk_unschedule(&self, job_ids: &[JobId]) -> BulkReport {
        bulk::bulk_unschedule(self.store.as_ref(), job_ids)
    }

    /// Workload per staff member over `range`.
    ///
    /// # Errors
    ///
    /// Same as [`staff_workload`].
    pub fn workload(
        &self,
        staff: &[StaffMember],
        range: &TimeInterval,
    ) -> Result<Vec<StaffWorkload>, SchedulingError> {
        staff_workload(staff, &self.store.snapshot(), range, &self.policy)
    }
}
