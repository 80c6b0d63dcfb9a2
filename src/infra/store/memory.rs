//! In-memory schedule store guarded by a `parking_lot::RwLock`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::availability::AvailabilityPolicy;
use crate::core::conflict::{check_conflicts, Candidate};
use crate::core::job::ScheduleEvent;
use crate::core::staff::StaffMember;
use crate::core::store::{CommitOutcome, CommitPolicy, ScheduleStore};
use crate::core::time::TimeInterval;
use crate::core::SchedulingError;
use crate::util::{EventId, JobId, StaffId};

/// Shared handle to an audit sink.
pub type SharedAuditSink = Arc<Mutex<dyn AuditSink>>;

/// In-memory store keeping events in insertion order.
///
/// Reads take the shared lock; every write, including the conflict re-check
/// in [`ScheduleStore::commit_checked`], runs under the exclusive lock.
#[derive(Default)]
pub struct InMemoryScheduleStore {
    events: RwLock<Vec<ScheduleEvent>>,
    audit: Option<SharedAuditSink>,
}

impl InMemoryScheduleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with events. Events are not conflict-checked.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids or inverted times.
    pub fn with_events(events: impl IntoIterator<Item = ScheduleEvent>) -> Result<Self, SchedulingError> {
        let store = Self::new();
        for event in events {
            store.insert(event)?;
        }
        Ok(store)
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, sink: SharedAuditSink) -> Self {
        self.audit = Some(sink);
        self
    }

    fn audit(&self, event: &ScheduleEvent, action: AuditAction, payload: Option<String>) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(event, action, payload));
        }
    }
}

fn position(events: &[ScheduleEvent], id: &EventId) -> Option<usize> {
    events.iter().position(|e| &e.id == id)
}

impl ScheduleStore for InMemoryScheduleStore {
    fn snapshot(&self) -> Vec<ScheduleEvent> {
        self.events.read().clone()
    }

    fn events_for_staff(&self, staff_id: &StaffId, range: Option<&TimeInterval>) -> Vec<ScheduleEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.is_for_staff(staff_id))
            .filter(|e| match (range, e.interval()) {
                (None, _) => true,
                (Some(range), Ok(iv)) => range.overlaps(&iv),
                (Some(_), Err(_)) => false,
            })
            .cloned()
            .collect()
    }

    fn events_for_job(&self, job_id: &JobId) -> Vec<ScheduleEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| &e.job_id == job_id)
            .cloned()
            .collect()
    }

    fn get(&self, id: &EventId) -> Option<ScheduleEvent> {
        let events = self.events.read();
        position(&events, id).map(|i| events[i].clone())
    }

    fn insert(&self, event: ScheduleEvent) -> Result<(), SchedulingError> {
        event.interval()?;
        let mut events = self.events.write();
        if position(&events, &event.id).is_some() {
            return Err(SchedulingError::DuplicateEvent(event.id));
        }
        self.audit(&event, AuditAction::Commit, None);
        events.push(event);
        Ok(())
    }

    fn replace(&self, event: ScheduleEvent) -> Result<ScheduleEvent, SchedulingError> {
        event.interval()?;
        let mut events = self.events.write();
        let idx = position(&events, &event.id).ok_or_else(|| SchedulingError::UnknownEvent(event.id.clone()))?;
        self.audit(&event, AuditAction::Reschedule, None);
        Ok(std::mem::replace(&mut events[idx], event))
    }

    fn remove(&self, id: &EventId) -> Result<ScheduleEvent, SchedulingError> {
        let mut events = self.events.write();
        let idx = position(&events, id).ok_or_else(|| SchedulingError::UnknownEvent(id.clone()))?;
        let removed = events.remove(idx);
        self.audit(&removed, AuditAction::Unschedule, None);
        Ok(removed)
    }

    fn commit_checked(
        &self,
        event: ScheduleEvent,
        staff: &[StaffMember],
        policy: &AvailabilityPolicy,
        commit_policy: CommitPolicy,
    ) -> Result<CommitOutcome, SchedulingError> {
        let mut events = self.events.write();
        let existing = position(&events, &event.id);

        let mut candidate = Candidate::from_event(&event)?;
        if existing.is_none() {
            candidate.replaces = None;
        }
        // Forced commits still run the check so warnings can be reported.
        let conflicts = check_conflicts(&candidate, &events, staff, policy)?;
        if conflicts.iter().any(|c| commit_policy.blocks(c.kind)) {
            let kinds: Vec<&str> = conflicts.iter().map(|c| c.kind.as_str()).collect();
            self.audit(&event, AuditAction::Reject, Some(kinds.join(",")));
        }

        let outcome = CommitOutcome::decide(event, conflicts, commit_policy);
        match &outcome {
            CommitOutcome::Committed { event, warnings } => {
                let payload = (!warnings.is_empty()).then(|| format!("{} warning(s)", warnings.len()));
                if let Some(idx) = existing {
                    self.audit(event, AuditAction::Reschedule, payload);
                    events[idx] = event.clone();
                } else {
                    self.audit(event, AuditAction::Commit, payload);
                    events.push(event.clone());
                }
                tracing::info!(event_id = %event.id, job_id = %event.job_id, "schedule event committed");
            }
            CommitOutcome::Rejected { conflicts } => {
                tracing::warn!(count = conflicts.len(), "commit rejected due to conflicts");
            }
        }
        Ok(outcome)
    }

    fn len(&self) -> usize {
        self.events.read().len()
    }
}
