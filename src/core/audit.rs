//! Audit trail for schedule mutations.
//!
//! Every commit, move, removal and rejected commit made through a store can
//! be mirrored into an [`AuditSink`]. The in-memory sink keeps a bounded
//! ring of the most recent entries for the dashboard's activity feed.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::job::ScheduleEvent;
use crate::util::clock::now_ms;
use crate::util::{EventId, JobId, StaffId};

/// What happened to a schedule event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Event added to the schedule.
    Commit,
    /// Event moved or reassigned.
    Reschedule,
    /// Event removed from the schedule.
    Unschedule,
    /// Commit refused because of conflicts.
    Reject,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Commit => "commit",
            Self::Reschedule => "reschedule",
            Self::Unschedule => "unschedule",
            Self::Reject => "reject",
        };
        f.write_str(s)
    }
}

/// One audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Audit entry identifier.
    pub audit_id: String,
    /// Schedule event concerned.
    pub event_id: EventId,
    /// Job concerned.
    pub job_id: JobId,
    /// Staff member concerned, if assigned.
    pub staff_id: Option<StaffId>,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp in milliseconds since the epoch.
    pub created_at_ms: i64,
    /// Additional context (conflict summary, previous slot).
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Bounded in-memory audit sink.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a sink that keeps at most `max_events` entries, dropping the oldest.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Entries for one job, oldest first.
    #[must_use]
    pub fn events_for_job(&self, job_id: &JobId) -> Vec<AuditEvent> {
        self.events.iter().filter(|e| &e.job_id == job_id).cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Build an audit entry for a schedule event.
#[must_use]
pub fn build_audit_event(event: &ScheduleEvent, action: AuditAction, payload: Option<String>) -> AuditEvent {
    AuditEvent {
        audit_id: uuid::Uuid::new_v4().to_string(),
        event_id: event.id.clone(),
        job_id: event.job_id.clone(),
        staff_id: event.staff_id.clone(),
        action,
        created_at_ms: now_ms(),
        payload,
    }
}
