//! Tests for audit sink

use chrono::{TimeZone, Utc};
use pressroom_scheduler::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, ScheduleEvent, TimeInterval,
};

fn event(id: &str, job: &str) -> ScheduleEvent {
    let interval = TimeInterval::new(
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap(),
    )
    .unwrap();
    ScheduleEvent::new(job, Some("mike".into()), interval).with_id(id)
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let entry = build_audit_event(&event("ev1", "job1"), AuditAction::Commit, Some("payload".to_string()));
    sink.record(entry);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id.as_str(), "ev1");
    assert_eq!(events[0].job_id.as_str(), "job1");
    assert_eq!(events[0].action, AuditAction::Commit);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(&event("ev1", "job1"), AuditAction::Commit, None));
    sink.record(build_audit_event(&event("ev2", "job2"), AuditAction::Commit, None));
    sink.record(build_audit_event(&event("ev3", "job3"), AuditAction::Commit, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id.as_str(), "ev2"); // First one popped
    assert_eq!(events[1].event_id.as_str(), "ev3");
}

#[test]
fn test_events_for_job() {
    let mut sink = InMemoryAuditSink::new(10);
    sink.record(build_audit_event(&event("ev1", "job1"), AuditAction::Commit, None));
    sink.record(build_audit_event(&event("ev2", "job2"), AuditAction::Commit, None));
    sink.record(build_audit_event(&event("ev1", "job1"), AuditAction::Unschedule, None));

    let job1 = sink.events_for_job(&"job1".into());
    assert_eq!(job1.len(), 2);
    assert_eq!(job1[1].action, AuditAction::Unschedule);
}

#[test]
fn test_build_audit_event() {
    let entry = build_audit_event(&event("ev1", "job1"), AuditAction::Reject, Some("staff-busy".to_string()));

    assert_eq!(entry.staff_id.as_ref().map(|s| s.as_str()), Some("mike"));
    assert_eq!(entry.action.to_string(), "reject");
    assert_eq!(entry.payload, Some("staff-busy".to_string()));
    assert!(!entry.audit_id.is_empty());
    assert!(entry.created_at_ms > 0);
}
