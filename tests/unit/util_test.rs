//! Tests for utility functions

use pressroom_scheduler::util::{init_tracing, EventId, JobId, StaffId};

#[test]
fn test_ids_display_and_compare() {
    let a = StaffId::new("mike");
    let b: StaffId = "mike".into();
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "mike");
    assert_eq!(JobId::from("job-1".to_string()).as_str(), "job-1");
}

#[test]
fn test_generated_event_ids_are_unique() {
    let a = EventId::generate();
    let b = EventId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}

#[test]
fn test_ids_serialize_transparently() {
    let json = serde_json::to_string(&StaffId::new("ana")).unwrap();
    assert_eq!(json, "\"ana\"");
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
