//! Tests for request/response handlers

use chrono::{TimeZone, Utc};
use pressroom_scheduler::api::{
    bulk_reassign, check_assignment, commit_assignment, suggest, AssignmentRequest, BulkReassignRequest,
    SuggestionRequest,
};
use pressroom_scheduler::builders::build_in_memory_scheduler;
use pressroom_scheduler::config::SchedulingConfig;
use pressroom_scheduler::core::{AuditAction, ConflictKind, StaffMember};

fn staff() -> Vec<StaffMember> {
    vec![StaffMember::new("mike", "Mike"), StaffMember::new("ana", "Ana")]
}

fn request(job: &str, staff_id: &str, h0: u32, h1: u32) -> AssignmentRequest {
    AssignmentRequest {
        job_id: job.into(),
        staff_id: Some(staff_id.into()),
        machine_id: None,
        start_time: Utc.with_ymd_and_hms(2024, 6, 10, h0, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2024, 6, 10, h1, 0, 0).unwrap(),
        notes: None,
    }
}

#[test]
fn test_check_then_commit_assignment() {
    let scheduler = build_in_memory_scheduler(&SchedulingConfig::default()).unwrap();
    let staff = staff();

    let report = check_assignment(&scheduler, &request("job-1", "mike", 9, 11), &staff).unwrap();
    assert!(report.safe_to_commit);

    let outcome = commit_assignment(&scheduler, request("job-1", "mike", 9, 11), &staff).unwrap();
    assert!(outcome.is_committed());

    let report = check_assignment(&scheduler, &request("job-2", "mike", 10, 12), &staff).unwrap();
    assert!(!report.safe_to_commit);
    assert_eq!(report.conflicts[0].kind, ConflictKind::StaffBusy);

    let actions: Vec<_> = scheduler.audit_events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Commit]);
}

#[test]
fn test_inverted_request_is_error() {
    let scheduler = build_in_memory_scheduler(&SchedulingConfig::default()).unwrap();
    assert!(check_assignment(&scheduler, &request("job-1", "mike", 11, 9), &staff()).is_err());
}

#[test]
fn test_suggest_request_from_json() {
    let scheduler = build_in_memory_scheduler(&SchedulingConfig::default()).unwrap();
    let req: SuggestionRequest = serde_json::from_str(
        r#"{
            "job": { "id": "job-7", "estimatedHours": 2 },
            "options": { "preferredStaffId": "ana", "maxSuggestions": 2 }
        }"#,
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();

    let response = suggest(&scheduler, &req, &staff(), now).unwrap();
    assert_eq!(response.suggestions.len(), 2);
    assert!(response.message.is_none());
    assert!(response
        .suggestions
        .iter()
        .all(|s| s.staff_id.as_ref().map(|id| id.as_str()) == Some("ana")));
}

#[test]
fn test_bulk_reassign_response_reports_partial_failure() {
    let scheduler = build_in_memory_scheduler(&SchedulingConfig::default()).unwrap();
    let staff = staff();
    commit_assignment(&scheduler, request("job-1", "mike", 9, 11), &staff).unwrap();
    commit_assignment(&scheduler, request("job-2", "ana", 9, 10), &staff).unwrap();

    let req = BulkReassignRequest {
        job_ids: vec!["job-1".into(), "job-missing".into()],
        target_staff_id: "ana".into(),
    };
    let response = bulk_reassign(&scheduler, &req, &staff).unwrap();
    assert!(!response.complete);
    assert_eq!(response.report.outcomes.len(), 2);
    assert_eq!(response.summary, "0 of 2 job(s) updated, 2 not applied");
}
