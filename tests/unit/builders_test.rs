//! Tests for builder modules

use pressroom_scheduler::builders::{build_in_memory_scheduler, build_scheduler};
use pressroom_scheduler::config::SchedulingConfig;
use pressroom_scheduler::core::{ScheduleStore, SchedulingError};
use pressroom_scheduler::infra::InMemoryScheduleStore;

#[test]
fn test_build_in_memory_scheduler_defaults() {
    let scheduler = build_in_memory_scheduler(&SchedulingConfig::default()).unwrap();
    assert_eq!(scheduler.config().slot_minutes, 30);
    assert!(scheduler.store().is_empty());
    assert!(scheduler.audit_events().is_empty());
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let config = SchedulingConfig {
        default_max_suggestions: 0,
        ..SchedulingConfig::default()
    };
    let result = build_scheduler(&config, |_| Ok(InMemoryScheduleStore::new()));
    assert!(matches!(result, Err(SchedulingError::Config(_))));
}

#[test]
fn test_build_scheduler_propagates_factory_error() {
    let result = build_scheduler::<InMemoryScheduleStore, _>(&SchedulingConfig::default(), |_| {
        Err(SchedulingError::Config("store unavailable".into()))
    });
    assert!(result.is_err());
}

#[test]
fn test_build_from_lookup_applies_variables() {
    use pressroom_scheduler::builders::build_in_memory_scheduler_from_lookup;
    use pressroom_scheduler::core::CommitPolicy;

    let scheduler = build_in_memory_scheduler_from_lookup(|key| match key {
        "PRESSROOM_SLOT_MINUTES" => Some("15".into()),
        "PRESSROOM_COMMIT_POLICY" => Some("force".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(scheduler.config().slot_minutes, 15);
    assert_eq!(scheduler.config().commit_policy, CommitPolicy::Force);
}

#[test]
fn test_build_from_lookup_reports_context() {
    use pressroom_scheduler::builders::build_in_memory_scheduler_from_lookup;

    let err = build_in_memory_scheduler_from_lookup(|key| {
        (key == "PRESSROOM_DAYS_TO_CHECK").then(|| "lots".to_string())
    })
    .err()
    .unwrap();
    assert_eq!(err.to_string(), "loading scheduler configuration");
    assert!(format!("{err:#}").contains("PRESSROOM_DAYS_TO_CHECK"));
}
