//! Tests for error types

use pressroom_scheduler::core::SchedulingError;
use pressroom_scheduler::util::{EventId, StaffId};

#[test]
fn test_invalid_time_of_day_error() {
    let err = SchedulingError::InvalidTimeOfDay("9:00".to_string());
    assert_eq!(format!("{}", err), "invalid time of day `9:00`, expected HH:MM");
}

#[test]
fn test_invalid_duration_error() {
    let err = SchedulingError::InvalidDuration(0.0);
    assert_eq!(format!("{}", err), "invalid duration: 0 hours");
}

#[test]
fn test_unknown_staff_error() {
    let err = SchedulingError::UnknownStaff(StaffId::new("ghost"));
    assert_eq!(format!("{}", err), "unknown staff member: ghost");
}

#[test]
fn test_unknown_event_error() {
    let err = SchedulingError::UnknownEvent(EventId::new("ev-9"));
    assert_eq!(format!("{}", err), "unknown schedule event: ev-9");
}

#[test]
fn test_config_error() {
    let err = SchedulingError::Config("slot_minutes must be greater than 0".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: slot_minutes must be greater than 0");
}

#[test]
fn test_app_result_wraps_scheduling_error() {
    use anyhow::Context;
    use pressroom_scheduler::core::AppResult;

    fn load() -> AppResult<()> {
        Err(SchedulingError::DuplicateEvent(EventId::new("ev-1"))).context("seeding schedule")
    }

    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "seeding schedule");
    assert_eq!(
        err.downcast_ref::<SchedulingError>(),
        Some(&SchedulingError::DuplicateEvent(EventId::new("ev-1")))
    );
}
