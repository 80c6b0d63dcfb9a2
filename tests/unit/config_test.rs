//! Tests for configuration validation

use std::collections::HashMap;

use pressroom_scheduler::config::SchedulingConfig;
use pressroom_scheduler::core::{CommitPolicy, WorkingWindow};

#[test]
fn test_default_config_is_valid() {
    let config = SchedulingConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.slot_minutes, 30);
    assert_eq!(config.default_days_to_check, 14);
    assert_eq!(config.default_max_suggestions, 5);
}

#[test]
fn test_config_invalid_slot_minutes() {
    let config = SchedulingConfig {
        slot_minutes: 0,
        ..SchedulingConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_slot_longer_than_business_day() {
    let config = SchedulingConfig {
        business_hours: WorkingWindow::parse("09:00", "10:00").unwrap(),
        slot_minutes: 90,
        ..SchedulingConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_invalid_days_to_check() {
    let config = SchedulingConfig {
        default_days_to_check: 0,
        ..SchedulingConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_invalid_offset() {
    let config = SchedulingConfig {
        utc_offset_minutes: 24 * 60,
        ..SchedulingConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "business_hours": { "start": "08:00", "end": "18:00" },
        "slot_minutes": 15,
        "default_days_to_check": 7,
        "utc_offset_minutes": -300,
        "commit_policy": "warn_on_availability"
    }"#;

    let config = SchedulingConfig::from_json_str(json).unwrap();
    assert_eq!(config.business_hours.to_string(), "08:00-18:00");
    assert_eq!(config.slot_minutes, 15);
    assert_eq!(config.default_max_suggestions, 5);
    assert_eq!(config.commit_policy, CommitPolicy::WarnOnAvailability);
    assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -300 * 60);
}

#[test]
fn test_config_from_json_rejects_bad_hours() {
    let json = r#"{ "business_hours": { "start": "18:00", "end": "08:00" } }"#;
    assert!(SchedulingConfig::from_json_str(json).is_err());
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("PRESSROOM_BUSINESS_START", "07:30"),
        ("PRESSROOM_SLOT_MINUTES", "15"),
        ("PRESSROOM_MAX_SUGGESTIONS", "3"),
        ("PRESSROOM_COMMIT_POLICY", "force"),
    ]
    .into_iter()
    .collect();

    let config = SchedulingConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.business_hours.to_string(), "07:30-17:00");
    assert_eq!(config.slot_minutes, 15);
    assert_eq!(config.default_max_suggestions, 3);
    assert_eq!(config.commit_policy, CommitPolicy::Force);
}

#[test]
fn test_config_from_lookup_rejects_garbage() {
    let err = SchedulingConfig::from_lookup(|k| {
        (k == "PRESSROOM_DAYS_TO_CHECK").then(|| "soon".to_string())
    })
    .unwrap_err();
    assert!(err.contains("PRESSROOM_DAYS_TO_CHECK"));
}
