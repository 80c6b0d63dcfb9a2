//! Auto-scheduler behaviour: bounds, ordering, horizon and the no-double-booking
//! guarantee.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};
use pressroom_scheduler::core::{
    check_conflicts, suggest_slots, AutoScheduleOptions, AvailabilityPolicy, Candidate, Job,
    ScheduleEvent, SchedulingError, StaffMember, SuggestionDefaults, TimeInterval, WeeklyAvailability,
    WorkingWindow,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn defaults() -> SuggestionDefaults {
    SuggestionDefaults {
        days_to_check: 14,
        max_suggestions: 5,
        slot_minutes: 30,
    }
}

/// Monday 2024-06-10, midnight UTC.
fn monday_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap()
}

fn event(job: &str, staff: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduleEvent {
    ScheduleEvent::new(job, Some(staff.into()), TimeInterval::new(start, end).unwrap())
}

fn pool() -> Vec<StaffMember> {
    vec![StaffMember::new("mike", "Mike"), StaffMember::new("ana", "Ana")]
}

fn suggest(
    job: &Job,
    options: &AutoScheduleOptions,
    events: &[ScheduleEvent],
    staff: &[StaffMember],
) -> Result<Vec<ScheduleEvent>, SchedulingError> {
    suggest_slots(
        job,
        options,
        events,
        staff,
        &AvailabilityPolicy::default(),
        &defaults(),
        monday_midnight(),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_earliest_slots_first_with_pool_order_ties() {
    let job = Job::new("job-1", 2.0);
    let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(3), &[], &pool()).unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].start_time, at(10, 9, 0));
    assert_eq!(slots[0].staff_id.as_ref().map(|s| s.as_str()), Some("mike"));
    assert_eq!(slots[1].start_time, at(10, 9, 0));
    assert_eq!(slots[1].staff_id.as_ref().map(|s| s.as_str()), Some("ana"));
    assert_eq!(slots[2].start_time, at(10, 9, 30));
    assert!(slots.iter().all(|s| s.is_auto_scheduled));
    assert!(slots.iter().all(|s| s.end_time - s.start_time == Duration::hours(2)));
}

#[test]
fn test_respects_max_suggestions() {
    let job = Job::new("job-1", 1.0);
    for max in [1, 2, 5, 9] {
        let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(max), &[], &pool()).unwrap();
        assert_eq!(slots.len(), max);
    }
}

#[test]
fn test_default_bound_is_five() {
    let job = Job::new("job-1", 1.0);
    let slots = suggest(&job, &AutoScheduleOptions::default(), &[], &pool()).unwrap();
    assert_eq!(slots.len(), 5);
}

#[test]
fn test_suggestions_avoid_existing_bookings() {
    let staff = vec![StaffMember::new("mike", "Mike")];
    let events = vec![event("busy", "mike", at(10, 9, 0), at(10, 12, 0))];
    let job = Job::new("job-1", 1.0);

    let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(1), &events, &staff).unwrap();
    assert_eq!(slots[0].start_time, at(10, 12, 0));
}

#[test]
fn test_every_suggestion_is_conflict_free() {
    let staff = pool();
    let events = vec![
        event("a", "mike", at(10, 9, 0), at(10, 15, 0)),
        event("b", "ana", at(10, 10, 0), at(10, 11, 0)),
    ];
    let job = Job::new("job-1", 1.5);
    let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(20), &events, &staff).unwrap();

    assert_eq!(slots.len(), 20);
    for slot in &slots {
        let candidate = Candidate::for_staff(slot.staff_id.clone().unwrap(), slot.interval().unwrap());
        let conflicts = check_conflicts(&candidate, &events, &staff, &AvailabilityPolicy::default()).unwrap();
        assert!(conflicts.is_empty(), "slot {slot:?} has conflicts {conflicts:?}");
    }
}

#[test]
fn test_ignore_conflicts_never_double_books() {
    // Mike works every day, so the only thing standing in the way is the booking.
    let staff = vec![StaffMember::new("mike", "Mike").with_availability(WeeklyAvailability::all_days())];
    let events = vec![event("busy", "mike", at(10, 9, 0), at(10, 17, 0))];
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default()
        .with_days_to_check(1)
        .with_max_suggestions(10)
        .ignoring_conflicts();

    let slots = suggest(&job, &options, &events, &staff).unwrap();
    for slot in &slots {
        let iv = slot.interval().unwrap();
        assert!(!iv.overlaps(&events[0].interval().unwrap()));
    }
}

#[test]
fn test_ignore_conflicts_waives_day_off() {
    let mut availability = WeeklyAvailability::weekdays();
    availability.set(Weekday::Mon, false);
    let staff = vec![StaffMember::new("mike", "Mike").with_availability(availability)];
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default().with_days_to_check(1).with_max_suggestions(1);

    assert!(suggest(&job, &options, &[], &staff).unwrap().is_empty());

    let slots = suggest(&job, &options.ignoring_conflicts(), &[], &staff).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_time, at(10, 9, 0));
}

#[test]
fn test_fully_booked_horizon_returns_empty() {
    let staff = vec![StaffMember::new("mike", "Mike")];
    let events = vec![event("busy", "mike", at(10, 9, 0), at(10, 17, 0))];
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default().with_days_to_check(1);

    let slots = suggest(&job, &options, &events, &staff).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn test_preferred_date_is_searched_first() {
    let wednesday = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default()
        .with_preferred_date(wednesday)
        .with_max_suggestions(2);

    let slots = suggest(&job, &options, &[], &pool()).unwrap();
    assert!(slots.iter().all(|s| s.start_time.date_naive() == wednesday));
}

#[test]
fn test_preferred_staff_restricts_pool() {
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default()
        .with_preferred_staff("ana")
        .with_max_suggestions(4);

    let slots = suggest(&job, &options, &[], &pool()).unwrap();
    assert!(slots.iter().all(|s| s.staff_id.as_ref().map(|s| s.as_str()) == Some("ana")));
}

#[test]
fn test_unknown_preferred_staff_falls_back_to_pool() {
    let job = Job::new("job-1", 1.0);
    let options = AutoScheduleOptions::default()
        .with_preferred_staff("ghost")
        .with_max_suggestions(2);

    let slots = suggest(&job, &options, &[], &pool()).unwrap();
    assert_eq!(slots.len(), 2);
}

#[test]
fn test_deadline_caps_horizon() {
    // Deadline Monday 10:00 is the latest permitted start.
    let job = Job::new("job-1", 1.0).with_deadline(at(10, 10, 0));
    let staff = vec![StaffMember::new("mike", "Mike")];
    let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(10), &[], &staff).unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![at(10, 9, 0), at(10, 9, 30), at(10, 10, 0)]);
}

#[test]
fn test_passed_deadline_yields_nothing() {
    let job = Job::new("job-1", 1.0).with_deadline(monday_midnight() - Duration::days(1));
    let slots = suggest(&job, &AutoScheduleOptions::default(), &[], &pool()).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn test_job_longer_than_window_finds_nothing() {
    let staff =
        vec![StaffMember::new("mike", "Mike").with_hours(Weekday::Mon, WorkingWindow::parse("09:00", "10:00").unwrap())];
    let job = Job::new("job-1", 2.0);
    let options = AutoScheduleOptions::default().with_days_to_check(1);
    assert!(suggest(&job, &options, &[], &staff).unwrap().is_empty());
}

#[test]
fn test_machine_bookings_are_avoided() {
    let staff = vec![StaffMember::new("mike", "Mike")];
    let events = vec![event("other", "ana", at(10, 9, 0), at(10, 13, 0)).with_machine("press-1")];
    let job = Job::new("job-1", 1.0).with_machine("press-1");

    let slots = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(1), &events, &staff).unwrap();
    assert_eq!(slots[0].start_time, at(10, 13, 0));
    assert_eq!(slots[0].machine_id.as_ref().map(|m| m.as_str()), Some("press-1"));
}

#[test]
fn test_invalid_duration_is_error() {
    for hours in [0.0, -1.0, f64::NAN] {
        let job = Job::new("job-1", hours);
        let result = suggest(&job, &AutoScheduleOptions::default(), &[], &pool());
        assert!(matches!(result, Err(SchedulingError::InvalidDuration(_))));
    }
}

#[test]
fn test_zero_bounds_are_invalid_options() {
    let job = Job::new("job-1", 1.0);
    let result = suggest(&job, &AutoScheduleOptions::default().with_max_suggestions(0), &[], &pool());
    assert!(matches!(result, Err(SchedulingError::InvalidOptions(_))));

    let result = suggest(&job, &AutoScheduleOptions::default().with_days_to_check(0), &[], &pool());
    assert!(matches!(result, Err(SchedulingError::InvalidOptions(_))));
}

#[test]
fn test_suggestions_are_distinct_events() {
    let job = Job::new("job-1", 1.0);
    let slots = suggest(&job, &AutoScheduleOptions::default(), &[], &pool()).unwrap();
    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            assert_ne!(a.id, b.id);
        }
    }
    assert!(slots.iter().all(|s| s.job_id.as_str() == "job-1"));
}

#[test]
fn test_job_longer_than_a_day_is_invalid_duration() {
    for hours in [25.0, 1e11, f64::MAX] {
        let job = Job::new("job-1", hours);
        let result = suggest(&job, &AutoScheduleOptions::default(), &[], &pool());
        assert!(matches!(result, Err(SchedulingError::InvalidDuration(_))), "{hours}");
    }
}

#[test]
fn test_full_day_job_is_searched() {
    let all_day = WorkingWindow::parse("00:00", "24:00").unwrap();
    let staff = vec![StaffMember::new("mike", "Mike").with_hours(Weekday::Mon, all_day)];
    let options = AutoScheduleOptions::default().with_days_to_check(1).with_max_suggestions(1);
    let slots = suggest(&Job::new("job-1", 24.0), &options, &[], &staff).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_time, monday_midnight());
}

#[test]
fn test_horizon_beyond_limit_is_invalid_options() {
    use pressroom_scheduler::core::suggest::MAX_DAYS_TO_CHECK;

    let job = Job::new("job-1", 1.0);
    for days in [MAX_DAYS_TO_CHECK + 1, u32::MAX] {
        let result = suggest(&job, &AutoScheduleOptions::default().with_days_to_check(days), &[], &pool());
        assert!(matches!(result, Err(SchedulingError::InvalidOptions(_))), "{days}");
    }

    let slots = suggest(&job, &AutoScheduleOptions::default().with_days_to_check(MAX_DAYS_TO_CHECK), &[], &pool());
    assert_eq!(slots.unwrap().len(), 5);
}
