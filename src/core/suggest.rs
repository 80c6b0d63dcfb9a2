//! Auto-scheduler: greedy search for open slots.
//!
//! The search walks the horizon day by day (preferred date first), tries
//! fixed-granularity start times from each staff member's working-window
//! start, and keeps the first conflict-free candidates it finds. Results
//! favour the earliest feasible slots; they are not globally optimal.
//!
//! Double booking is never suggested, even with `ignore_conflicts`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::availability::AvailabilityPolicy;
use crate::core::conflict::{check_conflicts_with_mode, Candidate, CheckMode};
use crate::core::job::{Job, ScheduleEvent};
use crate::core::staff::{find_staff, StaffMember};
use crate::core::time::{dates_between, hours_to_duration, TimeInterval};
use crate::core::SchedulingError;
use crate::util::{EventId, StaffId};

/// Default number of days searched.
pub const DEFAULT_DAYS_TO_CHECK: u32 = 14;
/// Default number of suggestions returned.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Default search step, matching the dashboard's 30-minute time pickers.
pub const DEFAULT_SLOT_MINUTES: u16 = 30;
/// Longest horizon a single search may cover.
pub const MAX_DAYS_TO_CHECK: u32 = 366;

/// Caller-supplied search options. Unset fields fall back to [`SuggestionDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScheduleOptions {
    /// Only consider this staff member, if they are in the pool.
    #[serde(default)]
    pub preferred_staff_id: Option<StaffId>,
    /// Search this date before any other.
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    /// Length of the search horizon in days.
    #[serde(default)]
    pub days_to_check: Option<u32>,
    /// Stop after this many suggestions.
    #[serde(default)]
    pub max_suggestions: Option<usize>,
    /// Skip availability and blocked-time checks. Double booking is still refused.
    #[serde(default)]
    pub ignore_conflicts: bool,
}

impl AutoScheduleOptions {
    /// Builder-style preferred staff member.
    #[must_use]
    pub fn with_preferred_staff(mut self, staff_id: impl Into<StaffId>) -> Self {
        self.preferred_staff_id = Some(staff_id.into());
        self
    }

    /// Builder-style preferred date.
    #[must_use]
    pub const fn with_preferred_date(mut self, date: NaiveDate) -> Self {
        self.preferred_date = Some(date);
        self
    }

    /// Builder-style horizon length.
    #[must_use]
    pub const fn with_days_to_check(mut self, days: u32) -> Self {
        self.days_to_check = Some(days);
        self
    }

    /// Builder-style result cap.
    #[must_use]
    pub const fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }

    /// Builder-style conflict override.
    #[must_use]
    pub const fn ignoring_conflicts(mut self) -> Self {
        self.ignore_conflicts = true;
        self
    }

    /// Fill unset fields from `defaults` and validate.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidOptions`] for zero-valued bounds and
    /// horizons longer than [`MAX_DAYS_TO_CHECK`].
    pub fn resolve(&self, defaults: &SuggestionDefaults) -> Result<ResolvedOptions, SchedulingError> {
        let days_to_check = self.days_to_check.unwrap_or(defaults.days_to_check);
        let max_suggestions = self.max_suggestions.unwrap_or(defaults.max_suggestions);
        if days_to_check == 0 {
            return Err(SchedulingError::InvalidOptions("days_to_check must be greater than 0".into()));
        }
        if days_to_check > MAX_DAYS_TO_CHECK {
            return Err(SchedulingError::InvalidOptions(format!(
                "days_to_check {days_to_check} exceeds the limit of {MAX_DAYS_TO_CHECK}"
            )));
        }
        if max_suggestions == 0 {
            return Err(SchedulingError::InvalidOptions("max_suggestions must be greater than 0".into()));
        }
        if defaults.slot_minutes == 0 {
            return Err(SchedulingError::InvalidOptions("slot granularity must be greater than 0".into()));
        }
        Ok(ResolvedOptions {
            preferred_staff_id: self.preferred_staff_id.clone(),
            preferred_date: self.preferred_date,
            days_to_check,
            max_suggestions,
            slot_minutes: defaults.slot_minutes,
            ignore_conflicts: self.ignore_conflicts,
        })
    }
}

/// Shop-wide defaults for the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDefaults {
    /// Horizon length when the caller gives none.
    pub days_to_check: u32,
    /// Result cap when the caller gives none.
    pub max_suggestions: usize,
    /// Search step in minutes.
    pub slot_minutes: u16,
}

impl Default for SuggestionDefaults {
    fn default() -> Self {
        Self {
            days_to_check: DEFAULT_DAYS_TO_CHECK,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

/// Options with every bound filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Preferred staff member.
    pub preferred_staff_id: Option<StaffId>,
    /// Preferred date.
    pub preferred_date: Option<NaiveDate>,
    /// Horizon length in days.
    pub days_to_check: u32,
    /// Result cap.
    pub max_suggestions: usize,
    /// Search step in minutes.
    pub slot_minutes: u16,
    /// Availability checks skipped.
    pub ignore_conflicts: bool,
}

/// Find up to `max_suggestions` conflict-free slots for `job`.
///
/// `staff_pool` is expected to be pre-filtered for capability (see
/// [`capable_staff`](crate::core::staff::capable_staff)). An empty result
/// means no availability was found and is not an error.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidDuration`] for a non-positive
/// `estimated_hours` or one longer than a day, and
/// [`SchedulingError::InvalidOptions`] for out-of-range bounds.
pub fn suggest_slots(
    job: &Job,
    options: &AutoScheduleOptions,
    existing_events: &[ScheduleEvent],
    staff_pool: &[StaffMember],
    policy: &AvailabilityPolicy,
    defaults: &SuggestionDefaults,
    now: DateTime<Utc>,
) -> Result<Vec<ScheduleEvent>, SchedulingError> {
    let duration = hours_to_duration(job.estimated_hours)?;
    // Slots never span calendar days.
    if duration > Duration::days(1) {
        return Err(SchedulingError::InvalidDuration(job.estimated_hours));
    }
    let opts = options.resolve(defaults)?;

    let horizon_end = now
        .checked_add_signed(Duration::days(i64::from(opts.days_to_check)))
        .ok_or_else(|| SchedulingError::InvalidOptions(format!("horizon from {now} is out of range")))?;
    let latest_start = job.deadline.map_or(horizon_end, |deadline| deadline.min(horizon_end));
    if latest_start < now {
        tracing::debug!(job_id = %job.id, "deadline already passed, nothing to suggest");
        return Ok(Vec::new());
    }

    let candidates: Vec<&StaffMember> = match opts
        .preferred_staff_id
        .as_ref()
        .and_then(|id| find_staff(staff_pool, id))
    {
        Some(member) => vec![member],
        None => staff_pool.iter().collect(),
    };

    let mode = if opts.ignore_conflicts {
        CheckMode::DoubleBookingOnly
    } else {
        CheckMode::Full
    };

    let mut days: Vec<NaiveDate> =
        dates_between(policy.local_date(now), policy.local_date(latest_start)).collect();
    if let Some(preferred) = opts.preferred_date {
        if let Some(pos) = days.iter().position(|d| *d == preferred) {
            let day = days.remove(pos);
            days.insert(0, day);
        }
    }

    let mut suggestions = Vec::with_capacity(opts.max_suggestions.min(32));
    for day in days {
        for (start, member) in start_times_for_day(day, &candidates, duration, &opts, policy, now, latest_start) {
            let end = start
                .checked_add_signed(duration)
                .ok_or_else(|| SchedulingError::InvalidInterval(format!("slot at {start} is out of range")))?;
            let interval = TimeInterval::new(start, end)?;
            let mut candidate = Candidate::for_staff(member.id.clone(), interval);
            candidate.machine_id.clone_from(&job.machine_id);

            let conflicts = check_conflicts_with_mode(&candidate, existing_events, staff_pool, policy, mode)?;
            if !conflicts.is_empty() {
                continue;
            }

            suggestions.push(ScheduleEvent {
                id: EventId::generate(),
                job_id: job.id.clone(),
                staff_id: Some(member.id.clone()),
                machine_id: job.machine_id.clone(),
                start_time: interval.start(),
                end_time: interval.end(),
                notes: None,
                is_auto_scheduled: true,
            });
            if suggestions.len() >= opts.max_suggestions {
                tracing::info!(job_id = %job.id, count = suggestions.len(), "suggestion limit reached");
                return Ok(suggestions);
            }
        }
    }

    if suggestions.is_empty() {
        tracing::info!(job_id = %job.id, "no availability found within horizon");
    } else {
        tracing::info!(job_id = %job.id, count = suggestions.len(), "horizon exhausted");
    }
    Ok(suggestions)
}

/// Candidate start times for one day, earliest first, ties in pool order.
fn start_times_for_day<'a>(
    day: NaiveDate,
    candidates: &[&'a StaffMember],
    duration: Duration,
    opts: &ResolvedOptions,
    policy: &AvailabilityPolicy,
    now: DateTime<Utc>,
    latest_start: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, &'a StaffMember)> {
    let weekday = day.weekday();
    let step = Duration::minutes(i64::from(opts.slot_minutes));
    let mut found = Vec::new();

    for (rank, member) in candidates.iter().enumerate() {
        let window = if opts.ignore_conflicts {
            member
                .availability_hours
                .for_day(weekday)
                .unwrap_or(policy.default_window)
        } else {
            match member.window_for(weekday, policy.default_window) {
                Some(window) => window,
                None => continue,
            }
        };

        let window_end = policy.instant_at(day, window.end());
        let mut start = policy.instant_at(day, window.start());
        while start <= latest_start {
            match start.checked_add_signed(duration) {
                Some(end) if end <= window_end => {}
                _ => break,
            }
            if start >= now {
                found.push((start, rank, *member));
            }
            let Some(next) = start.checked_add_signed(step) else { break };
            start = next;
        }
    }

    found.sort_by_key(|(start, rank, _)| (*start, *rank));
    found.into_iter().map(|(start, _, member)| (start, member)).collect()
}
