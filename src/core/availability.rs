//! Availability model: is a staff member free to work during `[start, end)`?
//!
//! Evaluation order for an interval on a single shop-local calendar day:
//!
//! 1. weekday flag off: unavailable all day, whatever the hours say;
//! 2. the interval must sit inside the effective working window
//!    (per-day hours, else the default business window);
//! 3. any blocked time on that exact date that touches the interval wins.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::core::staff::{BlockedTime, StaffMember};
use crate::core::time::{TimeInterval, TimeOfDay, WorkingWindow};
use crate::core::SchedulingError;

/// Shop-wide parameters the availability model needs besides the staff record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityPolicy {
    /// Window used for any weekday without explicit hours.
    pub default_window: WorkingWindow,
    /// Offset of the shop's wall clock from UTC.
    pub utc_offset: FixedOffset,
}

impl AvailabilityPolicy {
    /// Policy with the given default window, evaluated in UTC.
    #[must_use]
    pub fn new(default_window: WorkingWindow) -> Self {
        Self {
            default_window,
            utc_offset: utc(),
        }
    }

    /// Builder-style wall-clock offset.
    #[must_use]
    pub const fn with_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// Shop-local calendar date of an instant.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// The UTC instant at `time` on shop-local `date`. `24:00` maps to the next midnight.
    #[must_use]
    pub fn instant_at(&self, date: NaiveDate, time: TimeOfDay) -> DateTime<Utc> {
        let local = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(time.minutes()));
        Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(self.utc_offset.local_minus_utc()))))
    }

    /// Project an interval onto one shop-local day.
    ///
    /// The start is floored and the end ceiled to whole minutes so that a
    /// sub-minute overhang is never silently accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::MultiDayInterval`] unless the interval stays
    /// inside one date or ends exactly at the following midnight.
    pub fn local_span(&self, interval: &TimeInterval) -> Result<LocalSpan, SchedulingError> {
        let start = interval.start().with_timezone(&self.utc_offset).naive_local();
        let end = interval.end().with_timezone(&self.utc_offset).naive_local();
        let date = start.date();

        let end_minutes = if end.date() == date {
            let floor = TimeOfDay::of(end.time());
            if TimeOfDay::has_sub_minute_part(end.time()) {
                TimeOfDay::from_minutes(floor.minutes() + 1)?
            } else {
                floor
            }
        } else if date.succ_opt() == Some(end.date()) && end.time() == NaiveTime::MIN {
            TimeOfDay::END_OF_DAY
        } else {
            return Err(SchedulingError::MultiDayInterval(interval.to_string()));
        };

        Ok(LocalSpan {
            date,
            weekday: date.weekday(),
            start: TimeOfDay::of(start.time()),
            end: end_minutes,
        })
    }
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self::new(default_business_hours())
    }
}

/// The shop's fallback business hours, 09:00-17:00.
#[must_use]
pub const fn default_business_hours() -> WorkingWindow {
    WorkingWindow::BUSINESS_HOURS
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// An interval expressed on one shop-local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSpan {
    /// Calendar date.
    pub date: NaiveDate,
    /// Weekday of `date`.
    pub weekday: Weekday,
    /// Start, floored to the minute.
    pub start: TimeOfDay,
    /// End, ceiled to the minute; `24:00` for intervals ending at midnight.
    pub end: TimeOfDay,
}

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum AvailabilityVerdict {
    /// Fully inside working time.
    Available,
    /// The weekday is switched off for this person.
    DayOff {
        /// The weekday in question.
        weekday: Weekday,
    },
    /// Partly or wholly outside the effective working window.
    OutsideHours {
        /// Window that applied on that date.
        window: WorkingWindow,
    },
    /// Hits a blocked-time entry on that date.
    Blocked {
        /// The first matching block.
        block: BlockedTime,
    },
}

impl AvailabilityVerdict {
    /// Whether the verdict allows the work.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Evaluate a staff member's availability for `interval`.
///
/// # Errors
///
/// Returns [`SchedulingError::MultiDayInterval`] for intervals that cannot be
/// placed on one calendar day.
pub fn check_availability(
    staff: &StaffMember,
    interval: &TimeInterval,
    policy: &AvailabilityPolicy,
) -> Result<AvailabilityVerdict, SchedulingError> {
    let span = policy.local_span(interval)?;

    let Some(window) = staff.window_for(span.weekday, policy.default_window) else {
        return Ok(AvailabilityVerdict::DayOff { weekday: span.weekday });
    };

    if !window.contains(span.start, span.end) {
        return Ok(AvailabilityVerdict::OutsideHours { window });
    }

    if let Some(block) = staff
        .blocks_on(span.date)
        .find(|b| b.blocks(span.date, span.start, span.end))
    {
        return Ok(AvailabilityVerdict::Blocked { block: block.clone() });
    }

    Ok(AvailabilityVerdict::Available)
}

/// Boolean form of [`check_availability`].
///
/// # Errors
///
/// Same as [`check_availability`].
pub fn is_available(
    staff: &StaffMember,
    interval: &TimeInterval,
    policy: &AvailabilityPolicy,
) -> Result<bool, SchedulingError> {
    check_availability(staff, interval, policy).map(|v| v.is_available())
}

/// Minutes of working time left on `date` after removing blocked time.
#[must_use]
pub fn available_minutes_on(staff: &StaffMember, date: NaiveDate, policy: &AvailabilityPolicy) -> u32 {
    let Some(window) = staff.window_for(date.weekday(), policy.default_window) else {
        return 0;
    };

    // Merge overlapping blocks inside the window before subtracting.
    let mut blocks: Vec<(u16, u16)> = staff
        .blocks_on(date)
        .filter(|b| window.intersects(b.start(), b.end()))
        .map(|b| {
            (
                b.start().minutes().max(window.start().minutes()),
                b.end().minutes().min(window.end().minutes()),
            )
        })
        .collect();
    blocks.sort_unstable();

    let mut blocked = 0u32;
    let mut cursor = window.start().minutes();
    for (start, end) in blocks {
        let start = start.max(cursor);
        if end > start {
            blocked += u32::from(end - start);
            cursor = end;
        }
    }

    u32::from(window.len_minutes()) - blocked
}
