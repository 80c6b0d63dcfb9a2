//! Staff records as supplied by the dashboard's staff provider.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::job::Job;
use crate::core::time::{TimeOfDay, WorkingWindow};
use crate::core::SchedulingError;
use crate::util::StaffId;

/// Default working-day flags, one per weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct WeeklyAvailability {
    /// Works on Mondays.
    pub monday: bool,
    /// Works on Tuesdays.
    pub tuesday: bool,
    /// Works on Wednesdays.
    pub wednesday: bool,
    /// Works on Thursdays.
    pub thursday: bool,
    /// Works on Fridays.
    pub friday: bool,
    /// Works on Saturdays.
    pub saturday: bool,
    /// Works on Sundays.
    pub sunday: bool,
}

impl WeeklyAvailability {
    /// Monday through Friday.
    #[must_use]
    pub const fn weekdays() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }

    /// Every day of the week.
    #[must_use]
    pub const fn all_days() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }

    /// Flag for one weekday.
    #[must_use]
    pub const fn works_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Set the flag for one weekday.
    pub fn set(&mut self, day: Weekday, works: bool) {
        let slot = match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = works;
    }
}

impl Default for WeeklyAvailability {
    fn default() -> Self {
        Self::weekdays()
    }
}

/// Optional per-day working windows. A missing day uses the default business window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    /// Monday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<WorkingWindow>,
    /// Tuesday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<WorkingWindow>,
    /// Wednesday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<WorkingWindow>,
    /// Thursday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<WorkingWindow>,
    /// Friday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<WorkingWindow>,
    /// Saturday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<WorkingWindow>,
    /// Sunday hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<WorkingWindow>,
}

impl WeeklyHours {
    /// Window configured for one weekday, if any.
    #[must_use]
    pub const fn for_day(&self, day: Weekday) -> Option<WorkingWindow> {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Set or clear the window for one weekday.
    pub fn set(&mut self, day: Weekday, window: Option<WorkingWindow>) {
        let slot = match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = window;
    }
}

/// A date-specific block that removes availability regardless of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct BlockedTime {
    /// Calendar date the block applies to (local to the shop).
    pub date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    /// Optional human-readable reason; absence does not weaken the block.
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl TryFrom<RawBlock> for BlockedTime {
    type Error = SchedulingError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Self::new(raw.date, raw.start, raw.end, raw.reason)
    }
}

impl From<BlockedTime> for RawBlock {
    fn from(b: BlockedTime) -> Self {
        Self {
            date: b.date,
            start: b.start,
            end: b.end,
            reason: b.reason,
        }
    }
}

impl BlockedTime {
    /// Block a sub-range of a date; `start` must be strictly before `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] for empty or inverted blocks.
    pub fn new(
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    ) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidInterval(format!("blocked time {start}-{end} on {date}")));
        }
        Ok(Self { date, start, end, reason })
    }

    /// Block the whole date.
    #[must_use]
    pub const fn whole_day(date: NaiveDate, reason: Option<String>) -> Self {
        Self {
            date,
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::END_OF_DAY,
            reason,
        }
    }

    /// Block start.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// Block end.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Whether the block removes any of `[start, end)` on `date`.
    #[must_use]
    pub fn blocks(&self, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.date == date && self.start < end && start < self.end
    }
}

/// A staff member with their availability data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Unique identifier.
    pub id: StaffId,
    /// Display name.
    pub name: String,
    /// Working-day flags.
    #[serde(default)]
    pub availability: WeeklyAvailability,
    /// Per-day working windows.
    #[serde(default)]
    pub availability_hours: WeeklyHours,
    /// Ad-hoc blocks, in the order they were entered.
    #[serde(default)]
    pub blocked_times: Vec<BlockedTime>,
    /// Job types this person can run. Empty means no restriction.
    #[serde(default)]
    pub job_type_capabilities: Vec<String>,
}

impl StaffMember {
    /// A Monday-to-Friday staff member using default hours and no blocks.
    pub fn new(id: impl Into<StaffId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            availability: WeeklyAvailability::default(),
            availability_hours: WeeklyHours::default(),
            blocked_times: Vec::new(),
            job_type_capabilities: Vec::new(),
        }
    }

    /// Builder-style weekly flags.
    #[must_use]
    pub fn with_availability(mut self, availability: WeeklyAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Builder-style hours for one weekday.
    #[must_use]
    pub fn with_hours(mut self, day: Weekday, window: WorkingWindow) -> Self {
        self.availability_hours.set(day, Some(window));
        self
    }

    /// Builder-style blocked time.
    #[must_use]
    pub fn with_blocked_time(mut self, block: BlockedTime) -> Self {
        self.blocked_times.push(block);
        self
    }

    /// Builder-style capability.
    #[must_use]
    pub fn with_capability(mut self, job_type: impl Into<String>) -> Self {
        self.job_type_capabilities.push(job_type.into());
        self
    }

    /// Effective window for a weekday, or `None` on a day off.
    #[must_use]
    pub fn window_for(&self, day: Weekday, default_window: WorkingWindow) -> Option<WorkingWindow> {
        if !self.availability.works_on(day) {
            return None;
        }
        Some(self.availability_hours.for_day(day).unwrap_or(default_window))
    }

    /// Blocks recorded for one date.
    pub fn blocks_on(&self, date: NaiveDate) -> impl Iterator<Item = &BlockedTime> {
        self.blocked_times.iter().filter(move |b| b.date == date)
    }

    /// Whether this person may be assigned the job's type.
    #[must_use]
    pub fn can_perform(&self, job: &Job) -> bool {
        match &job.job_type {
            None => true,
            Some(_) if self.job_type_capabilities.is_empty() => true,
            Some(kind) => self
                .job_type_capabilities
                .iter()
                .any(|c| c.eq_ignore_ascii_case(kind)),
        }
    }
}

/// Staff members able to take a job, preserving pool order.
#[must_use]
pub fn capable_staff<'a>(job: &Job, pool: &'a [StaffMember]) -> Vec<&'a StaffMember> {
    pool.iter().filter(|s| s.can_perform(job)).collect()
}

/// Look up a staff member by id.
#[must_use]
pub fn find_staff<'a>(pool: &'a [StaffMember], id: &StaffId) -> Option<&'a StaffMember> {
    pool.iter().find(|s| &s.id == id)
}
