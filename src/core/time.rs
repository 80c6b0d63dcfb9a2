//! Time primitives: minute-of-day values, working windows and half-open instants.
//!
//! Wall-clock strings (`"08:00"`) are parsed once at the boundary into
//! [`TimeOfDay`] so that every comparison is numeric. Comparing the raw
//! strings would order `"9:00"` after `"17:00"`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::SchedulingError;

/// Minutes in one day; also the value of `24:00`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day stored as minutes since midnight (`0..=1440`).
///
/// `1440` (`"24:00"`) is only meaningful as the end of a window or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self(0);
    /// Midnight at the end of the day (`24:00`).
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    /// Build from hours and minutes.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidTimeOfDay`] when the value falls outside `00:00..=24:00`.
    pub fn from_hm(hours: u16, minutes: u16) -> Result<Self, SchedulingError> {
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
            return Err(SchedulingError::InvalidTimeOfDay(format!("{hours:02}:{minutes:02}")));
        }
        Ok(Self(hours * 60 + minutes))
    }

    /// Build from minutes since midnight.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidTimeOfDay`] when `minutes > 1440`.
    pub fn from_minutes(minutes: u16) -> Result<Self, SchedulingError> {
        if minutes > MINUTES_PER_DAY {
            return Err(SchedulingError::InvalidTimeOfDay(minutes.to_string()));
        }
        Ok(Self(minutes))
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Time of day of a wall-clock time, truncated to the minute.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Whether the wall-clock time has sub-minute precision that [`TimeOfDay::of`] drops.
    #[must_use]
    pub fn has_sub_minute_part(time: NaiveTime) -> bool {
        time.second() != 0 || time.nanosecond() != 0
    }
}

impl FromStr for TimeOfDay {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidTimeOfDay(s.to_owned());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hours: u16 = h.parse().map_err(|_| invalid())?;
        let minutes: u16 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hours, minutes).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A daily working window `[start, end]` in time-of-day terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct WorkingWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawWindow> for WorkingWindow {
    type Error = SchedulingError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<WorkingWindow> for RawWindow {
    fn from(w: WorkingWindow) -> Self {
        Self { start: w.start, end: w.end }
    }
}

impl WorkingWindow {
    /// Standard business hours, 09:00-17:00.
    pub const BUSINESS_HOURS: Self = Self {
        start: TimeOfDay(9 * 60),
        end: TimeOfDay(17 * 60),
    };

    /// Create a window; `start` must be strictly before `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] for empty or inverted windows.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidInterval(format!("window {start}-{end}")));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Propagates time-of-day parse errors and window validation errors.
    pub fn parse(start: &str, end: &str) -> Result<Self, SchedulingError> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// Window start.
    #[must_use]
    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    /// Window end.
    #[must_use]
    pub const fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Length of the window in minutes.
    #[must_use]
    pub const fn len_minutes(&self) -> u16 {
        self.end.0 - self.start.0
    }

    /// Whether `[start, end)` lies fully inside the window.
    #[must_use]
    pub fn contains(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start <= start && end <= self.end
    }

    /// Whether `[start, end)` shares any minute with the window.
    #[must_use]
    pub fn intersects(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start < end && start < self.end
    }
}

impl fmt::Display for WorkingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A half-open interval of instants `[start, end)`.
///
/// # Invariants
/// `start < end`; zero-length intervals are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = SchedulingError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<TimeInterval> for RawInterval {
    fn from(iv: TimeInterval) -> Self {
        Self { start: iv.start, end: iv.end }
    }
}

impl TimeInterval {
    /// Create a half-open interval.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidInterval(format!(
                "start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Create an interval from a start and a fractional number of hours.
    ///
    /// The end is `start + hours` rounded to whole milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidDuration`] for non-positive or non-finite hours.
    pub fn from_hours(start: DateTime<Utc>, hours: f64) -> Result<Self, SchedulingError> {
        let duration = hours_to_duration(hours)?;
        Self::new(start, start + duration)
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap: `a0 < b1 && b0 < a1`. Touching endpoints do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part of two intervals, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Self { start, end })
    }

    /// Whether `instant` lies inside `[start, end)`.
    #[must_use]
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Convert fractional hours into a millisecond-precision duration.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidDuration`] for non-positive, non-finite or
/// sub-millisecond values.
#[allow(clippy::cast_possible_truncation)]
pub fn hours_to_duration(hours: f64) -> Result<Duration, SchedulingError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(SchedulingError::InvalidDuration(hours));
    }
    let millis = (hours * 3_600_000.0).round();
    if millis < 1.0 || millis > i64::MAX as f64 {
        return Err(SchedulingError::InvalidDuration(hours));
    }
    Ok(Duration::milliseconds(millis as i64))
}

/// Fractional hours in a duration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 3_600_000.0
}

/// Every calendar date from `first` to `last`, inclusive.
pub fn dates_between(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |d| *d <= last)
}
