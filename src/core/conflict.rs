//! Conflict detection for candidate assignments.
//!
//! A conflict is data, not an error: callers render the list and decide
//! whether to block, warn, or force the commit. Only malformed input (an
//! unknown staff id, an interval spanning days) comes back as `Err`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::availability::{check_availability, AvailabilityPolicy, AvailabilityVerdict};
use crate::core::job::ScheduleEvent;
use crate::core::staff::{find_staff, StaffMember};
use crate::core::time::TimeInterval;
use crate::core::SchedulingError;
use crate::util::{EventId, MachineId, StaffId};

/// Why a candidate cannot be committed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// The staff member already has an overlapping event.
    StaffBusy,
    /// Day off, or outside the working window.
    OutsideAvailability,
    /// Hits a date-specific blocked time.
    BlockedTime,
    /// The machine already runs an overlapping event.
    MachineBusy,
}

impl ConflictKind {
    /// Wire name used by the dashboard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaffBusy => "staff-busy",
            Self::OutsideAvailability => "outside-availability",
            Self::BlockedTime => "blocked-time",
            Self::MachineBusy => "machine-busy",
        }
    }

    /// Whether this kind is a double booking (staff or machine).
    #[must_use]
    pub const fn is_double_booking(self) -> bool {
        matches!(self, Self::StaffBusy | Self::MachineBusy)
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific reason a candidate conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    /// Conflict category.
    pub kind: ConflictKind,
    /// The existing event involved, for double bookings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    /// The overlapping part of the candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap: Option<TimeInterval>,
    /// Human-readable explanation.
    pub reason: String,
}

/// A proposed assignment to validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Staff member to assign; `None` means unassigned.
    #[serde(default)]
    pub staff_id: Option<StaffId>,
    /// Machine to occupy, if any.
    #[serde(default)]
    pub machine_id: Option<MachineId>,
    /// Requested time span.
    pub interval: TimeInterval,
    /// Event being moved; it is ignored during the overlap scan.
    #[serde(default)]
    pub replaces: Option<EventId>,
}

impl Candidate {
    /// A candidate for a staff member.
    #[must_use]
    pub const fn for_staff(staff_id: StaffId, interval: TimeInterval) -> Self {
        Self {
            staff_id: Some(staff_id),
            machine_id: None,
            interval,
            replaces: None,
        }
    }

    /// An unassigned candidate.
    #[must_use]
    pub const fn unassigned(interval: TimeInterval) -> Self {
        Self {
            staff_id: None,
            machine_id: None,
            interval,
            replaces: None,
        }
    }

    /// Builder-style machine.
    #[must_use]
    pub fn on_machine(mut self, machine_id: MachineId) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Builder-style event being rescheduled.
    #[must_use]
    pub fn replacing(mut self, event_id: EventId) -> Self {
        self.replaces = Some(event_id);
        self
    }

    /// Candidate derived from an existing event (used when re-validating a move).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::InvalidInterval`] if the event's times are inverted.
    pub fn from_event(event: &ScheduleEvent) -> Result<Self, SchedulingError> {
        Ok(Self {
            staff_id: event.staff_id.clone(),
            machine_id: event.machine_id.clone(),
            interval: event.interval()?,
            replaces: Some(event.id.clone()),
        })
    }
}

/// Which rules to evaluate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Double bookings plus availability and blocked time.
    #[default]
    Full,
    /// Double bookings only; availability is not consulted.
    DoubleBookingOnly,
}

/// Check a candidate against committed events and the staff record.
///
/// Conflicts are returned in discovery order: staff double bookings, then the
/// availability notice, then machine double bookings.
///
/// # Errors
///
/// Returns [`SchedulingError::UnknownStaff`] when the candidate names a staff
/// member missing from `staff`, [`SchedulingError::InvalidInterval`] when a
/// relevant existing event has `start_time >= end_time`, and propagates
/// availability input errors.
pub fn check_conflicts(
    candidate: &Candidate,
    existing_events: &[ScheduleEvent],
    staff: &[StaffMember],
    policy: &AvailabilityPolicy,
) -> Result<Vec<ScheduleConflict>, SchedulingError> {
    check_conflicts_with_mode(candidate, existing_events, staff, policy, CheckMode::Full)
}

/// [`check_conflicts`] with an explicit rule set.
///
/// # Errors
///
/// Same as [`check_conflicts`].
pub fn check_conflicts_with_mode(
    candidate: &Candidate,
    existing_events: &[ScheduleEvent],
    staff: &[StaffMember],
    policy: &AvailabilityPolicy,
    mode: CheckMode,
) -> Result<Vec<ScheduleConflict>, SchedulingError> {
    let Some(staff_id) = candidate.staff_id.as_ref() else {
        return Ok(Vec::new());
    };
    let member = find_staff(staff, staff_id).ok_or_else(|| SchedulingError::UnknownStaff(staff_id.clone()))?;

    let mut conflicts = Vec::new();

    for event in relevant(existing_events, candidate).filter(|e| e.is_for_staff(staff_id)) {
        if let Some(overlap) = overlap_with(&candidate.interval, event)? {
            conflicts.push(ScheduleConflict {
                kind: ConflictKind::StaffBusy,
                event_id: Some(event.id.clone()),
                overlap: Some(overlap),
                reason: format!("{} is already booked on job {} during {overlap}", member.name, event.job_id),
            });
        }
    }

    if mode == CheckMode::Full {
        if let Some(conflict) = availability_conflict(member, &candidate.interval, policy)? {
            conflicts.push(conflict);
        }
    }

    if let Some(machine_id) = candidate.machine_id.as_ref() {
        for event in relevant(existing_events, candidate).filter(|e| e.machine_id.as_ref() == Some(machine_id)) {
            if let Some(overlap) = overlap_with(&candidate.interval, event)? {
                conflicts.push(ScheduleConflict {
                    kind: ConflictKind::MachineBusy,
                    event_id: Some(event.id.clone()),
                    overlap: Some(overlap),
                    reason: format!("machine {machine_id} is running job {} during {overlap}", event.job_id),
                });
            }
        }
    }

    if !conflicts.is_empty() {
        tracing::debug!(
            staff_id = %staff_id,
            candidate = %candidate.interval,
            count = conflicts.len(),
            "candidate has conflicts"
        );
    }
    Ok(conflicts)
}

/// Whether `candidate` double-books its staff member or machine.
///
/// # Errors
///
/// Same as [`check_conflicts`].
pub fn has_double_booking(
    candidate: &Candidate,
    existing_events: &[ScheduleEvent],
    staff: &[StaffMember],
    policy: &AvailabilityPolicy,
) -> Result<bool, SchedulingError> {
    let conflicts =
        check_conflicts_with_mode(candidate, existing_events, staff, policy, CheckMode::DoubleBookingOnly)?;
    Ok(conflicts.iter().any(|c| c.kind.is_double_booking()))
}

fn relevant<'a>(
    events: &'a [ScheduleEvent],
    candidate: &'a Candidate,
) -> impl Iterator<Item = &'a ScheduleEvent> + 'a {
    events
        .iter()
        .filter(move |e| candidate.replaces.as_ref() != Some(&e.id))
}

fn overlap_with(interval: &TimeInterval, event: &ScheduleEvent) -> Result<Option<TimeInterval>, SchedulingError> {
    let other = event.interval()?;
    Ok(interval.intersection(&other))
}

fn availability_conflict(
    member: &StaffMember,
    interval: &TimeInterval,
    policy: &AvailabilityPolicy,
) -> Result<Option<ScheduleConflict>, SchedulingError> {
    let conflict = match check_availability(member, interval, policy)? {
        AvailabilityVerdict::Available => None,
        AvailabilityVerdict::DayOff { weekday } => Some(ScheduleConflict {
            kind: ConflictKind::OutsideAvailability,
            event_id: None,
            overlap: Some(*interval),
            reason: format!("{} does not work on {weekday}", member.name),
        }),
        AvailabilityVerdict::OutsideHours { window } => Some(ScheduleConflict {
            kind: ConflictKind::OutsideAvailability,
            event_id: None,
            overlap: Some(*interval),
            reason: format!("{} works {window} that day", member.name),
        }),
        AvailabilityVerdict::Blocked { block } => {
            let overlap = TimeInterval::new(
                policy.instant_at(block.date, block.start()),
                policy.instant_at(block.date, block.end()),
            )
            .ok()
            .and_then(|b| b.intersection(interval));
            let reason = block.reason.as_deref().map_or_else(
                || format!("{} is blocked {}-{}", member.name, block.start(), block.end()),
                |r| format!("{} is blocked {}-{} ({r})", member.name, block.start(), block.end()),
            );
            Some(ScheduleConflict {
                kind: ConflictKind::BlockedTime,
                event_id: None,
                overlap,
                reason,
            })
        }
    };
    Ok(conflict)
}
