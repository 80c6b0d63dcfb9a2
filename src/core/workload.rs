//! Workload reporting: booked hours against available hours per staff member.

use serde::{Deserialize, Serialize};

use crate::core::availability::{available_minutes_on, AvailabilityPolicy};
use crate::core::job::ScheduleEvent;
use crate::core::staff::StaffMember;
use crate::core::time::{dates_between, duration_hours, TimeInterval};
use crate::core::SchedulingError;
use crate::util::StaffId;

/// Load figures for one staff member over a reporting range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWorkload {
    /// Staff member.
    pub staff_id: StaffId,
    /// Hours of assigned events inside the range.
    pub scheduled_hours: f64,
    /// Working hours inside the range, after blocked time.
    pub available_hours: f64,
    /// `scheduled_hours / available_hours`, or 0 when nothing is available.
    pub utilization: f64,
    /// Events overlapping the range.
    pub event_count: usize,
}

impl StaffWorkload {
    /// Whether more work is booked than there are available hours.
    #[must_use]
    pub fn is_overbooked(&self) -> bool {
        self.utilization > 1.0
    }
}

/// Compute workload for every staff member in `staff`, in pool order.
///
/// Event time is clipped to `range`. Available time counts every shop-local
/// date touched by `range` in full.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidInterval`] when an assigned event has
/// `start_time >= end_time`.
pub fn staff_workload(
    staff: &[StaffMember],
    events: &[ScheduleEvent],
    range: &TimeInterval,
    policy: &AvailabilityPolicy,
) -> Result<Vec<StaffWorkload>, SchedulingError> {
    let first = policy.local_date(range.start());
    // The end is exclusive; step back a millisecond to find the last date.
    let last = policy.local_date(range.end() - chrono::Duration::milliseconds(1));

    staff
        .iter()
        .map(|member| -> Result<StaffWorkload, SchedulingError> {
            let mut scheduled = chrono::Duration::zero();
            let mut event_count = 0;
            for event in events.iter().filter(|e| e.is_for_staff(&member.id)) {
                if let Some(clipped) = event.interval()?.intersection(range) {
                    scheduled += clipped.duration();
                    event_count += 1;
                }
            }

            let available_minutes: u32 = dates_between(first, last)
                .map(|date| available_minutes_on(member, date, policy))
                .sum();

            let scheduled_hours = duration_hours(scheduled);
            let available_hours = f64::from(available_minutes) / 60.0;
            let utilization = if available_minutes == 0 {
                0.0
            } else {
                scheduled_hours / available_hours
            };

            Ok(StaffWorkload {
                staff_id: member.id.clone(),
                scheduled_hours,
                available_hours,
                utilization,
                event_count,
            })
        })
        .collect()
}

/// Staff members booked beyond their available hours.
#[must_use]
pub fn overbooked_staff(workloads: &[StaffWorkload]) -> Vec<&StaffWorkload> {
    workloads.iter().filter(|w| w.is_overbooked()).collect()
}
