//! Core scheduling model: availability, conflicts, suggestions and bulk actions.

pub mod error;
pub mod time;
pub mod staff;
pub mod job;
pub mod availability;
pub mod conflict;
pub mod suggest;
pub mod store;
pub mod bulk;
pub mod workload;
pub mod audit;
pub mod scheduler;

pub use error::{AppResult, SchedulingError};
pub use time::{TimeInterval, TimeOfDay, WorkingWindow};
pub use staff::{capable_staff, BlockedTime, StaffMember, WeeklyAvailability, WeeklyHours};
pub use job::{Job, JobPriority, JobStatus, ScheduleEvent};
pub use availability::{check_availability, is_available, AvailabilityPolicy, AvailabilityVerdict};
pub use conflict::{check_conflicts, Candidate, CheckMode, ConflictKind, ScheduleConflict};
pub use suggest::{suggest_slots, AutoScheduleOptions, SuggestionDefaults};
pub use store::{CommitOutcome, CommitPolicy, ScheduleStore};
pub use bulk::{bulk_reassign, bulk_unschedule, BulkItemOutcome, BulkItemStatus, BulkReport};
pub use workload::{staff_workload, StaffWorkload};
pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use scheduler::Scheduler;
