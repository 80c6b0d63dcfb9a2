//! # Pressroom Scheduler
//!
//! Scheduling core for a print-shop operations dashboard: staff availability,
//! conflict detection, auto-scheduling suggestions, bulk actions and workload
//! reporting.
//!
//! The dashboard supplies snapshots (staff records, committed events, jobs)
//! and this crate answers questions about them. All computation is pure and
//! synchronous; the only shared state lives in a [`ScheduleStore`]
//! implementation, which serializes commits so that two overlapping
//! assignments can never both win.
//!
//! ## Key Features
//!
//! - **Availability Model**: weekday flags, per-day working windows and
//!   date-specific blocked time, compared as parsed minute-of-day values
//! - **Conflict Detector**: half-open overlap checks for staff and machines,
//!   with conflicts returned as data rather than errors
//! - **Auto-Scheduler**: greedy earliest-first slot search that never
//!   double-books, even when availability checks are waived
//! - **Bulk Actions**: per-job isolation with a report that never claims full
//!   success when any job was refused
//! - **Workload Reports**: booked versus available hours per staff member
//!
//! ## Checking an assignment
//!
//! ```rust,ignore
//! use pressroom_scheduler::builders::build_in_memory_scheduler;
//! use pressroom_scheduler::config::SchedulingConfig;
//! use pressroom_scheduler::core::{Candidate, StaffMember, TimeInterval};
//!
//! let scheduler = build_in_memory_scheduler(&SchedulingConfig::default())?;
//! let staff = vec![StaffMember::new("mike", "Mike")];
//! let conflicts = scheduler.check_assignment(
//!     &Candidate::for_staff("mike".into(), TimeInterval::new(start, end)?),
//!     &staff,
//! )?;
//! if conflicts.is_empty() {
//!     // safe to commit
//! }
//! ```
//!
//! ## Auto-scheduling
//!
//! ```rust,ignore
//! use pressroom_scheduler::core::{AutoScheduleOptions, Job};
//!
//! let job = Job::new("job-42", 2.5).with_deadline(deadline);
//! let options = AutoScheduleOptions::default().with_max_suggestions(3);
//! let slots = scheduler.suggest(&job, &options, &staff)?;
//! ```
//!
//! [`ScheduleStore`]: crate::core::ScheduleStore

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling model: availability, conflicts, suggestions and bulk actions.
pub mod core;
/// Configuration models for scheduling defaults and shop policy.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for schedule storage.
pub mod infra;
/// Request/response models and handlers for the dashboard.
pub mod api;
/// Shared utilities.
pub mod util;
