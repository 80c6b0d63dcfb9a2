//! Configuration models for scheduling defaults and shop policy.

pub mod scheduling;

pub use scheduling::SchedulingConfig;
