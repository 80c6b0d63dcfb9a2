//! Builders to construct a [`Scheduler`] from configuration.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;

use crate::config::SchedulingConfig;
use crate::core::{AppResult, InMemoryAuditSink, ScheduleStore, Scheduler, SchedulingError};
use crate::infra::InMemoryScheduleStore;

/// Build a scheduler over a store produced by `store_factory`.
///
/// The configuration is validated before the factory runs.
///
/// # Errors
///
/// Returns [`SchedulingError::Config`] for invalid configuration and
/// propagates factory errors.
pub fn build_scheduler<S, F>(cfg: &SchedulingConfig, store_factory: F) -> Result<Scheduler<S>, SchedulingError>
where
    S: ScheduleStore,
    F: FnOnce(&SchedulingConfig) -> Result<S, SchedulingError>,
{
    cfg.validate()
        .map_err(|e| SchedulingError::Config(format!("config invalid: {e}")))?;
    let store = store_factory(cfg)?;
    Scheduler::new(cfg.clone(), Arc::new(store))
}

/// Build a scheduler over an empty in-memory store with an audit log sized
/// by `audit_capacity`.
///
/// # Errors
///
/// Returns [`SchedulingError::Config`] for invalid configuration.
pub fn build_in_memory_scheduler(cfg: &SchedulingConfig) -> Result<Scheduler<InMemoryScheduleStore>, SchedulingError> {
    let log = Arc::new(Mutex::new(InMemoryAuditSink::new(cfg.audit_capacity)));
    let audit = Arc::clone(&log);
    let scheduler = build_scheduler(cfg, move |_| Ok(InMemoryScheduleStore::new().with_audit(audit)))?;
    tracing::info!(
        business_hours = %cfg.business_hours,
        slot_minutes = cfg.slot_minutes,
        "in-memory scheduler ready"
    );
    Ok(scheduler.with_audit_log(log))
}

/// Build an in-memory scheduler from `PRESSROOM_*` environment variables
/// (after loading `.env`).
///
/// # Errors
///
/// Fails with context when a variable is malformed or the resulting
/// configuration does not validate.
pub fn build_in_memory_scheduler_from_env() -> AppResult<Scheduler<InMemoryScheduleStore>> {
    let cfg = SchedulingConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading scheduler configuration from environment")?;
    build_in_memory_scheduler(&cfg).context("building in-memory scheduler")
}

/// [`build_in_memory_scheduler_from_env`] over an arbitrary key lookup.
///
/// # Errors
///
/// Same as [`build_in_memory_scheduler_from_env`].
pub fn build_in_memory_scheduler_from_lookup<F>(lookup: F) -> AppResult<Scheduler<InMemoryScheduleStore>>
where
    F: Fn(&str) -> Option<String>,
{
    let cfg = SchedulingConfig::from_lookup(lookup)
        .map_err(anyhow::Error::msg)
        .context("loading scheduler configuration")?;
    build_in_memory_scheduler(&cfg).context("building in-memory scheduler")
}
