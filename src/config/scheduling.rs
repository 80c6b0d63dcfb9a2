//! Scheduler configuration structures.

use std::env;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::core::availability::AvailabilityPolicy;
use crate::core::store::CommitPolicy;
use crate::core::suggest::{
    SuggestionDefaults, DEFAULT_DAYS_TO_CHECK, DEFAULT_MAX_SUGGESTIONS, DEFAULT_SLOT_MINUTES, MAX_DAYS_TO_CHECK,
};
use crate::core::time::WorkingWindow;

/// Prefix of every environment variable read by [`SchedulingConfig::from_env`].
pub const ENV_PREFIX: &str = "PRESSROOM_";

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Window used for weekdays without explicit staff hours.
    pub business_hours: WorkingWindow,
    /// Auto-scheduler search step in minutes.
    pub slot_minutes: u16,
    /// Horizon length when a request gives none.
    pub default_days_to_check: u32,
    /// Suggestion cap when a request gives none.
    pub default_max_suggestions: usize,
    /// Shop wall-clock offset from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// Maximum entries kept by the in-memory audit sink.
    pub audit_capacity: usize,
    /// How manual commits treat conflicts.
    pub commit_policy: CommitPolicy,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            business_hours: WorkingWindow::BUSINESS_HOURS,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            default_days_to_check: DEFAULT_DAYS_TO_CHECK,
            default_max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            utc_offset_minutes: 0,
            audit_capacity: 1000,
            commit_policy: CommitPolicy::Strict,
        }
    }
}

impl SchedulingConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.slot_minutes == 0 {
            return Err("slot_minutes must be greater than 0".into());
        }
        if self.slot_minutes > self.business_hours.len_minutes() {
            return Err(format!(
                "slot_minutes {} exceeds business hours {}",
                self.slot_minutes, self.business_hours
            ));
        }
        if self.default_days_to_check == 0 {
            return Err("default_days_to_check must be greater than 0".into());
        }
        if self.default_days_to_check > MAX_DAYS_TO_CHECK {
            return Err(format!(
                "default_days_to_check {} exceeds the limit of {MAX_DAYS_TO_CHECK}",
                self.default_days_to_check
            ));
        }
        if self.default_max_suggestions == 0 {
            return Err("default_max_suggestions must be greater than 0".into());
        }
        self.utc_offset()?;
        Ok(())
    }

    /// The wall-clock offset as a chrono offset.
    ///
    /// # Errors
    ///
    /// Fails when the offset is a day or more away from UTC.
    pub fn utc_offset(&self) -> Result<FixedOffset, String> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| format!("utc_offset_minutes {} out of range", self.utc_offset_minutes))
    }

    /// Availability policy derived from this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`SchedulingConfig::utc_offset`].
    pub fn availability_policy(&self) -> Result<AvailabilityPolicy, String> {
        Ok(AvailabilityPolicy::new(self.business_hours).with_offset(self.utc_offset()?))
    }

    /// Auto-scheduler defaults derived from this configuration.
    #[must_use]
    pub const fn suggestion_defaults(&self) -> SuggestionDefaults {
        SuggestionDefaults {
            days_to_check: self.default_days_to_check,
            max_suggestions: self.default_max_suggestions,
            slot_minutes: self.slot_minutes,
        }
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns parse or validation errors as text.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `PRESSROOM_*` environment variables, loading a
    /// `.env` file first when present. Unset variables keep their defaults.
    ///
    /// Recognised variables: `PRESSROOM_BUSINESS_START`, `PRESSROOM_BUSINESS_END`,
    /// `PRESSROOM_SLOT_MINUTES`, `PRESSROOM_DAYS_TO_CHECK`,
    /// `PRESSROOM_MAX_SUGGESTIONS`, `PRESSROOM_UTC_OFFSET_MINUTES`,
    /// `PRESSROOM_AUDIT_CAPACITY`, `PRESSROOM_COMMIT_POLICY`.
    ///
    /// # Errors
    ///
    /// Returns the first unparsable variable or validation failure.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by [`SchedulingConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns the first unparsable value or validation failure.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut cfg = Self::default();

        let start = get("BUSINESS_START");
        let end = get("BUSINESS_END");
        if start.is_some() || end.is_some() {
            let start = start.unwrap_or_else(|| cfg.business_hours.start().to_string());
            let end = end.unwrap_or_else(|| cfg.business_hours.end().to_string());
            cfg.business_hours = WorkingWindow::parse(&start, &end).map_err(|e| e.to_string())?;
        }
        if let Some(v) = get("SLOT_MINUTES") {
            cfg.slot_minutes = parse_var("SLOT_MINUTES", &v)?;
        }
        if let Some(v) = get("DAYS_TO_CHECK") {
            cfg.default_days_to_check = parse_var("DAYS_TO_CHECK", &v)?;
        }
        if let Some(v) = get("MAX_SUGGESTIONS") {
            cfg.default_max_suggestions = parse_var("MAX_SUGGESTIONS", &v)?;
        }
        if let Some(v) = get("UTC_OFFSET_MINUTES") {
            cfg.utc_offset_minutes = parse_var("UTC_OFFSET_MINUTES", &v)?;
        }
        if let Some(v) = get("AUDIT_CAPACITY") {
            cfg.audit_capacity = parse_var("AUDIT_CAPACITY", &v)?;
        }
        if let Some(v) = get("COMMIT_POLICY") {
            cfg.commit_policy = serde_json::from_value(serde_json::Value::String(v.trim().to_owned()))
                .map_err(|e| format!("{ENV_PREFIX}COMMIT_POLICY: {e}"))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| format!("{ENV_PREFIX}{name}: {e}"))
}
