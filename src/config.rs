//! Engine configuration
//!
//! Every constant table the engine relies on lives here as immutable data
//! injected into the components. Defaults reproduce the standard engine;
//! selected values can be overridden from the environment.

use crate::allocation::InstrumentTable;
use crate::error::PlanningError;
use crate::feasibility::{FeasibilityConfig, ValidationLimits};
use crate::health::CategoryTaxonomy;
use crate::resilience::RetryPolicy;
use crate::Result;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_ANNUAL_RETURN_RATE: &str = "PLANNER_ANNUAL_RETURN_RATE";
pub const ENV_AFFORDABILITY_RATIO: &str = "PLANNER_AFFORDABILITY_RATIO";
pub const ENV_NARRATIVE_MAX_ATTEMPTS: &str = "PLANNER_NARRATIVE_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_MS: &str = "PLANNER_RETRY_BASE_MS";
pub const ENV_RETRY_CAP_MS: &str = "PLANNER_RETRY_CAP_MS";
pub const ENV_RETRY_JITTER_MS: &str = "PLANNER_RETRY_JITTER_MS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub feasibility: FeasibilityConfig,
    pub validation: ValidationLimits,
    pub retry: RetryPolicy,
    pub instruments: InstrumentTable,
    pub taxonomy: CategoryTaxonomy,
}

impl EngineConfig {
    /// Defaults with overrides from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rate) = parse_var::<f64, _>(&lookup, ENV_ANNUAL_RETURN_RATE)? {
            if !(0.0..1.0).contains(&rate) {
                return Err(PlanningError::Config(format!(
                    "{} must be in [0, 1), got {}",
                    ENV_ANNUAL_RETURN_RATE, rate
                )));
            }
            config.feasibility.annual_return_rate = rate;
        }

        if let Some(ratio) = parse_var::<f64, _>(&lookup, ENV_AFFORDABILITY_RATIO)? {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(PlanningError::Config(format!(
                    "{} must be in (0, 1], got {}",
                    ENV_AFFORDABILITY_RATIO, ratio
                )));
            }
            config.feasibility.affordability_ratio = ratio;
        }

        if let Some(attempts) = parse_var::<u32, _>(&lookup, ENV_NARRATIVE_MAX_ATTEMPTS)? {
            if attempts == 0 {
                return Err(PlanningError::Config(format!(
                    "{} must be at least 1",
                    ENV_NARRATIVE_MAX_ATTEMPTS
                )));
            }
            config.retry.max_attempts = attempts;
        }

        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_RETRY_BASE_MS)? {
            config.retry.base_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_RETRY_CAP_MS)? {
            config.retry.max_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_RETRY_JITTER_MS)? {
            config.retry.max_jitter = Duration::from_millis(ms);
        }

        config.instruments.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PlanningError::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}
