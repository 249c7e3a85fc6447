//! Serializable evaluation configuration.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use phasegate_core::error::InputError;

use crate::verdict::KpiTargets;

/// Errors from loading an evaluation config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All parameters of one promotion evaluation.
///
/// Captures everything needed to reproduce a verdict for a given `as_of`
/// instant: the evaluation window, the capital base, the uptime window, and
/// the KPI target table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// First day of the evaluation window (inclusive).
    pub start_date: NaiveDate,

    /// Date the Go/No-Go decision is due.
    pub decision_deadline: NaiveDate,

    /// Paper-trading capital at the start of the window.
    pub starting_capital: f64,

    /// Trailing window for the uptime KPI, in days.
    #[serde(default = "default_uptime_window_days")]
    pub uptime_window_days: i64,

    /// Promotion thresholds.
    #[serde(default)]
    pub targets: KpiTargets,
}

fn default_uptime_window_days() -> i64 {
    7
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 24).expect("valid date"),
            decision_deadline: NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date"),
            starting_capital: 100_000.0,
            uptime_window_days: default_uptime_window_days(),
            targets: KpiTargets::default(),
        }
    }
}

impl EvaluationConfig {
    /// Load from a TOML file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Reject structurally invalid configuration up front.
    ///
    /// A start date after the horizon and a non-positive capital are the only
    /// inputs treated as errors; every data gap degrades instead.
    pub fn validate(&self, as_of: NaiveDate) -> Result<(), InputError> {
        if self.starting_capital <= 0.0 {
            return Err(InputError::NonPositiveCapital(self.starting_capital));
        }
        if self.start_date > as_of {
            return Err(InputError::StartAfterHorizon {
                start: self.start_date,
                as_of,
            });
        }
        Ok(())
    }

    /// Deterministic content hash of this config plus an `as_of` bucket.
    ///
    /// Two evaluations with identical config and the same bucket share a
    /// cache entry; bucketing keeps "now"-dependent outputs from being cached
    /// indefinitely.
    pub fn fingerprint(&self, as_of_bucket: &str) -> String {
        let json = serde_json::to_string(self).expect("EvaluationConfig serialization failed");
        let hash = blake3::hash(format!("{json}|{as_of_bucket}").as_bytes());
        hash.to_hex().to_string()
    }
}

/// Truncate an evaluation instant to a bucket label of `minutes` width.
///
/// Evaluations within the same bucket may share cached results.
pub fn as_of_bucket(as_of: NaiveDateTime, minutes: u32) -> String {
    let minutes = minutes.max(1);
    let since_midnight = as_of.time().signed_duration_since(
        chrono::NaiveTime::from_hms_opt(0, 0, 0).expect("midnight"),
    );
    let bucket = since_midnight.num_minutes() as u32 / minutes;
    format!("{}#{bucket}", as_of.date())
}
