//! Structured input errors.
//!
//! The error taxonomy is deliberately narrow: business-data gaps (missing
//! prices, empty ledgers, empty run windows) are absorbed as fallbacks or
//! zeros and never surface here. Only structurally invalid configuration is
//! an error.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid configuration passed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("start date {start} is after the evaluation horizon {as_of}")]
    StartAfterHorizon { start: NaiveDate, as_of: NaiveDate },

    #[error("starting capital must be positive, got {0}")]
    NonPositiveCapital(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = InputError::StartAfterHorizon {
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            as_of: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        };
        assert!(err.to_string().contains("2026-03-01"));
        assert!(err.to_string().contains("2026-02-01"));

        let err = InputError::NonPositiveCapital(0.0);
        assert!(err.to_string().contains("positive"));
    }
}
