//! Benchmark normalization — rebases a reference close series to the
//! portfolio's starting capital so the two curves share an axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use phasegate_core::prices::PriceSeries;

/// One point of the normalized benchmark curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Normalize `series` so that its first close on or after `start_date` equals
/// `starting_capital`.
///
/// Returns an empty curve when the series has no usable base (no point on or
/// after the start date, or a non-positive base close).
pub fn normalize_to_capital(
    series: &PriceSeries,
    start_date: NaiveDate,
    starting_capital: f64,
) -> Vec<BenchmarkPoint> {
    let Some(base) = series.first_at_or_after(start_date) else {
        return Vec::new();
    };
    if base.close <= 0.0 {
        return Vec::new();
    }
    let base_close = base.close;
    series
        .points()
        .iter()
        .filter(|p| p.date >= start_date)
        .map(|p| BenchmarkPoint {
            date: p.date,
            value: p.close / base_close * starting_capital,
        })
        .collect()
}
