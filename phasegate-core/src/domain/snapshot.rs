//! Output snapshots: the reconstructed daily balance sheet and the periodic
//! balance points recorded by the live pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Round a currency amount to the cent.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One business day of the reconstructed portfolio timeline.
///
/// Invariants, enforced by the reconstructor and checked in tests:
/// - `total == round_cents(cash + equity)`
/// - `change == round_cents(total - previous.total)` (first day compares
///   against starting capital)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    /// Cash balance at end of day, rounded to the cent.
    pub cash: f64,
    /// Mark-to-market value of all holdings, rounded to the cent.
    pub equity: f64,
    /// `cash + equity`, rounded to the cent.
    pub total: f64,
    /// Day-over-day change in total value.
    pub change: f64,
    /// Day-over-day change as a percentage of the previous total.
    pub change_pct: f64,
    /// Human-readable log of the day's buy/sell events, in application order.
    pub events: Vec<String>,
}

impl DailySnapshot {
    /// The day's events joined for single-line display.
    pub fn events_line(&self) -> String {
        self.events.join(" / ")
    }
}

/// One periodic balance point from the live pipeline's snapshot store.
///
/// Higher-fidelity input for drawdown than replaying the ledger, when enough
/// points exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub taken_at: NaiveDateTime,
    pub total_value: f64,
}
