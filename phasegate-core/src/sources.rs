//! Read-only input interfaces.
//!
//! The engine never fetches anything itself — callers acquire ledger rows,
//! prices, balance snapshots, and run telemetry up front and hand them over
//! through these narrow traits. The in-memory implementations back tests and
//! the CLI file loaders.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{BalanceSnapshot, RunRecord, TradeEvent};
use crate::prices::{PriceBook, PriceSeries};

/// Immutable record of executed trades.
pub trait TradeLedger: Send + Sync {
    /// All ledger rows with entry timestamp ≥ `start_date`, any status.
    fn list_trades(&self, start_date: NaiveDate) -> Vec<TradeEvent>;
}

/// Closing-price history per instrument.
pub trait PriceHistory: Send + Sync {
    /// Ordered closes for `symbol` within `from ..= to`.
    fn price_series(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> PriceSeries;
}

/// Periodic balance snapshots from the live pipeline (optional source).
pub trait SnapshotStore: Send + Sync {
    /// Snapshots taken at or after `start_date`, time-ascending.
    fn list_balance_snapshots(&self, start_date: NaiveDate) -> Vec<BalanceSnapshot>;
}

/// Pipeline execution telemetry.
pub trait RunLog: Send + Sync {
    /// Runs started within `from ..= to`.
    fn list_runs(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<RunRecord>;
}

// ─── In-memory implementations ───────────────────────────────────────

/// Trade ledger over an owned vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    trades: Vec<TradeEvent>,
}

impl InMemoryLedger {
    pub fn new(trades: Vec<TradeEvent>) -> Self {
        Self { trades }
    }
}

impl TradeLedger for InMemoryLedger {
    fn list_trades(&self, start_date: NaiveDate) -> Vec<TradeEvent> {
        let mut rows: Vec<TradeEvent> = self
            .trades
            .iter()
            .filter(|t| t.entry_date() >= start_date)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.entry_at);
        rows
    }
}

/// Price history over an owned `PriceBook`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceHistory {
    book: PriceBook,
}

impl InMemoryPriceHistory {
    pub fn new(book: PriceBook) -> Self {
        Self { book }
    }
}

impl PriceHistory for InMemoryPriceHistory {
    fn price_series(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> PriceSeries {
        self.book
            .get(symbol)
            .map(|series| series.between(from, to))
            .unwrap_or_default()
    }
}

/// Snapshot store over an owned vector.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Vec<BalanceSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new(snapshots: Vec<BalanceSnapshot>) -> Self {
        Self { snapshots }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn list_balance_snapshots(&self, start_date: NaiveDate) -> Vec<BalanceSnapshot> {
        let mut rows: Vec<BalanceSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.taken_at.date() >= start_date)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.taken_at);
        rows
    }
}

/// Run log over an owned vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRunLog {
    runs: Vec<RunRecord>,
}

impl InMemoryRunLog {
    pub fn new(runs: Vec<RunRecord>) -> Self {
        Self { runs }
    }
}

impl RunLog for InMemoryRunLog {
    fn list_runs(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<RunRecord> {
        let mut rows: Vec<RunRecord> = self
            .runs
            .iter()
            .filter(|r| r.started_at >= from && r.started_at <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.started_at);
        rows
    }
}
