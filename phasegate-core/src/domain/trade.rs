//! TradeEvent — one immutable row of the executed-trade ledger.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which side the ledger row was executed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Lifecycle status of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// One executed trade as recorded by the ledger.
///
/// Rows are immutable once recorded; the engine only reads them. A CLOSED row
/// carries both legs of the round trip: the entry (buy) and the exit (sell),
/// with the realized P&L attributed to the exit leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    // ── Identification ──
    pub symbol: String,
    pub side: TradeSide,

    // ── Entry leg ──
    pub shares: u32,
    pub entry_price: f64,
    pub entry_at: NaiveDateTime,

    // ── Exit leg (CLOSED rows only) ──
    #[serde(default)]
    pub exit_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub profit_loss: Option<f64>,

    // ── Lifecycle ──
    pub status: TradeStatus,
}

impl TradeEvent {
    /// Calendar date of the entry.
    pub fn entry_date(&self) -> NaiveDate {
        self.entry_at.date()
    }

    /// Calendar date of the exit, if the row has one.
    pub fn exit_date(&self) -> Option<NaiveDate> {
        self.exit_at.map(|ts| ts.date())
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// A closed row with positive realized P&L.
    pub fn is_winner(&self) -> bool {
        self.is_closed() && self.profit_loss.is_some_and(|pnl| pnl > 0.0)
    }

    /// Realized P&L, treating a missing value on a closed row as zero.
    pub fn realized_pnl(&self) -> f64 {
        self.profit_loss.unwrap_or(0.0)
    }

    /// Return on the round trip as a fraction of entry cost.
    pub fn return_fraction(&self) -> f64 {
        let cost = self.entry_price * f64::from(self.shares);
        if cost == 0.0 {
            return 0.0;
        }
        self.realized_pnl() / cost
    }

    /// Whole days the position was held, for closed rows.
    pub fn holding_days(&self) -> Option<i64> {
        self.exit_at
            .map(|exit| exit.signed_duration_since(self.entry_at).num_days())
    }
}
