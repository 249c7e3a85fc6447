//! Ledger normalization — raw trade rows into ordered buy/sell event streams.
//!
//! Buys and sells are kept as two independently time-indexed streams: a buy
//! is indexed by its entry date, a sell by its exit date. Same-day
//! buy-then-sell sequences therefore apply correctly regardless of where the
//! originating rows sit in the ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{TradeEvent, TradeSide};

/// A buy applied on its entry date: cash down, holdings up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyEvent {
    pub date: NaiveDate,
    pub symbol: String,
    pub shares: u32,
    pub price: f64,
}

/// A sell applied on its exit date: cash up, holdings down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellEvent {
    pub date: NaiveDate,
    pub symbol: String,
    pub shares: u32,
    pub price: f64,
    pub pnl: f64,
}

/// The normalized view of the ledger for one evaluation window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLedger {
    buys: Vec<BuyEvent>,
    sells: Vec<SellEvent>,
}

impl NormalizedLedger {
    /// Normalize ledger rows with entry date ≥ `start_date`.
    ///
    /// Rows are processed in entry-timestamp order. BUY-side rows contribute
    /// a buy event; CLOSED rows with a complete exit leg contribute a sell
    /// event dated by the exit, whatever the row's side.
    pub fn from_trades(trades: &[TradeEvent], start_date: NaiveDate) -> Self {
        let mut rows: Vec<&TradeEvent> = trades
            .iter()
            .filter(|t| t.entry_date() >= start_date)
            .collect();
        rows.sort_by_key(|t| t.entry_at);

        let mut buys = Vec::new();
        let mut sells = Vec::new();
        for trade in rows {
            if trade.side == TradeSide::Buy {
                buys.push(BuyEvent {
                    date: trade.entry_date(),
                    symbol: trade.symbol.clone(),
                    shares: trade.shares,
                    price: trade.entry_price,
                });
            }
            if trade.is_closed() {
                if let (Some(date), Some(price)) = (trade.exit_date(), trade.exit_price) {
                    sells.push(SellEvent {
                        date,
                        symbol: trade.symbol.clone(),
                        shares: trade.shares,
                        price,
                        pnl: trade.realized_pnl(),
                    });
                }
            }
        }
        Self { buys, sells }
    }

    pub fn buys(&self) -> &[BuyEvent] {
        &self.buys
    }

    pub fn sells(&self) -> &[SellEvent] {
        &self.sells
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    /// Entry date of the earliest buy — the first day of the timeline.
    pub fn first_entry_date(&self) -> Option<NaiveDate> {
        self.buys.iter().map(|b| b.date).min()
    }

    /// Buy events dated `date`, in ledger order.
    pub fn buys_on(&self, date: NaiveDate) -> impl Iterator<Item = &BuyEvent> {
        self.buys.iter().filter(move |b| b.date == date)
    }

    /// Sell events dated `date`, in ledger order.
    pub fn sells_on(&self, date: NaiveDate) -> impl Iterator<Item = &SellEvent> {
        self.sells.iter().filter(move |s| s.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TradeStatus, TradeSide};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn buy_row(symbol: &str, shares: u32, price: f64, entry: &str) -> TradeEvent {
        TradeEvent {
            symbol: symbol.into(),
            side: TradeSide::Buy,
            shares,
            entry_price: price,
            entry_at: entry.parse().unwrap(),
            exit_at: None,
            exit_price: None,
            profit_loss: None,
            status: TradeStatus::Open,
        }
    }

    fn closed_row(
        symbol: &str,
        shares: u32,
        entry_price: f64,
        entry: &str,
        exit_price: f64,
        exit: &str,
        pnl: f64,
    ) -> TradeEvent {
        TradeEvent {
            symbol: symbol.into(),
            side: TradeSide::Buy,
            shares,
            entry_price,
            entry_at: entry.parse().unwrap(),
            exit_at: Some(exit.parse().unwrap()),
            exit_price: Some(exit_price),
            profit_loss: Some(pnl),
            status: TradeStatus::Closed,
        }
    }

    #[test]
    fn closed_row_yields_both_legs() {
        let trades = vec![closed_row(
            "NVDA",
            10,
            100.0,
            "2026-01-26T10:00:00",
            105.0,
            "2026-01-28T15:30:00",
            50.0,
        )];
        let ledger = NormalizedLedger::from_trades(&trades, d(2026, 1, 24));
        assert_eq!(ledger.buys().len(), 1);
        assert_eq!(ledger.sells().len(), 1);
        assert_eq!(ledger.buys()[0].date, d(2026, 1, 26));
        assert_eq!(ledger.sells()[0].date, d(2026, 1, 28));
        assert_eq!(ledger.sells()[0].pnl, 50.0);
    }

    #[test]
    fn open_row_yields_only_buy() {
        let trades = vec![buy_row("NVDA", 10, 100.0, "2026-01-26T10:00:00")];
        let ledger = NormalizedLedger::from_trades(&trades, d(2026, 1, 24));
        assert_eq!(ledger.buys().len(), 1);
        assert!(ledger.sells().is_empty());
    }

    #[test]
    fn rows_before_start_date_are_excluded() {
        let trades = vec![
            buy_row("OLD", 5, 50.0, "2026-01-20T10:00:00"),
            buy_row("NEW", 5, 50.0, "2026-01-26T10:00:00"),
        ];
        let ledger = NormalizedLedger::from_trades(&trades, d(2026, 1, 24));
        assert_eq!(ledger.buys().len(), 1);
        assert_eq!(ledger.buys()[0].symbol, "NEW");
    }

    #[test]
    fn buys_ordered_by_entry_timestamp() {
        let trades = vec![
            buy_row("B", 1, 2.0, "2026-01-27T10:00:00"),
            buy_row("A", 1, 1.0, "2026-01-26T10:00:00"),
        ];
        let ledger = NormalizedLedger::from_trades(&trades, d(2026, 1, 24));
        assert_eq!(ledger.buys()[0].symbol, "A");
        assert_eq!(ledger.first_entry_date(), Some(d(2026, 1, 26)));
    }

    #[test]
    fn closed_row_without_exit_leg_yields_no_sell() {
        let mut trade = closed_row(
            "NVDA",
            10,
            100.0,
            "2026-01-26T10:00:00",
            105.0,
            "2026-01-28T15:30:00",
            50.0,
        );
        trade.exit_price = None;
        let ledger = NormalizedLedger::from_trades(&[trade], d(2026, 1, 24));
        assert_eq!(ledger.buys().len(), 1);
        assert!(ledger.sells().is_empty());
    }

    #[test]
    fn missing_pnl_defaults_to_zero() {
        let mut trade = closed_row(
            "NVDA",
            10,
            100.0,
            "2026-01-26T10:00:00",
            105.0,
            "2026-01-28T15:30:00",
            50.0,
        );
        trade.profit_loss = None;
        let ledger = NormalizedLedger::from_trades(&[trade], d(2026, 1, 24));
        assert_eq!(ledger.sells()[0].pnl, 0.0);
    }

    #[test]
    fn day_indexing() {
        let trades = vec![
            buy_row("A", 1, 1.0, "2026-01-26T10:00:00"),
            buy_row("B", 1, 1.0, "2026-01-26T14:00:00"),
            buy_row("C", 1, 1.0, "2026-01-27T10:00:00"),
        ];
        let ledger = NormalizedLedger::from_trades(&trades, d(2026, 1, 24));
        assert_eq!(ledger.buys_on(d(2026, 1, 26)).count(), 2);
        assert_eq!(ledger.buys_on(d(2026, 1, 27)).count(), 1);
        assert_eq!(ledger.buys_on(d(2026, 1, 28)).count(), 0);
    }

    #[test]
    fn empty_input_is_empty() {
        let ledger = NormalizedLedger::from_trades(&[], d(2026, 1, 24));
        assert!(ledger.is_empty());
        assert_eq!(ledger.first_entry_date(), None);
    }
}
