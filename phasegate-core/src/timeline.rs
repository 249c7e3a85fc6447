//! Daily timeline reconstruction — replays the normalized ledger over the
//! business-day calendar and marks holdings to market each day.
//!
//! Valuation degrades, never fails: an instrument with no usable price at a
//! given day contributes `shares * avg_entry_price` instead of a live mark.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::business_days;
use crate::domain::{round_cents, DailySnapshot, HoldingBook, TradeEvent, TradeSide, TradeStatus};
use crate::error::InputError;
use crate::ledger::NormalizedLedger;
use crate::prices::PriceBook;

/// Rebuild one `DailySnapshot` per business day from the earliest buy's entry
/// date through `as_of`.
///
/// An empty ledger yields an empty timeline — a valid result, not an error.
/// The only rejected input is a non-positive starting capital.
pub fn reconstruct(
    ledger: &NormalizedLedger,
    prices: &PriceBook,
    starting_capital: f64,
    as_of: NaiveDate,
) -> Result<Vec<DailySnapshot>, InputError> {
    if starting_capital <= 0.0 {
        return Err(InputError::NonPositiveCapital(starting_capital));
    }
    let Some(first_date) = ledger.first_entry_date() else {
        return Ok(Vec::new());
    };

    let mut holdings = HoldingBook::new();
    let mut cash = starting_capital;
    let mut prev_total = round_cents(starting_capital);
    let mut timeline = Vec::new();

    for date in business_days(first_date, as_of) {
        let mut events = Vec::new();

        for buy in ledger.buys_on(date) {
            cash -= f64::from(buy.shares) * buy.price;
            holdings.apply_buy(&buy.symbol, buy.shares, buy.price);
            events.push(format!(
                "BUY {} {} @ ${:.2}",
                buy.symbol, buy.shares, buy.price
            ));
        }

        for sell in ledger.sells_on(date) {
            cash += f64::from(sell.shares) * sell.price;
            holdings.apply_sell(&sell.symbol, sell.shares);
            let sign = if sell.pnl >= 0.0 { '+' } else { '-' };
            events.push(format!(
                "SELL {} {} @ ${:.2} ({}${:.0})",
                sell.symbol,
                sell.shares,
                sell.price,
                sign,
                sell.pnl.abs()
            ));
        }

        let equity = holdings.market_value(|symbol| prices.resolve(symbol, date));

        let cash_r = round_cents(cash);
        let equity_r = round_cents(equity);
        let total = round_cents(cash_r + equity_r);
        let change = round_cents(total - prev_total);
        let change_pct = if prev_total > 0.0 {
            round_cents(change / prev_total * 100.0)
        } else {
            0.0
        };

        timeline.push(DailySnapshot {
            date,
            cash: cash_r,
            equity: equity_r,
            total,
            change,
            change_pct,
            events,
        });
        prev_total = total;
    }

    Ok(timeline)
}

/// A currently open position reconstructed from the ledger and marked via the
/// price resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub shares: u32,
    pub avg_entry_price: f64,
    pub mark_price: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_pct: f64,
}

/// Rebuild the open book from OPEN buy rows and mark it at `as_of`.
///
/// The same fallback policy as the timeline applies: no resolvable price
/// means the mark is the average entry price (zero unrealized P&L).
pub fn open_positions(
    trades: &[TradeEvent],
    prices: &PriceBook,
    as_of: NaiveDate,
) -> Vec<OpenPosition> {
    let mut book = HoldingBook::new();
    let mut rows: Vec<&TradeEvent> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Open && t.side == TradeSide::Buy)
        .collect();
    rows.sort_by_key(|t| t.entry_at);
    for trade in rows {
        book.apply_buy(&trade.symbol, trade.shares, trade.entry_price);
    }

    book.iter()
        .map(|(symbol, holding)| {
            let mark = prices
                .resolve(symbol, as_of)
                .unwrap_or(holding.avg_entry_price);
            let pnl = holding.unrealized_pnl(mark);
            let pnl_pct = if holding.avg_entry_price > 0.0 {
                (mark / holding.avg_entry_price - 1.0) * 100.0
            } else {
                0.0
            };
            OpenPosition {
                symbol: symbol.to_string(),
                shares: holding.shares,
                avg_entry_price: holding.avg_entry_price,
                mark_price: mark,
                market_value: holding.market_value(mark),
                unrealized_pnl: pnl,
                unrealized_pnl_pct: pnl_pct,
            }
        })
        .collect()
}
