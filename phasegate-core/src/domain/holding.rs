//! Holding — per-instrument aggregate state during ledger replay.
//!
//! Holdings exist only transiently while the timeline is reconstructed; they
//! are never persisted. Share counts cannot go negative: a sell larger than
//! the held quantity clears the holding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shares held in one instrument plus the weighted-average entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub shares: u32,
    pub avg_entry_price: f64,
}

impl Holding {
    /// Blend an additional buy into the weighted-average cost basis:
    /// `new_avg = (prev_avg*prev_shares + price*shares) / (prev_shares + shares)`.
    pub fn buy(&mut self, shares: u32, price: f64) {
        let total = self.shares + shares;
        if total == 0 {
            return;
        }
        self.avg_entry_price = (self.avg_entry_price * f64::from(self.shares)
            + price * f64::from(shares))
            / f64::from(total);
        self.shares = total;
    }

    /// Reduce the held quantity, saturating at zero.
    pub fn sell(&mut self, shares: u32) {
        self.shares = self.shares.saturating_sub(shares);
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        f64::from(self.shares) * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        f64::from(self.shares) * (price - self.avg_entry_price)
    }
}

/// Symbol → holding map built up during replay.
///
/// Backed by a `BTreeMap` so that valuation sums and position listings are
/// deterministic across runs (identical inputs must produce byte-identical
/// output).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingBook {
    holdings: BTreeMap<String, Holding>,
}

impl HoldingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a buy, creating the holding on first touch.
    pub fn apply_buy(&mut self, symbol: &str, shares: u32, price: f64) {
        self.holdings
            .entry(symbol.to_string())
            .or_insert(Holding {
                shares: 0,
                avg_entry_price: 0.0,
            })
            .buy(shares, price);
    }

    /// Apply a sell; the holding is removed once it reaches zero shares.
    pub fn apply_sell(&mut self, symbol: &str, shares: u32) {
        if let Some(holding) = self.holdings.get_mut(symbol) {
            holding.sell(shares);
            if holding.is_flat() {
                self.holdings.remove(symbol);
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    /// Held instruments in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Holding)> {
        self.holdings.iter().map(|(sym, h)| (sym.as_str(), h))
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Mark-to-market value of all holdings.
    ///
    /// `mark` resolves a price per symbol; a `None` falls back to the
    /// holding's average entry price, so a missing price feed degrades to a
    /// cost-basis valuation instead of an error.
    pub fn market_value(&self, mut mark: impl FnMut(&str) -> Option<f64>) -> f64 {
        self.holdings
            .iter()
            .map(|(sym, holding)| {
                let price = mark(sym).unwrap_or(holding.avg_entry_price);
                holding.market_value(price)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Cost-basis blend ──

    #[test]
    fn first_buy_sets_average() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        let holding = book.get("NVDA").unwrap();
        assert_eq!(holding.shares, 10);
        assert!((holding.avg_entry_price - 100.0).abs() < 1e-10);
    }

    #[test]
    fn second_buy_blends_average() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        book.apply_buy("NVDA", 30, 120.0);
        let holding = book.get("NVDA").unwrap();
        assert_eq!(holding.shares, 40);
        // (10*100 + 30*120) / 40 = 115
        assert!((holding.avg_entry_price - 115.0).abs() < 1e-10);
    }

    // ── Sells ──

    #[test]
    fn partial_sell_keeps_average() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        book.apply_sell("NVDA", 4);
        let holding = book.get("NVDA").unwrap();
        assert_eq!(holding.shares, 6);
        assert!((holding.avg_entry_price - 100.0).abs() < 1e-10);
    }

    #[test]
    fn full_sell_removes_holding() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        book.apply_sell("NVDA", 10);
        assert!(book.get("NVDA").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn oversell_saturates_at_zero() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        book.apply_sell("NVDA", 25);
        assert!(book.get("NVDA").is_none());
    }

    #[test]
    fn sell_unknown_symbol_is_noop() {
        let mut book = HoldingBook::new();
        book.apply_sell("AMD", 5);
        assert!(book.is_empty());
    }

    // ── Valuation ──

    #[test]
    fn market_value_uses_resolved_price() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        let value = book.market_value(|_| Some(110.0));
        assert!((value - 1_100.0).abs() < 1e-10);
    }

    #[test]
    fn market_value_falls_back_to_entry_price() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 10, 100.0);
        let value = book.market_value(|_| None);
        assert!((value - 1_000.0).abs() < 1e-10);
    }

    #[test]
    fn iteration_is_symbol_ordered() {
        let mut book = HoldingBook::new();
        book.apply_buy("NVDA", 1, 1.0);
        book.apply_buy("AMD", 1, 1.0);
        book.apply_buy("MSFT", 1, 1.0);
        let symbols: Vec<&str> = book.iter().map(|(sym, _)| sym).collect();
        assert_eq!(symbols, vec!["AMD", "MSFT", "NVDA"]);
    }

    #[test]
    fn unrealized_pnl() {
        let holding = Holding {
            shares: 10,
            avg_entry_price: 100.0,
        };
        assert!((holding.unrealized_pnl(108.0) - 80.0).abs() < 1e-10);
        assert!((holding.unrealized_pnl(95.0) + 50.0).abs() < 1e-10);
    }
}
