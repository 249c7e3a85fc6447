//! Price resolution with "latest known close at or before date" semantics.
//!
//! The resolver never looks ahead: a price dated after the requested day is
//! invisible to that day's valuation. Missing data is not an error — callers
//! fall back to the holding's average entry price.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Date-ascending close series for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points. Points are sorted by date; on
    /// duplicate dates the later element wins.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.reverse();
        points.dedup_by_key(|p| p.date);
        points.reverse();
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent close with date ≤ `date`.
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.points.partition_point(|p| p.date <= date);
        if idx == 0 {
            None
        } else {
            Some(self.points[idx - 1].close)
        }
    }

    /// Earliest point with date ≥ `date` (used for benchmark normalization).
    pub fn first_at_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx)
    }

    /// Sub-series restricted to `from ..= to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> PriceSeries {
        let start = self.points.partition_point(|p| p.date < from);
        let end = self.points.partition_point(|p| p.date <= to);
        Self {
            points: self.points[start..end].to_vec(),
        }
    }
}

/// Symbol → price series map for all traded instruments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    series: HashMap<String, PriceSeries>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, series: PriceSeries) {
        self.series.insert(symbol.into(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Latest close for `symbol` at or before `date`.
    ///
    /// `None` when the symbol is unknown or has no price at or before the
    /// date — the caller degrades to its entry-price fallback.
    pub fn resolve(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.series
            .get(symbol)
            .and_then(|s| s.latest_at_or_before(date))
    }
}
