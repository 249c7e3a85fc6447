//! Maximum drawdown with two interchangeable sources.
//!
//! Snapshot mode walks the periodic balance snapshots and is the preferred,
//! higher-fidelity source. When fewer than two snapshots exist the calculator
//! falls back to an estimate against cumulative realized P&L over closed
//! trades. The two modes are NOT bit-equivalent: the ledger estimate ignores
//! unrealized positions and cash drag, and normalizes by `max(peak, 1)`.
//! Both behaviors are kept as-is rather than unified.

use serde::{Deserialize, Serialize};

use phasegate_core::domain::{BalanceSnapshot, TradeEvent};

/// Which input the drawdown figure was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownSource {
    Snapshots,
    LedgerEstimate,
}

/// Max drawdown percentage plus the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    pub pct: f64,
    pub source: DrawdownSource,
}

/// Compute max drawdown, preferring snapshots when at least two exist.
pub fn max_drawdown(snapshots: &[BalanceSnapshot], trades: &[TradeEvent]) -> Drawdown {
    match from_snapshots(snapshots) {
        Some(pct) => Drawdown {
            pct,
            source: DrawdownSource::Snapshots,
        },
        None => Drawdown {
            pct: ledger_estimate(trades),
            source: DrawdownSource::LedgerEstimate,
        },
    }
}

/// Peak-tracking drawdown over the snapshot series, as a positive percentage.
///
/// Returns `None` with fewer than two snapshots (not enough signal to call it
/// a series).
pub fn from_snapshots(snapshots: &[BalanceSnapshot]) -> Option<f64> {
    if snapshots.len() < 2 {
        return None;
    }
    let mut peak = snapshots[0].total_value;
    let mut max_dd = 0.0_f64;
    for snapshot in snapshots {
        let value = snapshot.total_value;
        if value > peak {
            peak = value;
        }
        let dd = if peak > 0.0 {
            (peak - value) / peak * 100.0
        } else {
            0.0
        };
        if dd > max_dd {
            max_dd = dd;
        }
    }
    Some(max_dd)
}

/// Drawdown estimated from cumulative realized P&L over closed trades, in
/// entry order.
///
/// This measures retreat from the running P&L peak, normalized by
/// `max(peak, 1)` — an approximation, not a portfolio-value drawdown.
pub fn ledger_estimate(trades: &[TradeEvent]) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut max_gap = 0.0_f64;
    let mut any = false;

    for trade in trades.iter().filter(|t| t.is_closed()) {
        any = true;
        cumulative += trade.realized_pnl();
        if cumulative > peak {
            peak = cumulative;
        }
        let gap = peak - cumulative;
        if gap > max_gap {
            max_gap = gap;
        }
    }

    if !any || peak <= 0.0 {
        return 0.0;
    }
    max_gap / peak.max(1.0) * 100.0
}
