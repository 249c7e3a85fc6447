//! KPI aggregation — pure functions over the ledger, run telemetry, and the
//! drawdown figure.
//!
//! `KpiVector` carries UNROUNDED values. Target comparisons in the verdict
//! engine use these raw values; rounding to one decimal happens only at the
//! presentation boundary (`KpiVector::rounded`, export, CLI).

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use phasegate_core::domain::{round_cents, RunRecord, TradeEvent};

use crate::config::EvaluationConfig;

/// Round a percentage for presentation (one decimal place).
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The KPI set the promotion verdict is decided on, plus supporting counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiVector {
    // ── Gate KPIs (unrounded) ──
    pub win_rate: f64,
    pub annual_return: f64,
    pub max_drawdown: f64,
    pub uptime: f64,

    // ── Supporting counts ──
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_pnl: f64,
    pub actual_return_pct: f64,
    pub days_running: i64,
    pub days_remaining: i64,
    pub progress_pct: f64,
}

impl KpiVector {
    /// Compute the full KPI set.
    ///
    /// `drawdown_pct` comes from the drawdown calculator; `now` is the
    /// evaluation instant (never read from a clock here).
    pub fn compute(
        trades: &[TradeEvent],
        runs: &[RunRecord],
        drawdown_pct: f64,
        config: &EvaluationConfig,
        now: NaiveDateTime,
    ) -> Self {
        let closed: Vec<&TradeEvent> = trades.iter().filter(|t| t.is_closed()).collect();
        let total = closed.len();
        let wins = closed.iter().filter(|t| t.is_winner()).count();
        let win_rate = if total > 0 {
            wins as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let total_pnl: f64 = closed.iter().map(|t| t.realized_pnl()).sum();
        let days_running = (now.date() - config.start_date).num_days().max(1);
        let actual_return_pct = total_pnl / config.starting_capital * 100.0;
        let annual_return = actual_return_pct * (365.0 / days_running as f64);

        let uptime = rolling_uptime(runs, config.uptime_window_days, now);

        let days_remaining = (config.decision_deadline - now.date()).num_days().max(0);
        let total_days = (config.decision_deadline - config.start_date)
            .num_days()
            .max(1);
        let progress_pct = (days_running as f64 / total_days as f64 * 100.0).min(100.0);

        Self {
            win_rate,
            annual_return,
            max_drawdown: drawdown_pct,
            uptime,
            total_trades: total,
            wins,
            losses: total - wins,
            total_pnl,
            actual_return_pct,
            days_running,
            days_remaining,
            progress_pct,
        }
    }

    /// Presentation copy: percentages to one decimal, currency to the cent.
    pub fn rounded(&self) -> Self {
        Self {
            win_rate: round_tenth(self.win_rate),
            annual_return: round_tenth(self.annual_return),
            max_drawdown: round_tenth(self.max_drawdown),
            uptime: round_tenth(self.uptime),
            total_pnl: round_cents(self.total_pnl),
            actual_return_pct: round_cents(self.actual_return_pct),
            progress_pct: round_tenth(self.progress_pct),
            ..self.clone()
        }
    }
}

/// Fraction of runs in the trailing window that completed, as a percentage.
///
/// An empty window is 0%: no runs at all means the pipeline was down, not
/// that there is "no data".
pub fn rolling_uptime(runs: &[RunRecord], window_days: i64, now: NaiveDateTime) -> f64 {
    let window_start = now - Duration::days(window_days);
    let in_window: Vec<&RunRecord> = runs
        .iter()
        .filter(|r| r.started_at >= window_start && r.started_at <= now)
        .collect();
    if in_window.is_empty() {
        return 0.0;
    }
    let completed = in_window.iter().filter(|r| r.is_completed()).count();
    completed as f64 / in_window.len() as f64 * 100.0
}

/// Closed-trade statistics for the operator report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win_pct: f64,
    pub avg_loss_pct: f64,
    pub largest_win_pct: f64,
    pub largest_loss_pct: f64,
    pub avg_holding_days: f64,
    pub total_pnl: f64,
}

impl TradeSummary {
    /// All fields zero — the shape of "no closed trades yet".
    pub fn empty() -> Self {
        Self {
            total: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            profit_factor: 0.0,
            avg_win_pct: 0.0,
            avg_loss_pct: 0.0,
            largest_win_pct: 0.0,
            largest_loss_pct: 0.0,
            avg_holding_days: 0.0,
            total_pnl: 0.0,
        }
    }

    /// Summarize the closed subset of the ledger.
    pub fn compute(trades: &[TradeEvent]) -> Self {
        let closed: Vec<&TradeEvent> = trades.iter().filter(|t| t.is_closed()).collect();
        if closed.is_empty() {
            return Self::empty();
        }

        let winners: Vec<&&TradeEvent> = closed.iter().filter(|t| t.is_winner()).collect();
        let losers: Vec<&&TradeEvent> = closed.iter().filter(|t| !t.is_winner()).collect();

        let gross_profit: f64 = winners.iter().map(|t| t.realized_pnl()).sum();
        let gross_loss: f64 = losers.iter().map(|t| t.realized_pnl().abs()).sum();
        // All-winner ledgers report the conventional 99.99 sentinel.
        let profit_factor = if gross_loss > 0.0 {
            (gross_profit / gross_loss * 100.0).round() / 100.0
        } else {
            99.99
        };

        let mean_pct = |rows: &[&&TradeEvent]| {
            if rows.is_empty() {
                0.0
            } else {
                rows.iter().map(|t| t.return_fraction() * 100.0).sum::<f64>() / rows.len() as f64
            }
        };

        let return_pcts: Vec<f64> = closed.iter().map(|t| t.return_fraction() * 100.0).collect();
        let largest_win_pct = return_pcts.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let largest_loss_pct = return_pcts.iter().cloned().fold(f64::INFINITY, f64::min);

        let holding_days: Vec<i64> = closed.iter().filter_map(|t| t.holding_days()).collect();
        let avg_holding_days = if holding_days.is_empty() {
            0.0
        } else {
            holding_days.iter().sum::<i64>() as f64 / holding_days.len() as f64
        };

        Self {
            total: closed.len(),
            wins: winners.len(),
            losses: losers.len(),
            win_rate: round_tenth(winners.len() as f64 / closed.len() as f64 * 100.0),
            profit_factor,
            avg_win_pct: round_cents(mean_pct(&winners)),
            avg_loss_pct: round_cents(mean_pct(&losers)),
            largest_win_pct: round_cents(largest_win_pct),
            largest_loss_pct: round_cents(largest_loss_pct),
            avg_holding_days: round_tenth(avg_holding_days),
            total_pnl: round_cents(closed.iter().map(|t| t.realized_pnl()).sum()),
        }
    }
}

/// Run-log health figures for the operator report.
///
/// Distinct from the uptime KPI: this summarizes whatever run slice was
/// supplied, while the KPI is strictly the trailing-window ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHealth {
    pub total_runs: usize,
    pub completed: usize,
    pub failed: usize,
    pub interrupted: usize,
    pub success_rate: f64,
    pub avg_duration_min: f64,
    pub total_errors: u64,
}

impl RunHealth {
    pub fn compute(runs: &[RunRecord]) -> Self {
        use phasegate_core::domain::RunStatus;

        if runs.is_empty() {
            return Self {
                total_runs: 0,
                completed: 0,
                failed: 0,
                interrupted: 0,
                success_rate: 0.0,
                avg_duration_min: 0.0,
                total_errors: 0,
            };
        }

        let completed = runs.iter().filter(|r| r.status == RunStatus::Completed).count();
        let failed = runs.iter().filter(|r| r.status == RunStatus::Failed).count();
        let interrupted = runs
            .iter()
            .filter(|r| r.status == RunStatus::Interrupted)
            .count();

        let durations: Vec<f64> = runs.iter().filter_map(|r| r.duration_minutes()).collect();
        let avg_duration_min = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<f64>() / durations.len() as f64
        };

        Self {
            total_runs: runs.len(),
            completed,
            failed,
            interrupted,
            success_rate: round_tenth(completed as f64 / runs.len() as f64 * 100.0),
            avg_duration_min: round_tenth(avg_duration_min),
            total_errors: runs.iter().map(|r| u64::from(r.errors)).sum(),
        }
    }
}
