//! Go/No-Go verdict — a deterministic rule table over the KPI vector.
//!
//! Four binary checks in fixed order (win rate, annual return, max drawdown,
//! uptime). All four pass → GO; exactly three → CONDITIONAL_GO; two or fewer
//! → NO_GO. Each failed check contributes one gap string with the numeric
//! shortfall. Comparisons use unrounded KPI values so a verdict cannot flap
//! across a rounding boundary.

use serde::{Deserialize, Serialize};

use crate::kpi::KpiVector;

/// Fixed promotion thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTargets {
    /// Minimum win rate, percent.
    pub win_rate: f64,
    /// Minimum annualized return, percent.
    pub annual_return: f64,
    /// Maximum tolerated drawdown, percent.
    pub max_drawdown: f64,
    /// Minimum pipeline uptime, percent.
    pub uptime: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            win_rate: 55.0,
            annual_return: 12.0,
            max_drawdown: 15.0,
            uptime: 99.0,
        }
    }
}

/// The categorical promotion decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    NoGo,
    ConditionalGo,
    Go,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Go => "GO",
            VerdictStatus::ConditionalGo => "CONDITIONAL_GO",
            VerdictStatus::NoGo => "NO_GO",
        }
    }
}

/// Verdict plus the checks passed and the gaps left to close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub passed: usize,
    pub total: usize,
    /// One entry per failed check, in check order.
    pub gaps: Vec<String>,
}

/// Evaluate the rule table. Pure: same KPIs and targets, same verdict.
pub fn decide(kpis: &KpiVector, targets: &KpiTargets) -> Verdict {
    let checks = [
        kpis.win_rate >= targets.win_rate,
        kpis.annual_return >= targets.annual_return,
        kpis.max_drawdown <= targets.max_drawdown,
        kpis.uptime >= targets.uptime,
    ];
    let passed = checks.iter().filter(|&&ok| ok).count();

    let status = match passed {
        4 => VerdictStatus::Go,
        3 => VerdictStatus::ConditionalGo,
        _ => VerdictStatus::NoGo,
    };

    let mut gaps = Vec::new();
    if !checks[0] {
        gaps.push(format!(
            "win rate: {:.1}pp short of target",
            targets.win_rate - kpis.win_rate
        ));
    }
    if !checks[1] {
        gaps.push(format!(
            "annual return: {:.1}% short of target",
            targets.annual_return - kpis.annual_return
        ));
    }
    if !checks[2] {
        gaps.push(format!(
            "drawdown: {:.1}% over target",
            kpis.max_drawdown - targets.max_drawdown
        ));
    }
    if !checks[3] {
        gaps.push(format!(
            "uptime: {:.1}pp short of target",
            targets.uptime - kpis.uptime
        ));
    }

    Verdict {
        status,
        passed,
        total: checks.len(),
        gaps,
    }
}
