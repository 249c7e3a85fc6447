//! End-to-end evaluation scenarios and verdict properties.

use chrono::NaiveDateTime;
use proptest::prelude::*;

use phasegate_core::domain::{RunRecord, RunStatus, TradeEvent, TradeSide, TradeStatus};
use phasegate_core::prices::PriceBook;
use phasegate_report::{
    decide, evaluate, EvaluationConfig, EvaluationInputs, KpiTargets, KpiVector, VerdictStatus,
};

fn now() -> NaiveDateTime {
    "2026-02-09T12:00:00".parse().unwrap()
}

fn closed_trade(pnl: f64) -> TradeEvent {
    TradeEvent {
        symbol: "NVDA".into(),
        side: TradeSide::Buy,
        shares: 10,
        entry_price: 100.0,
        entry_at: "2026-01-26T10:00:00".parse().unwrap(),
        exit_at: Some("2026-01-30T15:00:00".parse().unwrap()),
        exit_price: Some(100.0 + pnl / 10.0),
        profit_loss: Some(pnl),
        status: TradeStatus::Closed,
    }
}

fn run_at(ts: &str, status: RunStatus) -> RunRecord {
    RunRecord {
        started_at: ts.parse().unwrap(),
        ended_at: None,
        status,
        errors: 0,
    }
}

// ── Scenario: one winning trade ──────────────────────────────────────

#[test]
fn single_winner_yields_full_win_rate() {
    let trades = vec![closed_trade(500.0)];
    let inputs = EvaluationInputs {
        trades: &trades,
        prices: &PriceBook::new(),
        balance_snapshots: &[],
        runs: &[],
    };
    let evaluation = evaluate(&inputs, &EvaluationConfig::default(), now()).unwrap();
    assert_eq!(evaluation.kpis.win_rate, 100.0);
    assert_eq!(evaluation.kpis.wins, 1);
    assert_eq!(evaluation.kpis.losses, 0);
}

// ── Scenario: three of four targets met ──────────────────────────────

#[test]
fn three_of_four_is_conditional_go_with_one_gap() {
    let kpis = KpiVector {
        win_rate: 60.0,
        annual_return: 5.0,
        max_drawdown: 10.0,
        uptime: 99.0,
        total_trades: 10,
        wins: 6,
        losses: 4,
        total_pnl: 500.0,
        actual_return_pct: 0.5,
        days_running: 16,
        days_remaining: 19,
        progress_pct: 45.7,
    };
    let targets = KpiTargets {
        win_rate: 55.0,
        annual_return: 12.0,
        max_drawdown: 15.0,
        uptime: 99.0,
    };
    let verdict = decide(&kpis, &targets);
    assert_eq!(verdict.status, VerdictStatus::ConditionalGo);
    assert_eq!(verdict.passed, 3);
    assert_eq!(verdict.gaps.len(), 1);
    assert!(verdict.gaps[0].starts_with("annual return:"));
}

// ── Scenario: silent pipeline ────────────────────────────────────────

#[test]
fn zero_runs_in_window_is_zero_uptime_not_error() {
    let inputs = EvaluationInputs {
        trades: &[],
        prices: &PriceBook::new(),
        balance_snapshots: &[],
        runs: &[],
    };
    let evaluation = evaluate(&inputs, &EvaluationConfig::default(), now()).unwrap();
    assert_eq!(evaluation.kpis.uptime, 0.0);
}

// ── Idempotence ──────────────────────────────────────────────────────

#[test]
fn identical_inputs_produce_identical_output() {
    let trades = vec![closed_trade(500.0), closed_trade(-200.0)];
    let runs = vec![
        run_at("2026-02-08T06:00:00", RunStatus::Completed),
        run_at("2026-02-07T06:00:00", RunStatus::Failed),
    ];
    let inputs = EvaluationInputs {
        trades: &trades,
        prices: &PriceBook::new(),
        balance_snapshots: &[],
        runs: &runs,
    };
    let config = EvaluationConfig::default();

    let first = evaluate(&inputs, &config, now()).unwrap();
    let second = evaluate(&inputs, &config, now()).unwrap();

    assert_eq!(first, second);
    // Byte-identical once serialized, too.
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ── Verdict monotonicity ─────────────────────────────────────────────

fn arb_kpis() -> impl Strategy<Value = KpiVector> {
    (
        0.0..100.0_f64,
        -50.0..50.0_f64,
        0.0..60.0_f64,
        0.0..100.0_f64,
    )
        .prop_map(|(win_rate, annual_return, max_drawdown, uptime)| KpiVector {
            win_rate,
            annual_return,
            max_drawdown,
            uptime,
            total_trades: 10,
            wins: 5,
            losses: 5,
            total_pnl: 0.0,
            actual_return_pct: 0.0,
            days_running: 16,
            days_remaining: 19,
            progress_pct: 45.7,
        })
}

proptest! {
    /// Improving any single KPI never lowers the passed count or the tier.
    #[test]
    fn improving_one_kpi_never_demotes(kpis in arb_kpis(), bump in 0.1..30.0_f64) {
        let targets = KpiTargets::default();
        let base = decide(&kpis, &targets);

        let improvements = [
            KpiVector { win_rate: kpis.win_rate + bump, ..kpis.clone() },
            KpiVector { annual_return: kpis.annual_return + bump, ..kpis.clone() },
            KpiVector { max_drawdown: (kpis.max_drawdown - bump).max(0.0), ..kpis.clone() },
            KpiVector { uptime: (kpis.uptime + bump).min(100.0), ..kpis.clone() },
        ];
        for improved in improvements {
            let verdict = decide(&improved, &targets);
            prop_assert!(verdict.passed >= base.passed);
            prop_assert!(verdict.status >= base.status);
        }
    }

    /// The gap list always matches the failed-check count.
    #[test]
    fn gap_count_matches_failures(kpis in arb_kpis()) {
        let verdict = decide(&kpis, &KpiTargets::default());
        prop_assert_eq!(verdict.gaps.len(), verdict.total - verdict.passed);
    }
}
