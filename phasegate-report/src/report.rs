//! Evaluation pipeline — wires together ledger normalization, timeline
//! reconstruction, drawdown, KPIs, and the verdict.
//!
//! `evaluate()` is the single entry point callers use. It is a pure function
//! of its inputs plus the `now` instant; running it twice with identical
//! arguments produces identical output.

use chrono::{Days, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use phasegate_core::domain::{BalanceSnapshot, DailySnapshot, RunRecord, TradeEvent};
use phasegate_core::error::InputError;
use phasegate_core::ledger::NormalizedLedger;
use phasegate_core::prices::{PriceBook, PriceSeries};
use phasegate_core::sources::{PriceHistory, RunLog, SnapshotStore, TradeLedger};
use phasegate_core::timeline::{open_positions, reconstruct, OpenPosition};

use crate::config::EvaluationConfig;
use crate::drawdown::{self, DrawdownSource};
use crate::kpi::{KpiVector, RunHealth, TradeSummary};
use crate::verdict::{decide, Verdict};

/// Borrowed, already-resolved inputs for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInputs<'a> {
    pub trades: &'a [TradeEvent],
    pub prices: &'a PriceBook,
    pub balance_snapshots: &'a [BalanceSnapshot],
    pub runs: &'a [RunRecord],
}

/// The complete output contract: daily timeline, KPI vector, verdict, and
/// supporting summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub config: EvaluationConfig,
    pub as_of: NaiveDateTime,
    pub timeline: Vec<DailySnapshot>,
    pub open_positions: Vec<OpenPosition>,
    pub kpis: KpiVector,
    pub drawdown_source: DrawdownSource,
    pub trade_summary: TradeSummary,
    pub run_health: RunHealth,
    pub verdict: Verdict,
}

/// Run the full evaluation.
///
/// Only structurally invalid configuration errors out; every business-data
/// gap (no trades, no prices, no snapshots, no runs) degrades to empty
/// sequences, fallback valuations, or zeros.
pub fn evaluate(
    inputs: &EvaluationInputs<'_>,
    config: &EvaluationConfig,
    now: NaiveDateTime,
) -> Result<Evaluation, InputError> {
    config.validate(now.date())?;

    let ledger = NormalizedLedger::from_trades(inputs.trades, config.start_date);
    let timeline = reconstruct(&ledger, inputs.prices, config.starting_capital, now.date())?;

    let dd = drawdown::max_drawdown(inputs.balance_snapshots, inputs.trades);
    let kpis = KpiVector::compute(inputs.trades, inputs.runs, dd.pct, config, now);
    let verdict = decide(&kpis, &config.targets);

    Ok(Evaluation {
        config: config.clone(),
        as_of: now,
        open_positions: open_positions(inputs.trades, inputs.prices, now.date()),
        timeline,
        kpis,
        drawdown_source: dd.source,
        trade_summary: TradeSummary::compute(inputs.trades),
        run_health: RunHealth::compute(inputs.runs),
        verdict,
    })
}

/// Owned inputs pulled through the read-only source traits.
///
/// Acquisition happens here, before the pure pipeline runs: trades from the
/// window start, prices for every traded symbol padded a few days back so
/// the first day has a resolvable close, snapshots from the window start,
/// and runs from the trailing uptime window.
#[derive(Debug, Clone, Default)]
pub struct GatheredInputs {
    pub trades: Vec<TradeEvent>,
    pub prices: PriceBook,
    pub balance_snapshots: Vec<BalanceSnapshot>,
    pub runs: Vec<RunRecord>,
}

/// Days of price history fetched before the window start.
const PRICE_PAD_DAYS: u64 = 5;

impl GatheredInputs {
    pub fn collect(
        ledger: &dyn TradeLedger,
        history: &dyn PriceHistory,
        snapshots: Option<&dyn SnapshotStore>,
        run_log: &dyn RunLog,
        config: &EvaluationConfig,
        now: NaiveDateTime,
    ) -> Self {
        let trades = ledger.list_trades(config.start_date);

        let mut prices = PriceBook::new();
        let from = config
            .start_date
            .checked_sub_days(Days::new(PRICE_PAD_DAYS))
            .unwrap_or(config.start_date);
        let mut symbols: Vec<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        for symbol in symbols {
            let series: PriceSeries = history.price_series(symbol, from, now.date());
            if !series.is_empty() {
                prices.insert(symbol, series);
            }
        }

        let balance_snapshots = snapshots
            .map(|store| store.list_balance_snapshots(config.start_date))
            .unwrap_or_default();

        let window_start = now - Duration::days(config.uptime_window_days);
        let runs = run_log.list_runs(window_start, now);

        Self {
            trades,
            prices,
            balance_snapshots,
            runs,
        }
    }

    pub fn as_inputs(&self) -> EvaluationInputs<'_> {
        EvaluationInputs {
            trades: &self.trades,
            prices: &self.prices,
            balance_snapshots: &self.balance_snapshots,
            runs: &self.runs,
        }
    }
}
