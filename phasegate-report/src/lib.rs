//! Phasegate Report — promotion evaluation on top of `phasegate-core`.
//!
//! This crate turns a reconstructed portfolio history into a decision:
//! - Max drawdown from balance snapshots or a ledger estimate
//! - KPI aggregation (win rate, annualized return, rolling uptime)
//! - Go/No-Go verdict against fixed targets, with gap descriptions
//! - Evaluation config (TOML), result cache, and artifact export

pub mod benchmark;
pub mod cache;
pub mod config;
pub mod drawdown;
pub mod export;
pub mod kpi;
pub mod report;
pub mod verdict;

pub use benchmark::{normalize_to_capital, BenchmarkPoint};
pub use cache::ResultCache;
pub use config::{as_of_bucket, ConfigError, EvaluationConfig};
pub use drawdown::{max_drawdown, Drawdown, DrawdownSource};
pub use export::{write_benchmark_csv, write_report_json, write_timeline_csv};
pub use kpi::{rolling_uptime, KpiVector, RunHealth, TradeSummary};
pub use report::{evaluate, Evaluation, EvaluationInputs, GatheredInputs};
pub use verdict::{decide, KpiTargets, Verdict, VerdictStatus};
