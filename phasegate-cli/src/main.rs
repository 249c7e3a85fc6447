//! Phasegate CLI — run a promotion evaluation over recorded trading data.
//!
//! Commands:
//! - `report` — full evaluation: daily timeline, KPIs, verdict; writes artifacts
//! - `timeline` — reconstruct and export just the daily timeline CSV
//! - `verdict` — print the KPI table and Go/No-Go verdict only
//!
//! Input files live in a data directory:
//! - `trades.csv`    — ledger rows (required)
//! - `prices.csv`    — symbol,date,close rows (optional)
//! - `snapshots.csv` — periodic balance snapshots (optional)
//! - `runs.csv`      — pipeline run telemetry (optional)

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use phasegate_core::domain::{BalanceSnapshot, RunRecord, TradeEvent};
use phasegate_core::prices::{PriceBook, PricePoint, PriceSeries};
use phasegate_core::sources::{
    InMemoryLedger, InMemoryPriceHistory, InMemoryRunLog, InMemorySnapshotStore,
};
use phasegate_report::{
    as_of_bucket, evaluate, normalize_to_capital, write_benchmark_csv, write_report_json,
    write_timeline_csv, Evaluation, EvaluationConfig, GatheredInputs, ResultCache,
};

#[derive(Parser)]
#[command(
    name = "phasegate",
    about = "Phasegate CLI — paper-trading promotion evaluation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full evaluation: timeline, KPIs, verdict; writes CSV and JSON artifacts.
    Report {
        /// Directory containing trades.csv, prices.csv, snapshots.csv, runs.csv.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Path to a TOML evaluation config. Defaults to the built-in window.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluation instant (YYYY-MM-DDTHH:MM:SS). Defaults to now.
        #[arg(long)]
        as_of: Option<String>,

        /// Output directory for timeline.csv and report.json.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Cache directory. When set, identical evaluations within a
        /// five-minute bucket are served from cache.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Benchmark symbol from prices.csv to normalize against starting
        /// capital and export as benchmark.csv (e.g. SPY).
        #[arg(long)]
        benchmark: Option<String>,
    },
    /// Reconstruct the daily timeline and write it as CSV.
    Timeline {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        as_of: Option<String>,

        /// Output CSV path.
        #[arg(long, default_value = "timeline.csv")]
        output: PathBuf,
    },
    /// Print the KPI table and the Go/No-Go verdict.
    Verdict {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        as_of: Option<String>,

        /// Emit the KPI vector and verdict as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            data_dir,
            config,
            as_of,
            output_dir,
            cache_dir,
            benchmark,
        } => run_report(&data_dir, config, as_of, &output_dir, cache_dir, benchmark),
        Commands::Timeline {
            data_dir,
            config,
            as_of,
            output,
        } => run_timeline(&data_dir, config, as_of, &output),
        Commands::Verdict {
            data_dir,
            config,
            as_of,
            json,
        } => run_verdict(&data_dir, config, as_of, json),
    }
}

// ─── Commands ────────────────────────────────────────────────────────

fn run_report(
    data_dir: &Path,
    config_path: Option<PathBuf>,
    as_of: Option<String>,
    output_dir: &Path,
    cache_dir: Option<PathBuf>,
    benchmark: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let now = parse_as_of(as_of.as_deref())?;

    let evaluation = match cache_dir {
        Some(dir) => {
            let cache = ResultCache::new(dir)?;
            let key = config.fingerprint(&as_of_bucket(now, 5));
            match cache.get(&key)? {
                Some(cached) => {
                    println!("(cached result, bucket {})", as_of_bucket(now, 5));
                    cached
                }
                None => {
                    let fresh = run_evaluation(data_dir, &config, now)?;
                    cache.put(&key, &fresh)?;
                    fresh
                }
            }
        }
        None => run_evaluation(data_dir, &config, now)?,
    };

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let timeline_path = output_dir.join("timeline.csv");
    let report_path = output_dir.join("report.json");
    write_timeline_csv(&timeline_path, &evaluation.timeline)?;
    write_report_json(&report_path, &evaluation)?;

    let mut artifacts = vec![timeline_path, report_path];
    if let Some(symbol) = benchmark {
        // The benchmark symbol is usually untraded, so read the full price
        // file rather than the traded-symbol book.
        let book = load_prices(&data_dir.join("prices.csv"))?;
        let curve = book
            .get(&symbol)
            .map(|series| normalize_to_capital(series, config.start_date, config.starting_capital))
            .unwrap_or_default();
        if curve.is_empty() {
            eprintln!("warning: no usable {symbol} prices for a benchmark curve");
        } else {
            let benchmark_path = output_dir.join("benchmark.csv");
            write_benchmark_csv(&benchmark_path, &curve)?;
            artifacts.push(benchmark_path);
        }
    }

    print_summary(&evaluation);
    println!();
    println!("Artifacts:");
    for path in &artifacts {
        println!("  {}", path.display());
    }
    Ok(())
}

fn run_timeline(
    data_dir: &Path,
    config_path: Option<PathBuf>,
    as_of: Option<String>,
    output: &Path,
) -> Result<()> {
    let config = load_config(config_path)?;
    let now = parse_as_of(as_of.as_deref())?;
    let evaluation = run_evaluation(data_dir, &config, now)?;

    write_timeline_csv(output, &evaluation.timeline)?;
    println!(
        "Wrote {} business days to {}",
        evaluation.timeline.len(),
        output.display()
    );
    Ok(())
}

fn run_verdict(
    data_dir: &Path,
    config_path: Option<PathBuf>,
    as_of: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let now = parse_as_of(as_of.as_deref())?;
    let evaluation = run_evaluation(data_dir, &config, now)?;

    if json {
        let payload = serde_json::json!({
            "as_of": evaluation.as_of,
            "kpis": evaluation.kpis.rounded(),
            "drawdown_source": evaluation.drawdown_source,
            "verdict": evaluation.verdict,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_summary(&evaluation);
    }
    Ok(())
}

/// Load files, wrap them in the read-only sources, gather, evaluate.
fn run_evaluation(
    data_dir: &Path,
    config: &EvaluationConfig,
    now: NaiveDateTime,
) -> Result<Evaluation> {
    let ledger = InMemoryLedger::new(load_trades(&data_dir.join("trades.csv"))?);
    let history = InMemoryPriceHistory::new(load_prices(&data_dir.join("prices.csv"))?);
    let store = InMemorySnapshotStore::new(load_snapshots(&data_dir.join("snapshots.csv"))?);
    let run_log = InMemoryRunLog::new(load_runs(&data_dir.join("runs.csv"))?);

    let gathered = GatheredInputs::collect(&ledger, &history, Some(&store), &run_log, config, now);
    let evaluation = evaluate(&gathered.as_inputs(), config, now)?;
    Ok(evaluation)
}

// ─── Input loading ───────────────────────────────────────────────────

/// Ledger rows deserialize straight into `TradeEvent`; empty optional fields
/// become `None`.
fn load_trades(path: &Path) -> Result<Vec<TradeEvent>> {
    if !path.exists() {
        anyhow::bail!("ledger file not found: {}", path.display());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut trades = Vec::new();
    for row in reader.deserialize() {
        let trade: TradeEvent =
            row.with_context(|| format!("Malformed trade row in {}", path.display()))?;
        trades.push(trade);
    }
    Ok(trades)
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    symbol: String,
    date: NaiveDate,
    close: f64,
}

fn load_prices(path: &Path) -> Result<PriceBook> {
    let mut book = PriceBook::new();
    if !path.exists() {
        // Missing price data degrades to entry-price valuation.
        return Ok(book);
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut per_symbol: std::collections::BTreeMap<String, Vec<PricePoint>> = Default::default();
    for row in reader.deserialize() {
        let row: PriceRow =
            row.with_context(|| format!("Malformed price row in {}", path.display()))?;
        per_symbol.entry(row.symbol).or_default().push(PricePoint {
            date: row.date,
            close: row.close,
        });
    }
    for (symbol, points) in per_symbol {
        book.insert(symbol, PriceSeries::new(points));
    }
    Ok(book)
}

fn load_snapshots(path: &Path) -> Result<Vec<BalanceSnapshot>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut snapshots = Vec::new();
    for row in reader.deserialize() {
        let snapshot: BalanceSnapshot =
            row.with_context(|| format!("Malformed snapshot row in {}", path.display()))?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

fn load_runs(path: &Path) -> Result<Vec<RunRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut runs = Vec::new();
    for row in reader.deserialize() {
        let run: RunRecord =
            row.with_context(|| format!("Malformed run row in {}", path.display()))?;
        runs.push(run);
    }
    Ok(runs)
}

// ─── Output ──────────────────────────────────────────────────────────

fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDateTime> {
    match as_of {
        Some(text) => text
            .parse::<NaiveDateTime>()
            .or_else(|_| {
                text.parse::<NaiveDate>()
                    .map(|d| d.and_hms_opt(23, 59, 59).expect("valid time"))
            })
            .with_context(|| format!("Invalid --as-of value: {text}")),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EvaluationConfig> {
    match path {
        Some(path) => EvaluationConfig::from_toml_path(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EvaluationConfig::default()),
    }
}

fn print_summary(evaluation: &Evaluation) {
    let kpis = evaluation.kpis.rounded();
    let targets = &evaluation.config.targets;

    println!(
        "Evaluation as of {} (window {} → {})",
        evaluation.as_of, evaluation.config.start_date, evaluation.config.decision_deadline
    );
    println!(
        "Day {} of the window, {} remaining ({:.1}% elapsed)",
        kpis.days_running, kpis.days_remaining, kpis.progress_pct
    );
    println!();
    println!(
        "  win rate       {:>7.1}%   target >= {:>5.1}%",
        kpis.win_rate, targets.win_rate
    );
    println!(
        "  annual return  {:>7.1}%   target >= {:>5.1}%",
        kpis.annual_return, targets.annual_return
    );
    println!(
        "  max drawdown   {:>7.1}%   target <= {:>5.1}%   ({:?})",
        kpis.max_drawdown, targets.max_drawdown, evaluation.drawdown_source
    );
    println!(
        "  uptime         {:>7.1}%   target >= {:>5.1}%",
        kpis.uptime, targets.uptime
    );
    println!();
    println!(
        "  trades: {} closed ({} wins / {} losses), P&L ${:.2}",
        kpis.total_trades, kpis.wins, kpis.losses, kpis.total_pnl
    );
    if !evaluation.open_positions.is_empty() {
        println!("  open positions:");
        for position in &evaluation.open_positions {
            println!(
                "    {} {} @ ${:.2} (mark ${:.2}, unrealized ${:.2})",
                position.symbol,
                position.shares,
                position.avg_entry_price,
                position.mark_price,
                position.unrealized_pnl
            );
        }
    }
    println!(
        "  pipeline: {}/{} runs completed, {} errors",
        evaluation.run_health.completed,
        evaluation.run_health.total_runs,
        evaluation.run_health.total_errors
    );
    println!();
    println!(
        "Verdict: {} ({}/{} KPIs passed)",
        evaluation.verdict.status.as_str(),
        evaluation.verdict.passed,
        evaluation.verdict.total
    );
    for gap in &evaluation.verdict.gaps {
        println!("  - {gap}");
    }
}
