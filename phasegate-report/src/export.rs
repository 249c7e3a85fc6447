//! Artifact export: timeline CSV and the full evaluation report as JSON.
//!
//! Snapshot rows are written at cent precision; KPI percentages are written
//! from the presentation (one-decimal) copy of the vector.

use anyhow::{Context, Result};
use std::path::Path;

use phasegate_core::domain::DailySnapshot;

use crate::report::Evaluation;

/// Write the daily timeline as CSV:
/// `date,cash,equity,total,change,change_pct,events`.
pub fn write_timeline_csv(path: &Path, timeline: &[DailySnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create timeline CSV {}", path.display()))?;
    writer
        .write_record(["date", "cash", "equity", "total", "change", "change_pct", "events"])
        .context("Failed to write timeline CSV header")?;
    for snapshot in timeline {
        writer
            .write_record([
                snapshot.date.to_string(),
                format!("{:.2}", snapshot.cash),
                format!("{:.2}", snapshot.equity),
                format!("{:.2}", snapshot.total),
                format!("{:.2}", snapshot.change),
                format!("{:.2}", snapshot.change_pct),
                snapshot.events_line(),
            ])
            .context("Failed to write timeline CSV row")?;
    }
    writer.flush().context("Failed to flush timeline CSV")?;
    Ok(())
}

/// Write a normalized benchmark curve as CSV: `date,value`.
pub fn write_benchmark_csv(path: &Path, curve: &[crate::benchmark::BenchmarkPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create benchmark CSV {}", path.display()))?;
    writer
        .write_record(["date", "value"])
        .context("Failed to write benchmark CSV header")?;
    for point in curve {
        writer
            .write_record([point.date.to_string(), format!("{:.2}", point.value)])
            .context("Failed to write benchmark CSV row")?;
    }
    writer.flush().context("Failed to flush benchmark CSV")?;
    Ok(())
}

/// Write the full evaluation as pretty JSON, with the KPI vector replaced by
/// its presentation copy.
pub fn write_report_json(path: &Path, evaluation: &Evaluation) -> Result<()> {
    let mut presented = evaluation.clone();
    presented.kpis = evaluation.kpis.rounded();
    let json = serde_json::to_string_pretty(&presented).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report JSON {}", path.display()))?;
    Ok(())
}
