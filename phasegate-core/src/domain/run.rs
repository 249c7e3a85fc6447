//! RunRecord — pipeline execution telemetry consumed by the uptime KPI.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of one pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
    Interrupted,
    Running,
}

/// One pipeline execution as recorded by the run log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub started_at: NaiveDateTime,
    #[serde(default)]
    pub ended_at: Option<NaiveDateTime>,
    pub status: RunStatus,
    #[serde(default)]
    pub errors: u32,
}

impl RunRecord {
    /// Only `completed` counts toward uptime; `running` is not terminal.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Wall-clock duration in minutes, when the run has ended.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.ended_at
            .map(|end| end.signed_duration_since(self.started_at).num_seconds() as f64 / 60.0)
    }
}
