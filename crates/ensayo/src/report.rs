//! Run reporting: per-scenario outcomes and the aggregated summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::result::EnsayoResult;

/// File name of the JSON run report
pub const REPORT_FILE: &str = "run-report.json";

/// Outcome of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Every step held
    Passed,
    /// A step or setup error ended the scenario
    Failed,
    /// Not run (fail-fast stopped the run earlier)
    Skipped,
}

/// One scenario's report entry
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioEntry {
    /// Scenario title
    pub name: String,
    /// Outcome
    pub status: ScenarioStatus,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Error display, for failed scenarios
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure screenshot, when one was captured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl ScenarioEntry {
    /// Entry for a passed scenario
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration_ms: duration.as_millis() as u64,
            error: None,
            screenshot: None,
        }
    }

    /// Entry for a failed scenario
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
        screenshot: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration_ms: duration.as_millis() as u64,
            error: Some(error.into()),
            screenshot,
        }
    }

    /// Entry for a scenario that never ran
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Skipped,
            duration_ms: 0,
            error: None,
            screenshot: None,
        }
    }
}

/// Accumulated report for one run
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    entries: Vec<ScenarioEntry>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    /// Start an empty report
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Record one scenario outcome
    pub fn record(&mut self, entry: ScenarioEntry) {
        match entry.status {
            ScenarioStatus::Passed => {
                tracing::info!(scenario = %entry.name, duration_ms = entry.duration_ms, "scenario passed");
            }
            ScenarioStatus::Failed => {
                tracing::error!(
                    scenario = %entry.name,
                    error = entry.error.as_deref().unwrap_or(""),
                    "scenario failed"
                );
            }
            ScenarioStatus::Skipped => {
                tracing::warn!(scenario = %entry.name, "scenario skipped");
            }
        }
        self.entries.push(entry);
    }

    /// All recorded entries, in execution order
    #[must_use]
    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// Whether no scenario failed (skips do not fail a run)
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit status for this run
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    /// Human-readable one-block summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} scenarios: {} passed, {} failed, {} skipped\n",
            self.entries.len(),
            self.passed(),
            self.failed(),
            self.skipped()
        );
        for entry in self.entries.iter().filter(|e| e.status == ScenarioStatus::Failed) {
            out.push_str(&format!(
                "  FAILED {} ({}ms): {}\n",
                entry.name,
                entry.duration_ms,
                entry.error.as_deref().unwrap_or("")
            ));
        }
        out
    }

    /// Write the JSON report under `dir`, creating it if needed
    pub fn write_json(&self, dir: &Path) -> EnsayoResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
