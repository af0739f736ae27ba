//! Report output model for headless scenario runs.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    /// Virtual time elapsed when the run ended
    pub elapsed_ms: u64,
    /// Effect tasks executed during the run
    pub tasks_run: u64,
}

impl HeadlessReport {
    pub fn passed(elapsed_ms: u64, tasks_run: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_ms,
            tasks_run,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        elapsed_ms: u64,
        tasks_run: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            elapsed_ms,
            tasks_run,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report_json() {
        let report =
            HeadlessReport::failed("assert_text", 3, ".counter: mismatch".to_string(), 2000, 120);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["failed_step_index"], 3);
        assert_eq!(json["assertion"], "assert_text");
        assert_eq!(json["elapsed_ms"], 2000);
    }
}
