// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run report and its human-readable rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{exit, SmokeError};

/// Steps in the order a full run executes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Nodes,
    Namespace,
    ConfigMap,
    ImportImage,
    WindowsWorkload,
    LinuxWorkload,
    Cleanup,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nodes => "nodes",
            Self::Namespace => "namespace",
            Self::ConfigMap => "configmap",
            Self::ImportImage => "import-image",
            Self::WindowsWorkload => "windows-workload",
            Self::LinuxWorkload => "linux-workload",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub detail: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub namespace: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepReport>,
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<SmokeError>,
}

impl RunReport {
    pub fn new(run_id: &str, namespace: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            namespace: namespace.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
            error: None,
            failure: None,
        }
    }

    pub fn record(&mut self, step: Step, status: StepStatus, detail: String, elapsed_ms: u64) {
        self.steps.push(StepReport {
            step,
            status,
            detail,
            elapsed_ms,
        });
    }

    pub fn fail(&mut self, err: SmokeError) {
        self.error = Some(err.to_string());
        self.failure = Some(err);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn exit_code(&self) -> u8 {
        self.failure
            .as_ref()
            .map(SmokeError::exit_code)
            .unwrap_or(exit::SUCCESS)
    }

    pub fn status_of(&self, step: Step) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.status)
    }
}

/// Print the report in human-readable format.
pub fn print_report_human(report: &RunReport) {
    let verdict = if report.success() { "PASSED" } else { "FAILED" };

    println!("====================================================");
    println!("  hybrid-smoke {}                  v{}", verdict, env!("CARGO_PKG_VERSION"));
    println!("====================================================");
    println!("  Run:       {}", report.run_id);
    println!("  Namespace: {}", report.namespace);
    println!("====================================================");
    println!("  Step               | Status  | Time     | Detail");
    println!("  -------------------+---------+----------+---------------");
    for s in &report.steps {
        println!(
            "  {:18} | {:7} | {:>8} | {}",
            s.step.to_string(),
            s.status.to_string(),
            format_elapsed(s.elapsed_ms),
            truncate(&s.detail, 60)
        );
    }
    if let Some(ref err) = report.error {
        println!("\nError: {}", err);
    }
}

/// Format milliseconds as `850ms`, `12.3s` or `4m 05s`.
pub fn format_elapsed(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let secs = ms / 1000;
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
