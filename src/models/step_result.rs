//! Step result models
//!
//! Defines step statuses, per-step results and the end-of-run summary.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::suite::Step;

/// Assertion status of a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pass,
    Fail,
    /// The server accepted the call but echoed something else
    Warn,
}

impl StepStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            StepStatus::Pass => "✓",
            StepStatus::Fail => "✗",
            StepStatus::Warn => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Pass)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pass => write!(f, "PASS"),
            StepStatus::Fail => write!(f, "FAIL"),
            StepStatus::Warn => write!(f, "WARN"),
        }
    }
}

/// Result of a single step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepResult {
    /// Suite or resource display name, e.g. `Waters`
    pub scope: String,
    pub step: Step,
    pub status: StepStatus,
    pub message: String,
    /// Duration of the call that decided the step
    pub duration_ms: u64,
}

impl StepResult {
    pub fn new(
        scope: impl Into<String>,
        step: Step,
        status: StepStatus,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            step,
            status,
            message: message.into(),
            duration_ms,
        }
    }

    pub fn pass(
        scope: impl Into<String>,
        step: Step,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::new(scope, step, StepStatus::Pass, duration_ms, message)
    }

    pub fn fail(
        scope: impl Into<String>,
        step: Step,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::new(scope, step, StepStatus::Fail, duration_ms, message)
    }

    pub fn warn(
        scope: impl Into<String>,
        step: Step,
        duration_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::new(scope, step, StepStatus::Warn, duration_ms, message)
    }

    /// Label shown in front of the message, e.g. `Waters Create`
    pub fn label(&self) -> String {
        if self.step.is_resource_step() {
            format!("{} {}", self.scope, self.step)
        } else {
            self.step.name().to_string()
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} [{}ms]",
            self.status,
            self.label(),
            self.message,
            self.duration_ms
        )
    }
}

/// Summary of a completed run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub total_duration_ms: u64,
    pub results: Vec<StepResult>,
}

impl RunSummary {
    pub fn new(base_url: impl Into<String>, results: Vec<StepResult>, total_duration_ms: u64) -> Self {
        let count = |status: StepStatus| results.iter().filter(|r| r.status == status).count();
        let passed = count(StepStatus::Pass);
        let failed = count(StepStatus::Fail);
        let warned = count(StepStatus::Warn);

        Self {
            base_url: base_url.into(),
            total: results.len(),
            passed,
            failed,
            warned,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Results of one scope, in emission order
    #[cfg(test)]
    pub fn scope_results(&self, scope: &str) -> Vec<&StepResult> {
        self.results.iter().filter(|r| r.scope == scope).collect()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run against {}", self.base_url)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Warn: {}",
            self.total, self.passed, self.failed, self.warned
        )?;
        write!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
