//! Output formatters for step results
//!
//! Provides colored console lines and JSON summaries.

use crate::models::{RunSummary, StepResult, StepStatus, Suite};

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }

    /// Text output prints every step as it happens
    pub fn is_streaming(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a single step line, e.g. `[PASS] Waters Create: Created item ID: 0`
    pub fn format_step(&self, result: &StepResult) -> String {
        let color = match result.status {
            StepStatus::Pass => GREEN,
            StepStatus::Fail => RED,
            StepStatus::Warn => YELLOW,
        };
        let line = format!("[{}] {}: {}", result.status, result.label(), result.message);
        self.paint(color, &line)
    }

    /// Section banner announcing a suite
    pub fn format_section(&self, suite: Suite) -> String {
        let line = format!(
            "[SECTION] {}: {}",
            suite.name().to_uppercase(),
            suite.description()
        );
        self.paint(CYAN, &line)
    }

    /// Format the end-of-run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Text => self.format_summary_text(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        }
    }

    fn format_summary_text(&self, summary: &RunSummary) -> String {
        let mut output = String::new();
        output.push('\n');
        let headline = if summary.is_all_passed() { GREEN } else { YELLOW };
        output.push_str(&self.paint(headline, "All tests completed."));
        output.push_str("\n\n");
        output.push_str(&summary.to_string());

        let attention: Vec<&StepResult> = summary
            .results
            .iter()
            .filter(|r| !r.status.is_success())
            .collect();
        if !attention.is_empty() {
            output.push_str("\n\nNeeds attention:");
            for result in attention {
                output.push_str(&format!(
                    "\n  {} {}: {}",
                    result.status.symbol(),
                    result.label(),
                    result.message
                ));
            }
        }

        output
    }
}
