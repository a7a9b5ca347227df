//! Step result sink
//!
//! Emits each result as soon as a check produces it and keeps it for the
//! end-of-run summary.

use tracing::{debug, warn};

use crate::models::{StepResult, StepStatus, Suite};
use crate::output::ResultFormatter;

/// Collects step results in emission order
#[derive(Debug, Default)]
pub struct Recorder {
    results: Vec<StepResult>,
    live: Option<ResultFormatter>,
}

impl Recorder {
    /// Recorder that prints each step through `formatter`
    pub fn streaming(formatter: ResultFormatter) -> Self {
        Self {
            results: Vec::new(),
            live: Some(formatter),
        }
    }

    /// Recorder that only collects
    pub fn silent() -> Self {
        Self::default()
    }

    /// Announce the start of a suite
    pub fn section(&self, suite: Suite) {
        match &self.live {
            Some(formatter) => println!("{}", formatter.format_section(suite)),
            None => debug!("{}: {}", suite, suite.description()),
        }
    }

    pub fn record(&mut self, result: StepResult) {
        match &self.live {
            Some(formatter) => println!("{}", formatter.format_step(&result)),
            None if result.status == StepStatus::Pass => debug!("{}", result),
            None => warn!("{}", result),
        }
        self.results.push(result);
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    #[cfg(test)]
    pub fn into_results(self) -> Vec<StepResult> {
        self.results
    }
}
