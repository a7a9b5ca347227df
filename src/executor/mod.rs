//! Test execution engine
//!
//! Runs the suites in order and collects their step results.

mod recorder;
mod runner;

pub use crate::checks::FatalError;
pub use recorder::Recorder;
pub use runner::SuiteRunner;
