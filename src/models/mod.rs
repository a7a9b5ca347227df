//! Data models for the health tracker harness
//!
//! This module contains all data structures used throughout the application.

mod outcome;
mod resource;
mod responses;
mod session;
mod step_result;
mod suite;
mod user;

pub use outcome::RequestOutcome;
#[cfg(test)]
pub use resource::ResourceKind;
pub use resource::{CategorySpec, ResourceSpec};
pub use responses::{
    list_ids, mismatched_keys, parse_object, BmiResponse, HealthResponse, Identifier,
    ProfileResponse, RecordResponse, ResponseError, TokenResponse,
};
pub use session::Session;
pub use step_result::{RunSummary, StepResult, StepStatus};
pub use suite::{Step, Suite};
pub use user::{Registration, UserTemplate};
