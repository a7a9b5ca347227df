//! Health tracker API checks
//!
//! Each submodule drives one group of endpoints and records a `StepResult`
//! per assertion.
//!
//! ## Suites
//!
//! - Health preflight (`GET /health`)
//! - Authentication: register, login
//! - Profile: profile, BMI
//! - Waters, Sleeps, Activities: the generic create/read/update/delete protocol
//! - Categories: the category -> item protocol
//!
//! Only transport failures and a registration without a token stop a run.
//! Every other problem is recorded and the run moves on.

mod auth;
mod category;
mod health;
mod profile;
mod resource;

pub use auth::authenticate;
pub use category::verify_category;
pub use health::check_health;
pub use profile::check_profile;
pub use resource::verify_resource;

use thiserror::Error;

use crate::http::TransportError;
use crate::models::{
    list_ids, parse_object, Identifier, RecordResponse, RequestOutcome, ResponseError,
};

/// Conditions that end a run early
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("Server unreachable: {0}")]
    Unreachable(#[from] TransportError),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

/// Identifier of the record a create call returned
fn created_id(outcome: &RequestOutcome) -> Result<Identifier, ResponseError> {
    parse_object::<RecordResponse>(outcome, "a created record")?.identifier()
}

/// Whether a list response contains `id`
fn contains_id(outcome: &RequestOutcome, id: &Identifier) -> Result<bool, ResponseError> {
    Ok(list_ids(outcome)?.iter().any(|candidate| candidate == id))
}
