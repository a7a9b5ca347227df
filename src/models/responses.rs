//! Expected response shapes for the health tracker API
//!
//! Every endpoint the harness checks gets an explicit shape here. Parsing a
//! body that does not fit its shape yields `ResponseError::Malformed`, which
//! is reported separately from a well-formed body that lacks a field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

use super::outcome::RequestOutcome;

/// Why a response could not be used by a step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    #[error("response carried no body")]
    EmptyBody,

    #[error("malformed response: expected {expected} ({reason})")]
    Malformed {
        expected: &'static str,
        reason: String,
    },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

impl ResponseError {
    fn rejected(outcome: &RequestOutcome) -> Self {
        let message = match outcome.status() {
            Some(status) => format!("HTTP {status}: {}", outcome.error_message()),
            None => outcome.error_message(),
        };
        ResponseError::Rejected {
            status: outcome.status(),
            message,
        }
    }

    fn malformed(expected: &'static str, reason: impl Into<String>) -> Self {
        ResponseError::Malformed {
            expected,
            reason: reason.into(),
        }
    }
}

/// Record identifier as issued by the backend
///
/// The backend hands out string ids (`"0"`, `"Mindfulness"`), but numeric ids
/// are accepted as well, whatever their JSON number representation. Equality
/// is strict: `1` and `"1"` differ, and so do `1` and `1.0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    Text(String),
}

impl Identifier {
    /// Zero and the empty string count as "no identifier"
    pub fn is_present(&self) -> bool {
        match self {
            Identifier::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Identifier::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n.into())
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Text(s.to_string())
    }
}

/// `POST /register` and `POST /login`
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// `GET /user/profile`
///
/// Only the fields the profile step reads; the rest of the body is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /user/bmi`
#[derive(Clone, Debug, Deserialize)]
pub struct BmiResponse {
    #[serde(default)]
    pub bmi: Option<f64>,
}

/// `GET /health`
#[derive(Clone, Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Any record the backend returns after a create or an update
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl RecordResponse {
    /// The record's identifier, if it is present and truthy
    pub fn identifier(&self) -> Result<Identifier, ResponseError> {
        self.id
            .clone()
            .filter(Identifier::is_present)
            .ok_or(ResponseError::MissingField("id"))
    }
}

/// Success body of an outcome, or the reason there is none
pub fn success_body(outcome: &RequestOutcome) -> Result<&Value, ResponseError> {
    match outcome {
        RequestOutcome::Err { .. } => Err(ResponseError::rejected(outcome)),
        RequestOutcome::Ok { body: None, .. } => Err(ResponseError::EmptyBody),
        RequestOutcome::Ok {
            body: Some(body), ..
        } => Ok(body),
    }
}

/// Parse the success body of an outcome into an object shape
pub fn parse_object<T: DeserializeOwned>(
    outcome: &RequestOutcome,
    expected: &'static str,
) -> Result<T, ResponseError> {
    let body = success_body(outcome)?;
    if !body.is_object() {
        return Err(ResponseError::malformed(expected, kind_of(body)));
    }
    serde_json::from_value(body.clone()).map_err(|e| ResponseError::malformed(expected, e.to_string()))
}

/// Identifiers of every element in a list response
///
/// Elements without a usable `id` are skipped rather than rejected; only a
/// body that is not a list at all is malformed.
pub fn list_ids(outcome: &RequestOutcome) -> Result<Vec<Identifier>, ResponseError> {
    let body = success_body(outcome)?;
    let items = body
        .as_array()
        .ok_or_else(|| ResponseError::malformed("a list of records", kind_of(body)))?;

    Ok(items
        .iter()
        .filter_map(|item| item.get("id"))
        .filter_map(|id| Identifier::deserialize(id).ok())
        .collect())
}

/// Keys of `expected` whose values the response body does not echo
///
/// A missing or non-object body mismatches every key.
pub fn mismatched_keys(body: Option<&Value>, expected: &Map<String, Value>) -> Vec<String> {
    let actual = body.and_then(Value::as_object);
    expected
        .iter()
        .filter(|(key, value)| {
            !actual
                .and_then(|map| map.get(key.as_str()))
                .is_some_and(|found| json_eq(found, value))
        })
        .map(|(key, _)| key.clone())
        .collect()
}

/// Structural equality that compares numbers by value
///
/// `serde_json` keeps integers and floats apart, so `8` and `8.0` would
/// otherwise differ.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
