//! Classified result of one completed HTTP exchange

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Outcome of a completed request
///
/// `Ok` covers statuses in [200, 300). Everything else is `Err` and carries
/// whatever error payload the server produced. Transport failures never reach
/// this type; they surface as `TransportError`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RequestOutcome {
    Ok {
        status: u16,
        duration_ms: u64,
        body: Option<Value>,
    },
    Err {
        status: Option<u16>,
        duration_ms: u64,
        error: Value,
    },
}

impl RequestOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, RequestOutcome::Ok { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Ok { status, .. } => Some(*status),
            RequestOutcome::Err { status, .. } => *status,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            RequestOutcome::Ok { duration_ms, .. } | RequestOutcome::Err { duration_ms, .. } => {
                *duration_ms
            }
        }
    }

    /// Parsed success body, `None` for errors and empty responses
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestOutcome::Ok { body, .. } => body.as_ref(),
            RequestOutcome::Err { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&Value> {
        match self {
            RequestOutcome::Ok { .. } => None,
            RequestOutcome::Err { error, .. } => Some(error),
        }
    }

    /// Human-readable description of the error payload
    pub fn error_message(&self) -> String {
        match self.error() {
            Some(error) => describe_error(error),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOutcome::Ok {
                status,
                duration_ms,
                ..
            } => write!(f, "ok ({status}) in {duration_ms}ms"),
            RequestOutcome::Err {
                status,
                duration_ms,
                error,
            } => {
                match status {
                    Some(code) => write!(f, "error ({code})")?,
                    None => write!(f, "error")?,
                }
                write!(f, " in {duration_ms}ms: {}", describe_error(error))
            }
        }
    }
}

/// Render an error payload, preferring the backend's `errorMessage` envelope
pub fn describe_error(error: &Value) -> String {
    match error {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("errorMessage").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        },
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}
