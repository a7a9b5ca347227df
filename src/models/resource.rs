//! Resource definitions driven through the verification protocol

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Parameterization of the create/read/update/delete protocol
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceSpec {
    /// Display name used in step labels
    pub name: String,
    /// Collection path, e.g. `/waters`
    pub base_path: String,
    pub create_payload: Value,
    /// Fields sent with the update; each one must be echoed back
    pub update_payload: Map<String, Value>,
}

impl ResourceSpec {
    pub fn new(
        name: impl Into<String>,
        base_path: impl Into<String>,
        create_payload: Value,
        update_payload: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            create_payload,
            update_payload,
        }
    }

    /// Path of a single record
    pub fn record_path(&self, id: impl fmt::Display) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), id)
    }
}

/// The built-in CRUD resources of the health tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Water,
    Sleep,
    Activity,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Water => "Waters",
            ResourceKind::Sleep => "Sleeps",
            ResourceKind::Activity => "Activities",
        }
    }

    pub fn base_path(&self) -> &'static str {
        match self {
            ResourceKind::Water => "/waters",
            ResourceKind::Sleep => "/sleeps",
            ResourceKind::Activity => "/activities",
        }
    }

    /// Build the protocol parameters with `recorded_at` as the record datetime
    pub fn spec(&self, recorded_at: DateTime<Utc>) -> ResourceSpec {
        let datetime = iso_timestamp(recorded_at);
        let (create, update) = match self {
            ResourceKind::Water => (
                json!({"datetime": datetime, "amountMl": 500}),
                fields([("amountMl", json!(750))]),
            ),
            ResourceKind::Sleep => (
                json!({"datetime": datetime, "hours": 6.5}),
                fields([("hours", json!(8.0))]),
            ),
            ResourceKind::Activity => (
                json!({"datetime": datetime, "minutes": 30, "intensity": "moderate"}),
                fields([("minutes", json!(45)), ("intensity", json!("high"))]),
            ),
        };
        ResourceSpec::new(self.name(), self.base_path(), create, update)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters of the category -> item protocol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySpec {
    pub category_name: String,
    pub item_note: String,
    pub updated_note: String,
    pub recorded_at: String,
}

impl CategorySpec {
    pub fn new(recorded_at: DateTime<Utc>) -> Self {
        Self {
            category_name: "Mindfulness".to_string(),
            item_note: "Morning Meditation".to_string(),
            updated_note: "Evening Meditation".to_string(),
            recorded_at: iso_timestamp(recorded_at),
        }
    }

    pub fn create_payload(&self) -> Value {
        json!({"categoryName": self.category_name})
    }

    pub fn item_payload(&self) -> Value {
        json!({"datetime": self.recorded_at, "note": self.item_note})
    }

    pub fn update_payload(&self) -> Value {
        json!({"note": self.updated_note})
    }
}

/// RFC 3339 UTC timestamp with millisecond precision
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
