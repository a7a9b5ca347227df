//! Test user definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Template for the throwaway user registered by each run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTemplate {
    /// Names are `<prefix>_<unix millis>`
    pub name_prefix: String,
    pub password: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_m: f64,
    pub gender: String,
}

impl Default for UserTemplate {
    fn default() -> Self {
        Self {
            name_prefix: "user".to_string(),
            password: "securePassword123".to_string(),
            age: 30,
            weight_kg: 75.0,
            height_m: 1.8,
            gender: "male".to_string(),
        }
    }
}

impl UserTemplate {
    /// Concrete registration for a run started at `at`
    pub fn registration(&self, at: DateTime<Utc>) -> Registration {
        Registration {
            name: format!("{}_{}", self.name_prefix, at.timestamp_millis()),
            password: self.password.clone(),
            age: self.age,
            weight_kg: self.weight_kg,
            height_m: self.height_m,
            gender: self.gender.clone(),
        }
    }
}

/// A concrete user to register
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub name: String,
    pub password: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_m: f64,
    pub gender: String,
}

impl Registration {
    /// `POST /register` body
    pub fn payload(&self) -> Value {
        json!({
            "name": self.name,
            "password": self.password,
            "age": self.age,
            "weightKg": self.weight_kg,
            "heightM": self.height_m,
            "gender": self.gender,
        })
    }

    /// `POST /login` body for the same user
    pub fn login_payload(&self) -> Value {
        json!({"name": self.name, "password": self.password})
    }
}
