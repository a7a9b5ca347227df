//! Suites and steps of a harness run

use serde::{Deserialize, Serialize};
use std::fmt;

use super::resource::ResourceKind;

/// A group of steps announced under one section header
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    Health,
    Auth,
    Profile,
    Waters,
    Sleeps,
    Activities,
    Categories,
}

impl Suite {
    /// All suites in execution order
    pub fn all() -> Vec<Suite> {
        vec![
            Suite::Health,
            Suite::Auth,
            Suite::Profile,
            Suite::Waters,
            Suite::Sleeps,
            Suite::Activities,
            Suite::Categories,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Health => "Health",
            Suite::Auth => "Auth",
            Suite::Profile => "Profile",
            Suite::Waters => "Waters",
            Suite::Sleeps => "Sleeps",
            Suite::Activities => "Activities",
            Suite::Categories => "Categories",
        }
    }

    /// Section banner text
    pub fn description(&self) -> String {
        match self {
            Suite::Health => "Checking server health...".to_string(),
            Suite::Auth => "Starting Authentication Tests...".to_string(),
            Suite::Profile => "Testing Profile Endpoints...".to_string(),
            Suite::Waters | Suite::Sleeps | Suite::Activities => {
                format!("Testing {} CRUD...", self.name())
            }
            Suite::Categories => "Testing Custom Categories & Items...".to_string(),
        }
    }

    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Suite::Waters => Some(ResourceKind::Water),
            Suite::Sleeps => Some(ResourceKind::Sleep),
            Suite::Activities => Some(ResourceKind::Activity),
            _ => None,
        }
    }

    /// Steps the suite can emit, in order
    pub fn steps(&self) -> Vec<Step> {
        match self {
            Suite::Health => vec![Step::HealthCheck],
            Suite::Auth => vec![Step::Register, Step::Login],
            Suite::Profile => vec![Step::Profile, Step::Bmi],
            Suite::Waters | Suite::Sleeps | Suite::Activities => {
                vec![Step::Create, Step::Read, Step::Update, Step::Delete]
            }
            Suite::Categories => vec![
                Step::CategoryCreate,
                Step::CategoryList,
                Step::ItemAdd,
                Step::ItemList,
                Step::ItemUpdate,
                Step::ItemDelete,
            ],
        }
    }

    /// Authentication gates every other suite and cannot be skipped
    pub fn is_skippable(&self) -> bool {
        !matches!(self, Suite::Auth)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "health" => Some(Suite::Health),
            "auth" => Some(Suite::Auth),
            "profile" => Some(Suite::Profile),
            "waters" | "water" => Some(Suite::Waters),
            "sleeps" | "sleep" => Some(Suite::Sleeps),
            "activities" | "activity" => Some(Suite::Activities),
            "categories" | "category" => Some(Suite::Categories),
            _ => None,
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One assertion-bearing stage of a suite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    HealthCheck,
    Register,
    Login,
    Profile,
    Bmi,

    // Generic resource protocol
    Create,
    Read,
    Update,
    Delete,

    // Category -> item protocol
    CategoryCreate,
    CategoryList,
    ItemAdd,
    ItemList,
    ItemUpdate,
    ItemDelete,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::HealthCheck => "Health",
            Step::Register => "Register",
            Step::Login => "Login",
            Step::Profile => "Profile",
            Step::Bmi => "BMI",
            Step::Create => "Create",
            Step::Read => "Read",
            Step::Update => "Update",
            Step::Delete => "Delete",
            Step::CategoryCreate => "Category Create",
            Step::CategoryList => "Category List",
            Step::ItemAdd => "Category Item Add",
            Step::ItemList => "Category Item List",
            Step::ItemUpdate => "Category Item Update",
            Step::ItemDelete => "Category Item Delete",
        }
    }

    /// Steps whose label is prefixed by the resource name
    pub fn is_resource_step(&self) -> bool {
        matches!(self, Step::Create | Step::Read | Step::Update | Step::Delete)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
