//! Configuration module
//!
//! Settings are layered: built-in defaults, then a config file, then
//! `TRACKER_PROBE_*` environment variables. CLI flags are applied last by the
//! caller.

pub mod env;
pub mod file;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{Suite, UserTemplate};
use crate::output::OutputFormat;

pub use env::EnvConfig;
pub use file::ConfigFile;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the API under test, e.g. `http://localhost:8080`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Probe `GET /health` before authenticating
    pub health_check: bool,

    /// ANSI colors in text output
    pub colorize: bool,

    /// Output format (text, json, json-pretty)
    pub format: String,

    /// Suites to leave out of the run
    pub skip: Vec<String>,

    /// Throwaway user registered by each run
    pub user: UserTemplate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            health_check: true,
            colorize: true,
            format: "text".to_string(),
            skip: Vec::new(),
            user: UserTemplate::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with the config file and the environment
    ///
    /// `explicit` wins over `TRACKER_PROBE_CONFIG`, which wins over the
    /// standard search locations. Returns the file that was used, if any.
    pub fn load_layered(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let env = EnvConfig::load();
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_ref().map(PathBuf::from))
            .or_else(ConfigFile::find);

        let mut config = match &path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                ConfigFile::load(path)?.app
            }
            None => Self::default(),
        };
        config.apply_env(&env);
        Ok((config, path))
    }

    /// Overlay every variable that is set
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(base_url) = &env.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(prefix) = &env.user_prefix {
            self.user.name_prefix = prefix.clone();
        }
        if let Some(password) = &env.password {
            self.user.password = password.clone();
        }
        if env.no_color == Some(true) {
            self.colorize = false;
        }
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https://: {}", base_url);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.user.name_prefix.is_empty() {
            anyhow::bail!("user.name_prefix must not be empty");
        }
        self.output_format()?;
        self.skipped_suites()?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format).with_context(|| {
            format!(
                "Unknown output format '{}'. Use text, json or json-pretty",
                self.format
            )
        })
    }

    /// Parse the skip list; authentication is never skippable
    pub fn skipped_suites(&self) -> Result<Vec<Suite>> {
        let mut suites = Vec::new();
        for name in &self.skip {
            let suite = Suite::from_str(name)
                .with_context(|| format!("Unknown suite '{name}'"))?;
            if !suite.is_skippable() {
                anyhow::bail!("The {} suite cannot be skipped", suite);
            }
            if !suites.contains(&suite) {
                suites.push(suite);
            }
        }
        Ok(suites)
    }

    /// Whether `suite` takes part in the run
    pub fn runs(&self, suite: Suite) -> Result<bool> {
        if suite == Suite::Health && !self.health_check {
            return Ok(false);
        }
        Ok(!self.skipped_suites()?.contains(&suite))
    }
}
