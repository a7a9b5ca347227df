//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "TRACKER_PROBE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// API root from TRACKER_PROBE_BASE_URL
    pub base_url: Option<String>,
    /// Timeout from TRACKER_PROBE_TIMEOUT
    pub timeout: Option<u64>,
    /// Config file from TRACKER_PROBE_CONFIG
    pub config_file: Option<String>,
    /// Output format from TRACKER_PROBE_FORMAT
    pub format: Option<String>,
    /// User name prefix from TRACKER_PROBE_USER_PREFIX
    pub user_prefix: Option<String>,
    /// User password from TRACKER_PROBE_PASSWORD
    pub password: Option<String>,
    /// TRACKER_PROBE_NO_COLOR
    pub no_color: Option<bool>,
    /// TRACKER_PROBE_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            timeout: get_env_parse("TIMEOUT"),
            config_file: get_env("CONFIG"),
            format: get_env("FORMAT"),
            user_prefix: get_env("USER_PREFIX"),
            password: get_env("PASSWORD"),
            no_color: get_env_bool("NO_COLOR"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout.is_some()
            || self.config_file.is_some()
            || self.format.is_some()
            || self.user_prefix.is_some()
            || self.password.is_some()
            || self.no_color.is_some()
            || self.verbose.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        let password = self.password.as_ref().map(|_| "********");
        println!("Environment Configuration:");
        println!("  {}_BASE_URL:     {:?}", ENV_PREFIX, self.base_url);
        println!("  {}_TIMEOUT:      {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_CONFIG:       {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_FORMAT:       {:?}", ENV_PREFIX, self.format);
        println!("  {}_USER_PREFIX:  {:?}", ENV_PREFIX, self.user_prefix);
        println!("  {}_PASSWORD:     {:?}", ENV_PREFIX, password);
        println!("  {}_NO_COLOR:     {:?}", ENV_PREFIX, self.no_color);
        println!("  {}_VERBOSE:      {:?}", ENV_PREFIX, self.verbose);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    pub fn base_url(self, url: impl Into<String>) -> Self {
        self.var("BASE_URL", url)
    }

    pub fn timeout(self, timeout: u64) -> Self {
        self.var("TIMEOUT", timeout.to_string())
    }

    pub fn user_prefix(self, prefix: impl Into<String>) -> Self {
        self.var("USER_PREFIX", prefix)
    }

    pub fn no_color(self, no_color: bool) -> Self {
        self.var("NO_COLOR", no_color.to_string())
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all TRACKER_PROBE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_BASE_URL      Root URL of the health tracker API");
    println!("  {ENV_PREFIX}_TIMEOUT       Request timeout in seconds");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_FORMAT        Output format (text, json, json-pretty)");
    println!("  {ENV_PREFIX}_USER_PREFIX   Prefix of the generated user name");
    println!("  {ENV_PREFIX}_PASSWORD      Password of the generated user");
    println!("  {ENV_PREFIX}_NO_COLOR      Disable colored output (true/false)");
    println!("  {ENV_PREFIX}_VERBOSE       Enable debug logging (true/false)");
    println!("  RUST_LOG                    Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_BASE_URL=http://10.0.0.100:8080");
    println!("  tracker-probe run --skip categories");
}
