//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Integration test harness for the health tracker API
#[derive(Parser, Debug)]
#[command(name = "tracker-probe")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Run end-to-end checks against a health tracker API")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the suites against a live server
    Run(RunArgs),

    /// List suites and their steps
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Root URL of the API (default http://localhost:8080)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format (text, json, json-pretty)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Suites to skip (comma-separated, e.g. health,categories)
    #[arg(short, long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Prefix of the generated user name
    #[arg(long)]
    pub user_prefix: Option<String>,

    /// Password of the generated user
    #[arg(long)]
    pub password: Option<String>,
}

impl RunArgs {
    /// Overlay the flags that were given on top of `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if !self.skip.is_empty() {
            config.skip = self.skip.clone();
        }
        if self.no_color {
            config.colorize = false;
        }
        if let Some(prefix) = &self.user_prefix {
            config.user.name_prefix = prefix.clone();
        }
        if let Some(password) = &self.password {
            config.user.password = password.clone();
        }
    }
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show endpoints and steps for each suite
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path (default ./tracker-probe.yaml)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Configuration file to start from
        #[arg(short, long)]
        config: Option<String>,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// List supported environment variables and their current values
    Env,
}
