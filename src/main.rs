//! tracker-probe - integration test harness for a health tracker API
//!
//! Registers a throwaway user against a running server and walks every
//! endpoint group through its expected lifecycle, printing one PASS, FAIL or
//! WARN line per step.
//!
//! ## Suites
//!
//! - Health preflight
//! - Authentication (register, login)
//! - Profile and BMI
//! - Waters, Sleeps, Activities (create, read, update, delete)
//! - Custom categories and their items
//!
//! ## Usage
//!
//! ```bash
//! # Run everything against a local server
//! tracker-probe run
//!
//! # Point at another server and skip a suite
//! tracker-probe run --base-url http://10.0.0.1:8080 --skip categories
//!
//! # Machine-readable summary
//! tracker-probe run --format json-pretty
//!
//! # List suites
//! tracker-probe list --detailed
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};

mod checks;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
#[cfg(test)]
mod testing;
mod utils;

use cli::Args;
use config::{AppConfig, ConfigFile, EnvConfig};
use executor::{Recorder, SuiteRunner};
use models::Suite;
use output::ResultFormatter;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let verbose = args.verbose || EnvConfig::load().verbose == Some(true);
    init_logger(LogLevel::resolve(args.log_level.as_deref(), verbose));

    match args.command {
        cli::Command::Run(run_args) => {
            run_suites(run_args).await?;
        }
        cli::Command::List(list_args) => {
            list_suites(list_args);
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args)?;
        }
    }

    Ok(())
}

async fn run_suites(args: cli::RunArgs) -> Result<()> {
    let (mut config, source) = AppConfig::load_layered(args.config.as_deref().map(Path::new))?;
    args.apply_to(&mut config);
    config.validate()?;

    if let Some(path) = source {
        info!("Using configuration from {}", path.display());
    }

    let format = config.output_format()?;
    let mut formatter = ResultFormatter::new(format);
    if !config.colorize {
        formatter = formatter.no_color();
    }

    let runner = SuiteRunner::new(&config)?;
    let mut recorder = if format.is_streaming() {
        Recorder::streaming(formatter.clone())
    } else {
        Recorder::silent()
    };

    match runner.run(&mut recorder).await {
        Ok(summary) => {
            println!("{}", formatter.format_summary(&summary));
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn list_suites(args: cli::ListArgs) {
    let suites = Suite::all();
    println!("\nHealth Tracker Suites ({} total)\n", suites.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, suite) in suites.iter().enumerate() {
        let optional = if suite.is_skippable() { "" } else { " [required]" };
        println!(
            "  {}. {:12} {}{}",
            index + 1,
            suite.name(),
            suite.description(),
            optional
        );

        if args.detailed {
            if let Some(kind) = suite.resource_kind() {
                println!("       endpoint: {}", kind.base_path());
            }
            for step in suite.steps() {
                println!("       - {step}");
            }
            println!();
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = output
                .map(PathBuf::from)
                .unwrap_or_else(ConfigFile::default_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            ConfigFile::example().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { config, format } => {
            let (app, source) = AppConfig::load_layered(config.as_deref().map(Path::new))?;
            let effective = ConfigFile {
                app,
                ..ConfigFile::default()
            };
            if let Some(path) = source {
                println!("# Loaded from {}", path.display());
            }
            let output = if format == "json" {
                serde_json::to_string_pretty(&effective)?
            } else {
                serde_yaml::to_string(&effective)?
            };
            println!("{output}");
        }

        cli::ConfigAction::Env => {
            config::env::print_env_help();
            println!();
            let env = EnvConfig::load();
            if env.has_any() {
                env.print_summary();
            } else {
                println!("No TRACKER_PROBE_* variables are set.");
            }
        }
    }

    Ok(())
}
