//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Order state machine auditor
#[derive(Parser, Debug)]
#[command(name = "tru-state")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long, global = true, env = "TRU_STATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an order file against a state machine and print the report
    Run {
        /// Path to the state machine specification (JSON)
        spec: PathBuf,

        /// Path to the order records (CSV)
        orders: PathBuf,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Check a specification file and print its transition table
    SpecValidate {
        /// Path to the state machine specification (JSON)
        spec: PathBuf,
    },
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per state
    Table,
    /// JSON document
    Json,
}

impl OutputFormat {
    /// Resolve the format named in the config file
    pub fn from_config(config: &Config) -> Result<Self> {
        <Self as ValueEnum>::from_str(&config.output.format, true).map_err(|_| {
            Error::Config(format!(
                "unknown output format '{}' (expected table or json)",
                config.output.format
            ))
        })
    }
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Run {
            spec,
            orders,
            format,
        } => {
            let format = match format {
                Some(format) => format,
                None => OutputFormat::from_config(&config)?,
            };
            commands::run::execute(spec, orders, format, &config)
        }
        Commands::SpecValidate { spec } => commands::spec_validate::execute(spec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["tru-state", "run", "spec.json", "orders.csv"]).unwrap();
        match cli.command {
            Commands::Run {
                spec,
                orders,
                format,
            } => {
                assert_eq!(spec, PathBuf::from("spec.json"));
                assert_eq!(orders, PathBuf::from("orders.csv"));
                assert_eq!(format, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "tru-state",
            "--config",
            "tru-state.toml",
            "run",
            "spec.json",
            "orders.csv",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tru-state.toml")));
        assert!(matches!(
            cli.command,
            Commands::Run {
                format: Some(OutputFormat::Json),
                ..
            }
        ));
    }

    #[test]
    fn test_cli_requires_both_inputs() {
        assert!(Cli::try_parse_from(["tru-state", "run", "spec.json"]).is_err());
        assert!(Cli::try_parse_from(["tru-state", "spec-validate", "spec.json"]).is_ok());
    }

    #[test]
    fn test_format_from_config() {
        let mut config = Config::default();
        assert_eq!(OutputFormat::from_config(&config).unwrap(), OutputFormat::Table);

        config.output.format = "JSON".to_string();
        assert_eq!(OutputFormat::from_config(&config).unwrap(), OutputFormat::Json);

        config.output.format = "dot".to_string();
        assert!(OutputFormat::from_config(&config).is_err());
    }
}
