//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// LabPlan - RF test-lab planner
///
/// Derives FDM band statistics, a TDM/UXG channel plan and the hardware
/// and cooling requirements of a lab installation, then optionally pushes
/// the machine config to the lab agents.
///
/// Examples:
///   labplan --config bench-a.toml
///   labplan --config bench-a.toml --format json --output plan.json
///   labplan --config bench-a.toml --max-freq-ghz 18 --rec-port-count 4
///   labplan --config bench-a.toml --distribute --agents rx-rack-1,rx-rack-2
///   labplan --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .labplan.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "LABPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Highest frequency played, in GHz
    #[arg(long, value_name = "GHZ")]
    pub max_freq_ghz: Option<f64>,

    /// Receiver ports required per band/channel unit
    #[arg(long, value_name = "COUNT")]
    pub rec_port_count: Option<u32>,

    /// Lab width in feet
    #[arg(long, value_name = "FEET")]
    pub lab_width_ft: Option<f64>,

    /// Lab length in feet
    #[arg(long, value_name = "FEET")]
    pub lab_length_ft: Option<f64>,

    /// Treat the lab as having no FDM hardware
    #[arg(long)]
    pub no_fdm: bool,

    /// Push the machine config to the lab agents after the analysis
    #[arg(long)]
    pub distribute: bool,

    /// Only push to these agent ids (comma-separated)
    ///
    /// Example: --agents rx-rack-1,uxg-ctrl
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub agents: Option<Vec<String>>,

    /// Only push to agents using this protocol (http, https, ...)
    #[arg(long, value_name = "PROTOCOL")]
    pub protocol: Option<String>,

    /// Per-agent request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Dry run: analyze and list the agents that would receive the config
    ///
    /// Nothing is pushed.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .labplan.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ghz) = self.max_freq_ghz {
            if !(ghz.is_finite() && ghz > 0.0) {
                return Err("Max frequency must be a positive number of GHz".to_string());
            }
        }

        for (flag, value) in [
            ("--lab-width-ft", self.lab_width_ft),
            ("--lab-length-ft", self.lab_length_ft),
        ] {
            if let Some(feet) = value {
                if !(feet.is_finite() && feet > 0.0) {
                    return Err(format!("{} must be a positive number of feet", flag));
                }
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref ids) = self.agents {
            if ids.iter().any(|id| id.trim().is_empty()) {
                return Err("Agent ids in --agents must not be empty".to_string());
            }
        }

        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }
}
