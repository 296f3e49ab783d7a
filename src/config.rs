//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.labplan.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::models::{AnalysisOptions, MachineConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".labplan.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis settings not carried by the machine config.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Agent distribution settings.
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// The lab machine being planned.
    #[serde(default)]
    pub machine: MachineConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "labplan_report.md".to_string()
}

/// Pipeline inputs that live outside the machine config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_section_bandwidth")]
    pub section_bandwidth_mhz: f64,

    #[serde(default = "default_pps_fdm_assign")]
    pub pps_fdm_assign: u32,

    #[serde(default = "default_max_chan_avail")]
    pub max_chan_avail: u32,

    #[serde(default)]
    pub tdm_enabled: bool,

    #[serde(default = "default_true")]
    pub uxg_enabled: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            section_bandwidth_mhz: default_section_bandwidth(),
            pps_fdm_assign: default_pps_fdm_assign(),
            max_chan_avail: default_max_chan_avail(),
            tdm_enabled: false,
            uxg_enabled: true,
        }
    }
}

fn default_section_bandwidth() -> f64 {
    50.0
}

fn default_pps_fdm_assign() -> u32 {
    15_000
}

fn default_max_chan_avail() -> u32 {
    1000
}

fn default_true() -> bool {
    true
}

/// Settings for pushing the machine config to agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Push to agents after every successful analysis.
    #[serde(default)]
    pub enabled: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.labplan.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        let playback = &mut self.machine.playback;
        if let Some(ghz) = args.max_freq_ghz {
            playback.max_freq_played_ghz = ghz;
        }
        if let Some(ports) = args.rec_port_count {
            playback.rec_port_count = ports;
        }

        let lab = &mut self.machine.lab;
        if let Some(width) = args.lab_width_ft {
            lab.width_ft = width;
        }
        if let Some(length) = args.lab_length_ft {
            lab.length_ft = length;
        }

        if args.no_fdm {
            self.machine.fdm.present = false;
        }

        if args.distribute {
            self.distribution.enabled = true;
        }
        if let Some(timeout) = args.timeout {
            self.distribution.timeout_seconds = timeout;
        }
    }

    /// Assemble pipeline options from the machine config and analysis settings.
    pub fn analysis_options(&self) -> AnalysisOptions {
        let machine = &self.machine;
        AnalysisOptions {
            section_bandwidth_mhz: self.analysis.section_bandwidth_mhz,
            pps_fdm_assign: self.analysis.pps_fdm_assign,
            fdm_present: machine.fdm.present,
            randomize_shadow_time: machine.playback.randomize_shadow_time,
            buffer_time_ps: machine.playback.buffer_time_ps,
            number_of_virtual_channels: machine.fdm.number_of_virtual_channels,
            max_fdm_power_db: machine.fdm.max_power_db,
            max_chan_avail: self.analysis.max_chan_avail,
            tdm_enabled: self.analysis.tdm_enabled,
            uxg_enabled: self.analysis.uxg_enabled,
            rec_port_count: machine.playback.rec_port_count,
            lab_width_ft: machine.lab.width_ft,
            lab_length_ft: machine.lab.length_ft,
            max_freq_played_ghz: machine.playback.max_freq_played_ghz,
        }
    }

    /// Log level after merging: `--quiet` wins, then `verbose` from either source.
    pub fn log_level(&self, args: &Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if args.verbose || self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
