//! Data models for the lab planner.
//!
//! This module contains the value objects that flow through the analysis
//! pipeline, plus the machine configuration pushed to lab agents.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// RF section bandwidth used to size bands.
    pub section_bandwidth_mhz: f64,
    /// Pulses-per-second assignment rate for FDM.
    pub pps_fdm_assign: u32,
    /// Whether FDM bands are counted downstream.
    pub fdm_present: bool,
    pub randomize_shadow_time: bool,
    pub buffer_time_ps: u32,
    /// Upper bound on per-band virtual-channel usage.
    pub number_of_virtual_channels: u32,
    pub max_fdm_power_db: f64,
    pub max_chan_avail: u32,
    pub tdm_enabled: bool,
    pub uxg_enabled: bool,
    /// Receiver ports required per band/channel unit.
    pub rec_port_count: u32,
    pub lab_width_ft: f64,
    pub lab_length_ft: f64,
    /// Highest frequency played; decides VXG port density per chassis.
    pub max_freq_played_ghz: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            section_bandwidth_mhz: 50.0,
            pps_fdm_assign: 15_000,
            fdm_present: true,
            randomize_shadow_time: true,
            buffer_time_ps: 20_000,
            number_of_virtual_channels: 8,
            max_fdm_power_db: -5.0,
            max_chan_avail: 1000,
            tdm_enabled: false,
            uxg_enabled: true,
            rec_port_count: 6,
            lab_width_ft: 40.0,
            lab_length_ft: 100.0,
            max_freq_played_ghz: 40.0,
        }
    }
}

impl AnalysisOptions {
    /// Reject out-of-range values before they enter the pipeline.
    ///
    /// Counts are unsigned so only the floating-point fields and the
    /// virtual-channel count need checking here.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        require_positive("section_bandwidth_mhz", self.section_bandwidth_mhz)?;
        require_positive("lab_width_ft", self.lab_width_ft)?;
        require_positive("lab_length_ft", self.lab_length_ft)?;
        require_positive("max_freq_played_ghz", self.max_freq_played_ghz)?;

        if !self.max_fdm_power_db.is_finite() {
            return Err(AnalysisError::invalid(
                "max_fdm_power_db",
                self.max_fdm_power_db,
                "must be a finite number",
            ));
        }

        if self.number_of_virtual_channels == 0 {
            return Err(AnalysisError::invalid(
                "number_of_virtual_channels",
                0,
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), AnalysisError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(field, value, "must be a positive number"))
    }
}

/// One FDM band as a min/center/max frequency triple in MHz.
///
/// Deserialization goes through [`FrequencyBand::new`], so bands read from a
/// config file obey the same ordering as bands built in code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrequencyBand")]
pub struct FrequencyBand {
    pub min_mhz: f64,
    pub center_mhz: f64,
    pub max_mhz: f64,
}

#[derive(Deserialize)]
struct RawFrequencyBand {
    min_mhz: f64,
    center_mhz: f64,
    max_mhz: f64,
}

impl TryFrom<RawFrequencyBand> for FrequencyBand {
    type Error = AnalysisError;

    fn try_from(raw: RawFrequencyBand) -> Result<Self, Self::Error> {
        Self::new(raw.min_mhz, raw.center_mhz, raw.max_mhz)
    }
}

impl FrequencyBand {
    /// Build a band, checking `min <= center <= max`.
    pub fn new(min_mhz: f64, center_mhz: f64, max_mhz: f64) -> Result<Self, AnalysisError> {
        if !(min_mhz <= center_mhz && center_mhz <= max_mhz) {
            return Err(AnalysisError::InvalidBand {
                min: min_mhz,
                center: center_mhz,
                max: max_mhz,
            });
        }
        Ok(Self {
            min_mhz,
            center_mhz,
            max_mhz,
        })
    }

    pub fn width_mhz(&self) -> f64 {
        self.max_mhz - self.min_mhz
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}-{:.1} MHz (center {:.1})",
            self.min_mhz, self.max_mhz, self.center_mhz
        )
    }
}

/// Pulse statistics for a single FDM band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdmBandStats {
    /// 1-based position of the band in assignment order.
    pub band_number: u32,
    pub min_mhz: f64,
    pub center_mhz: f64,
    pub max_mhz: f64,
    pub vc_available: u32,
    pub max_vc_used: u32,
    pub pulses_assigned: u64,
    pub pulses_played: u64,
    pub pulses_dropped: u64,
    pub pulse_drop_percent: f64,
}

impl FdmBandStats {
    /// Build the stats for one band; played count and drop percentage are derived.
    pub fn new(
        band_number: u32,
        band: &FrequencyBand,
        vc_available: u32,
        max_vc_used: u32,
        pulses_assigned: u64,
        pulses_dropped: u64,
    ) -> Result<Self, AnalysisError> {
        let pulses_played = pulses_assigned.checked_sub(pulses_dropped).ok_or(
            AnalysisError::InvalidPulseCounts {
                assigned: pulses_assigned,
                dropped: pulses_dropped,
            },
        )?;

        Ok(Self {
            band_number,
            min_mhz: band.min_mhz,
            center_mhz: band.center_mhz,
            max_mhz: band.max_mhz,
            vc_available,
            max_vc_used: max_vc_used.min(vc_available),
            pulses_assigned,
            pulses_played,
            pulses_dropped,
            pulse_drop_percent: drop_percent(pulses_assigned, pulses_dropped),
        })
    }
}

/// Percentage of assigned pulses that were dropped; 0 when nothing was assigned.
pub fn drop_percent(assigned: u64, dropped: u64) -> f64 {
    if assigned == 0 {
        0.0
    } else {
        dropped as f64 / assigned as f64 * 100.0
    }
}

/// Output of the FDM band stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FdmAnalysisResult {
    /// Per-band stats in input band order.
    pub bands: Vec<FdmBandStats>,
    /// Pulses overflowing into the TDM/UXG path.
    pub pulses_to_tdm_uxg: u64,
}

impl FdmAnalysisResult {
    pub fn total_assigned(&self) -> u64 {
        self.bands.iter().map(|b| b.pulses_assigned).sum()
    }

    pub fn total_dropped(&self) -> u64 {
        self.bands.iter().map(|b| b.pulses_dropped).sum()
    }
}

/// Candidate UXG channel counts, one per cooling scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdmUxgAnalysisResult {
    pub channels: Vec<u32>,
}

/// Unit counts and cooling load for one TDM/UXG scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortExpansionCoolingRow {
    pub num_of_vxg_units: u32,
    pub vxg_cooling_tons: f64,
    pub num_of_vuxg: u32,
    pub vuxg_cooling_tons: f64,
    pub num_of_auxg: u32,
    pub auxg_cooling_tons: f64,
    pub total_hw_cooling_tons: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortExpansionCoolingSummary {
    /// Hardware tons of the final scenario row, 0 without scenarios.
    pub total_hw_cooling_tons: f64,
    pub lab_size_sqft: f64,
    pub lab_cooling_req_tons: f64,
    pub total_overall_cooling_req_tons: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortExpansionResult {
    pub rows: Vec<PortExpansionCoolingRow>,
    pub summary: PortExpansionCoolingSummary,
}

// --- Machine configuration pushed to agents ---

/// Where and how to reach a lab agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAddress {
    pub id: String,
    /// Transport name: "http", "https" or a custom protocol.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// URL for http(s), authority for other transports.
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_protocol() -> String {
    "http".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineIdentity {
    pub name: String,
    pub location: String,
    pub version: String,
}

impl Default for MachineIdentity {
    fn default() -> Self {
        Self {
            name: "rf-lab".to_string(),
            location: "unassigned".to_string(),
            version: "1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineNetwork {
    #[serde(default)]
    pub agents: Vec<AgentAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FdmConfig {
    pub present: bool,
    pub number_of_virtual_channels: u32,
    pub max_power_db: f64,
}

impl Default for FdmConfig {
    fn default() -> Self {
        Self {
            present: true,
            number_of_virtual_channels: 8,
            max_power_db: -5.0,
        }
    }
}

/// Lab floor dimensions, used only for the cooling load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub width_ft: f64,
    pub length_ft: f64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            width_ft: 40.0,
            length_ft: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub max_freq_played_ghz: f64,
    pub rec_port_count: u32,
    pub randomize_shadow_time: bool,
    pub buffer_time_ps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_freq_played_ghz: 40.0,
            rec_port_count: 6,
            randomize_shadow_time: true,
            buffer_time_ps: 20_000,
        }
    }
}

/// The complete configuration of one lab machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default)]
    pub identity: MachineIdentity,
    #[serde(default)]
    pub network: MachineNetwork,
    #[serde(default)]
    pub fdm: FdmConfig,
    #[serde(default)]
    pub lab: LabConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub bands: Vec<FrequencyBand>,
}

impl MachineConfig {
    /// Copy of this config with its band list replaced by analysis output.
    pub fn with_bands(&self, bands: &[FrequencyBand]) -> Self {
        Self {
            bands: bands.to_vec(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> FrequencyBand {
        FrequencyBand::new(500.0, 1750.0, 3000.0).unwrap()
    }

    #[test]
    fn test_default_options_are_valid() {
        let options = AnalysisOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.rec_port_count, 6);
        assert_eq!(options.max_freq_played_ghz, 40.0);
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let options = AnalysisOptions {
            lab_width_ft: -40.0,
            ..AnalysisOptions::default()
        };
        match options.validate() {
            Err(AnalysisError::InvalidOption { field, value, .. }) => {
                assert_eq!(field, "lab_width_ft");
                assert_eq!(value, "-40");
            }
            other => panic!("expected invalid option, got {:?}", other),
        }

        let options = AnalysisOptions {
            section_bandwidth_mhz: 0.0,
            ..AnalysisOptions::default()
        };
        assert!(options.validate().is_err());

        let options = AnalysisOptions {
            lab_length_ft: f64::NAN,
            ..AnalysisOptions::default()
        };
        assert!(options.validate().is_err());

        let options = AnalysisOptions {
            number_of_virtual_channels: 0,
            ..AnalysisOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_frequency_band_ordering() {
        assert!(FrequencyBand::new(500.0, 500.0, 500.0).is_ok());
        assert!(FrequencyBand::new(600.0, 500.0, 3000.0).is_err());
        assert!(FrequencyBand::new(500.0, 3500.0, 3000.0).is_err());
        assert_eq!(band().width_mhz(), 2500.0);
    }

    #[test]
    fn test_frequency_band_deserialize_checks_ordering() {
        let parsed: FrequencyBand =
            serde_json::from_str(r#"{"min_mhz": 500.0, "center_mhz": 1750.0, "max_mhz": 3000.0}"#)
                .unwrap();
        assert_eq!(parsed, band());

        let err = serde_json::from_str::<FrequencyBand>(
            r#"{"min_mhz": 3000.0, "center_mhz": 1750.0, "max_mhz": 500.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("3000"));
    }

    #[test]
    fn test_band_stats_derive_played_and_percent() {
        let stats = FdmBandStats::new(1, &band(), 8, 6, 100_000, 2_500).unwrap();
        assert_eq!(stats.pulses_played, 97_500);
        assert!((stats.pulse_drop_percent - 2.5).abs() < 1e-12);
        assert_eq!(stats.center_mhz, 1750.0);
    }

    #[test]
    fn test_drop_percent_zero_assigned() {
        assert_eq!(drop_percent(0, 0), 0.0);
        let stats = FdmBandStats::new(1, &band(), 8, 6, 0, 0).unwrap();
        assert_eq!(stats.pulse_drop_percent, 0.0);
        assert_eq!(stats.pulses_played, 0);
    }

    #[test]
    fn test_band_stats_reject_more_dropped_than_assigned() {
        let err = FdmBandStats::new(1, &band(), 8, 6, 10, 11).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidPulseCounts {
                assigned: 10,
                dropped: 11
            }
        );
    }

    #[test]
    fn test_max_vc_used_capped_by_available() {
        let stats = FdmBandStats::new(1, &band(), 4, 6, 10, 0).unwrap();
        assert_eq!(stats.max_vc_used, 4);
    }

    #[test]
    fn test_machine_config_with_bands() {
        let config = MachineConfig::default();
        let populated = config.with_bands(&[band()]);
        assert!(config.bands.is_empty());
        assert_eq!(populated.bands, vec![band()]);
        assert_eq!(populated.identity, config.identity);
    }

    #[test]
    fn test_agent_protocol_defaults_to_http() {
        let agent: AgentAddress =
            serde_json::from_str(r#"{"id": "a1", "endpoint": "http://10.0.0.5/config"}"#).unwrap();
        assert_eq!(agent.protocol, "http");
        assert!(agent.api_key.is_none());
    }
}
