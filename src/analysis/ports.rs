//! Port expansion and cooling requirements.
//!
//! Sizes the VXG chassis count from the FDM band count, pairs it with each
//! TDM/UXG channel scenario, and converts the resulting hardware heat load
//! plus the lab floor load into tons of cooling.

use super::units::{btu_to_tons, round2, BTU_PER_WATT, LAB_BTU_PER_SQFT};
use crate::error::{AnalysisError, Stage};
use crate::models::{
    AnalysisOptions, FrequencyBand, PortExpansionCoolingRow, PortExpansionCoolingSummary,
    PortExpansionResult, TdmUxgAnalysisResult,
};
use tracing::debug;

/// VXG output above this frequency halves the usable ports per chassis.
pub const HIGH_BAND_THRESHOLD_GHZ: f64 = 20.0;

pub const VXG_WATTS: f64 = 1500.0;
pub const VUXG_WATTS: f64 = 800.0;
pub const AUXG_WATTS: f64 = 600.0;

/// Computes unit counts and cooling load for every TDM/UXG scenario.
pub trait PortExpansionCalculator: Send + Sync {
    fn compute(
        &self,
        max_freq_played_ghz: f64,
        tdm_uxg: &TdmUxgAnalysisResult,
        fdm_bands: &[FrequencyBand],
        options: &AnalysisOptions,
    ) -> Result<PortExpansionResult, AnalysisError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoolingCalculator;

/// Usable VXG ports per chassis at the given maximum frequency.
pub fn vxg_ports_per_box(max_freq_played_ghz: f64) -> u32 {
    if max_freq_played_ghz > HIGH_BAND_THRESHOLD_GHZ {
        2
    } else {
        4
    }
}

/// Chassis needed to provide `ports_required` ports, rounded up.
pub fn vxg_units(ports_required: u32, ports_per_box: u32) -> u32 {
    ports_required.div_ceil(ports_per_box)
}

fn vxg_btu_per_unit() -> f64 {
    VXG_WATTS * BTU_PER_WATT
}

fn vuxg_btu_per_unit() -> f64 {
    VUXG_WATTS * BTU_PER_WATT
}

fn auxg_btu_per_unit() -> f64 {
    AUXG_WATTS * BTU_PER_WATT
}

impl CoolingCalculator {
    fn cooling_row(num_of_vxg_units: u32, num_of_vuxg: u32, num_of_auxg: u32) -> PortExpansionCoolingRow {
        let vxg_btu = f64::from(num_of_vxg_units) * vxg_btu_per_unit();
        let vuxg_btu = f64::from(num_of_vuxg) * vuxg_btu_per_unit();
        let auxg_btu = f64::from(num_of_auxg) * auxg_btu_per_unit();
        let hardware_btu = vxg_btu + vuxg_btu + auxg_btu;

        PortExpansionCoolingRow {
            num_of_vxg_units,
            vxg_cooling_tons: round2(btu_to_tons(vxg_btu)),
            num_of_vuxg,
            vuxg_cooling_tons: round2(btu_to_tons(vuxg_btu)),
            num_of_auxg,
            auxg_cooling_tons: round2(btu_to_tons(auxg_btu)),
            total_hw_cooling_tons: round2(btu_to_tons(hardware_btu)),
        }
    }
}

impl PortExpansionCalculator for CoolingCalculator {
    fn compute(
        &self,
        max_freq_played_ghz: f64,
        tdm_uxg: &TdmUxgAnalysisResult,
        fdm_bands: &[FrequencyBand],
        options: &AnalysisOptions,
    ) -> Result<PortExpansionResult, AnalysisError> {
        let ports_per_box = vxg_ports_per_box(max_freq_played_ghz);

        let total_fdm_bands = if options.fdm_present {
            u32::try_from(fdm_bands.len())
                .map_err(|_| AnalysisError::overflow(Stage::PortExpansion, "FDM band count"))?
        } else {
            0
        };

        let ports_required = total_fdm_bands
            .checked_mul(options.rec_port_count)
            .ok_or_else(|| {
                AnalysisError::overflow(
                    Stage::PortExpansion,
                    format!(
                        "ports required ({} bands x {} ports)",
                        total_fdm_bands, options.rec_port_count
                    ),
                )
            })?;

        // Same chassis count for every scenario row.
        let num_of_vxg_units = vxg_units(ports_required, ports_per_box);

        debug!(
            "{} FDM bands x {} ports -> {} VXG units at {} ports/box",
            total_fdm_bands, options.rec_port_count, num_of_vxg_units, ports_per_box
        );

        let mut rows = Vec::with_capacity(tdm_uxg.channels.len());
        for &channels in &tdm_uxg.channels {
            let num_of_vuxg = channels.checked_mul(options.rec_port_count).ok_or_else(|| {
                AnalysisError::overflow(
                    Stage::PortExpansion,
                    format!(
                        "V-UXG units ({} channels x {} ports)",
                        channels, options.rec_port_count
                    ),
                )
            })?;

            // A-UXG count is the scenario's raw channel count.
            rows.push(Self::cooling_row(num_of_vxg_units, num_of_vuxg, channels));
        }

        let lab_sqft = options.lab_width_ft * options.lab_length_ft;
        let lab_tons = btu_to_tons(lab_sqft * LAB_BTU_PER_SQFT);

        // The final scenario row wins; it is not a sum or a max.
        let total_hw_tons = rows.last().map_or(0.0, |row| row.total_hw_cooling_tons);

        let summary = PortExpansionCoolingSummary {
            total_hw_cooling_tons: round2(total_hw_tons),
            lab_size_sqft: round2(lab_sqft),
            lab_cooling_req_tons: round2(lab_tons),
            total_overall_cooling_req_tons: round2(total_hw_tons + lab_tons),
        };

        Ok(PortExpansionResult { rows, summary })
    }
}
