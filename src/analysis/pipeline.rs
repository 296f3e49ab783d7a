//! Sequential orchestration of the four analysis stages.

use super::fdm::{FdmBandAnalyzer, PlaceholderFdmAnalyzer};
use super::frequency::{FixedBandAnalyzer, FrequencyAnalyzer};
use super::ports::{CoolingCalculator, PortExpansionCalculator};
use super::tdm_uxg::{FixedScenarioTdmUxgAnalyzer, TdmUxgAnalyzer};
use crate::error::AnalysisError;
use crate::models::{
    AnalysisOptions, FdmAnalysisResult, FrequencyBand, PortExpansionResult, TdmUxgAnalysisResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Bands from the frequency stage, kept for populating a machine config.
    pub bands: Vec<FrequencyBand>,
    pub fdm: FdmAnalysisResult,
    pub tdm_uxg: TdmUxgAnalysisResult,
    pub ports: PortExpansionResult,
}

impl PipelineOutput {
    pub fn into_parts(self) -> (FdmAnalysisResult, TdmUxgAnalysisResult, PortExpansionResult) {
        (self.fdm, self.tdm_uxg, self.ports)
    }
}

/// Runs frequency, FDM, TDM/UXG and port-expansion stages in order.
///
/// Holds no per-run state, so one pipeline can serve concurrent callers.
pub struct AnalysisPipeline {
    frequency: Box<dyn FrequencyAnalyzer>,
    fdm: Box<dyn FdmBandAnalyzer>,
    tdm_uxg: Box<dyn TdmUxgAnalyzer>,
    ports: Box<dyn PortExpansionCalculator>,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self {
            frequency: Box::new(FixedBandAnalyzer),
            fdm: Box::new(PlaceholderFdmAnalyzer::default()),
            tdm_uxg: Box::new(FixedScenarioTdmUxgAnalyzer::default()),
            ports: Box::new(CoolingCalculator),
        }
    }
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frequency_analyzer(mut self, stage: impl FrequencyAnalyzer + 'static) -> Self {
        self.frequency = Box::new(stage);
        self
    }

    pub fn with_fdm_analyzer(mut self, stage: impl FdmBandAnalyzer + 'static) -> Self {
        self.fdm = Box::new(stage);
        self
    }

    pub fn with_tdm_uxg_analyzer(mut self, stage: impl TdmUxgAnalyzer + 'static) -> Self {
        self.tdm_uxg = Box::new(stage);
        self
    }

    pub fn with_port_calculator(mut self, stage: impl PortExpansionCalculator + 'static) -> Self {
        self.ports = Box::new(stage);
        self
    }

    /// Validate `options` and run every stage, stopping at the first error.
    pub fn run(&self, options: &AnalysisOptions) -> Result<PipelineOutput, AnalysisError> {
        options.validate()?;

        debug!("Running frequency analysis");
        let bands = self.frequency.analyze(options)?;
        debug!("Frequency analysis produced {} bands", bands.len());

        let fdm = self.fdm.analyze(&bands, options)?;
        debug!(
            "FDM analysis: {} bands, {} pulses to TDM/UXG",
            fdm.bands.len(),
            fdm.pulses_to_tdm_uxg
        );

        let tdm_uxg = self.tdm_uxg.analyze(&fdm, options)?;
        debug!("TDM/UXG analysis: {} scenarios", tdm_uxg.channels.len());

        let ports = self
            .ports
            .compute(options.max_freq_played_ghz, &tdm_uxg, &bands, options)?;

        info!(
            "Analysis complete: {} bands, {} scenarios, {:.2} tons overall cooling",
            bands.len(),
            tdm_uxg.channels.len(),
            ports.summary.total_overall_cooling_req_tons
        );

        Ok(PipelineOutput {
            bands,
            fdm,
            tdm_uxg,
            ports,
        })
    }
}
