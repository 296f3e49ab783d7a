//! TDM/UXG channel-count scenarios.

use crate::error::AnalysisError;
use crate::models::{AnalysisOptions, FdmAnalysisResult, TdmUxgAnalysisResult};

/// Plans the candidate UXG channel counts fed to the cooling calculation.
pub trait TdmUxgAnalyzer: Send + Sync {
    fn analyze(
        &self,
        fdm: &FdmAnalysisResult,
        options: &AnalysisOptions,
    ) -> Result<TdmUxgAnalysisResult, AnalysisError>;
}

/// Returns the same ordered scenario list for every run.
///
/// Stands in for channel packing driven by the FDM overflow count,
/// the TDM/UXG gates and `max_chan_avail`.
#[derive(Debug, Clone)]
pub struct FixedScenarioTdmUxgAnalyzer {
    scenarios: Vec<u32>,
}

impl FixedScenarioTdmUxgAnalyzer {
    pub const DEFAULT_SCENARIOS: [u32; 5] = [32, 24, 16, 8, 4];

    pub fn new(scenarios: Vec<u32>) -> Self {
        Self { scenarios }
    }
}

impl Default for FixedScenarioTdmUxgAnalyzer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCENARIOS.to_vec())
    }
}

impl TdmUxgAnalyzer for FixedScenarioTdmUxgAnalyzer {
    fn analyze(
        &self,
        _fdm: &FdmAnalysisResult,
        _options: &AnalysisOptions,
    ) -> Result<TdmUxgAnalysisResult, AnalysisError> {
        Ok(TdmUxgAnalysisResult {
            channels: self.scenarios.clone(),
        })
    }
}
