//! Candidate FDM band derivation.

use crate::error::AnalysisError;
use crate::models::{AnalysisOptions, FrequencyBand};

/// Derives the ordered list of FDM bands for a run.
pub trait FrequencyAnalyzer: Send + Sync {
    fn analyze(&self, options: &AnalysisOptions) -> Result<Vec<FrequencyBand>, AnalysisError>;
}

/// Produces a single fixed 2.5 GHz wide band starting at 500 MHz.
///
/// Stands in for spectral-occupancy packing driven by section bandwidth
/// and power limits; the output ignores `options`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBandAnalyzer;

impl FixedBandAnalyzer {
    pub const MIN_MHZ: f64 = 500.0;
    pub const HALF_WIDTH_MHZ: f64 = 1250.0;
    pub const WIDTH_MHZ: f64 = 2500.0;
}

impl FrequencyAnalyzer for FixedBandAnalyzer {
    fn analyze(&self, _options: &AnalysisOptions) -> Result<Vec<FrequencyBand>, AnalysisError> {
        let min = Self::MIN_MHZ;
        let band = FrequencyBand::new(min, min + Self::HALF_WIDTH_MHZ, min + Self::WIDTH_MHZ)?;
        Ok(vec![band])
    }
}
