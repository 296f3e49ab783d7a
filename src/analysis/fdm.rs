//! Per-band FDM pulse statistics.

use crate::error::{AnalysisError, Stage};
use crate::models::{AnalysisOptions, FdmAnalysisResult, FdmBandStats, FrequencyBand};
use tracing::debug;

/// Turns band centers into per-band pulse statistics.
pub trait FdmBandAnalyzer: Send + Sync {
    fn analyze(
        &self,
        bands: &[FrequencyBand],
        options: &AnalysisOptions,
    ) -> Result<FdmAnalysisResult, AnalysisError>;
}

/// Fills every band with fixed throughput figures.
///
/// Placeholder for the pulse-assignment simulation; `pps_fdm_assign`,
/// `buffer_time_ps` and the power ceiling are not consumed yet.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderFdmAnalyzer {
    pub pulses_assigned: u64,
    pub pulses_dropped: u64,
    pub max_vc_used: u32,
    pub pulses_to_tdm_uxg: u64,
}

impl Default for PlaceholderFdmAnalyzer {
    fn default() -> Self {
        Self {
            pulses_assigned: 100_000,
            pulses_dropped: 2_500,
            max_vc_used: 6,
            pulses_to_tdm_uxg: 250_000,
        }
    }
}

impl FdmBandAnalyzer for PlaceholderFdmAnalyzer {
    fn analyze(
        &self,
        bands: &[FrequencyBand],
        options: &AnalysisOptions,
    ) -> Result<FdmAnalysisResult, AnalysisError> {
        let mut stats = Vec::with_capacity(bands.len());

        for (index, band) in bands.iter().enumerate() {
            let band_number = u32::try_from(index + 1)
                .map_err(|_| AnalysisError::overflow(Stage::FdmBand, "band number"))?;

            stats.push(FdmBandStats::new(
                band_number,
                band,
                options.number_of_virtual_channels,
                self.max_vc_used,
                self.pulses_assigned,
                self.pulses_dropped,
            )?);

            debug!("Band {} ({}) analyzed", band_number, band);
        }

        Ok(FdmAnalysisResult {
            bands: stats,
            pulses_to_tdm_uxg: self.pulses_to_tdm_uxg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands(n: usize) -> Vec<FrequencyBand> {
        (0..n)
            .map(|i| {
                let min = 500.0 + 3000.0 * i as f64;
                FrequencyBand::new(min, min + 1250.0, min + 2500.0).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_band_numbers_follow_input_order() {
        let input = bands(3);
        let result = PlaceholderFdmAnalyzer::default()
            .analyze(&input, &AnalysisOptions::default())
            .unwrap();

        let numbers: Vec<u32> = result.bands.iter().map(|b| b.band_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        for (stats, band) in result.bands.iter().zip(&input) {
            assert_eq!(stats.min_mhz, band.min_mhz);
            assert_eq!(stats.center_mhz, band.center_mhz);
            assert_eq!(stats.max_mhz, band.max_mhz);
        }
    }

    #[test]
    fn test_placeholder_figures() {
        let result = PlaceholderFdmAnalyzer::default()
            .analyze(&bands(1), &AnalysisOptions::default())
            .unwrap();

        let stats = &result.bands[0];
        assert_eq!(stats.vc_available, 8);
        assert_eq!(stats.max_vc_used, 6);
        assert_eq!(stats.pulses_assigned, 100_000);
        assert_eq!(stats.pulses_dropped, 2_500);
        assert_eq!(stats.pulses_played, 97_500);
        assert!((stats.pulse_drop_percent - 2.5).abs() < 1e-12);
        assert_eq!(result.pulses_to_tdm_uxg, 250_000);
        assert_eq!(result.total_assigned(), 100_000);
        assert_eq!(result.total_dropped(), 2_500);
    }

    #[test]
    fn test_max_vc_used_respects_virtual_channels() {
        let options = AnalysisOptions {
            number_of_virtual_channels: 3,
            ..AnalysisOptions::default()
        };
        let result = PlaceholderFdmAnalyzer::default()
            .analyze(&bands(2), &options)
            .unwrap();
        assert!(result.bands.iter().all(|b| b.max_vc_used == 3 && b.vc_available == 3));
    }

    #[test]
    fn test_empty_band_list() {
        let result = PlaceholderFdmAnalyzer::default()
            .analyze(&[], &AnalysisOptions::default())
            .unwrap();
        assert!(result.bands.is_empty());
        assert_eq!(result.pulses_to_tdm_uxg, 250_000);
    }

    #[test]
    fn test_zero_assigned_has_zero_drop_percent() {
        let analyzer = PlaceholderFdmAnalyzer {
            pulses_assigned: 0,
            pulses_dropped: 0,
            ..PlaceholderFdmAnalyzer::default()
        };
        let result = analyzer.analyze(&bands(1), &AnalysisOptions::default()).unwrap();
        assert_eq!(result.bands[0].pulse_drop_percent, 0.0);
    }
}
