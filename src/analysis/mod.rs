//! Analysis pipeline.
//!
//! Frequency bands feed the FDM band statistics, whose overflow feeds the
//! TDM/UXG channel plan, which in turn drives the port-expansion and
//! cooling calculation.

pub mod fdm;
pub mod frequency;
pub mod pipeline;
pub mod ports;
pub mod tdm_uxg;
pub mod units;

pub use fdm::{FdmBandAnalyzer, PlaceholderFdmAnalyzer};
pub use frequency::{FixedBandAnalyzer, FrequencyAnalyzer};
pub use pipeline::{AnalysisPipeline, PipelineOutput};
pub use ports::{CoolingCalculator, PortExpansionCalculator};
pub use tdm_uxg::{FixedScenarioTdmUxgAnalyzer, TdmUxgAnalyzer};
