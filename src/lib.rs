//! LabPlan - RF test-lab planning.
//!
//! Turns lab and playback parameters into FDM band statistics, a TDM/UXG
//! channel plan and hardware/cooling requirements, and pushes the machine
//! configuration to lab agents.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod distribute;
pub mod error;
pub mod models;
pub mod report;

pub use analysis::{AnalysisPipeline, PipelineOutput};
pub use error::{AnalysisError, PushError, Stage};
