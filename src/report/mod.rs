//! Plan report model and rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::PipelineOutput;
use crate::models::{AnalysisOptions, MachineIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub machine_name: String,
    pub location: String,
    pub config_version: String,
    pub analysis_date: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl ReportMetadata {
    pub fn for_machine(identity: &MachineIdentity, duration_seconds: f64) -> Self {
        Self {
            machine_name: identity.name.clone(),
            location: identity.location.clone(),
            config_version: identity.version.clone(),
            analysis_date: Utc::now(),
            duration_seconds,
        }
    }
}

/// Everything a planning run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub metadata: ReportMetadata,
    pub options: AnalysisOptions,
    pub analysis: PipelineOutput,
    /// Per-agent push results, when distribution ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<BTreeMap<String, bool>>,
}

impl PlanReport {
    /// Number of agents that did not accept the config.
    pub fn failed_agents(&self) -> usize {
        self.distribution
            .as_ref()
            .map_or(0, |results| results.values().filter(|ok| !**ok).count())
    }
}
