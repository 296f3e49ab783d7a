//! Error types for the analysis pipeline and config distribution.

use std::fmt;
use thiserror::Error;

/// Pipeline stage, used to tag errors with where they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Frequency,
    FdmBand,
    TdmUxg,
    PortExpansion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Frequency => write!(f, "frequency analysis"),
            Stage::FdmBand => write!(f, "FDM band analysis"),
            Stage::TdmUxg => write!(f, "TDM/UXG analysis"),
            Stage::PortExpansion => write!(f, "port expansion"),
        }
    }
}

/// Errors raised while validating options or running the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid option `{field}` = {value}: {reason}")]
    InvalidOption {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid frequency band {min} / {center} / {max} MHz: expected min <= center <= max")]
    InvalidBand { min: f64, center: f64, max: f64 },

    #[error("invalid pulse counts: {dropped} dropped exceeds {assigned} assigned")]
    InvalidPulseCounts { assigned: u64, dropped: u64 },

    #[error("{stage} overflowed computing {quantity}")]
    Overflow { stage: Stage, quantity: String },

    #[error("{stage} failed: {message}")]
    StageFailed { stage: Stage, message: String },
}

impl AnalysisError {
    pub(crate) fn invalid(field: &'static str, value: impl fmt::Display, reason: &'static str) -> Self {
        Self::InvalidOption {
            field,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn overflow(stage: Stage, quantity: impl Into<String>) -> Self {
        Self::Overflow {
            stage,
            quantity: quantity.into(),
        }
    }

    /// The stage this error came from, if it was raised inside one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Overflow { stage, .. } | Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Failure of a single transport while pushing a config to an agent.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("cannot connect to agent at {endpoint}")]
    Connect { endpoint: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
