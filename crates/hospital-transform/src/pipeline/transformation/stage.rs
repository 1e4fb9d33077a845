use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::EventError;
use crate::pipeline::questionnaire::ValidationError;

/// Stages of a transformation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Parse,
    Extract,
    Formulas,
    Assess,
    Map,
    Generate,
    Validate,
    Refine,
    Revalidate,
    Optimize,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Parse,
            Self::Extract,
            Self::Formulas,
            Self::Assess,
            Self::Map,
            Self::Generate,
            Self::Validate,
            Self::Refine,
            Self::Revalidate,
            Self::Optimize,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Extract => "extract",
            Self::Formulas => "formulas",
            Self::Assess => "assess",
            Self::Map => "map",
            Self::Generate => "generate",
            Self::Validate => "validate",
            Self::Refine => "refine",
            Self::Revalidate => "revalidate",
            Self::Optimize => "optimize",
        }
    }

    /// Stages that contribute a quality score to every run.
    pub const fn scored() -> [Self; 8] {
        [
            Self::Parse,
            Self::Extract,
            Self::Formulas,
            Self::Assess,
            Self::Map,
            Self::Generate,
            Self::Validate,
            Self::Optimize,
        ]
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a stage could not produce its output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageFailure {
    #[error("no active requirements could be extracted from the questionnaire")]
    NoActiveRequirements,
    #[error("computed metric '{metric}' is not a finite number")]
    NonFiniteMetric { metric: &'static str },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{stage} stage failed")]
pub struct PipelineStageError {
    pub stage: PipelineStage,
    #[source]
    pub cause: StageFailure,
}

impl PipelineStageError {
    pub fn new(stage: PipelineStage, cause: StageFailure) -> Self {
        Self { stage, cause }
    }
}

/// Error surfaced by `TransformationEngine::transform`.
#[derive(Debug, thiserror::Error)]
pub enum TransformationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Stage(#[from] PipelineStageError),
    #[error("transformation cancelled after the {after} stage")]
    Cancelled { after: PipelineStage },
    #[error(transparent)]
    Event(#[from] EventError),
}

impl TransformationError {
    /// Stage the failure is attributed to, when there is one.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Validation(_) => Some(PipelineStage::Parse),
            Self::Stage(err) => Some(err.stage),
            Self::Cancelled { after } => Some(*after),
            Self::Event(_) => None,
        }
    }
}

/// Cooperative cancellation shared between a caller and a running transformation.
///
/// The engine checks the flag after every stage; a stage already in progress
/// always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn checkpoint(&self, after: PipelineStage) -> Result<(), TransformationError> {
        if self.is_cancelled() {
            Err(TransformationError::Cancelled { after })
        } else {
            Ok(())
        }
    }
}
