use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;
use crate::pipeline::formulas::bounded::{round_to, unit};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageQuality {
    pub stage: PipelineStage,
    pub quality: f64,
}

/// Feasibility before and after the single refinement round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub suggestions_applied: usize,
    pub feasibility_before: f64,
    pub feasibility_after: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub stages: Vec<StageQuality>,
    pub refinement: Option<RefinementOutcome>,
}

impl PipelineMetrics {
    pub(crate) fn record(&mut self, stage: PipelineStage, quality: f64) {
        self.stages.push(StageQuality {
            stage,
            quality: round_to(unit(quality), 4),
        });
    }

    pub fn quality_for(&self, stage: PipelineStage) -> Option<f64> {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.quality)
    }

    /// Arithmetic mean of the recorded stage qualities.
    pub fn overall_quality(&self) -> f64 {
        if self.stages.is_empty() {
            return 0.0;
        }
        let total: f64 = self.stages.iter().map(|entry| entry.quality).sum();
        round_to(total / self.stages.len() as f64, 4)
    }

    pub fn refined(&self) -> bool {
        self.refinement.is_some()
    }
}
