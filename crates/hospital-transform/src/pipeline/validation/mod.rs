//! Specification quality scoring, feasibility gating, and refinement suggestions.

mod dimensions;
mod suggestions;

#[cfg(test)]
mod tests;

pub use suggestions::{
    refine, RefinementSuggestion, RefinementValue, SpecField, SuggestionPriority,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::formulas::bounded::{bounded, round_to};
use crate::pipeline::questionnaire::RequirementSet;
use crate::pipeline::specification::{SpecSection, Specification};

pub const DEFAULT_FEASIBILITY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityDimensions {
    pub completeness: f64,
    pub accuracy: f64,
    pub feasibility: f64,
    pub consistency: f64,
    pub compliance: f64,
    pub technical_validity: f64,
}

impl QualityDimensions {
    pub fn weighted(&self) -> f64 {
        round_to(
            0.25 * self.completeness
                + 0.25 * self.accuracy
                + 0.20 * self.feasibility
                + 0.15 * self.consistency
                + 0.10 * self.compliance
                + 0.05 * self.technical_validity,
            4,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityBreakdown {
    pub technical: f64,
    pub resource: f64,
    pub timeline: f64,
    pub budget: f64,
}

impl FeasibilityBreakdown {
    pub fn score(&self) -> f64 {
        round_to(
            (self.technical + self.resource + self.timeline + self.budget) / 4.0,
            4,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub section: SpecSection,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(section: SpecSection, message: impl Into<String>) -> Self {
        Self {
            section,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub quality_score: f64,
    pub feasibility_score: f64,
    pub dimensions: QualityDimensions,
    pub feasibility_breakdown: FeasibilityBreakdown,
    pub missing_sections: Vec<SpecSection>,
    pub issues: Vec<ValidationIssue>,
    pub refinement_required: bool,
    pub suggestions: Vec<RefinementSuggestion>,
}

impl ValidationResult {
    pub fn has_issue(&self, message: &str) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.message.eq_ignore_ascii_case(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationEngine {
    feasibility_threshold: f64,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FEASIBILITY_THRESHOLD)
    }
}

impl ValidationEngine {
    pub fn new(feasibility_threshold: f64) -> Self {
        Self {
            feasibility_threshold: bounded(
                feasibility_threshold,
                0.0,
                1.0,
                DEFAULT_FEASIBILITY_THRESHOLD,
            ),
        }
    }

    pub fn feasibility_threshold(&self) -> f64 {
        self.feasibility_threshold
    }

    pub fn validate_specification(
        &self,
        spec: &Specification,
        requirements: &RequirementSet,
    ) -> ValidationResult {
        let (dimensions, feasibility_breakdown, issues) = dimensions::score(spec, requirements);
        let feasibility_score = dimensions.feasibility;
        let refinement_required = feasibility_score < self.feasibility_threshold;
        let suggestions = if refinement_required {
            suggestions::suggest(spec, &feasibility_breakdown)
        } else {
            Vec::new()
        };

        let result = ValidationResult {
            quality_score: dimensions.weighted(),
            feasibility_score,
            dimensions,
            feasibility_breakdown,
            missing_sections: spec.missing_sections(),
            issues,
            refinement_required,
            suggestions,
        };
        debug!(
            quality = result.quality_score,
            feasibility = result.feasibility_score,
            issues = result.issues.len(),
            refinement_required,
            "specification validated"
        );
        result
    }
}
