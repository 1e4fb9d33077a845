//! Questionnaire intake: structural validation, profile extraction, and the
//! prioritized requirement list the rest of the pipeline works from.

mod conflicts;
pub mod domain;
mod parser;
mod requirements;

#[cfg(test)]
mod tests;

pub use conflicts::{ConflictResolution, DeploymentConstraint, RequirementConflict};
pub use domain::{
    HospitalProfile, HospitalType, ImplementationPreferences, InfrastructureModel,
    LocationClass, ProcessedQuestionnaire, QuestionnaireMetadata, QuestionnaireSection,
    RawQuestionnaire, ResponseValue, RolloutStrategy, TimelineUrgency, ValidationError,
};
pub use requirements::{
    PriorityWeights, Requirement, RequirementCategory, RequirementKind, RequirementSet,
};

pub(crate) use requirements::is_around_the_clock;

use tracing::debug;

/// Stateless processor turning raw answers into a profile and requirements.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionnaireProcessor;

impl QuestionnaireProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Validate identity fields and normalize the remaining answers.
    ///
    /// Only missing or malformed identity fields fail; every other gap lowers
    /// the completeness score instead.
    pub fn process_questionnaire(
        &self,
        raw: &RawQuestionnaire,
    ) -> Result<ProcessedQuestionnaire, ValidationError> {
        let processed = parser::process(raw)?;
        debug!(
            hospital = %processed.profile.name,
            completeness = processed.completeness,
            warnings = processed.warnings.len(),
            "questionnaire processed"
        );
        Ok(processed)
    }

    /// Bucket, weight, sort, and de-conflict the requirements implied by the answers.
    pub fn extract_requirements(&self, processed: &ProcessedQuestionnaire) -> RequirementSet {
        let set = requirements::extract(processed);
        debug!(
            requirements = set.requirements.len(),
            conflicts = set.conflicts.len(),
            "requirements extracted"
        );
        set
    }
}
