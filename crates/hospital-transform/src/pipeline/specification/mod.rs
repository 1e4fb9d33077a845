//! Specification generation: requirement mapping over per-type templates,
//! vendor overlays, and the implementation plan.

mod domain;
mod mapping;
mod plan;
mod templates;

#[cfg(test)]
mod tests;

pub use domain::{
    BackupRecoverySpec, ComplianceSpec, DeploymentSpec, ImplementationTimeline,
    InfrastructureSpec, IntegrationSpec, MitigationItem, MonitoringSpec, RiskMitigationSpec,
    SecuritySpec, SpecSection, Specification,
};
pub use plan::{ImplementationApproach, ImplementationPlan, PlanPhase, ResourceOptimization};

use tracing::debug;

use crate::pipeline::assessment::HospitalAssessment;
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::questionnaire::{HospitalProfile, ProcessedQuestionnaire, RequirementSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationGenerator;

impl SpecificationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build every section except the timeline and resource allocation,
    /// which come from the implementation plan.
    pub fn map_requirements_to_specification(
        &self,
        processed: &ProcessedQuestionnaire,
        requirements: &RequirementSet,
        metrics: &ComputedMetrics,
        assessment: &HospitalAssessment,
    ) -> Specification {
        let specification = mapping::map(processed, requirements, metrics, assessment);
        debug!(
            sections = specification.present_sections().len(),
            "requirements mapped to specification"
        );
        specification
    }

    pub fn generate_implementation_plan(
        &self,
        profile: &HospitalProfile,
        assessment: &HospitalAssessment,
        metrics: &ComputedMetrics,
    ) -> ImplementationPlan {
        let plan = plan::generate(profile, assessment, metrics);
        debug!(
            approach = plan.approach.label(),
            months = plan.risk_adjusted_duration_months,
            "implementation plan generated"
        );
        plan
    }

    pub fn attach_plan(&self, spec: &Specification, plan: &ImplementationPlan) -> Specification {
        plan::attach(spec, plan)
    }
}
