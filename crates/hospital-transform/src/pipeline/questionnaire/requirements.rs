use serde::{Deserialize, Serialize};

use super::conflicts::{resolve_conflicts, ConflictResolution, DeploymentConstraint, RequirementConflict};
use super::domain::{
    normalize_framework, InfrastructureModel, ProcessedQuestionnaire, QuestionnaireSection,
    RolloutStrategy, TimelineUrgency,
};
use crate::pipeline::formulas::bounded::{round_to, unit};

const CLINICAL_WEIGHT: f64 = 0.4;
const URGENCY_WEIGHT: f64 = 0.35;
const COMPLEXITY_WEIGHT: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Technical,
    Operational,
    Compliance,
}

impl RequirementCategory {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Technical => "TECH",
            Self::Operational => "OPS",
            Self::Compliance => "COMP",
        }
    }
}

/// What a requirement asks of the specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementKind {
    EhrIntegration { vendor: String, additional: usize },
    Interoperability { standard: String },
    CustomApi,
    DeploymentModel { model: InfrastructureModel },
    ClinicalSystems { count: usize },
    DataResidency,
    Availability { target: f64 },
    SupportCoverage { model: String },
    StaffTraining { staff: u32 },
    Timeline { urgency: TimelineUrgency },
    Rollout { strategy: RolloutStrategy },
    ComplianceFramework { framework: String },
    SecurityControl { control: String },
}

impl RequirementKind {
    pub fn constraint(&self) -> Option<DeploymentConstraint> {
        match self {
            RequirementKind::DeploymentModel { model } => match model {
                InfrastructureModel::Cloud => Some(DeploymentConstraint::CloudHosted),
                InfrastructureModel::OnPremise => Some(DeploymentConstraint::OnPremise),
                InfrastructureModel::Hybrid => Some(DeploymentConstraint::Hybrid),
                InfrastructureModel::Unknown => None,
            },
            RequirementKind::DataResidency => Some(DeploymentConstraint::OnPremiseDataResidency),
            RequirementKind::Timeline {
                urgency: TimelineUrgency::Urgent,
            } => Some(DeploymentConstraint::AcceleratedRollout),
            RequirementKind::Rollout {
                strategy: RolloutStrategy::Phased,
            } => Some(DeploymentConstraint::PhasedRollout),
            _ => None,
        }
    }
}

/// Clinical impact, urgency and complexity, each on a 0-1 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub clinical: f64,
    pub urgency: f64,
    pub complexity: f64,
}

impl PriorityWeights {
    pub fn new(clinical: f64, urgency: f64, complexity: f64) -> Self {
        Self {
            clinical: unit(clinical),
            urgency: unit(urgency),
            complexity: unit(complexity),
        }
    }

    pub fn overall(&self) -> f64 {
        round_to(
            CLINICAL_WEIGHT * self.clinical
                + URGENCY_WEIGHT * self.urgency
                + COMPLEXITY_WEIGHT * self.complexity,
            4,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub category: RequirementCategory,
    pub section: QuestionnaireSection,
    pub kind: RequirementKind,
    pub description: String,
    pub weights: PriorityWeights,
    pub overall_priority: f64,
    pub resolution: Option<ConflictResolution>,
}

impl Requirement {
    pub fn is_active(&self) -> bool {
        self.resolution.is_none()
    }
}

/// Prioritized requirements plus the conflicts resolved while building them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub requirements: Vec<Requirement>,
    pub conflicts: Vec<RequirementConflict>,
}

impl RequirementSet {
    pub fn active(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|requirement| requirement.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn by_category(&self, category: RequirementCategory) -> Vec<&Requirement> {
        self.requirements
            .iter()
            .filter(|requirement| requirement.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|requirement| requirement.id == id)
    }
}

struct RequirementBuilder {
    counters: [usize; 3],
    requirements: Vec<Requirement>,
}

impl RequirementBuilder {
    fn new() -> Self {
        Self {
            counters: [0; 3],
            requirements: Vec::new(),
        }
    }

    fn push(
        &mut self,
        category: RequirementCategory,
        section: QuestionnaireSection,
        kind: RequirementKind,
        description: String,
        weights: PriorityWeights,
    ) {
        let slot = match category {
            RequirementCategory::Technical => 0,
            RequirementCategory::Operational => 1,
            RequirementCategory::Compliance => 2,
        };
        self.counters[slot] += 1;

        self.requirements.push(Requirement {
            id: format!("{}-{:03}", category.prefix(), self.counters[slot]),
            category,
            section,
            kind,
            description,
            overall_priority: weights.overall(),
            weights,
            resolution: None,
        });
    }
}

pub(crate) fn extract(processed: &ProcessedQuestionnaire) -> RequirementSet {
    let mut builder = RequirementBuilder::new();
    technical_requirements(processed, &mut builder);
    operational_requirements(processed, &mut builder);
    compliance_requirements(processed, &mut builder);

    let mut requirements = builder.requirements;
    requirements.sort_by(|left, right| {
        right
            .overall_priority
            .total_cmp(&left.overall_priority)
            .then_with(|| left.id.cmp(&right.id))
    });

    let conflicts = resolve_conflicts(&mut requirements);

    RequirementSet {
        requirements,
        conflicts,
    }
}

fn technical_requirements(processed: &ProcessedQuestionnaire, builder: &mut RequirementBuilder) {
    let profile = &processed.profile;
    let preferences = &processed.preferences;

    if let Some(vendor) = &profile.primary_ehr {
        let additional = profile.additional_ehrs.len();
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::ClinicalSystems,
            RequirementKind::EhrIntegration {
                vendor: vendor.clone(),
                additional,
            },
            if additional > 0 {
                format!("Integrate with {vendor} EHR and {additional} additional EHR platform(s)")
            } else {
                format!("Integrate with {vendor} EHR")
            },
            PriorityWeights::new(0.95, 0.8, 0.6 + 0.1 * additional as f64),
        );
    }

    for standard in &profile.interoperability_standards {
        let upper = standard.to_ascii_uppercase();
        let weights = if upper.contains("FHIR") {
            PriorityWeights::new(0.75, 0.6, 0.5)
        } else if upper.starts_with("HL7") {
            PriorityWeights::new(0.7, 0.6, 0.4)
        } else {
            PriorityWeights::new(0.6, 0.5, 0.5)
        };
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::Integration,
            RequirementKind::Interoperability {
                standard: standard.clone(),
            },
            format!("Support {standard} interoperability"),
            weights,
        );
    }

    if profile.custom_apis {
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::Integration,
            RequirementKind::CustomApi,
            "Expose and maintain custom integration APIs".to_string(),
            PriorityWeights::new(0.5, 0.5, 0.9),
        );
    }

    if let Some(model) = preferences.deployment_preference {
        let complexity = match model {
            InfrastructureModel::Cloud => 0.5,
            InfrastructureModel::Hybrid => 0.7,
            _ => 0.6,
        };
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::Infrastructure,
            RequirementKind::DeploymentModel { model },
            format!("Deploy on {} infrastructure", model.label().replace('_', "-")),
            PriorityWeights::new(0.4, 0.6, complexity),
        );
    }

    if !profile.clinical_systems.is_empty() {
        let count = profile.clinical_systems.len();
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::ClinicalSystems,
            RequirementKind::ClinicalSystems { count },
            format!(
                "Connect {count} clinical system(s): {}",
                profile.clinical_systems.join(", ")
            ),
            PriorityWeights::new(0.85, 0.6, count as f64 / 10.0 + 0.2),
        );
    }

    if preferences.data_residency_on_premise {
        builder.push(
            RequirementCategory::Technical,
            QuestionnaireSection::Infrastructure,
            RequirementKind::DataResidency,
            "Keep protected health information on premise".to_string(),
            PriorityWeights::new(0.6, 0.7, 0.6),
        );
    }
}

fn operational_requirements(processed: &ProcessedQuestionnaire, builder: &mut RequirementBuilder) {
    let profile = &processed.profile;
    let preferences = &processed.preferences;

    if let Some(target) = preferences.uptime_target {
        let complexity = if target >= 99.99 {
            0.9
        } else if target >= 99.9 {
            0.7
        } else {
            0.5
        };
        builder.push(
            RequirementCategory::Operational,
            QuestionnaireSection::Operations,
            RequirementKind::Availability { target },
            format!("Maintain {target}% system availability"),
            PriorityWeights::new(0.9, 0.7, complexity),
        );
    }

    if let Some(model) = &preferences.support_model {
        let around_the_clock = is_around_the_clock(model);
        builder.push(
            RequirementCategory::Operational,
            QuestionnaireSection::Operations,
            RequirementKind::SupportCoverage {
                model: model.clone(),
            },
            format!("Provide {model} operational support"),
            if around_the_clock {
                PriorityWeights::new(0.8, 0.6, 0.6)
            } else {
                PriorityWeights::new(0.6, 0.5, 0.4)
            },
        );
    }

    if let Some(staff) = profile.it_staff_count {
        builder.push(
            RequirementCategory::Operational,
            QuestionnaireSection::Operations,
            RequirementKind::StaffTraining { staff },
            format!("Train {staff} IT staff on the new platform"),
            PriorityWeights::new(0.6, 0.5, if staff < 5 { 0.6 } else { 0.4 }),
        );
    }

    if preferences.timeline_answered {
        let urgency = profile.timeline;
        let urgency_weight = match urgency {
            TimelineUrgency::Urgent => 1.0,
            TimelineUrgency::Accelerated => 0.8,
            TimelineUrgency::Standard => 0.5,
            TimelineUrgency::Extended => 0.3,
        };
        builder.push(
            RequirementCategory::Operational,
            QuestionnaireSection::Timeline,
            RequirementKind::Timeline { urgency },
            format!(
                "Complete implementation on a {} timeline (within {} months)",
                urgency.label(),
                urgency.expected_months()
            ),
            PriorityWeights::new(0.5, urgency_weight, 0.5),
        );
    }

    if let Some(strategy) = preferences.rollout_strategy {
        let (description, weights) = match strategy {
            RolloutStrategy::Phased => (
                "Roll out in phased waves by facility or department",
                PriorityWeights::new(0.5, 0.5, 0.6),
            ),
            RolloutStrategy::BigBang => (
                "Cut over all facilities in a single go-live",
                PriorityWeights::new(0.5, 0.7, 0.8),
            ),
        };
        builder.push(
            RequirementCategory::Operational,
            QuestionnaireSection::Integration,
            RequirementKind::Rollout { strategy },
            description.to_string(),
            weights,
        );
    }
}

fn compliance_requirements(processed: &ProcessedQuestionnaire, builder: &mut RequirementBuilder) {
    for framework in &processed.profile.compliance_frameworks {
        let weights = match normalize_framework(framework).as_str() {
            "HIPAA" => PriorityWeights::new(0.95, 0.9, 0.6),
            "HITRUST" => PriorityWeights::new(0.8, 0.7, 0.7),
            "GDPR" => PriorityWeights::new(0.7, 0.8, 0.7),
            _ => PriorityWeights::new(0.75, 0.7, 0.6),
        };
        builder.push(
            RequirementCategory::Compliance,
            QuestionnaireSection::Compliance,
            RequirementKind::ComplianceFramework {
                framework: framework.clone(),
            },
            format!("Satisfy {framework} control requirements"),
            weights,
        );
    }

    for control in &processed.preferences.security_requirements {
        builder.push(
            RequirementCategory::Compliance,
            QuestionnaireSection::Security,
            RequirementKind::SecurityControl {
                control: control.clone(),
            },
            format!("Enforce {control}"),
            PriorityWeights::new(0.75, 0.7, 0.5),
        );
    }
}

pub(crate) fn is_around_the_clock(model: &str) -> bool {
    let lowered = model.to_ascii_lowercase();
    lowered.contains("24") || lowered.contains("around the clock")
}
