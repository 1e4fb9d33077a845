use serde::{Deserialize, Serialize};

use super::domain::{ImplementationTimeline, Specification};
use crate::pipeline::assessment::{HospitalAssessment, RiskLevel};
use crate::pipeline::formulas::bounded::round_to;
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::questionnaire::HospitalProfile;

const DEFAULT_AVAILABLE_FTE: u32 = 5;
const HIGH_COMPLEXITY: f64 = 7.0;
const LOW_COMPLEXITY: f64 = 4.0;
const LARGE_HOSPITAL_BEDS: u32 = 500;
const SMALL_HOSPITAL_BEDS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationApproach {
    Phased,
    Standard,
    Accelerated,
}

impl ImplementationApproach {
    pub fn select(complexity: f64, bed_count: u32) -> Self {
        if complexity >= HIGH_COMPLEXITY || bed_count >= LARGE_HOSPITAL_BEDS {
            Self::Phased
        } else if complexity < LOW_COMPLEXITY && bed_count < SMALL_HOSPITAL_BEDS {
            Self::Accelerated
        } else {
            Self::Standard
        }
    }

    pub const fn duration_factor(self) -> f64 {
        match self {
            Self::Phased => 1.2,
            Self::Standard => 1.0,
            Self::Accelerated => 0.8,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Phased => "phased",
            Self::Standard => "standard",
            Self::Accelerated => "accelerated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub name: String,
    pub duration_months: f64,
    pub staff_fte: u32,
    pub deliverables: Vec<String>,
}

/// Internal staffing measured against the plan's peak demand.
///
/// `available_fte`, `utilization` and `shortfall_fte` describe the declared
/// internal team and never change after planning. Refinement only adds
/// `contracted_fte` on top of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceOptimization {
    pub available_fte: u32,
    pub peak_demand_fte: u32,
    pub utilization: f64,
    pub shortfall_fte: u32,
    #[serde(default)]
    pub contracted_fte: u32,
    pub recommendation: String,
}

impl ResourceOptimization {
    pub(crate) fn new(available_fte: u32, peak_demand_fte: u32) -> Self {
        let utilization = ratio(peak_demand_fte, available_fte);
        let shortfall_fte = peak_demand_fte.saturating_sub(available_fte);

        let mut optimization = Self {
            available_fte,
            peak_demand_fte,
            utilization,
            shortfall_fte,
            contracted_fte: 0,
            recommendation: String::new(),
        };
        optimization.recommendation = optimization.recommend();
        optimization
    }

    /// Copy with `contracted_fte` external staff added to the internal team.
    pub(crate) fn with_contracted(&self, contracted_fte: u32) -> Self {
        let mut augmented = Self {
            contracted_fte,
            ..self.clone()
        };
        augmented.recommendation = augmented.recommend();
        augmented
    }

    /// Internal plus contracted staff.
    pub fn staffed_fte(&self) -> u32 {
        self.available_fte.saturating_add(self.contracted_fte)
    }

    /// Peak demand over internal plus contracted staff.
    pub fn staffed_utilization(&self) -> f64 {
        ratio(self.peak_demand_fte, self.staffed_fte())
    }

    /// Shortfall left once contracted staff are counted.
    pub fn uncovered_fte(&self) -> u32 {
        self.shortfall_fte.saturating_sub(self.contracted_fte)
    }

    fn recommend(&self) -> String {
        if self.contracted_fte > 0 {
            let uncovered = self.uncovered_fte();
            if uncovered > 0 {
                format!(
                    "Contract {} FTE during peak phases; {uncovered} FTE of peak demand remains uncovered",
                    self.contracted_fte
                )
            } else {
                format!(
                    "Contract {} FTE to cover the {} FTE internal shortfall at peak",
                    self.contracted_fte, self.shortfall_fte
                )
            }
        } else if self.shortfall_fte > 0 {
            format!(
                "Augment the internal team with {} contracted FTE during peak phases",
                self.shortfall_fte
            )
        } else if self.utilization < 0.5 {
            "Internal team can absorb the programme; consider reassigning surplus staff"
                .to_string()
        } else {
            "Internal staffing covers peak demand".to_string()
        }
    }
}

fn ratio(demand: u32, staff: u32) -> f64 {
    if staff == 0 {
        demand as f64
    } else {
        round_to(demand as f64 / staff as f64, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    pub approach: ImplementationApproach,
    pub phases: Vec<PlanPhase>,
    pub total_duration_months: f64,
    pub risk_buffer: f64,
    pub risk_adjusted_duration_months: f64,
    pub target_months: f64,
    /// Target agreed during refinement; `target_months` stays as requested.
    #[serde(default)]
    pub revised_target_months: Option<f64>,
    pub resource_optimization: ResourceOptimization,
}

impl ImplementationPlan {
    /// Revised target when refinement set one, otherwise the requested target.
    pub fn effective_target_months(&self) -> f64 {
        self.revised_target_months.unwrap_or(self.target_months)
    }
}

struct PhaseTemplate {
    name: &'static str,
    months: f64,
    fte: f64,
}

const PHASES: [PhaseTemplate; 4] = [
    PhaseTemplate {
        name: "Infrastructure",
        months: 3.0,
        fte: 4.0,
    },
    PhaseTemplate {
        name: "Integration",
        months: 4.0,
        fte: 6.0,
    },
    PhaseTemplate {
        name: "Testing",
        months: 2.0,
        fte: 5.0,
    },
    PhaseTemplate {
        name: "Go-live",
        months: 1.0,
        fte: 8.0,
    },
];

pub(crate) fn risk_buffer(level: RiskLevel) -> f64 {
    match level {
        RiskLevel::Low => 0.1,
        RiskLevel::Medium => 0.2,
        RiskLevel::High => 0.3,
        RiskLevel::Critical => 0.4,
    }
}

pub(crate) fn generate(
    profile: &HospitalProfile,
    assessment: &HospitalAssessment,
    metrics: &ComputedMetrics,
) -> ImplementationPlan {
    let approach = ImplementationApproach::select(assessment.complexity_score, profile.bed_count);
    let size_multiplier = 1.0 + profile.bed_count.min(2000) as f64 / 1000.0 * 0.5;

    let phases: Vec<PlanPhase> = PHASES
        .iter()
        .map(|phase| PlanPhase {
            name: phase.name.to_string(),
            duration_months: round_to(
                phase.months * size_multiplier * approach.duration_factor(),
                2,
            ),
            staff_fte: (phase.fte * size_multiplier).ceil() as u32,
            deliverables: deliverables(phase.name, profile, assessment, metrics),
        })
        .collect();

    let total_duration_months = round_to(phases.iter().map(|phase| phase.duration_months).sum(), 2);
    let buffer = risk_buffer(assessment.risk_assessment.overall_level);
    let peak_demand = phases.iter().map(|phase| phase.staff_fte).max().unwrap_or(0);
    let available = profile.it_staff_count.unwrap_or(DEFAULT_AVAILABLE_FTE);

    ImplementationPlan {
        approach,
        phases,
        total_duration_months,
        risk_buffer: buffer,
        risk_adjusted_duration_months: round_to(total_duration_months * (1.0 + buffer), 2),
        target_months: profile.timeline.expected_months(),
        revised_target_months: None,
        resource_optimization: ResourceOptimization::new(available, peak_demand),
    }
}

fn deliverables(
    phase: &str,
    profile: &HospitalProfile,
    assessment: &HospitalAssessment,
    metrics: &ComputedMetrics,
) -> Vec<String> {
    match phase {
        "Infrastructure" => vec![
            format!("Provision {} servers", metrics.raf.servers.total),
            format!(
                "Allocate {:.2} TB tiered storage",
                metrics.raf.storage.total_tb()
            ),
        ],
        "Integration" => {
            let mut items = vec![format!(
                "Connect {} clinical system(s)",
                profile.clinical_systems.len()
            )];
            if let Some(vendor) = assessment.top_vendor() {
                items.push(format!("Configure {} interfaces", vendor.vendor.vendor_name));
            }
            items
        }
        "Testing" => vec![
            "End-to-end clinical workflow validation".to_string(),
            "Failover and recovery drills".to_string(),
        ],
        _ => vec![
            "Staff training and at-the-elbow support".to_string(),
            "Cutover and hypercare".to_string(),
        ],
    }
}

/// Copy of `spec` with the timeline and resource sections filled from `plan`.
pub(crate) fn attach(spec: &Specification, plan: &ImplementationPlan) -> Specification {
    let mut attached = spec.clone();
    attached.implementation_timeline = Some(ImplementationTimeline {
        approach: plan.approach,
        phases: plan.phases.clone(),
        total_months: plan.total_duration_months,
        risk_buffer: plan.risk_buffer,
        risk_adjusted_months: plan.risk_adjusted_duration_months,
        target_months: plan.target_months,
        revised_target_months: plan.revised_target_months,
    });
    attached.resource_allocation = Some(plan.resource_optimization.clone());
    attached
}
