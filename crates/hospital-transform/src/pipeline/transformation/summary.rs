use serde::{Deserialize, Serialize};

use crate::pipeline::assessment::{HospitalAssessment, RiskLevel};
use crate::pipeline::formulas::bounded::round_to;
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::questionnaire::HospitalProfile;
use crate::pipeline::specification::{ImplementationPlan, Specification};
use crate::pipeline::validation::ValidationResult;

/// One-page digest of a transformation for executive readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub hospital_name: String,
    pub headline: String,
    pub recommended_vendor: Option<String>,
    pub overall_risk: RiskLevel,
    pub estimated_duration_months: f64,
    pub estimated_annual_cost_usd: f64,
    pub quality_score: f64,
    pub feasibility_score: f64,
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapMilestone {
    pub name: String,
    pub start_month: f64,
    pub end_month: f64,
    pub staff_fte: u32,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationRoadmap {
    pub milestones: Vec<RoadmapMilestone>,
    pub total_months: f64,
}

const STABILISATION_MILESTONE: &str = "Stabilisation buffer";

/// Lay the plan phases end to end, then append the risk buffer as its own milestone.
pub(crate) fn roadmap(plan: &ImplementationPlan) -> ImplementationRoadmap {
    let mut cursor = 0.0;
    let mut milestones: Vec<RoadmapMilestone> = plan
        .phases
        .iter()
        .map(|phase| {
            let start_month = cursor;
            cursor = round_to(cursor + phase.duration_months, 2);
            RoadmapMilestone {
                name: phase.name.clone(),
                start_month,
                end_month: cursor,
                staff_fte: phase.staff_fte,
                deliverables: phase.deliverables.clone(),
            }
        })
        .collect();

    let buffer = round_to(plan.risk_adjusted_duration_months - cursor, 2);
    if buffer > 0.0 {
        milestones.push(RoadmapMilestone {
            name: STABILISATION_MILESTONE.to_string(),
            start_month: cursor,
            end_month: plan.risk_adjusted_duration_months,
            staff_fte: plan
                .phases
                .last()
                .map(|phase| phase.staff_fte.div_ceil(2))
                .unwrap_or(0),
            deliverables: vec![
                "Hypercare support and defect triage".to_string(),
                "Post-implementation review".to_string(),
            ],
        });
    }

    ImplementationRoadmap {
        milestones,
        total_months: plan.risk_adjusted_duration_months,
    }
}

pub(crate) fn executive_summary(
    profile: &HospitalProfile,
    assessment: &HospitalAssessment,
    metrics: &ComputedMetrics,
    spec: &Specification,
    plan: &ImplementationPlan,
    validation: &ValidationResult,
) -> ExecutiveSummary {
    let recommended_vendor = assessment
        .top_vendor()
        .map(|ranked| ranked.vendor.vendor_name.clone());
    let overall_risk = assessment.risk_assessment.overall_level;

    let headline = match &recommended_vendor {
        Some(vendor) => format!(
            "{} can adopt {vendor} in about {:.0} months at {} risk",
            profile.name,
            plan.risk_adjusted_duration_months.ceil(),
            overall_risk.label()
        ),
        None => format!(
            "{} has no vendor above the recommendation threshold; review requirements before procurement",
            profile.name
        ),
    };

    let mut key_findings = vec![
        format!(
            "Hospital complexity {:.2} and integration difficulty {:.2}",
            metrics.hcs, metrics.sidi
        ),
        format!(
            "{} servers with {:.2} TB tiered storage",
            metrics.raf.servers.total,
            metrics.raf.storage.total_tb()
        ),
        format!(
            "Risk-adjusted duration of {:.1} months on a {} approach",
            plan.risk_adjusted_duration_months,
            plan.approach.label()
        ),
    ];

    key_findings.extend(staffing_finding(plan));
    key_findings.extend(timeline_finding(plan));
    key_findings.extend(budget_finding(spec));
    let elevated = assessment
        .risk_assessment
        .risks
        .iter()
        .filter(|risk| risk.level >= RiskLevel::High)
        .count();
    if elevated > 0 {
        key_findings.push(format!("{elevated} high or critical risk(s) need mitigation owners"));
    }
    if !spec.missing_sections().is_empty() {
        key_findings.push(format!(
            "Specification is missing: {}",
            spec.missing_sections()
                .iter()
                .map(|section| section.label())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    ExecutiveSummary {
        hospital_name: profile.name.clone(),
        headline,
        recommended_vendor,
        overall_risk,
        estimated_duration_months: plan.risk_adjusted_duration_months,
        estimated_annual_cost_usd: metrics.raf.cost.annual_usd,
        quality_score: validation.quality_score,
        feasibility_score: validation.feasibility_score,
        key_findings,
    }
}

fn staffing_finding(plan: &ImplementationPlan) -> Option<String> {
    let resources = &plan.resource_optimization;
    if resources.shortfall_fte == 0 {
        return None;
    }
    let mut finding = format!(
        "Staffing shortfall of {} FTE at peak demand against {} internal staff",
        resources.shortfall_fte, resources.available_fte
    );
    match (resources.contracted_fte, resources.uncovered_fte()) {
        (0, _) => {}
        (contracted, 0) => {
            finding.push_str(&format!(", mitigated by {contracted} contracted FTE"));
        }
        (contracted, uncovered) => finding.push_str(&format!(
            ", partly mitigated by {contracted} contracted FTE ({uncovered} FTE uncovered)"
        )),
    }
    Some(finding)
}

fn timeline_finding(plan: &ImplementationPlan) -> Option<String> {
    if plan.risk_adjusted_duration_months <= plan.target_months {
        return None;
    }
    let mut finding = format!(
        "Requested {:.0}-month timeline is shorter than the {:.1}-month risk-adjusted plan",
        plan.target_months, plan.risk_adjusted_duration_months
    );
    if let Some(revised) = plan.revised_target_months {
        finding.push_str(&format!(
            ", {} by a revised {revised:.0}-month target",
            mitigation(revised >= plan.risk_adjusted_duration_months)
        ));
    }
    Some(finding)
}

fn budget_finding(spec: &Specification) -> Option<String> {
    let infrastructure = spec.infrastructure.as_ref()?;
    let declared = infrastructure.budget_usd?;
    if infrastructure.estimated_annual_cost_usd <= declared {
        return None;
    }
    let mut finding = format!(
        "Declared budget of ${declared:.0} is below the ${:.0} annual estimate",
        infrastructure.estimated_annual_cost_usd
    );
    if let Some(recommended) = infrastructure.recommended_budget_usd {
        finding.push_str(&format!(
            ", {} by a recommended ${recommended:.0} budget",
            mitigation(recommended >= infrastructure.estimated_annual_cost_usd)
        ));
    }
    Some(finding)
}

const fn mitigation(covered: bool) -> &'static str {
    if covered {
        "mitigated"
    } else {
        "partly mitigated"
    }
}
