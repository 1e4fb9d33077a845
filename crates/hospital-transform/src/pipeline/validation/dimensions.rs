use super::{FeasibilityBreakdown, QualityDimensions, ValidationIssue};
use crate::pipeline::formulas::bounded::{round_to, unit};
use crate::pipeline::questionnaire::domain::normalize_framework;
use crate::pipeline::questionnaire::{Requirement, RequirementKind, RequirementSet};
use crate::pipeline::specification::{SpecSection, Specification};

pub(crate) const COMPLIANCE_FRAMEWORK_ISSUE: &str =
    "At least one compliance framework should be selected";

const UNKNOWN_BUDGET_SCORE: f64 = 0.9;
const MISSING_SECTION_SCORE: f64 = 0.5;
const FEASIBILITY_FLOOR: f64 = 0.2;
const HIPAA_RETENTION_YEARS: u32 = 6;
const HIGH_AVAILABILITY_TARGET: f64 = 99.99;

pub(crate) fn score(
    spec: &Specification,
    requirements: &RequirementSet,
) -> (QualityDimensions, FeasibilityBreakdown, Vec<ValidationIssue>) {
    let feasibility = feasibility(spec);
    let issues = issues(spec);

    let dimensions = QualityDimensions {
        completeness: round_to(spec.populated_share(), 4),
        accuracy: accuracy(spec, requirements),
        feasibility: feasibility.score(),
        consistency: round_to((1.0 - 0.1 * issues.len() as f64).max(0.0), 4),
        compliance: compliance(spec),
        technical_validity: technical_validity(spec),
    };

    (dimensions, feasibility, issues)
}

fn accuracy(spec: &Specification, requirements: &RequirementSet) -> f64 {
    let active: Vec<&Requirement> = requirements.active().collect();
    if active.is_empty() {
        return 1.0;
    }
    let covered = active
        .iter()
        .filter(|requirement| is_covered(spec, &requirement.kind))
        .count();
    round_to(covered as f64 / active.len() as f64, 4)
}

fn contains_ignore_case(values: &[String], wanted: &str) -> bool {
    values.iter().any(|value| value.eq_ignore_ascii_case(wanted))
}

fn is_covered(spec: &Specification, kind: &RequirementKind) -> bool {
    match kind {
        RequirementKind::EhrIntegration { .. } => spec
            .integration
            .as_ref()
            .is_some_and(|integration| integration.primary_ehr.is_some()),
        RequirementKind::Interoperability { standard } => spec
            .integration
            .as_ref()
            .is_some_and(|integration| contains_ignore_case(&integration.standards, standard)),
        RequirementKind::CustomApi => spec
            .integration
            .as_ref()
            .is_some_and(|integration| integration.custom_api_gateway),
        RequirementKind::DeploymentModel { model } => {
            spec.deployment
                .as_ref()
                .is_some_and(|deployment| deployment.model == *model)
                || spec
                    .infrastructure
                    .as_ref()
                    .is_some_and(|infrastructure| infrastructure.deployment_model == *model)
        }
        RequirementKind::ClinicalSystems { count } => spec
            .integration
            .as_ref()
            .is_some_and(|integration| integration.interfaces.len() >= *count),
        RequirementKind::DataResidency => spec
            .infrastructure
            .as_ref()
            .is_some_and(|infrastructure| infrastructure.data_residency_on_premise),
        RequirementKind::Availability { target } => spec
            .infrastructure
            .as_ref()
            .is_some_and(|infrastructure| infrastructure.availability_target >= *target),
        RequirementKind::SupportCoverage { .. } => spec
            .monitoring
            .as_ref()
            .is_some_and(|monitoring| !monitoring.support_coverage.trim().is_empty()),
        RequirementKind::StaffTraining { .. } | RequirementKind::Timeline { .. } => {
            spec.implementation_timeline.is_some()
        }
        RequirementKind::Rollout { strategy } => spec
            .deployment
            .as_ref()
            .is_some_and(|deployment| deployment.rollout == *strategy),
        RequirementKind::ComplianceFramework { framework } => {
            let wanted = normalize_framework(framework);
            spec.compliance.as_ref().is_some_and(|compliance| {
                compliance
                    .frameworks
                    .iter()
                    .any(|listed| normalize_framework(listed) == wanted)
            })
        }
        RequirementKind::SecurityControl { control } => spec
            .security
            .as_ref()
            .is_some_and(|security| contains_ignore_case(&security.controls, control)),
    }
}

pub(crate) fn feasibility(spec: &Specification) -> FeasibilityBreakdown {
    FeasibilityBreakdown {
        technical: round_to(technical_feasibility(spec), 4),
        resource: round_to(resource_feasibility(spec), 4),
        timeline: round_to(timeline_feasibility(spec), 4),
        budget: round_to(budget_feasibility(spec), 4),
    }
}

/// Penalty applied when integration difficulty exceeds 1.0 without a dedicated engine.
pub(crate) fn sidi_penalty(spec: &Specification) -> f64 {
    spec.integration
        .as_ref()
        .filter(|integration| !integration.dedicated_interface_engine)
        .filter(|integration| integration.difficulty_index > 1.0)
        .map(|integration| ((integration.difficulty_index - 1.0) * 0.4 + 0.1).min(0.5))
        .unwrap_or(0.0)
}

pub(crate) fn lacks_high_availability(spec: &Specification) -> bool {
    spec.infrastructure.as_ref().is_some_and(|infrastructure| {
        infrastructure.availability_target >= HIGH_AVAILABILITY_TARGET
            && !infrastructure.high_availability
    })
}

fn technical_feasibility(spec: &Specification) -> f64 {
    let Some(infrastructure) = spec.infrastructure.as_ref() else {
        return MISSING_SECTION_SCORE;
    };

    let mut score = 1.0 - sidi_penalty(spec);
    if lacks_high_availability(spec) {
        score -= 0.2;
    }
    if infrastructure.servers.total == 0 {
        score -= 0.3;
    }
    unit(score)
}

fn resource_feasibility(spec: &Specification) -> f64 {
    match spec.resource_allocation.as_ref() {
        Some(resources) if resources.staffed_utilization() <= 1.0 => 1.0,
        Some(resources) => (1.0 / resources.staffed_utilization()).max(FEASIBILITY_FLOOR),
        None => MISSING_SECTION_SCORE,
    }
}

fn timeline_feasibility(spec: &Specification) -> f64 {
    let Some(timeline) = spec.implementation_timeline.as_ref() else {
        return MISSING_SECTION_SCORE;
    };
    let target = timeline.effective_target_months();
    if timeline.risk_adjusted_months <= target {
        1.0
    } else {
        (target / timeline.risk_adjusted_months).max(FEASIBILITY_FLOOR)
    }
}

fn budget_feasibility(spec: &Specification) -> f64 {
    let Some(infrastructure) = spec.infrastructure.as_ref() else {
        return MISSING_SECTION_SCORE;
    };
    match infrastructure.effective_budget_usd() {
        None => UNKNOWN_BUDGET_SCORE,
        Some(budget) if infrastructure.estimated_annual_cost_usd <= budget => 1.0,
        Some(budget) => (budget / infrastructure.estimated_annual_cost_usd).max(FEASIBILITY_FLOOR),
    }
}

fn issues(spec: &Specification) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let has_frameworks = spec
        .compliance
        .as_ref()
        .is_some_and(|compliance| !compliance.frameworks.is_empty());
    if !has_frameworks {
        issues.push(ValidationIssue::new(
            SpecSection::Compliance,
            COMPLIANCE_FRAMEWORK_ISSUE,
        ));
    }

    if let (Some(infrastructure), Some(deployment)) =
        (spec.infrastructure.as_ref(), spec.deployment.as_ref())
    {
        if infrastructure.deployment_model != deployment.model {
            issues.push(ValidationIssue::new(
                SpecSection::Deployment,
                "Deployment model differs between infrastructure and deployment sections",
            ));
        }
    }

    if let Some(compliance) = spec.compliance.as_ref() {
        let encrypted = spec
            .security
            .as_ref()
            .is_some_and(|security| security.encryption_at_rest);
        if compliance.hipaa_safeguards && !encrypted {
            issues.push(ValidationIssue::new(
                SpecSection::Security,
                "HIPAA safeguards require encryption at rest",
            ));
        }
    }

    if lacks_high_availability(spec) {
        issues.push(ValidationIssue::new(
            SpecSection::Infrastructure,
            "Availability target requires a high-availability topology",
        ));
    }

    if let (Some(infrastructure), Some(monitoring)) =
        (spec.infrastructure.as_ref(), spec.monitoring.as_ref())
    {
        if monitoring.uptime_target > infrastructure.availability_target {
            issues.push(ValidationIssue::new(
                SpecSection::Monitoring,
                "Monitoring uptime target exceeds the infrastructure availability target",
            ));
        }
    }

    issues
}

fn compliance(spec: &Specification) -> f64 {
    let security = spec.security.as_ref();
    let compliance = spec.compliance.as_ref();

    let safeguards = match compliance {
        Some(compliance) if compliance.hipaa_safeguards => 1.0,
        Some(_) => 0.5,
        None => 0.0,
    };

    let encryption = match security {
        Some(security) => match (security.encryption_at_rest, security.encryption_in_transit) {
            (true, true) => 1.0,
            (false, false) => 0.0,
            _ => 0.5,
        },
        None => 0.0,
    };

    let retention = match compliance {
        Some(compliance) if compliance.audit_retention_years >= HIPAA_RETENTION_YEARS => 1.0,
        Some(compliance) if compliance.audit_retention_years > 0 => 0.5,
        _ => 0.0,
    };

    let access = match security {
        Some(security) => match (security.role_based_access, security.mfa_required) {
            (true, true) => 1.0,
            (false, false) => 0.0,
            _ => 0.5,
        },
        None => 0.0,
    };

    round_to((safeguards + encryption + retention + access) / 4.0, 4)
}

fn technical_validity(spec: &Specification) -> f64 {
    let Some(infrastructure) = spec.infrastructure.as_ref() else {
        return 0.0;
    };
    let servers = &infrastructure.servers;
    let storage = &infrastructure.storage;

    let checks = [
        servers.total == servers.application + servers.database + servers.integration,
        servers.application >= 2 && servers.database >= 2 && servers.integration >= 1,
        infrastructure.cpu_cores > 0 && infrastructure.memory_gb >= infrastructure.cpu_cores * 2,
        storage.warm_tb >= storage.hot_tb && storage.cold_tb >= storage.warm_tb,
        infrastructure.estimated_monthly_cost_usd > 0.0
            && (infrastructure.estimated_annual_cost_usd
                - infrastructure.estimated_monthly_cost_usd * 12.0)
                .abs()
                < 0.05,
        (90.0..100.0).contains(&infrastructure.availability_target),
    ];

    let passing = checks.iter().filter(|passed| **passed).count();
    round_to(passing as f64 / checks.len() as f64, 4)
}
