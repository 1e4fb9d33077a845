use super::domain::{
    BackupRecoverySpec, ComplianceSpec, DeploymentSpec, InfrastructureSpec, IntegrationSpec,
    MitigationItem, MonitoringSpec, RiskMitigationSpec, SecuritySpec, Specification,
};
use super::templates::{base_template, vendor_overlay, BaseTemplate};
use crate::pipeline::assessment::{HospitalAssessment, RiskCategory, RiskLevel};
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::questionnaire::domain::normalize_framework;
use crate::pipeline::questionnaire::{
    HospitalType, InfrastructureModel, ProcessedQuestionnaire, Requirement, RequirementKind,
    RequirementSet, RolloutStrategy,
};

const BASE_ALERT_RULES: f64 = 20.0;
const LARGE_HOSPITAL_BEDS: u32 = 500;

pub(crate) fn map(
    processed: &ProcessedQuestionnaire,
    requirements: &RequirementSet,
    metrics: &ComputedMetrics,
    assessment: &HospitalAssessment,
) -> Specification {
    let template = base_template(processed.profile.hospital_type);
    let active: Vec<&Requirement> = requirements.active().collect();
    let multiplier = 1.0 + 0.5 * metrics.hcs;

    let availability_target = active
        .iter()
        .find_map(|requirement| match requirement.kind {
            RequirementKind::Availability { target } => Some(target),
            _ => None,
        })
        .unwrap_or(template.availability_target);

    let data_residency_on_premise = active
        .iter()
        .any(|requirement| requirement.kind == RequirementKind::DataResidency);

    let deployment_model = active
        .iter()
        .find_map(|requirement| match requirement.kind {
            RequirementKind::DeploymentModel { model } => Some(model),
            _ => None,
        })
        .or_else(|| data_residency_on_premise.then_some(InfrastructureModel::OnPremise))
        .unwrap_or(match processed.profile.infrastructure {
            InfrastructureModel::Unknown => InfrastructureModel::Hybrid,
            known => known,
        });

    Specification {
        infrastructure: Some(infrastructure(
            processed,
            metrics,
            &template,
            deployment_model,
            data_residency_on_premise,
            availability_target,
        )),
        integration: Some(integration(processed, &active, metrics, assessment, &template, multiplier)),
        security: Some(security(processed, &active, &template)),
        compliance: compliance(processed, &active, &template),
        deployment: Some(deployment(processed, &active, &template, deployment_model)),
        monitoring: Some(monitoring(&active, &template, availability_target, multiplier)),
        backup_recovery: Some(BackupRecoverySpec {
            rpo_hours: template.rpo_hours,
            rto_hours: template.rto_hours,
            backup_frequency: template.backup_frequency.to_string(),
            offsite_copies: template.offsite_copies,
        }),
        implementation_timeline: None,
        resource_allocation: None,
        risk_mitigation: Some(risk_mitigation(assessment)),
    }
}

fn infrastructure(
    processed: &ProcessedQuestionnaire,
    metrics: &ComputedMetrics,
    template: &BaseTemplate,
    deployment_model: InfrastructureModel,
    data_residency_on_premise: bool,
    availability_target: f64,
) -> InfrastructureSpec {
    let raf = &metrics.raf;
    InfrastructureSpec {
        deployment_model,
        data_residency_on_premise,
        servers: raf.servers,
        cpu_cores: raf.cpu_cores,
        memory_gb: raf.memory_gb,
        storage: raf.storage,
        high_availability: template.high_availability,
        availability_target,
        estimated_monthly_cost_usd: raf.cost.monthly_usd,
        estimated_annual_cost_usd: raf.cost.annual_usd,
        budget_usd: processed.preferences.budget_usd,
        recommended_budget_usd: None,
        notes: Vec::new(),
    }
}

fn integration(
    processed: &ProcessedQuestionnaire,
    active: &[&Requirement],
    metrics: &ComputedMetrics,
    assessment: &HospitalAssessment,
    template: &BaseTemplate,
    multiplier: f64,
) -> IntegrationSpec {
    let profile = &processed.profile;
    let vendor = assessment
        .top_vendor()
        .map(|ranked| ranked.vendor.vendor_name.clone())
        .or_else(|| profile.primary_ehr.clone());
    let overlay = vendor.as_deref().and_then(vendor_overlay);

    let mut standards: Vec<String> = Vec::new();
    let mut list_standard = |standard: &str| {
        if !standards
            .iter()
            .any(|listed| listed.trim().eq_ignore_ascii_case(standard.trim()))
        {
            standards.push(standard.to_string());
        }
    };
    for requirement in active {
        if let RequirementKind::Interoperability { standard } = &requirement.kind {
            list_standard(standard.as_str());
        }
    }
    if let Some(overlay) = overlay {
        for standard in overlay.native_standards {
            list_standard(*standard);
        }
    }

    let mut interfaces = profile.clinical_systems.clone();
    interfaces.extend(profile.additional_ehrs.iter().cloned());
    let estimated_interfaces = ((interfaces.len() + 1) as f64 * multiplier).ceil() as u32;

    IntegrationSpec {
        primary_ehr: profile.primary_ehr.clone(),
        vendor,
        interface_engine: overlay
            .map(|overlay| overlay.interface_engine)
            .unwrap_or(template.interface_engine)
            .to_string(),
        dedicated_interface_engine: template.dedicated_interface_engine,
        difficulty_index: metrics.sidi,
        standards,
        interfaces,
        estimated_interfaces,
        custom_api_gateway: profile.custom_apis,
    }
}

fn security(
    processed: &ProcessedQuestionnaire,
    active: &[&Requirement],
    template: &BaseTemplate,
) -> SecuritySpec {
    let mut controls = vec![
        "Role-based access control".to_string(),
        "Centralized audit logging".to_string(),
    ];
    for requirement in active {
        if let RequirementKind::SecurityControl { control } = &requirement.kind {
            if !controls
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(control))
            {
                controls.push(control.clone());
            }
        }
    }

    let requested_mfa = controls.iter().any(|control| {
        let lowered = control.to_ascii_lowercase();
        lowered.contains("mfa") || lowered.contains("multi-factor")
    });
    let mfa_required = processed
        .preferences
        .mfa_required
        .unwrap_or(template.mfa_required)
        || requested_mfa;

    SecuritySpec {
        mfa_required,
        role_based_access: true,
        encryption_at_rest: true,
        encryption_in_transit: true,
        encryption_standard: "AES-256 at rest, TLS 1.2+ in transit".to_string(),
        audit_logging: true,
        controls,
    }
}

fn compliance(
    processed: &ProcessedQuestionnaire,
    active: &[&Requirement],
    template: &BaseTemplate,
) -> Option<ComplianceSpec> {
    let mut frameworks: Vec<String> = active
        .iter()
        .filter_map(|requirement| match &requirement.kind {
            RequirementKind::ComplianceFramework { framework } => Some(framework.clone()),
            _ => None,
        })
        .collect();
    if frameworks.is_empty() {
        frameworks = processed.profile.compliance_frameworks.clone();
    }
    if frameworks.is_empty() {
        return None;
    }

    let hipaa_safeguards = frameworks
        .iter()
        .any(|framework| normalize_framework(framework) == "HIPAA");
    let controls = frameworks
        .iter()
        .map(|framework| match normalize_framework(framework).as_str() {
            "HIPAA" => "HIPAA administrative, physical and technical safeguards".to_string(),
            "HITRUST" => "HITRUST CSF certification".to_string(),
            "SOC2" => "SOC 2 Type II audit".to_string(),
            "GDPR" => "GDPR data subject rights workflow".to_string(),
            _ => format!("{framework} control mapping"),
        })
        .collect();

    Some(ComplianceSpec {
        frameworks,
        hipaa_safeguards,
        audit_retention_years: template.audit_retention_years,
        controls,
    })
}

fn deployment(
    processed: &ProcessedQuestionnaire,
    active: &[&Requirement],
    template: &BaseTemplate,
    model: InfrastructureModel,
) -> DeploymentSpec {
    let profile = &processed.profile;
    let rollout = active
        .iter()
        .find_map(|requirement| match requirement.kind {
            RequirementKind::Rollout { strategy } => Some(strategy),
            _ => None,
        })
        .unwrap_or(
            if profile.bed_count >= LARGE_HOSPITAL_BEDS
                || profile.hospital_type == HospitalType::MultiSite
            {
                RolloutStrategy::Phased
            } else {
                RolloutStrategy::BigBang
            },
        );

    DeploymentSpec {
        model,
        environments: template
            .environments
            .iter()
            .map(|environment| environment.to_string())
            .collect(),
        rollout,
    }
}

fn monitoring(
    active: &[&Requirement],
    template: &BaseTemplate,
    uptime_target: f64,
    multiplier: f64,
) -> MonitoringSpec {
    let support_coverage = active
        .iter()
        .find_map(|requirement| match &requirement.kind {
            RequirementKind::SupportCoverage { model } => Some(model.clone()),
            _ => None,
        })
        .unwrap_or_else(|| template.support_coverage.to_string());

    MonitoringSpec {
        uptime_target,
        alert_rules: (BASE_ALERT_RULES * multiplier).ceil() as u32,
        metrics_retention_days: template.metrics_retention_days,
        support_coverage,
    }
}

fn risk_mitigation(assessment: &HospitalAssessment) -> RiskMitigationSpec {
    let mut items: Vec<MitigationItem> = assessment
        .risk_assessment
        .risks
        .iter()
        .map(|risk| MitigationItem {
            category: risk.category,
            level: risk.level,
            risk: risk.description.clone(),
            mitigation: risk.mitigation.clone(),
        })
        .collect();

    if items.is_empty() {
        items.push(MitigationItem {
            category: RiskCategory::Operational,
            level: RiskLevel::Low,
            risk: "No elevated risks identified".to_string(),
            mitigation: "Maintain standard change-management controls".to_string(),
        });
    }

    RiskMitigationSpec { items }
}
