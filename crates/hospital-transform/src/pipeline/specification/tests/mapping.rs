use super::{community_fixture, fixture_for, profile_fixture, Fixture};
use crate::pipeline::questionnaire::{HospitalType, InfrastructureModel, RolloutStrategy};
use crate::pipeline::specification::{SpecSection, Specification, SpecificationGenerator};
use crate::pipeline::test_support::{academic_profile, community_profile, community_questionnaire, text};

fn map(fixture: &Fixture) -> Specification {
    SpecificationGenerator::new().map_requirements_to_specification(
        &fixture.processed,
        &fixture.requirements,
        &fixture.metrics,
        &fixture.assessment,
    )
}

#[test]
fn community_specification_follows_answers_over_template() {
    let spec = map(&community_fixture());

    assert_eq!(
        spec.missing_sections(),
        vec![
            SpecSection::ImplementationTimeline,
            SpecSection::ResourceAllocation
        ]
    );
    assert_eq!(spec.populated_share(), 0.8);

    let infrastructure = spec.infrastructure.as_ref().expect("infrastructure");
    assert_eq!(infrastructure.deployment_model, InfrastructureModel::Hybrid);
    assert_eq!(infrastructure.availability_target, 99.9);
    assert!(!infrastructure.high_availability);
    assert_eq!(infrastructure.servers.total, 6);

    let integration = spec.integration.as_ref().expect("integration");
    assert_eq!(integration.vendor.as_deref(), Some("Epic"));
    assert_eq!(integration.interface_engine, "Epic Bridges");
    assert!(integration.standards.contains(&"FHIR R4".to_string()));
    assert_eq!(integration.interfaces.len(), 3);
    assert_eq!(integration.estimated_interfaces, 6);
    assert_eq!(integration.difficulty_index, 0.6);

    let security = spec.security.as_ref().expect("security");
    assert!(security.mfa_required);
    assert!(security.controls.iter().any(|control| control == "Role-based access"));

    let compliance = spec.compliance.as_ref().expect("compliance");
    assert_eq!(compliance.frameworks, vec!["HIPAA"]);
    assert!(compliance.hipaa_safeguards);
    assert_eq!(compliance.audit_retention_years, 6);

    let deployment = spec.deployment.as_ref().expect("deployment");
    assert_eq!(deployment.rollout, RolloutStrategy::BigBang);
    assert_eq!(spec.monitoring.as_ref().map(|m| m.support_coverage.as_str()), Some("24x7"));
    assert_eq!(spec.monitoring.as_ref().map(|m| m.alert_rules), Some(26));

    let mitigation = spec.risk_mitigation.as_ref().expect("risk mitigation");
    assert_eq!(mitigation.items.len(), 1);
}

#[test]
fn compliance_section_is_omitted_without_frameworks() {
    let mut raw = community_questionnaire();
    raw.metadata.compliance_frameworks.clear();

    let spec = map(&fixture_for(&raw));

    assert!(spec.compliance.is_none());
    assert!(!spec.has_section(SpecSection::Compliance));
    assert_eq!(spec.present_sections().len(), 7);
}

#[test]
fn data_residency_forces_on_premise_when_cloud_loses() {
    let raw = community_questionnaire()
        .with_response("deployment_preference", text("cloud"))
        .with_response("data_residency", text("on premise"));

    let spec = map(&fixture_for(&raw));

    let infrastructure = spec.infrastructure.expect("infrastructure");
    assert_eq!(infrastructure.deployment_model, InfrastructureModel::OnPremise);
    assert!(infrastructure.data_residency_on_premise);
    assert_eq!(
        spec.deployment.map(|deployment| deployment.model),
        Some(InfrastructureModel::OnPremise)
    );
}

#[test]
fn academic_template_and_top_vendor_overlay_apply() {
    let spec = map(&profile_fixture(academic_profile()));

    let infrastructure = spec.infrastructure.as_ref().expect("infrastructure");
    assert_eq!(infrastructure.availability_target, 99.99);
    assert!(infrastructure.high_availability);
    assert_eq!(infrastructure.deployment_model, InfrastructureModel::Hybrid);

    let integration = spec.integration.as_ref().expect("integration");
    assert_eq!(integration.vendor.as_deref(), Some("Oracle Health"));
    assert_eq!(integration.interface_engine, "Oracle Health Open Engine");
    assert!(integration.dedicated_interface_engine);
    assert!(integration.custom_api_gateway);
    assert_eq!(integration.interfaces.len(), 14);

    assert_eq!(
        spec.deployment.as_ref().map(|deployment| deployment.rollout),
        Some(RolloutStrategy::Phased)
    );
    assert_eq!(spec.risk_mitigation.as_ref().map(|r| r.items.len()), Some(7));
    assert_eq!(
        spec.compliance.as_ref().map(|c| c.audit_retention_years),
        Some(7)
    );
}

#[test]
fn critical_access_template_relaxes_availability() {
    let mut profile = community_profile();
    profile.hospital_type = HospitalType::CriticalAccess;
    profile.primary_ehr = Some("Homegrown".to_string());

    let fixture = profile_fixture(profile);
    let spec = map(&fixture);

    let infrastructure = spec.infrastructure.as_ref().expect("infrastructure");
    assert_eq!(infrastructure.availability_target, 99.5);
    assert_eq!(
        spec.backup_recovery.as_ref().map(|backup| backup.rto_hours),
        Some(24.0)
    );
    assert!(!spec.security.as_ref().is_some_and(|security| security.mfa_required));
}

#[test]
fn standards_are_listed_once_before_optimization() {
    let mut profile = academic_profile();
    profile.interoperability_standards = vec![
        "FHIR R4".to_string(),
        "HL7V2".to_string(),
        "fhir r4".to_string(),
    ];
    let fixture = profile_fixture(profile);

    let spec = map(&fixture);

    let standards = spec
        .integration
        .as_ref()
        .map(|integration| integration.standards.clone())
        .expect("integration");
    for (index, standard) in standards.iter().enumerate() {
        assert!(
            !standards[index + 1..]
                .iter()
                .any(|other| other.eq_ignore_ascii_case(standard)),
            "{standard} listed twice in {standards:?}"
        );
    }
    assert!(standards.iter().any(|standard| standard == "HL7V2"));
    assert!(standards.iter().any(|standard| standard.eq_ignore_ascii_case("FHIR R4")));
}
