use crate::pipeline::questionnaire::conflicts::resolve_conflicts;
use crate::pipeline::questionnaire::{
    DeploymentConstraint, InfrastructureModel, PriorityWeights, ProcessedQuestionnaire,
    QuestionnaireProcessor, QuestionnaireSection, RawQuestionnaire, Requirement,
    RequirementCategory, RequirementKind, RequirementSet,
};
use crate::pipeline::test_support::{community_questionnaire, list, text};

fn extract(raw: &RawQuestionnaire) -> RequirementSet {
    let processor = QuestionnaireProcessor::new();
    let processed: ProcessedQuestionnaire = processor
        .process_questionnaire(raw)
        .expect("questionnaire is valid");
    processor.extract_requirements(&processed)
}

fn requirement(id: &str, kind: RequirementKind, clinical: f64) -> Requirement {
    let weights = PriorityWeights::new(clinical, 0.5, 0.5);
    Requirement {
        id: id.to_string(),
        category: RequirementCategory::Technical,
        section: QuestionnaireSection::Infrastructure,
        kind,
        description: id.to_string(),
        overall_priority: weights.overall(),
        weights,
        resolution: None,
    }
}

#[test]
fn community_requirements_are_sorted_by_priority() {
    let set = extract(&community_questionnaire());
    let ids: Vec<&str> = set
        .requirements
        .iter()
        .map(|requirement| requirement.id.as_str())
        .collect();

    assert_eq!(
        ids,
        vec![
            "COMP-001", "TECH-001", "OPS-001", "OPS-002", "TECH-003", "COMP-002", "TECH-002",
            "OPS-003",
        ]
    );
    assert!(set.conflicts.is_empty());
    assert_eq!(set.active_count(), 8);
    assert_eq!(set.by_category(RequirementCategory::Compliance).len(), 2);
    assert_eq!(set.get("COMP-001").map(|r| r.overall_priority), Some(0.845));
}

#[test]
fn equal_priorities_keep_id_order() {
    let raw = community_questionnaire().with_response(
        "security_requirements",
        list(&["Encryption at rest", "Audit logging", "Role-based access"]),
    );
    let set = extract(&raw);

    let controls: Vec<&str> = set
        .requirements
        .iter()
        .filter(|requirement| {
            matches!(requirement.kind, RequirementKind::SecurityControl { .. })
        })
        .map(|requirement| requirement.id.as_str())
        .collect();
    assert_eq!(controls, vec!["COMP-002", "COMP-003", "COMP-004"]);

    let positions: Vec<usize> = controls
        .iter()
        .filter_map(|id| set.requirements.iter().position(|r| r.id == *id))
        .collect();
    assert_eq!(positions[1], positions[0] + 1);
    assert_eq!(positions[2], positions[1] + 1);

    for pair in set.requirements.windows(2) {
        assert!(pair[0].overall_priority >= pair[1].overall_priority);
    }
}

#[test]
fn data_residency_supersedes_cloud_hosting() {
    let raw = community_questionnaire()
        .with_response("deployment_preference", text("cloud"))
        .with_response("data_residency", text("on-premise"));
    let set = extract(&raw);

    let cloud = set.get("TECH-002").expect("deployment requirement");
    assert_eq!(
        cloud.kind,
        RequirementKind::DeploymentModel {
            model: InfrastructureModel::Cloud
        }
    );
    let resolution = cloud.resolution.as_ref().expect("cloud is superseded");
    assert_eq!(resolution.superseded_by, "TECH-004");
    assert!(resolution.reason.contains("cloud hosting"));

    assert_eq!(set.conflicts.len(), 1);
    assert_eq!(
        set.conflicts[0].kept_constraint,
        DeploymentConstraint::OnPremiseDataResidency
    );
    assert_eq!(set.active_count(), set.requirements.len() - 1);
}

#[test]
fn urgent_timeline_supersedes_phased_rollout() {
    let raw = community_questionnaire()
        .with_response("timeline", text("urgent"))
        .with_response("rollout_strategy", text("phased"));
    let set = extract(&raw);

    let timeline = set.get("OPS-004").expect("timeline requirement");
    assert!(timeline.is_active());
    let rollout = set.get("OPS-005").expect("rollout requirement");
    assert_eq!(
        rollout.resolution.as_ref().map(|r| r.superseded_by.as_str()),
        Some("OPS-004")
    );
}

#[test]
fn superseded_requirements_never_supersede_others() {
    let mut requirements = vec![
        requirement("TECH-001", RequirementKind::DataResidency, 0.9),
        requirement(
            "TECH-002",
            RequirementKind::DeploymentModel {
                model: InfrastructureModel::Cloud,
            },
            0.8,
        ),
        requirement(
            "TECH-003",
            RequirementKind::DeploymentModel {
                model: InfrastructureModel::OnPremise,
            },
            0.7,
        ),
    ];

    let conflicts = resolve_conflicts(&mut requirements);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].superseded, "TECH-002");
    assert!(requirements[0].is_active());
    assert!(!requirements[1].is_active());
    assert!(requirements[2].is_active());
}

#[test]
fn missing_compliance_yields_no_framework_requirements() {
    let mut raw = community_questionnaire();
    raw.metadata.compliance_frameworks.clear();
    let set = extract(&raw);

    assert!(set
        .requirements
        .iter()
        .all(|requirement| !matches!(
            requirement.kind,
            RequirementKind::ComplianceFramework { .. }
        )));
    assert_eq!(set.get("COMP-001").map(|r| &r.kind), Some(&RequirementKind::SecurityControl {
        control: "Role-based access".to_string()
    }));
}

#[test]
fn priority_weights_are_clamped() {
    let weights = PriorityWeights::new(1.4, -0.2, f64::NAN);
    assert_eq!(weights.clinical, 1.0);
    assert_eq!(weights.urgency, 0.0);
    assert_eq!(weights.complexity, 0.0);
    assert_eq!(weights.overall(), 0.4);
}
