use super::recording_engine;
use crate::pipeline::assessment::{RiskCategory, RiskLevel};
use crate::pipeline::specification::MitigationItem;
use crate::pipeline::test_support::community_questionnaire;
use crate::pipeline::transformation::optimize::optimize;
use crate::pipeline::transformation::{CancellationFlag, StageFailure, TransformationResult};

fn community_result() -> TransformationResult {
    let (engine, _) = recording_engine();
    engine
        .transform(&community_questionnaire(), &CancellationFlag::new())
        .expect("transforms")
}

fn mitigation(level: RiskLevel, risk: &str) -> MitigationItem {
    MitigationItem {
        category: RiskCategory::Technical,
        level,
        risk: risk.to_string(),
        mitigation: "Plan for it".to_string(),
    }
}

#[test]
fn standards_are_deduplicated_ignoring_case() {
    let result = community_result();
    let mut spec = result.specification.clone();
    if let Some(integration) = spec.integration.as_mut() {
        integration.standards = vec![
            "FHIR R4".to_string(),
            "fhir r4".to_string(),
            "HL7V2".to_string(),
            " FHIR R4 ".to_string(),
        ];
    }

    let optimized = optimize(&spec, &result.computed_metrics).expect("finite metrics");

    let standards = optimized
        .integration
        .as_ref()
        .map(|integration| integration.standards.clone())
        .unwrap_or_default();
    assert_eq!(standards, vec!["FHIR R4", "HL7V2"]);
    assert_eq!(
        spec.integration.as_ref().map(|integration| integration.standards.len()),
        Some(4)
    );
}

#[test]
fn mitigations_are_ordered_by_severity() {
    let result = community_result();
    let mut spec = result.specification.clone();
    if let Some(mitigations) = spec.risk_mitigation.as_mut() {
        mitigations.items = vec![
            mitigation(RiskLevel::Medium, "first medium"),
            mitigation(RiskLevel::Critical, "critical"),
            mitigation(RiskLevel::Low, "low"),
            mitigation(RiskLevel::Medium, "second medium"),
        ];
    }

    let optimized = optimize(&spec, &result.computed_metrics).expect("finite metrics");

    let order: Vec<&str> = optimized
        .risk_mitigation
        .as_ref()
        .map(|mitigations| mitigations.items.iter().map(|item| item.risk.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(order, vec!["critical", "first medium", "second medium", "low"]);
}

#[test]
fn storage_notes_are_added_once() {
    let result = community_result();
    let notes = result
        .specification
        .infrastructure
        .as_ref()
        .map(|infrastructure| infrastructure.notes.clone())
        .unwrap_or_default();
    assert_eq!(notes.len(), 3);
    assert!(notes[0].starts_with("Hot tier: 1.50 TB"));

    let again = optimize(&result.specification, &result.computed_metrics).expect("finite");
    assert_eq!(again, result.specification);
}

#[test]
fn non_finite_metrics_are_rejected() {
    let result = community_result();
    let mut metrics = result.computed_metrics.clone();
    metrics.raf.cost.annual_usd = f64::INFINITY;

    assert_eq!(
        optimize(&result.specification, &metrics),
        Err(StageFailure::NonFiniteMetric {
            metric: "cost.annual_usd"
        })
    );

    metrics.hcs = f64::NAN;
    assert_eq!(
        optimize(&result.specification, &metrics),
        Err(StageFailure::NonFiniteMetric { metric: "hcs" })
    );
}
