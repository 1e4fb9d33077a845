use std::collections::BTreeMap;

use crate::pipeline::questionnaire::{
    HospitalProfile, HospitalType, InfrastructureModel, LocationClass, QuestionnaireMetadata,
    RawQuestionnaire, ResponseValue, TimelineUrgency,
};

pub(crate) fn text(value: &str) -> ResponseValue {
    ResponseValue::Text(value.to_string())
}

pub(crate) fn list(values: &[&str]) -> ResponseValue {
    ResponseValue::List(values.iter().map(|value| value.to_string()).collect())
}

/// 100-bed community hospital on Epic with HIPAA only.
pub(crate) fn community_profile() -> HospitalProfile {
    HospitalProfile {
        hospital_id: Some("hosp-riverside".to_string()),
        name: "Riverside Community Hospital".to_string(),
        hospital_type: HospitalType::Community,
        bed_count: 100,
        annual_volume: Some(42_000),
        location: LocationClass::Suburban,
        primary_ehr: Some("Epic".to_string()),
        additional_ehrs: Vec::new(),
        clinical_systems: vec![
            "PACS".to_string(),
            "Laboratory".to_string(),
            "Pharmacy".to_string(),
        ],
        compliance_frameworks: vec!["HIPAA".to_string()],
        interoperability_standards: Vec::new(),
        custom_apis: false,
        infrastructure: InfrastructureModel::OnPremise,
        it_staff_count: Some(12),
        timeline: TimelineUrgency::Standard,
        technology_maturity: 6.9,
    }
}

/// 900-bed academic centre on a legacy multi-EHR estate; maturity is set low by hand.
pub(crate) fn academic_profile() -> HospitalProfile {
    HospitalProfile {
        hospital_id: Some("hosp-university".to_string()),
        name: "University Medical Center".to_string(),
        hospital_type: HospitalType::Academic,
        bed_count: 900,
        annual_volume: Some(310_000),
        location: LocationClass::Urban,
        primary_ehr: Some("Oracle Health".to_string()),
        additional_ehrs: vec!["MEDITECH".to_string(), "Allscripts".to_string()],
        clinical_systems: (1..=12).map(|n| format!("System {n}")).collect(),
        compliance_frameworks: vec![
            "HIPAA".to_string(),
            "HITRUST".to_string(),
            "SOC2".to_string(),
            "GDPR".to_string(),
        ],
        interoperability_standards: vec!["FHIR".to_string(), "HL7".to_string()],
        custom_apis: true,
        infrastructure: InfrastructureModel::Hybrid,
        it_staff_count: Some(3),
        timeline: TimelineUrgency::Urgent,
        technology_maturity: 4.2,
    }
}

/// Questionnaire answers describing the community hospital scenario.
pub(crate) fn community_questionnaire() -> RawQuestionnaire {
    let mut responses = BTreeMap::new();
    responses.insert("hospital_name".to_string(), text("Riverside Community Hospital"));
    responses.insert("hospital_type".to_string(), text("community"));
    responses.insert("bed_count".to_string(), ResponseValue::Number(100.0));
    responses.insert("annual_volume".to_string(), ResponseValue::Number(42_000.0));
    responses.insert("location".to_string(), text("suburban"));
    responses.insert("primary_ehr".to_string(), text("Epic"));
    responses.insert(
        "clinical_systems".to_string(),
        list(&["PACS", "Laboratory", "Pharmacy"]),
    );
    responses.insert("current_infrastructure".to_string(), text("on-premise"));
    responses.insert("deployment_preference".to_string(), text("hybrid"));
    responses.insert("security_requirements".to_string(), list(&["Role-based access"]));
    responses.insert("mfa_required".to_string(), ResponseValue::Flag(true));
    responses.insert("it_staff_count".to_string(), ResponseValue::Number(12.0));
    responses.insert("support_model".to_string(), text("24x7"));
    responses.insert("uptime_target".to_string(), ResponseValue::Number(99.9));

    RawQuestionnaire {
        responses,
        metadata: QuestionnaireMetadata {
            hospital_id: Some("hosp-riverside".to_string()),
            timeline: None,
            compliance_frameworks: vec!["HIPAA".to_string()],
            interoperability_standards: Vec::new(),
        },
    }
}
