use crate::pipeline::questionnaire::{
    HospitalType, QuestionnaireProcessor, QuestionnaireSection, ResponseValue, TimelineUrgency,
    ValidationError,
};
use crate::pipeline::test_support::{community_profile, community_questionnaire, list, text};

#[test]
fn community_answers_produce_the_community_profile() {
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&community_questionnaire())
        .expect("community questionnaire is valid");

    assert_eq!(processed.profile, community_profile());
    assert_eq!(processed.completeness, 0.75);
    assert_eq!(
        processed.missing_sections,
        vec![QuestionnaireSection::Integration, QuestionnaireSection::Timeline]
    );
    assert!(processed.warnings.is_empty(), "{:?}", processed.warnings);
    assert_eq!(processed.preferences.uptime_target, Some(99.9));
    assert_eq!(processed.preferences.mfa_required, Some(true));
    assert!(!processed.preferences.timeline_answered);
}

#[test]
fn missing_identity_fields_are_rejected() {
    let processor = QuestionnaireProcessor::new();

    for field in ["hospital_name", "hospital_type", "bed_count"] {
        let mut raw = community_questionnaire();
        raw.responses.remove(field);
        match processor.process_questionnaire(&raw) {
            Err(ValidationError::MissingField { field: missing }) => assert_eq!(missing, field),
            other => panic!("expected missing {field}, got {other:?}"),
        }
    }

    let blank = community_questionnaire().with_response("hospital_name", text("   "));
    assert_eq!(
        processor.process_questionnaire(&blank),
        Err(ValidationError::MissingField {
            field: "hospital_name"
        })
    );
}

#[test]
fn non_numeric_bed_count_is_invalid() {
    let raw = community_questionnaire().with_response("bed_count", text("about a hundred"));

    match QuestionnaireProcessor::new().process_questionnaire(&raw) {
        Err(ValidationError::InvalidField { field, .. }) => assert_eq!(field, "bed_count"),
        other => panic!("expected invalid bed count, got {other:?}"),
    }
}

#[test]
fn missing_compliance_lowers_completeness_without_failing() {
    let mut raw = community_questionnaire();
    raw.metadata.compliance_frameworks.clear();

    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("compliance is optional");

    assert_eq!(processed.completeness, 0.625);
    assert!(processed
        .missing_sections
        .contains(&QuestionnaireSection::Compliance));
    assert!(processed.profile.compliance_frameworks.is_empty());
}

#[test]
fn out_of_range_beds_are_clamped_with_a_warning() {
    let raw = community_questionnaire().with_response("bed_count", ResponseValue::Number(9000.0));
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("clamped, not rejected");

    assert_eq!(processed.profile.bed_count, 5000);
    assert!(processed
        .warnings
        .iter()
        .any(|warning| warning.contains("bed count")));

    let raw = community_questionnaire().with_response("bed_count", text("0"));
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("clamped, not rejected");
    assert_eq!(processed.profile.bed_count, 1);
}

#[test]
fn unknown_hospital_type_falls_back_to_general() {
    let raw = community_questionnaire().with_response("hospital_type", text("veterinary"));
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("unknown type is tolerated");

    assert_eq!(processed.profile.hospital_type, HospitalType::General);
    assert_eq!(processed.warnings.len(), 1);
}

#[test]
fn unparseable_optional_numbers_become_warnings() {
    let raw = community_questionnaire()
        .with_response("annual_volume", text("lots"))
        .with_response("it_staff_count", ResponseValue::Flag(true));
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("optional numbers never fail processing");

    assert_eq!(processed.profile.annual_volume, None);
    assert_eq!(processed.profile.it_staff_count, None);
    assert_eq!(processed.warnings.len(), 2);
}

#[test]
fn metadata_fills_timeline_and_frameworks() {
    let mut raw = community_questionnaire()
        .with_response("compliance_frameworks", list(&["hipaa", "SOC 2"]))
        .with_response("interoperability_standards", text("fhir r4, hl7v2"));
    raw.metadata.timeline = Some("6 months".to_string());

    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(&raw)
        .expect("valid questionnaire");
    let profile = &processed.profile;

    assert_eq!(profile.timeline, TimelineUrgency::Urgent);
    assert_eq!(profile.compliance_frameworks, vec!["HIPAA", "SOC2"]);
    assert!(profile.supports_fhir());
    assert!(profile.supports_hl7());
    assert_eq!(processed.completeness, 1.0);
    assert!(processed.preferences.timeline_answered);
    // 3 + 2 (ehr) + 1 (fhir) + 1 (hl7) + 0.9 (systems) + 0.5 (on-prem) + 0.5 (staff)
    assert_eq!(profile.technology_maturity, 8.9);
}
