use super::domain::{
    normalize_framework, HospitalProfile, HospitalType, ImplementationPreferences,
    InfrastructureModel, LocationClass, ProcessedQuestionnaire, QuestionnaireSection,
    RawQuestionnaire, ResponseValue, RolloutStrategy, TimelineUrgency, ValidationError,
};
use crate::pipeline::formulas::bounded::{bounded, round_to};

pub(crate) const MIN_BEDS: f64 = 1.0;
pub(crate) const MAX_BEDS: f64 = 5000.0;

pub(crate) fn process(raw: &RawQuestionnaire) -> Result<ProcessedQuestionnaire, ValidationError> {
    let mut warnings = Vec::new();

    let name = raw
        .answer("hospital_name")
        .and_then(ResponseValue::as_text)
        .ok_or(ValidationError::MissingField {
            field: "hospital_name",
        })?;

    let type_label = raw
        .answer("hospital_type")
        .and_then(ResponseValue::as_text)
        .ok_or(ValidationError::MissingField {
            field: "hospital_type",
        })?;

    let beds_answer = raw.answer("bed_count").ok_or(ValidationError::MissingField {
        field: "bed_count",
    })?;
    let raw_beds = beds_answer
        .as_number()
        .ok_or(ValidationError::InvalidField {
            field: "bed_count",
            expected: "a number",
        })?;

    let hospital_type = HospitalType::parse(&type_label).unwrap_or_else(|| {
        warnings.push(format!(
            "unrecognised hospital type '{type_label}', treating as general"
        ));
        HospitalType::General
    });

    let beds = bounded(raw_beds.round(), MIN_BEDS, MAX_BEDS, 100.0);
    if beds != raw_beds {
        warnings.push(format!(
            "bed count {raw_beds} adjusted to {beds} (supported range {MIN_BEDS}-{MAX_BEDS})"
        ));
    }
    let bed_count = beds as u32;

    let annual_volume = numeric_answer(raw, "annual_volume", &mut warnings)
        .filter(|volume| *volume >= 0.0)
        .map(|volume| volume.round() as u64);

    let it_staff_count = numeric_answer(raw, "it_staff_count", &mut warnings)
        .filter(|staff| *staff >= 0.0)
        .map(|staff| staff.round().min(u32::MAX as f64) as u32);

    let location = raw
        .answer("location")
        .and_then(ResponseValue::as_text)
        .and_then(|label| LocationClass::parse(&label))
        .unwrap_or(LocationClass::Suburban);

    let primary_ehr = raw.answer("primary_ehr").and_then(ResponseValue::as_text);
    let additional_ehrs = list_answer(raw, "additional_ehrs");
    let clinical_systems = list_answer(raw, "clinical_systems");

    let compliance_frameworks = merge_unique(
        list_answer(raw, "compliance_frameworks"),
        &raw.metadata.compliance_frameworks,
        normalize_framework,
    );
    let interoperability_standards = merge_unique(
        list_answer(raw, "interoperability_standards"),
        &raw.metadata.interoperability_standards,
        |value| value.trim().to_ascii_uppercase(),
    );

    let custom_apis = raw
        .answer("custom_apis")
        .and_then(ResponseValue::as_flag)
        .unwrap_or(false);

    let infrastructure = raw
        .answer("current_infrastructure")
        .and_then(ResponseValue::as_text)
        .map(|label| InfrastructureModel::parse(&label))
        .unwrap_or_default();

    let timeline_label = raw
        .answer("timeline")
        .and_then(ResponseValue::as_text)
        .or_else(|| {
            raw.metadata
                .timeline
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        });
    let timeline = match timeline_label.as_deref() {
        Some(label) => TimelineUrgency::parse(label).unwrap_or_else(|| {
            warnings.push(format!(
                "unrecognised timeline '{label}', assuming standard"
            ));
            TimelineUrgency::Standard
        }),
        None => TimelineUrgency::Standard,
    };

    let mut profile = HospitalProfile {
        hospital_id: raw
            .metadata
            .hospital_id
            .clone()
            .filter(|id| !id.trim().is_empty()),
        name,
        hospital_type,
        bed_count,
        annual_volume,
        location,
        primary_ehr,
        additional_ehrs,
        clinical_systems,
        compliance_frameworks,
        interoperability_standards,
        custom_apis,
        infrastructure,
        it_staff_count,
        timeline,
        technology_maturity: 0.0,
    };
    profile.technology_maturity = technology_maturity(&profile);

    let preferences = ImplementationPreferences {
        deployment_preference: raw
            .answer("deployment_preference")
            .and_then(ResponseValue::as_text)
            .map(|label| InfrastructureModel::parse(&label))
            .filter(|model| *model != InfrastructureModel::Unknown),
        data_residency_on_premise: raw
            .answer("data_residency")
            .and_then(ResponseValue::as_text)
            .map(|label| InfrastructureModel::parse(&label) == InfrastructureModel::OnPremise)
            .unwrap_or(false),
        rollout_strategy: raw
            .answer("rollout_strategy")
            .and_then(ResponseValue::as_text)
            .and_then(|label| RolloutStrategy::parse(&label)),
        security_requirements: list_answer(raw, "security_requirements"),
        mfa_required: raw.answer("mfa_required").and_then(ResponseValue::as_flag),
        support_model: raw.answer("support_model").and_then(ResponseValue::as_text),
        uptime_target: numeric_answer(raw, "uptime_target", &mut warnings)
            .map(|target| bounded(target, 90.0, 99.999, 99.9)),
        budget_usd: numeric_answer(raw, "budget", &mut warnings).filter(|budget| *budget > 0.0),
        timeline_answered: timeline_label.is_some(),
    };

    let (sections_present, missing_sections): (Vec<_>, Vec<_>) = QuestionnaireSection::ordered()
        .into_iter()
        .partition(|section| section_present(raw, *section));
    let completeness = round_to(
        sections_present.len() as f64 / QuestionnaireSection::ordered().len() as f64,
        4,
    );

    Ok(ProcessedQuestionnaire {
        profile,
        completeness,
        sections_present,
        missing_sections,
        warnings,
        preferences,
    })
}

fn section_present(raw: &RawQuestionnaire, section: QuestionnaireSection) -> bool {
    let answered = section
        .questions()
        .iter()
        .any(|question| raw.answer(question).is_some());

    answered
        || match section {
            QuestionnaireSection::Compliance => !raw.metadata.compliance_frameworks.is_empty(),
            QuestionnaireSection::Integration => {
                !raw.metadata.interoperability_standards.is_empty()
            }
            QuestionnaireSection::Timeline => raw
                .metadata
                .timeline
                .as_deref()
                .map(|timeline| !timeline.trim().is_empty())
                .unwrap_or(false),
            _ => false,
        }
}

fn numeric_answer(
    raw: &RawQuestionnaire,
    question: &'static str,
    warnings: &mut Vec<String>,
) -> Option<f64> {
    let answer = raw.answer(question)?;
    match answer.as_number() {
        Some(value) => Some(value),
        None => {
            warnings.push(format!("ignored non-numeric answer for '{question}'"));
            None
        }
    }
}

fn list_answer(raw: &RawQuestionnaire, question: &str) -> Vec<String> {
    raw.answer(question)
        .map(ResponseValue::as_list)
        .unwrap_or_default()
}

fn merge_unique<F>(primary: Vec<String>, secondary: &[String], normalize: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut merged: Vec<String> = Vec::new();
    for value in primary.iter().chain(secondary.iter()) {
        let normalized = normalize(value);
        if !normalized.is_empty() && !merged.contains(&normalized) {
            merged.push(normalized);
        }
    }
    merged
}

fn technology_maturity(profile: &HospitalProfile) -> f64 {
    let mut maturity = 3.0;

    if profile.primary_ehr.is_some() {
        maturity += 2.0;
    }
    if profile.supports_fhir() {
        maturity += 1.0;
    }
    if profile.supports_hl7() {
        maturity += 1.0;
    }

    maturity += profile.clinical_systems.len().min(5) as f64 * 0.3;

    maturity += match profile.infrastructure {
        InfrastructureModel::Cloud => 1.5,
        InfrastructureModel::Hybrid => 1.0,
        InfrastructureModel::OnPremise => 0.5,
        InfrastructureModel::Unknown => 0.0,
    };

    maturity += match profile.it_staff_count {
        Some(staff) if staff >= 20 => 1.0,
        Some(staff) if staff >= 5 => 0.5,
        _ => 0.0,
    };

    round_to(bounded(maturity, 0.0, 10.0, 5.0), 1)
}
