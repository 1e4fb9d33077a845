mod mapping;
mod plan;

use std::sync::Arc;

use crate::cache::{AssessmentCache, CacheCapacities};
use crate::pipeline::assessment::{
    HeuristicPredictor, HospitalAssessment, HospitalAssessmentEngine, VendorKnowledgeTable,
};
use crate::pipeline::formulas::{ComputedMetrics, FormulasEngine};
use crate::pipeline::questionnaire::{
    HospitalProfile, ImplementationPreferences, ProcessedQuestionnaire, QuestionnaireProcessor,
    QuestionnaireSection, RawQuestionnaire, RequirementSet,
};
use crate::pipeline::test_support::community_questionnaire;

struct Fixture {
    processed: ProcessedQuestionnaire,
    requirements: RequirementSet,
    metrics: ComputedMetrics,
    assessment: HospitalAssessment,
}

fn assess(profile: &HospitalProfile) -> HospitalAssessment {
    HospitalAssessmentEngine::new(
        VendorKnowledgeTable::standard(),
        Arc::new(HeuristicPredictor::new()),
        Arc::new(AssessmentCache::with_capacities(
            CacheCapacities::default(),
            300.0,
        )),
    )
    .assess_hospital(profile)
}

fn fixture_from(processed: ProcessedQuestionnaire) -> Fixture {
    let requirements = QuestionnaireProcessor::new().extract_requirements(&processed);
    let metrics = FormulasEngine::new().compute(&processed.profile);
    let assessment = assess(&processed.profile);
    Fixture {
        processed,
        requirements,
        metrics,
        assessment,
    }
}

fn fixture_for(raw: &RawQuestionnaire) -> Fixture {
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(raw)
        .expect("questionnaire is valid");
    fixture_from(processed)
}

fn community_fixture() -> Fixture {
    fixture_for(&community_questionnaire())
}

/// Profile-only fixture with no preference answers.
fn profile_fixture(profile: HospitalProfile) -> Fixture {
    fixture_from(ProcessedQuestionnaire {
        profile,
        completeness: 1.0,
        sections_present: QuestionnaireSection::ordered().to_vec(),
        missing_sections: Vec::new(),
        warnings: Vec::new(),
        preferences: ImplementationPreferences::default(),
    })
}
