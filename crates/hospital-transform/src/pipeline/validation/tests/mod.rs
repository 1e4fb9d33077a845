
use std::sync::Arc;

use crate::cache::{AssessmentCache, CacheCapacities};
use crate::pipeline::assessment::{
    HeuristicPredictor, HospitalAssessmentEngine, VendorKnowledgeTable,
};
use crate::pipeline::formulas::FormulasEngine;
use crate::pipeline::questionnaire::{
    HospitalProfile, ImplementationPreferences, ProcessedQuestionnaire, QuestionnaireProcessor,
    QuestionnaireSection, RawQuestionnaire, RequirementSet,
};
use crate::pipeline::specification::{Specification, SpecificationGenerator};

/// Mapped specification with its plan attached, plus the requirements it came from.
fn planned(processed: &ProcessedQuestionnaire) -> (Specification, RequirementSet) {
    let processor = QuestionnaireProcessor::new();
    let generator = SpecificationGenerator::new();
    let requirements = processor.extract_requirements(processed);
    let metrics = FormulasEngine::new().compute(&processed.profile);
    let assessment = HospitalAssessmentEngine::new(
        VendorKnowledgeTable::standard(),
        Arc::new(HeuristicPredictor::new()),
        Arc::new(AssessmentCache::with_capacities(
            CacheCapacities::default(),
            300.0,
        )),
    )
    .assess_hospital(&processed.profile);

    let spec = generator.map_requirements_to_specification(
        processed,
        &requirements,
        &metrics,
        &assessment,
    );
    let plan = generator.generate_implementation_plan(&processed.profile, &assessment, &metrics);
    (generator.attach_plan(&spec, &plan), requirements)
}

fn planned_from_raw(raw: &RawQuestionnaire) -> (Specification, RequirementSet) {
    let processed = QuestionnaireProcessor::new()
        .process_questionnaire(raw)
        .expect("questionnaire is valid");
    planned(&processed)
}

fn planned_from_profile(profile: HospitalProfile) -> (Specification, RequirementSet) {
    planned(&ProcessedQuestionnaire {
        profile,
        completeness: 1.0,
        sections_present: QuestionnaireSection::ordered().to_vec(),
        missing_sections: Vec::new(),
        warnings: Vec::new(),
        preferences: ImplementationPreferences::default(),
    })
}
