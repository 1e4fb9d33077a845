mod optimize;

use std::sync::Arc;

use crate::cache::{AssessmentCache, CacheCapacities};
use crate::config::PipelineConfig;
use crate::pipeline::assessment::{
    HeuristicPredictor, HospitalAssessmentEngine, VendorKnowledgeTable,
};
use crate::pipeline::questionnaire::{RawQuestionnaire, ResponseValue};
use crate::pipeline::test_support::{list, text};

use super::{RecordingEventPublisher, TransformationEngine, TransformationEventPublisher};

fn engine_with(publisher: Arc<dyn TransformationEventPublisher>) -> TransformationEngine {
    let assessment = HospitalAssessmentEngine::new(
        VendorKnowledgeTable::standard(),
        Arc::new(HeuristicPredictor::new()),
        Arc::new(AssessmentCache::with_capacities(
            CacheCapacities::default(),
            300.0,
        )),
    );
    TransformationEngine::new(&PipelineConfig::default(), assessment, publisher)
}

fn recording_engine() -> (TransformationEngine, Arc<RecordingEventPublisher>) {
    let publisher = Arc::new(RecordingEventPublisher::new());
    (engine_with(publisher.clone()), publisher)
}

/// Large academic centre with three IT staff and a six-month deadline.
fn understaffed_academic_questionnaire() -> RawQuestionnaire {
    let mut raw = RawQuestionnaire::default()
        .with_response("hospital_name", text("University Medical Center"))
        .with_response("hospital_type", text("academic"))
        .with_response("bed_count", ResponseValue::Number(900.0))
        .with_response("location", text("urban"))
        .with_response("primary_ehr", text("Oracle Health"))
        .with_response("additional_ehrs", list(&["MEDITECH", "Allscripts"]))
        .with_response(
            "clinical_systems",
            list(&["PACS", "Laboratory", "Pharmacy", "Radiology", "Oncology"]),
        )
        .with_response("current_infrastructure", text("hybrid"))
        .with_response("it_staff_count", ResponseValue::Number(3.0))
        .with_response("custom_apis", ResponseValue::Flag(true));
    raw.metadata.hospital_id = Some("hosp-university".to_string());
    raw.metadata.timeline = Some("6 months".to_string());
    raw.metadata.compliance_frameworks = vec!["HIPAA".to_string(), "HITRUST".to_string()];
    raw
}
