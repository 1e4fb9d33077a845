use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use hospital_transform::cache::{AssessmentCache, CacheCapacities};
use hospital_transform::config::PipelineConfig;
use hospital_transform::pipeline::assessment::{
    HeuristicPredictor, HospitalAssessmentEngine, VendorKnowledgeTable,
};
use hospital_transform::pipeline::questionnaire::{InfrastructureModel, RawQuestionnaire};
use hospital_transform::pipeline::transformation::{
    RecordingEventPublisher, TransformationEvent,
};
use hospital_transform::{CancellationFlag, TransformationEngine};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn questionnaire(name: &str) -> RawQuestionnaire {
    let data = std::fs::read_to_string(fixture_path(name)).expect("fixture readable");
    serde_json::from_str(&data).expect("fixture is a questionnaire")
}

fn engine(
    vendors: VendorKnowledgeTable,
    publisher: Arc<RecordingEventPublisher>,
) -> TransformationEngine {
    let assessment = HospitalAssessmentEngine::new(
        vendors,
        Arc::new(HeuristicPredictor::new()),
        Arc::new(AssessmentCache::with_capacities(
            CacheCapacities::new(4, 8, 16),
            300.0,
        )),
    );
    TransformationEngine::new(&PipelineConfig::default(), assessment, publisher)
}

#[test]
fn community_fixture_produces_a_complete_specification() {
    let publisher = Arc::new(RecordingEventPublisher::new());
    let engine = engine(VendorKnowledgeTable::standard(), publisher.clone());

    let result = engine
        .transform(
            &questionnaire("community_hospital.json"),
            &CancellationFlag::new(),
        )
        .expect("community fixture transforms");

    assert_eq!(result.hospital_id.as_deref(), Some("hosp-riverside"));
    assert!(result.specification.missing_sections().is_empty());
    assert!(result.validation.issues.is_empty());
    assert!(!result.validation.refinement_required);
    assert!(result.quality_score > 0.0 && result.quality_score <= 1.0);
    assert!((0.5..=0.6).contains(&result.computed_metrics.hcs));
    assert!(result.computed_metrics.sidi < 1.0);
    assert_eq!(publisher.len(), 1);

    let record = result.to_record().expect("record serializes");
    assert_eq!(record["transformation_id"], result.transformation_id.as_str());
}

#[test]
fn data_residency_keeps_the_network_on_premise() {
    let engine = engine(
        VendorKnowledgeTable::standard(),
        Arc::new(RecordingEventPublisher::new()),
    );

    let result = engine
        .transform(
            &questionnaire("regional_network.json"),
            &CancellationFlag::new(),
        )
        .expect("network fixture transforms");

    let infrastructure = result
        .specification
        .infrastructure
        .as_ref()
        .expect("infrastructure section");
    assert_eq!(infrastructure.deployment_model, InfrastructureModel::OnPremise);
    assert!(infrastructure.data_residency_on_premise);
    assert_eq!(infrastructure.budget_usd, Some(2_000_000.0));

    let standards = result
        .specification
        .integration
        .as_ref()
        .map(|integration| integration.standards.clone())
        .unwrap_or_default();
    let unique: HashSet<String> = standards
        .iter()
        .map(|standard| standard.to_ascii_uppercase())
        .collect();
    assert_eq!(unique.len(), standards.len());
}

#[test]
fn csv_vendor_table_drives_recommendations() {
    let vendors =
        VendorKnowledgeTable::from_path(fixture_path("vendors.csv")).expect("vendor table loads");
    assert_eq!(vendors.len(), 3);
    let engine = engine(vendors, Arc::new(RecordingEventPublisher::new()));

    let result = engine
        .transform(
            &questionnaire("community_hospital.json"),
            &CancellationFlag::new(),
        )
        .expect("transforms");

    let known = ["Epic", "CareCloud", "Vista"];
    assert!(!result.vendor_recommendations.is_empty());
    assert!(result
        .vendor_recommendations
        .iter()
        .all(|ranked| known.contains(&ranked.vendor.vendor_name.as_str())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_share_one_consistent_cache() {
    let publisher = Arc::new(RecordingEventPublisher::new());
    let engine = Arc::new(engine(VendorKnowledgeTable::standard(), publisher.clone()));
    let inputs = [
        questionnaire("community_hospital.json"),
        questionnaire("regional_network.json"),
    ];

    let mut handles = Vec::new();
    for run in 0..8 {
        let engine = Arc::clone(&engine);
        let raw = inputs[run % inputs.len()].clone();
        handles.push(tokio::task::spawn_blocking(move || {
            engine.transform(&raw, &CancellationFlag::new())
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let result = handle
            .await
            .expect("task joins")
            .expect("transformation succeeds");
        ids.insert(result.transformation_id);
    }
    assert_eq!(ids.len(), 8);

    let cache = engine.assessment_engine().cache();
    assert!(cache.check_consistency().is_ok());
    assert_eq!(cache.len(), 2);
    let stats = engine.cache_stats();
    assert_eq!(stats.hits() + stats.misses, 8);
    assert!(stats.sets >= 2);

    let events = publisher.events();
    assert_eq!(events.len(), 8);
    assert!(events
        .iter()
        .all(|event| matches!(event, TransformationEvent::Completed { .. })));
}

#[test]
fn cancellation_from_another_thread_is_observed() {
    let engine = engine(
        VendorKnowledgeTable::standard(),
        Arc::new(RecordingEventPublisher::new()),
    );
    let cancel = CancellationFlag::new();
    let remote = cancel.clone();

    std::thread::spawn(move || remote.cancel())
        .join()
        .expect("cancel thread joins");

    let err = engine
        .transform(&questionnaire("community_hospital.json"), &cancel)
        .expect_err("cancelled before the first checkpoint");
    assert!(err.to_string().contains("cancelled after the parse stage"));
}
