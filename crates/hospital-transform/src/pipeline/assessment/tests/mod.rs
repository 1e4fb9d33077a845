
use std::sync::Arc;

use super::{HeuristicPredictor, HospitalAssessmentEngine, VendorKnowledgeTable};
use crate::cache::{AssessmentCache, CacheCapacities};

fn standard_engine() -> HospitalAssessmentEngine {
    HospitalAssessmentEngine::new(
        VendorKnowledgeTable::standard(),
        Arc::new(HeuristicPredictor::new()),
        Arc::new(AssessmentCache::with_capacities(
            CacheCapacities::default(),
            300.0,
        )),
    )
}
