//! Vendor compatibility, complexity and risk assessment for a hospital profile.

mod complexity;
mod predictor;
mod ranking;
mod risk;
mod vendors;

#[cfg(test)]
mod tests;

pub use predictor::{CompatibilityPredictor, HeuristicPredictor};
pub use ranking::{
    rank_vendors, RankedVendor, VendorCompatibility, MAX_RECOMMENDATIONS,
    MIN_RECOMMENDED_COMPATIBILITY,
};
pub use risk::{RiskAssessment, RiskCategory, RiskItem, RiskLevel};
pub use vendors::{VendorKnowledgeTable, VendorProfile, VendorTableError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{AssessmentCache, CacheContext};
use crate::pipeline::questionnaire::HospitalProfile;

/// Assessment output, cached per hospital identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalAssessment {
    pub hospital_name: String,
    pub complexity_score: f64,
    pub vendor_compatibilities: Vec<VendorCompatibility>,
    pub recommendations: Vec<RankedVendor>,
    pub risk_assessment: RiskAssessment,
    pub assessed_at: DateTime<Utc>,
}

impl HospitalAssessment {
    pub fn top_vendor(&self) -> Option<&RankedVendor> {
        self.recommendations.first()
    }
}

/// Scores a hospital against the vendor table, memoizing results in the shared cache.
pub struct HospitalAssessmentEngine {
    vendors: VendorKnowledgeTable,
    predictor: Arc<dyn CompatibilityPredictor>,
    cache: Arc<AssessmentCache<HospitalAssessment>>,
}

impl std::fmt::Debug for HospitalAssessmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HospitalAssessmentEngine")
            .field("vendors", &self.vendors.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl HospitalAssessmentEngine {
    pub fn new(
        vendors: VendorKnowledgeTable,
        predictor: Arc<dyn CompatibilityPredictor>,
        cache: Arc<AssessmentCache<HospitalAssessment>>,
    ) -> Self {
        Self {
            vendors,
            predictor,
            cache,
        }
    }

    pub fn vendors(&self) -> &VendorKnowledgeTable {
        &self.vendors
    }

    pub fn cache(&self) -> &Arc<AssessmentCache<HospitalAssessment>> {
        &self.cache
    }

    pub fn assess_hospital(&self, profile: &HospitalProfile) -> HospitalAssessment {
        let key = cache_key(profile);
        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "assessment cache hit");
            return cached;
        }

        let complexity_score = complexity::complexity_score(profile);
        let vendor_compatibilities: Vec<VendorCompatibility> = self
            .vendors
            .vendors()
            .iter()
            .map(|vendor| {
                ranking::score_vendor(vendor, profile, complexity_score, self.predictor.as_ref())
            })
            .collect();
        let recommendations = rank_vendors(&vendor_compatibilities);
        let risk_assessment = risk::assess_risks(profile, complexity_score);

        let assessment = HospitalAssessment {
            hospital_name: profile.name.clone(),
            complexity_score,
            vendor_compatibilities,
            recommendations,
            risk_assessment,
            assessed_at: Utc::now(),
        };

        self.cache.set(
            &key,
            assessment.clone(),
            CacheContext {
                clinical_data: true,
                bed_count: profile.bed_count,
                complexity_score,
            },
        );
        debug!(
            %key,
            complexity = complexity_score,
            recommended = assessment.recommendations.len(),
            "hospital assessed"
        );

        assessment
    }
}

/// `assessment:<name>:<beds>:<type>` with the name trimmed and lower-cased.
pub fn cache_key(profile: &HospitalProfile) -> String {
    format!(
        "assessment:{}:{}:{}",
        profile.name.trim().to_lowercase(),
        profile.bed_count,
        profile.hospital_type.label()
    )
}
