use serde::{Deserialize, Serialize};

use super::predictor::CompatibilityPredictor;
use super::vendors::VendorProfile;
use crate::pipeline::formulas::bounded::{bounded, round_to, unit};
use crate::pipeline::questionnaire::HospitalProfile;

pub const MIN_RECOMMENDED_COMPATIBILITY: f64 = 0.6;
pub const MAX_RECOMMENDATIONS: usize = 5;

const PREDICTOR_BLEND: f64 = 0.3;
const INCUMBENT_BONUS: f64 = 1.1;
const LONG_TIMELINE_MONTHS: f64 = 18.0;
const TIMELINE_HORIZON_MONTHS: f64 = 36.0;

/// How well one vendor fits one hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCompatibility {
    pub vendor_name: String,
    pub base_compatibility_score: f64,
    pub compatibility_score: f64,
    pub predicted_success_probability: f64,
    pub predicted_timeline_months: f64,
    pub risk_factors: Vec<String>,
}

/// Recommended vendor with the composite ranking inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVendor {
    #[serde(flatten)]
    pub vendor: VendorCompatibility,
    pub ranking_score: f64,
    pub timeline_penalty: f64,
}

pub(crate) fn score_vendor(
    vendor: &VendorProfile,
    profile: &HospitalProfile,
    complexity: f64,
    predictor: &dyn CompatibilityPredictor,
) -> VendorCompatibility {
    let maturity = bounded(profile.technology_maturity, 0.0, 10.0, 5.0) / 10.0;

    let size_alignment = vendor.size_fit(profile.bed_count);
    let maturity_alignment = 1.0 - (vendor.api_maturity - maturity).abs();
    let integration_alignment =
        vendor.integration_fit * (1.0 - vendor.integration_difficulty * complexity / 20.0);
    let base = unit(0.4 * size_alignment + 0.3 * maturity_alignment + 0.3 * integration_alignment);

    let predicted = unit(predictor.predict(vendor, profile));
    let mut compatibility = (1.0 - PREDICTOR_BLEND) * base + PREDICTOR_BLEND * predicted;
    compatibility *= 0.85 + 0.15 * vendor.deployment_success_rate;
    if profile.uses_vendor(&vendor.name) {
        compatibility *= INCUMBENT_BONUS;
    }

    let success = unit(vendor.deployment_success_rate * (1.0 - complexity / 50.0));
    let months = vendor.average_implementation_time_months * (1.0 + complexity / 20.0);

    let mut risk_factors = Vec::new();
    if vendor.integration_difficulty > 0.6 {
        risk_factors.push("High integration difficulty".to_string());
    }
    if vendor.api_maturity < 0.7 {
        risk_factors.push("Limited API maturity".to_string());
    }
    if months > LONG_TIMELINE_MONTHS {
        risk_factors.push(format!("Extended implementation timeline ({months:.1} months)"));
    }

    VendorCompatibility {
        vendor_name: vendor.name.clone(),
        base_compatibility_score: round_to(base, 4),
        compatibility_score: round_to(unit(compatibility), 4),
        predicted_success_probability: round_to(success, 4),
        predicted_timeline_months: round_to(months, 1),
        risk_factors,
    }
}

/// Keep vendors above the compatibility floor and order them by
/// `compatibility × success × (1 − 0.2 × min(months / 36, 1))`, ties by name.
pub fn rank_vendors(compatibilities: &[VendorCompatibility]) -> Vec<RankedVendor> {
    let mut ranked: Vec<RankedVendor> = compatibilities
        .iter()
        .filter(|vendor| vendor.compatibility_score > MIN_RECOMMENDED_COMPATIBILITY)
        .map(|vendor| {
            let timeline_penalty =
                (vendor.predicted_timeline_months / TIMELINE_HORIZON_MONTHS).clamp(0.0, 1.0);
            let ranking_score = vendor.compatibility_score
                * vendor.predicted_success_probability
                * (1.0 - timeline_penalty * 0.2);
            RankedVendor {
                vendor: vendor.clone(),
                ranking_score: round_to(ranking_score, 4),
                timeline_penalty: round_to(timeline_penalty, 4),
            }
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .ranking_score
            .total_cmp(&left.ranking_score)
            .then_with(|| left.vendor.vendor_name.cmp(&right.vendor.vendor_name))
    });
    ranked.truncate(MAX_RECOMMENDATIONS);
    ranked
}
