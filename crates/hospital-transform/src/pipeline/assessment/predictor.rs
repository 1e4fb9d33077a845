use super::vendors::VendorProfile;
use crate::pipeline::formulas::bounded::unit;
use crate::pipeline::questionnaire::HospitalProfile;

/// Learned or heuristic estimate of how well a vendor suits a hospital.
pub trait CompatibilityPredictor: Send + Sync {
    /// Compatibility in `[0, 1]`; values outside the range are clamped by the caller.
    fn predict(&self, vendor: &VendorProfile, profile: &HospitalProfile) -> f64;
}

/// Deterministic default weighing size fit, API maturity and staffing pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPredictor;

impl HeuristicPredictor {
    pub fn new() -> Self {
        Self
    }
}

impl CompatibilityPredictor for HeuristicPredictor {
    fn predict(&self, vendor: &VendorProfile, profile: &HospitalProfile) -> f64 {
        let staffing_pressure = match profile.it_staff_count {
            Some(staff) if staff >= 20 => 0.2,
            Some(staff) if staff >= 5 => 0.4,
            _ => 0.6,
        };

        let mut api_fit = vendor.api_maturity;
        if profile.supports_fhir() && vendor.api_maturity >= 0.8 {
            api_fit = (api_fit + 0.1).min(1.0);
        }

        unit(
            0.5 * vendor.size_fit(profile.bed_count)
                + 0.3 * api_fit
                + 0.2 * (1.0 - vendor.complexity_score * staffing_pressure),
        )
    }
}
