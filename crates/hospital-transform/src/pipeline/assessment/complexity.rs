use crate::pipeline::formulas::bounded::{bounded, round_to};
use crate::pipeline::formulas::type_weight;
use crate::pipeline::questionnaire::HospitalProfile;

/// One `W·log2(1 + V·T)` term of the complexity score.
#[derive(Debug, Clone, Copy)]
struct Factor {
    value: f64,
    weight: f64,
    multiplier: f64,
}

impl Factor {
    const fn new(value: f64, weight: f64, multiplier: f64) -> Self {
        Self {
            value,
            weight,
            multiplier,
        }
    }

    fn contribution(self) -> f64 {
        let value = bounded(self.value, 0.0, f64::MAX, 0.0);
        self.weight * (1.0 + value * self.multiplier).log2()
    }
}

/// Logarithmic hospital complexity on a 0-10 scale, rounded to two decimals.
pub(crate) fn complexity_score(profile: &HospitalProfile) -> f64 {
    let integration_surface =
        profile.additional_ehrs.len() as f64 + if profile.custom_apis { 1.0 } else { 0.0 };
    let maturity = bounded(profile.technology_maturity, 0.0, 10.0, 5.0);
    let volume = profile.annual_volume.unwrap_or(0) as f64;

    let factors = [
        Factor::new(profile.bed_count as f64 / 100.0, 1.2, 1.0),
        Factor::new(profile.clinical_systems.len() as f64, 0.8, 1.0),
        Factor::new(profile.compliance_frameworks.len() as f64, 0.6, 1.0),
        Factor::new(integration_surface, 0.9, 1.5),
        Factor::new((10.0 - maturity) / 10.0, 1.0, 2.0),
        Factor::new(volume / 100_000.0, 0.5, 1.0),
        Factor::new(type_weight(profile.hospital_type), 1.0, 1.0),
    ];

    let total: f64 = factors.into_iter().map(Factor::contribution).sum();
    round_to(bounded(total, 0.0, 10.0, 5.0), 2)
}
