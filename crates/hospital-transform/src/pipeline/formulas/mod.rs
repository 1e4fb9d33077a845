//! Deterministic sizing metrics: Hospital Complexity Score (HCS), Software
//! Integration Difficulty Index (SIDI) and the Resource Allocation Formula (RAF).
//!
//! Every function here is total. Out-of-range inputs are clamped through
//! [`bounded`] rather than rejected, so identical profiles always produce
//! bit-identical metrics.

pub mod bounded;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::pipeline::questionnaire::domain::{normalize_framework, vendor_matches};
use crate::pipeline::questionnaire::{HospitalProfile, HospitalType, TimelineUrgency};
use bounded::{bounded, round_to, unit};

const BED_CAP: f64 = 2000.0;
const SYSTEMS_CAP: f64 = 10.0;
const DEFAULT_BEDS: f64 = 100.0;
const UNKNOWN_VENDOR_INDEX: f64 = 0.8;

const TYPE_COEFFICIENT: f64 = 0.35;
const COMPLIANCE_COEFFICIENT: f64 = 0.25;
const BED_COEFFICIENT: f64 = 0.20;
const SYSTEMS_COEFFICIENT: f64 = 0.15;
const TIMELINE_COEFFICIENT: f64 = 0.05;

const VENDOR_INDEX: &[(&str, f64)] = &[
    ("epic", 0.9),
    ("oracle health", 0.85),
    ("cerner", 0.85),
    ("athenahealth", 0.8),
    ("meditech", 0.75),
    ("allscripts", 0.7),
    ("eclinicalworks", 0.7),
    ("nextgen", 0.7),
];

/// Metrics derived once per run from the hospital profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    pub hcs: f64,
    pub sidi: f64,
    pub raf: ResourceAllocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerCounts {
    pub application: u32,
    pub database: u32,
    pub integration: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageTiers {
    pub hot_tb: f64,
    pub warm_tb: f64,
    pub cold_tb: f64,
}

impl StorageTiers {
    pub fn total_tb(&self) -> f64 {
        round_to(self.hot_tb + self.warm_tb + self.cold_tb, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub monthly_usd: f64,
    pub annual_usd: f64,
}

/// Output of the Resource Allocation Formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub servers: ServerCounts,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub storage: StorageTiers,
    pub cost: CostEstimate,
}

/// Unit pricing behind the RAF cost estimate (USD per month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingModel {
    pub per_cpu_core: f64,
    pub per_memory_gb: f64,
    pub per_hot_tb: f64,
    pub per_warm_tb: f64,
    pub per_cold_tb: f64,
}

impl Default for PricingModel {
    fn default() -> Self {
        Self {
            per_cpu_core: 25.0,
            per_memory_gb: 5.0,
            per_hot_tb: 100.0,
            per_warm_tb: 50.0,
            per_cold_tb: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormulasEngine {
    pricing: PricingModel,
}

impl FormulasEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pricing(pricing: PricingModel) -> Self {
        Self { pricing }
    }

    pub fn compute(&self, profile: &HospitalProfile) -> ComputedMetrics {
        let hcs = self.compute_hcs(profile);
        let sidi = self.compute_sidi(profile);
        let raf = self.compute_raf(profile, hcs, sidi);
        ComputedMetrics { hcs, sidi, raf }
    }

    /// Hospital Complexity Score in `[0, 1]`, rounded to three decimals.
    pub fn compute_hcs(&self, profile: &HospitalProfile) -> f64 {
        let beds = bounded_beds(profile);
        let bed_score = beds.min(BED_CAP) / BED_CAP;
        let systems_score =
            (profile.clinical_systems.len() as f64).min(SYSTEMS_CAP) / SYSTEMS_CAP;

        let score = TYPE_COEFFICIENT * type_weight(profile.hospital_type)
            + COMPLIANCE_COEFFICIENT * compliance_weight(&profile.compliance_frameworks)
            + BED_COEFFICIENT * bed_score
            + SYSTEMS_COEFFICIENT * systems_score
            + TIMELINE_COEFFICIENT * timeline_weight(profile.timeline);

        round_to(unit(score), 3)
    }

    /// Software Integration Difficulty Index; strictly positive.
    pub fn compute_sidi(&self, profile: &HospitalProfile) -> f64 {
        let mut sidi = 1.0;

        sidi *= 1.5 - vendor_index(profile.primary_ehr.as_deref());

        if profile.custom_apis {
            sidi *= 1.4;
        }
        if profile.supports_fhir() {
            sidi *= 0.8;
        }
        if profile.supports_hl7() {
            sidi *= 0.9;
        }

        let extra_vendors = bounded(profile.additional_ehrs.len() as f64, 0.0, 10.0, 0.0);
        sidi *= 1.0 + 0.2 * extra_vendors;

        round_to(sidi, 3)
    }

    /// Resource Allocation Formula: servers, compute, storage tiers, and cost.
    pub fn compute_raf(&self, profile: &HospitalProfile, hcs: f64, sidi: f64) -> ResourceAllocation {
        let beds = bounded_beds(profile);
        let hcs = bounded(hcs, 0.0, 1.0, 0.5);
        let sidi = bounded(sidi, 0.1, 10.0, 1.0);

        let application = ((beds / 100.0) * (1.0 + hcs)).ceil().max(2.0) as u32;
        let database = (application as f64 / 3.0).ceil().max(2.0) as u32;
        let integration = (sidi * 2.0).ceil().max(1.0) as u32;

        let cpu_cores = application * 8 + database * 16 + integration * 4;
        let memory_gb = application * 32 + database * 128 + integration * 16;

        let hot = beds * 0.01 * (1.0 + hcs);
        let warm = hot * 2.0;
        let cold = hot * 5.0;

        let monthly = cpu_cores as f64 * self.pricing.per_cpu_core
            + memory_gb as f64 * self.pricing.per_memory_gb
            + hot * self.pricing.per_hot_tb
            + warm * self.pricing.per_warm_tb
            + cold * self.pricing.per_cold_tb;

        ResourceAllocation {
            servers: ServerCounts {
                application,
                database,
                integration,
                total: application + database + integration,
            },
            cpu_cores,
            memory_gb,
            storage: StorageTiers {
                hot_tb: round_to(hot, 2),
                warm_tb: round_to(warm, 2),
                cold_tb: round_to(cold, 2),
            },
            cost: CostEstimate {
                monthly_usd: round_to(monthly, 2),
                annual_usd: round_to(monthly * 12.0, 2),
            },
        }
    }
}

fn bounded_beds(profile: &HospitalProfile) -> f64 {
    bounded(profile.bed_count as f64, 1.0, 5000.0, DEFAULT_BEDS)
}

pub(crate) fn type_weight(hospital_type: HospitalType) -> f64 {
    match hospital_type {
        HospitalType::Academic => 1.0,
        HospitalType::MultiSite => 0.9,
        HospitalType::Specialty => 0.8,
        HospitalType::Community => 0.7,
        HospitalType::General => 0.6,
        HospitalType::CriticalAccess => 0.5,
    }
}

pub(crate) fn compliance_weight(frameworks: &[String]) -> f64 {
    let mut weight: f64 = 0.6;
    for framework in frameworks {
        weight += match normalize_framework(framework).as_str() {
            "HIPAA" => 0.15,
            "HITRUST" => 0.1,
            "SOC2" => 0.1,
            "GDPR" => 0.1,
            _ => 0.0,
        };
    }
    weight.min(1.0)
}

pub(crate) fn timeline_weight(timeline: TimelineUrgency) -> f64 {
    match timeline {
        TimelineUrgency::Urgent => 1.0,
        TimelineUrgency::Accelerated => 0.8,
        TimelineUrgency::Standard => 0.5,
        TimelineUrgency::Extended => 0.3,
    }
}

/// Vendor maturity index in `[0, 1]`; unknown or missing vendors score 0.8.
pub fn vendor_index(ehr: Option<&str>) -> f64 {
    let index = ehr
        .and_then(|ehr| {
            VENDOR_INDEX
                .iter()
                .find(|(vendor, _)| vendor_matches(ehr, vendor))
                .map(|(_, index)| *index)
        })
        .unwrap_or(UNKNOWN_VENDOR_INDEX);
    bounded(index, 0.0, 1.0, UNKNOWN_VENDOR_INDEX)
}
