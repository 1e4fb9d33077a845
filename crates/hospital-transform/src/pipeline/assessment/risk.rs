use serde::{Deserialize, Serialize};

use crate::pipeline::formulas::bounded::round_to;
use crate::pipeline::questionnaire::{HospitalProfile, HospitalType};

const LOW_MATURITY: f64 = 5.0;
const LARGE_HOSPITAL_BEDS: u32 = 500;
const MIN_IT_STAFF: u32 = 5;
const HIGH_COMPLEXITY: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn value(self) -> f64 {
        match self {
            Self::Low => 0.25,
            Self::Medium => 0.5,
            Self::High => 0.75,
            Self::Critical => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Technical,
    Operational,
    Financial,
    Regulatory,
}

impl RiskCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Technical,
            Self::Operational,
            Self::Financial,
            Self::Regulatory,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub category: RiskCategory,
    pub level: RiskLevel,
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risks: Vec<RiskItem>,
    pub overall_level: RiskLevel,
    pub overall_score: f64,
}

impl RiskAssessment {
    pub fn by_category(&self, category: RiskCategory) -> impl Iterator<Item = &RiskItem> {
        self.risks.iter().filter(move |risk| risk.category == category)
    }
}

pub(crate) fn assess_risks(profile: &HospitalProfile, complexity: f64) -> RiskAssessment {
    let mut risks = Vec::new();
    technical_risks(profile, &mut risks);
    operational_risks(profile, &mut risks);
    financial_risks(profile, complexity, &mut risks);
    regulatory_risks(profile, &mut risks);

    let overall_level = risks
        .iter()
        .map(|risk| risk.level)
        .max()
        .unwrap_or(RiskLevel::Low);
    let overall_score = if risks.is_empty() {
        0.0
    } else {
        risks.iter().map(|risk| risk.level.value()).sum::<f64>() / risks.len() as f64
    };

    RiskAssessment {
        risks,
        overall_level,
        overall_score: round_to(overall_score, 4),
    }
}

fn push(
    risks: &mut Vec<RiskItem>,
    category: RiskCategory,
    level: RiskLevel,
    description: impl Into<String>,
    mitigation: impl Into<String>,
) {
    risks.push(RiskItem {
        category,
        level,
        description: description.into(),
        mitigation: mitigation.into(),
    });
}

fn technical_risks(profile: &HospitalProfile, risks: &mut Vec<RiskItem>) {
    if profile.technology_maturity < LOW_MATURITY {
        push(
            risks,
            RiskCategory::Technical,
            RiskLevel::High,
            format!(
                "Low technology maturity ({:.1}/10)",
                profile.technology_maturity
            ),
            "Modernize core infrastructure before integration work begins",
        );
    }

    match profile.additional_ehrs.len() {
        0 => {}
        1 => push(
            risks,
            RiskCategory::Technical,
            RiskLevel::Medium,
            "Secondary EHR platform requires data synchronization",
            "Route cross-EHR traffic through a single interface engine",
        ),
        count => push(
            risks,
            RiskCategory::Technical,
            RiskLevel::High,
            format!("{} additional EHR platforms widen the integration surface", count),
            "Deploy a dedicated interface engine and master patient index",
        ),
    }

    if profile.custom_apis {
        push(
            risks,
            RiskCategory::Technical,
            RiskLevel::Medium,
            "Custom APIs need bespoke integration and regression testing",
            "Inventory custom endpoints and wrap them behind versioned adapters",
        );
    }
}

fn operational_risks(profile: &HospitalProfile, risks: &mut Vec<RiskItem>) {
    if profile.bed_count >= LARGE_HOSPITAL_BEDS {
        push(
            risks,
            RiskCategory::Operational,
            RiskLevel::High,
            format!("Large-scale deployment across {} beds", profile.bed_count),
            "Stage go-live by department with command-centre support",
        );
    }

    if profile.hospital_type == HospitalType::MultiSite {
        push(
            risks,
            RiskCategory::Operational,
            RiskLevel::High,
            "Multi-site coordination across facilities",
            "Appoint site leads and sequence facility cutovers",
        );
    }

    match profile.it_staff_count {
        Some(staff) if staff < MIN_IT_STAFF => push(
            risks,
            RiskCategory::Operational,
            RiskLevel::High,
            format!("Only {} IT staff available", staff),
            "Engage vendor professional services or a managed service partner",
        ),
        None => push(
            risks,
            RiskCategory::Operational,
            RiskLevel::Medium,
            "IT staffing level unknown",
            "Confirm internal staffing before committing to a timeline",
        ),
        Some(_) => {}
    }
}

fn financial_risks(profile: &HospitalProfile, complexity: f64, risks: &mut Vec<RiskItem>) {
    if complexity >= HIGH_COMPLEXITY {
        push(
            risks,
            RiskCategory::Financial,
            RiskLevel::High,
            format!("High implementation complexity ({:.1}/10)", complexity),
            "Hold a 20% budget contingency and phase capital spend",
        );
    }

    if profile.hospital_type == HospitalType::CriticalAccess {
        push(
            risks,
            RiskCategory::Financial,
            RiskLevel::Medium,
            "Critical access hospital with constrained capital budget",
            "Prefer subscription pricing and pursue rural health grants",
        );
    }
}

fn regulatory_risks(profile: &HospitalProfile, risks: &mut Vec<RiskItem>) {
    if profile.compliance_frameworks.is_empty() {
        push(
            risks,
            RiskCategory::Regulatory,
            RiskLevel::Critical,
            "No compliance framework selected",
            "Complete a HIPAA risk analysis before handling patient data",
        );
    } else if !profile.has_framework("HIPAA") {
        push(
            risks,
            RiskCategory::Regulatory,
            RiskLevel::High,
            "HIPAA is not listed among compliance frameworks",
            "Add HIPAA safeguards to the compliance scope",
        );
    }

    if profile.has_framework("GDPR") {
        push(
            risks,
            RiskCategory::Regulatory,
            RiskLevel::Medium,
            "GDPR obligations apply to patient data",
            "Map cross-border data flows and appoint a data protection officer",
        );
    }
}
