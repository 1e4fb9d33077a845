use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw questionnaire submission: question id to response, plus side-channel metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuestionnaire {
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseValue>,
    #[serde(default)]
    pub metadata: QuestionnaireMetadata,
}

impl RawQuestionnaire {
    pub fn answer(&self, question: &str) -> Option<&ResponseValue> {
        self.responses
            .get(question)
            .filter(|value| value.is_answered())
    }

    pub fn with_response(mut self, question: &str, value: ResponseValue) -> Self {
        self.responses.insert(question.to_string(), value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireMetadata {
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub compliance_frameworks: Vec<String>,
    #[serde(default)]
    pub interoperability_standards: Vec<String>,
}

/// A single questionnaire answer as submitted by the form layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl ResponseValue {
    pub fn is_answered(&self) -> bool {
        match self {
            ResponseValue::Flag(_) => true,
            ResponseValue::Number(value) => value.is_finite(),
            ResponseValue::Text(text) => !text.trim().is_empty(),
            ResponseValue::List(items) => items.iter().any(|item| !item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            ResponseValue::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            ResponseValue::Number(value) if value.is_finite() => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(value) if value.is_finite() => Some(*value),
            ResponseValue::Text(text) => text
                .trim()
                .replace([',', '_'], "")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            ResponseValue::List(items) => items.clone(),
            ResponseValue::Text(text) => text.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };

        raw.into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ResponseValue::Flag(flag) => Some(*flag),
            ResponseValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "required" => Some(true),
                "no" | "n" | "false" | "none" => Some(false),
                _ => None,
            },
            ResponseValue::Number(value) => Some(*value != 0.0),
            ResponseValue::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HospitalType {
    Academic,
    Community,
    Specialty,
    CriticalAccess,
    MultiSite,
    General,
}

impl HospitalType {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "academic" | "academic_medical_center" | "teaching" => Some(Self::Academic),
            "community" | "community_hospital" => Some(Self::Community),
            "specialty" | "specialty_hospital" => Some(Self::Specialty),
            "critical_access" | "cah" => Some(Self::CriticalAccess),
            "multi_site" | "multisite" | "health_system" => Some(Self::MultiSite),
            "general" | "general_hospital" => Some(Self::General),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Community => "community",
            Self::Specialty => "specialty",
            Self::CriticalAccess => "critical_access",
            Self::MultiSite => "multi_site",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationClass {
    Urban,
    Suburban,
    Rural,
}

impl LocationClass {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "urban" | "metro" | "metropolitan" => Some(Self::Urban),
            "suburban" => Some(Self::Suburban),
            "rural" | "remote" => Some(Self::Rural),
            _ => None,
        }
    }
}

/// How soon the hospital expects to be live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineUrgency {
    Urgent,
    Accelerated,
    #[default]
    Standard,
    Extended,
}

impl TimelineUrgency {
    pub fn parse(value: &str) -> Option<Self> {
        if let Ok(months) = value.trim().parse::<f64>() {
            return Some(Self::from_months(months));
        }

        let token = normalize_token(value);
        match token.as_str() {
            "urgent" | "immediate" | "asap" | "critical" => Some(Self::Urgent),
            "accelerated" | "fast" | "expedited" => Some(Self::Accelerated),
            "standard" | "normal" | "default" => Some(Self::Standard),
            "extended" | "flexible" | "long_term" => Some(Self::Extended),
            _ => token
                .split('_')
                .find_map(|part| part.parse::<f64>().ok())
                .map(Self::from_months),
        }
    }

    pub fn from_months(months: f64) -> Self {
        if months <= 6.0 {
            Self::Urgent
        } else if months <= 9.0 {
            Self::Accelerated
        } else if months <= 18.0 {
            Self::Standard
        } else {
            Self::Extended
        }
    }

    /// Longest plan, in months, that still honours the requested urgency.
    pub const fn expected_months(self) -> f64 {
        match self {
            Self::Urgent => 6.0,
            Self::Accelerated => 9.0,
            Self::Standard => 12.0,
            Self::Extended => 18.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Accelerated => "accelerated",
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfrastructureModel {
    OnPremise,
    Cloud,
    Hybrid,
    #[default]
    Unknown,
}

impl InfrastructureModel {
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "on_premise" | "on_prem" | "onprem" | "on_premises" | "data_center" => Self::OnPremise,
            "cloud" | "public_cloud" | "saas" => Self::Cloud,
            "hybrid" | "hybrid_cloud" => Self::Hybrid,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnPremise => "on_premise",
            Self::Cloud => "cloud",
            Self::Hybrid => "hybrid",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutStrategy {
    Phased,
    BigBang,
}

impl RolloutStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "phased" | "incremental" | "wave" | "waves" => Some(Self::Phased),
            "big_bang" | "bigbang" | "single_cutover" => Some(Self::BigBang),
            _ => None,
        }
    }
}

/// Normalized hospital facts consumed by every downstream stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalProfile {
    pub hospital_id: Option<String>,
    pub name: String,
    pub hospital_type: HospitalType,
    pub bed_count: u32,
    pub annual_volume: Option<u64>,
    pub location: LocationClass,
    pub primary_ehr: Option<String>,
    pub additional_ehrs: Vec<String>,
    pub clinical_systems: Vec<String>,
    pub compliance_frameworks: Vec<String>,
    pub interoperability_standards: Vec<String>,
    pub custom_apis: bool,
    pub infrastructure: InfrastructureModel,
    pub it_staff_count: Option<u32>,
    pub timeline: TimelineUrgency,
    pub technology_maturity: f64,
}

impl HospitalProfile {
    pub fn supports_fhir(&self) -> bool {
        self.interoperability_standards
            .iter()
            .any(|standard| standard.to_ascii_uppercase().contains("FHIR"))
    }

    pub fn supports_hl7(&self) -> bool {
        self.interoperability_standards
            .iter()
            .any(|standard| standard.to_ascii_uppercase().starts_with("HL7"))
    }

    pub fn has_framework(&self, framework: &str) -> bool {
        let wanted = normalize_framework(framework);
        self.compliance_frameworks
            .iter()
            .any(|existing| normalize_framework(existing) == wanted)
    }

    pub fn uses_vendor(&self, vendor: &str) -> bool {
        self.primary_ehr
            .as_deref()
            .map(|ehr| vendor_matches(ehr, vendor))
            .unwrap_or(false)
    }
}

/// Taxonomy sections used for completeness scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireSection {
    Organization,
    ClinicalSystems,
    Infrastructure,
    Integration,
    Security,
    Compliance,
    Operations,
    Timeline,
}

impl QuestionnaireSection {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Organization,
            Self::ClinicalSystems,
            Self::Infrastructure,
            Self::Integration,
            Self::Security,
            Self::Compliance,
            Self::Operations,
            Self::Timeline,
        ]
    }

    pub const fn questions(self) -> &'static [&'static str] {
        match self {
            Self::Organization => &[
                "hospital_name",
                "hospital_type",
                "bed_count",
                "annual_volume",
                "location",
            ],
            Self::ClinicalSystems => &["primary_ehr", "additional_ehrs", "clinical_systems"],
            Self::Infrastructure => &[
                "current_infrastructure",
                "deployment_preference",
                "data_residency",
            ],
            Self::Integration => &[
                "interoperability_standards",
                "custom_apis",
                "rollout_strategy",
            ],
            Self::Security => &["security_requirements", "mfa_required"],
            Self::Compliance => &["compliance_frameworks"],
            Self::Operations => &["it_staff_count", "support_model", "uptime_target"],
            Self::Timeline => &["timeline", "budget"],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::ClinicalSystems => "Clinical Systems",
            Self::Infrastructure => "Infrastructure",
            Self::Integration => "Integration",
            Self::Security => "Security",
            Self::Compliance => "Compliance",
            Self::Operations => "Operations",
            Self::Timeline => "Timeline",
        }
    }
}

/// Answers that shape the specification but are not part of the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPreferences {
    pub deployment_preference: Option<InfrastructureModel>,
    pub data_residency_on_premise: bool,
    pub rollout_strategy: Option<RolloutStrategy>,
    pub security_requirements: Vec<String>,
    pub mfa_required: Option<bool>,
    pub support_model: Option<String>,
    pub uptime_target: Option<f64>,
    pub budget_usd: Option<f64>,
    pub timeline_answered: bool,
}

/// Output of the parse stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedQuestionnaire {
    pub profile: HospitalProfile,
    pub completeness: f64,
    pub sections_present: Vec<QuestionnaireSection>,
    pub missing_sections: Vec<QuestionnaireSection>,
    pub warnings: Vec<String>,
    pub preferences: ImplementationPreferences,
}

/// Questionnaire rejected before the pipeline can start.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required questionnaire field '{field}' is missing")]
    MissingField { field: &'static str },
    #[error("questionnaire field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

pub(crate) fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' ', '/'], "_")
}

pub(crate) fn normalize_framework(value: &str) -> String {
    value
        .trim()
        .to_ascii_uppercase()
        .replace([' ', '-', '_'], "")
}

fn name_tokens(value: &str) -> Vec<String> {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// True when `candidate` names `vendor`: every token of the vendor name
/// appears as a contiguous run of whole tokens in the candidate, or both
/// spell the same letters once separators are removed.
pub(crate) fn vendor_matches(candidate: &str, vendor: &str) -> bool {
    let candidate = name_tokens(candidate);
    let vendor = name_tokens(vendor);
    if candidate.is_empty() || vendor.is_empty() {
        return false;
    }
    candidate.concat() == vendor.concat()
        || candidate
            .windows(vendor.len())
            .any(|window| window == vendor.as_slice())
}
