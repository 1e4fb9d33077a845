use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::metrics::PipelineMetrics;
use super::summary::{ExecutiveSummary, ImplementationRoadmap};
use crate::pipeline::assessment::{RankedVendor, RiskAssessment};
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::specification::{ImplementationPlan, Specification};
use crate::pipeline::validation::ValidationResult;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Everything a completed run produced. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub transformation_id: String,
    pub hospital_id: Option<String>,
    pub specification: Specification,
    pub implementation_plan: ImplementationPlan,
    pub implementation_roadmap: ImplementationRoadmap,
    pub risk_assessment: RiskAssessment,
    pub executive_summary: ExecutiveSummary,
    pub vendor_recommendations: Vec<RankedVendor>,
    pub computed_metrics: ComputedMetrics,
    pub validation: ValidationResult,
    pub metrics: PipelineMetrics,
    pub quality_score: f64,
    pub processing_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl TransformationResult {
    /// Persistence record keyed by transformation id, with the full result as payload.
    pub fn to_record(&self) -> Result<Value, serde_json::Error> {
        Ok(json!({
            "transformation_id": self.transformation_id,
            "hospital_id": self.hospital_id,
            "quality_score": self.quality_score,
            "processing_time_ms": self.processing_time_ms,
            "completed_at": self.completed_at.to_rfc3339(),
            "payload": serde_json::to_value(self)?,
        }))
    }
}

/// `transform-<unix millis>-<9 base-36 chars>`.
pub(crate) fn new_transformation_id(now: DateTime<Utc>) -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(char::from(BASE36[(entropy % 36) as usize]));
        entropy /= 36;
    }
    format!("transform-{}-{suffix}", now.timestamp_millis())
}
