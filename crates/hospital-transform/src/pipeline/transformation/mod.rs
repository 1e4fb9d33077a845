//! Staged orchestration of a single questionnaire-to-specification run.
//!
//! `parse → extract → formulas → assess → map → generate → validate`, then
//! either straight to `optimize` or through one `refine → revalidate` round
//! first. Every stage is synchronous; the shared assessment cache is the only
//! state visible across concurrent runs.

mod events;
mod metrics;
mod optimize;
mod result;
mod stage;
mod summary;

#[cfg(test)]
mod tests;

pub use events::{
    EventError, NoopEventPublisher, RecordingEventPublisher, TransformationEvent,
    TransformationEventPublisher,
};
pub use metrics::{PipelineMetrics, RefinementOutcome, StageQuality};
pub use result::TransformationResult;
pub use stage::{
    CancellationFlag, PipelineStage, PipelineStageError, StageFailure, TransformationError,
};
pub use summary::{ExecutiveSummary, ImplementationRoadmap, RoadmapMilestone};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, info_span, warn};

use crate::cache::{AssessmentCache, CacheStats};
use crate::config::{AppConfig, PipelineConfig};
use crate::pipeline::assessment::{
    HeuristicPredictor, HospitalAssessmentEngine, VendorKnowledgeTable,
};
use crate::pipeline::formulas::FormulasEngine;
use crate::pipeline::questionnaire::{QuestionnaireProcessor, RawQuestionnaire};
use crate::pipeline::specification::{ImplementationPlan, Specification, SpecificationGenerator};
use crate::pipeline::validation::{refine, ValidationEngine};

/// Runs transformations against injected collaborators. `Send + Sync`, so one
/// engine can serve many concurrent runs.
pub struct TransformationEngine {
    processor: QuestionnaireProcessor,
    formulas: FormulasEngine,
    assessment: HospitalAssessmentEngine,
    generator: SpecificationGenerator,
    validator: ValidationEngine,
    publisher: Arc<dyn TransformationEventPublisher>,
}

impl std::fmt::Debug for TransformationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationEngine")
            .field("assessment", &self.assessment)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl TransformationEngine {
    pub fn new(
        config: &PipelineConfig,
        assessment: HospitalAssessmentEngine,
        publisher: Arc<dyn TransformationEventPublisher>,
    ) -> Self {
        Self {
            processor: QuestionnaireProcessor::new(),
            formulas: FormulasEngine::new(),
            assessment,
            generator: SpecificationGenerator::new(),
            validator: ValidationEngine::new(config.feasibility_threshold),
            publisher,
        }
    }

    /// Engine with a fresh cache sized from `config` and the heuristic predictor.
    pub fn from_config(
        config: &AppConfig,
        vendors: VendorKnowledgeTable,
        publisher: Arc<dyn TransformationEventPublisher>,
    ) -> Self {
        let assessment = HospitalAssessmentEngine::new(
            vendors,
            Arc::new(HeuristicPredictor::new()),
            Arc::new(AssessmentCache::new(&config.cache)),
        );
        Self::new(&config.pipeline, assessment, publisher)
    }

    pub fn assessment_engine(&self) -> &HospitalAssessmentEngine {
        &self.assessment
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.assessment.cache().stats()
    }

    /// Run every stage for one questionnaire and publish the outcome.
    pub fn transform(
        &self,
        raw: &RawQuestionnaire,
        cancel: &CancellationFlag,
    ) -> Result<TransformationResult, TransformationError> {
        let started = Instant::now();
        let transformation_id = result::new_transformation_id(Utc::now());
        let span = info_span!("transformation", id = %transformation_id);
        let _entered = span.enter();

        match self.run(&transformation_id, raw, cancel, started) {
            Ok(result) => {
                self.publisher.publish(TransformationEvent::Completed {
                    transformation_id: result.transformation_id.clone(),
                    hospital_id: result.hospital_id.clone(),
                    processing_time_ms: result.processing_time_ms,
                    quality_score: result.quality_score,
                })?;
                info!(
                    hospital = %result.executive_summary.hospital_name,
                    quality = result.quality_score,
                    refined = result.metrics.refined(),
                    elapsed_ms = result.processing_time_ms,
                    "transformation completed"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, stage = ?err.stage(), "transformation failed");
                let event = TransformationEvent::Failed {
                    transformation_id,
                    hospital_id: raw.metadata.hospital_id.clone(),
                    processing_time_ms: elapsed_ms(started),
                    stage: err.stage(),
                    error: err.to_string(),
                };
                if let Err(publish_err) = self.publisher.publish(event) {
                    warn!(error = %publish_err, "failure event could not be published");
                }
                Err(err)
            }
        }
    }

    fn run(
        &self,
        transformation_id: &str,
        raw: &RawQuestionnaire,
        cancel: &CancellationFlag,
        started: Instant,
    ) -> Result<TransformationResult, TransformationError> {
        let mut metrics = PipelineMetrics::default();

        let processed = self.processor.process_questionnaire(raw)?;
        metrics.record(PipelineStage::Parse, processed.completeness);
        cancel.checkpoint(PipelineStage::Parse)?;

        let requirements = self.processor.extract_requirements(&processed);
        let active = requirements.active_count();
        if active == 0 {
            return Err(PipelineStageError::new(
                PipelineStage::Extract,
                StageFailure::NoActiveRequirements,
            )
            .into());
        }
        metrics.record(
            PipelineStage::Extract,
            active as f64 / requirements.requirements.len() as f64,
        );
        cancel.checkpoint(PipelineStage::Extract)?;

        let computed = self.formulas.compute(&processed.profile);
        metrics.record(PipelineStage::Formulas, 1.0);
        cancel.checkpoint(PipelineStage::Formulas)?;

        let assessment = self.assessment.assess_hospital(&processed.profile);
        metrics.record(
            PipelineStage::Assess,
            if assessment.recommendations.is_empty() {
                0.5
            } else {
                1.0
            },
        );
        cancel.checkpoint(PipelineStage::Assess)?;

        let mapped = self.generator.map_requirements_to_specification(
            &processed,
            &requirements,
            &computed,
            &assessment,
        );
        metrics.record(PipelineStage::Map, mapped.populated_share());
        cancel.checkpoint(PipelineStage::Map)?;

        let plan = self.generator.generate_implementation_plan(
            &processed.profile,
            &assessment,
            &computed,
        );
        let spec = self.generator.attach_plan(&mapped, &plan);
        metrics.record(PipelineStage::Generate, 1.0);
        cancel.checkpoint(PipelineStage::Generate)?;

        let initial = self.validator.validate_specification(&spec, &requirements);
        metrics.record(PipelineStage::Validate, initial.quality_score);
        cancel.checkpoint(PipelineStage::Validate)?;

        let (spec, validation) = if initial.refinement_required {
            debug!(
                feasibility = initial.feasibility_score,
                suggestions = initial.suggestions.len(),
                "feasibility below threshold, refining once"
            );
            let refined = refine(&spec, &initial.suggestions);
            cancel.checkpoint(PipelineStage::Refine)?;

            let revalidated = self.validator.validate_specification(&refined, &requirements);
            metrics.refinement = Some(RefinementOutcome {
                suggestions_applied: initial.suggestions.len(),
                feasibility_before: initial.feasibility_score,
                feasibility_after: revalidated.feasibility_score,
            });
            cancel.checkpoint(PipelineStage::Revalidate)?;
            (refined, revalidated)
        } else {
            (spec, initial)
        };

        let specification = optimize::optimize(&spec, &computed)
            .map_err(|cause| PipelineStageError::new(PipelineStage::Optimize, cause))?;
        let implementation_plan = reconcile_plan(&plan, &specification);
        let implementation_roadmap = summary::roadmap(&implementation_plan);
        let executive_summary = summary::executive_summary(
            &processed.profile,
            &assessment,
            &computed,
            &specification,
            &implementation_plan,
            &validation,
        );
        metrics.record(PipelineStage::Optimize, validation.quality_score);
        cancel.checkpoint(PipelineStage::Optimize)?;

        let quality_score = metrics.overall_quality();
        Ok(TransformationResult {
            transformation_id: transformation_id.to_string(),
            hospital_id: processed.profile.hospital_id.clone(),
            specification,
            implementation_plan,
            implementation_roadmap,
            risk_assessment: assessment.risk_assessment.clone(),
            executive_summary,
            vendor_recommendations: assessment.recommendations.clone(),
            computed_metrics: computed,
            validation,
            metrics,
            quality_score,
            processing_time_ms: elapsed_ms(started),
            completed_at: Utc::now(),
        })
    }
}

/// Carry contracted staffing and the revised target into the plan so both
/// views agree. Requested target and internal staffing are not touched.
fn reconcile_plan(plan: &ImplementationPlan, spec: &Specification) -> ImplementationPlan {
    let mut reconciled = plan.clone();
    if let Some(resources) = spec.resource_allocation.as_ref() {
        reconciled.resource_optimization = plan
            .resource_optimization
            .with_contracted(resources.contracted_fte);
    }
    if let Some(timeline) = spec.implementation_timeline.as_ref() {
        reconciled.revised_target_months = timeline.revised_target_months;
    }
    reconciled
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
