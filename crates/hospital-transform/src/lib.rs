//! Questionnaire-to-specification transformation pipeline for hospital
//! technology programmes.
//!
//! The crate turns a raw operations questionnaire into a scored technical
//! specification: deterministic sizing formulas, a cached vendor assessment,
//! specification and plan generation, validation with a single refinement
//! round, and an aggregate result ready for rendering or persistence.

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

pub use cache::{AssessmentCache, CacheCapacities, CacheContext, CacheStats, CacheTier};
pub use pipeline::transformation::{
    CancellationFlag, TransformationEngine, TransformationError, TransformationResult,
};
