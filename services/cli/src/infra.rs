use std::path::{Path, PathBuf};

use hospital_transform::error::AppError;
use hospital_transform::pipeline::assessment::VendorKnowledgeTable;
use hospital_transform::pipeline::transformation::{
    EventError, TransformationEvent, TransformationEventPublisher,
};
use tracing::{info, warn};

/// Publishes lifecycle events to the log stream.
#[derive(Debug, Default)]
pub(crate) struct TracingEventPublisher;

impl TransformationEventPublisher for TracingEventPublisher {
    fn publish(&self, event: TransformationEvent) -> Result<(), EventError> {
        match &event {
            TransformationEvent::Completed {
                transformation_id,
                quality_score,
                processing_time_ms,
                ..
            } => info!(
                id = %transformation_id,
                quality = quality_score,
                elapsed_ms = processing_time_ms,
                "transformation.completed"
            ),
            TransformationEvent::Failed {
                transformation_id,
                stage,
                error,
                ..
            } => warn!(
                id = %transformation_id,
                stage = ?stage,
                %error,
                "transformation.failed"
            ),
        }
        Ok(())
    }
}

/// Explicit path first, then the configured one, then the built-in table.
pub(crate) fn resolve_vendor_table(
    explicit: Option<PathBuf>,
    configured: Option<&Path>,
) -> Result<(VendorKnowledgeTable, Option<PathBuf>), AppError> {
    match explicit.or_else(|| configured.map(Path::to_path_buf)) {
        Some(path) => {
            let table = VendorKnowledgeTable::from_path(&path)?;
            Ok((table, Some(path)))
        }
        None => Ok((VendorKnowledgeTable::standard(), None)),
    }
}
