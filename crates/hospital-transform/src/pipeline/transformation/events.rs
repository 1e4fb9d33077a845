use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::stage::PipelineStage;

/// Lifecycle notification emitted once per transformation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransformationEvent {
    Completed {
        transformation_id: String,
        hospital_id: Option<String>,
        processing_time_ms: u64,
        quality_score: f64,
    },
    Failed {
        transformation_id: String,
        hospital_id: Option<String>,
        processing_time_ms: u64,
        stage: Option<PipelineStage>,
        error: String,
    },
}

impl TransformationEvent {
    pub fn transformation_id(&self) -> &str {
        match self {
            Self::Completed {
                transformation_id, ..
            }
            | Self::Failed {
                transformation_id, ..
            } => transformation_id,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outbound hook for lifecycle events (message bus, webhook, audit log).
pub trait TransformationEventPublisher: Send + Sync {
    fn publish(&self, event: TransformationEvent) -> Result<(), EventError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

impl TransformationEventPublisher for NoopEventPublisher {
    fn publish(&self, _event: TransformationEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// Keeps events in memory, in publish order.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<TransformationEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TransformationEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl TransformationEventPublisher for RecordingEventPublisher {
    fn publish(&self, event: TransformationEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}
