use crate::config::ConfigError;
use crate::pipeline::assessment::VendorTableError;
use crate::pipeline::transformation::TransformationError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    VendorTable(VendorTableError),
    Transformation(TransformationError),
    Task(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::VendorTable(err) => write!(f, "vendor table error: {}", err),
            AppError::Transformation(err) => write!(f, "transformation error: {}", err),
            AppError::Task(detail) => write!(f, "background task failed: {}", detail),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::VendorTable(err) => Some(err),
            AppError::Transformation(err) => Some(err),
            AppError::Task(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<VendorTableError> for AppError {
    fn from(value: VendorTableError) -> Self {
        Self::VendorTable(value)
    }
}

impl From<TransformationError> for AppError {
    fn from(value: TransformationError) -> Self {
        Self::Transformation(value)
    }
}
