use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{AppEnvironment, TelemetryConfig};

/// Targets that receive the configured level; everything else stays at `warn`.
const PIPELINE_TARGETS: [&str; 2] = ["hospital_transform", "hospital_transform_cli"];

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log level or filter '{value}' for the pipeline")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// A bare level such as `debug` applies to the pipeline crates only; a value
/// that already holds directives (`=` or `,`) is used verbatim.
pub(crate) fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        PIPELINE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

pub(crate) fn configured_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter_directives(log_level)).map_err(|source| TelemetryError::EnvFilter {
        value: log_level.to_string(),
        source,
    })
}

/// `(ansi, targets)` for the fmt layer in each environment.
pub(crate) const fn output_style(environment: AppEnvironment) -> (bool, bool) {
    match environment {
        AppEnvironment::Development => (true, false),
        AppEnvironment::Test => (false, false),
        AppEnvironment::Production => (false, true),
    }
}

/// Install the process-wide subscriber. `RUST_LOG` wins over the configured
/// level. Development runs get coloured output; production adds targets so
/// stage logs can be traced back to their module.
pub fn init(config: &TelemetryConfig, environment: AppEnvironment) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(&config.log_level)?,
    };

    let (ansi, targets) = output_style(environment);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(targets)
        .with_ansi(ansi)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
