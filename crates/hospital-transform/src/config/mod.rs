use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::cache::CacheCapacities;

const DEFAULT_FEASIBILITY_THRESHOLD: f64 = 0.8;
const DEFAULT_HALF_LIFE_SECS: f64 = 300.0;

/// Deployment stage; telemetry picks colour and target output from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub pipeline: PipelineConfig,
    pub cache: CacheConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let feasibility_threshold =
            parse_var("PIPELINE_FEASIBILITY_THRESHOLD", DEFAULT_FEASIBILITY_THRESHOLD)?;
        if !(0.0..=1.0).contains(&feasibility_threshold) {
            return Err(ConfigError::InvalidThreshold(feasibility_threshold));
        }

        let vendor_table_path = env::var("VENDOR_TABLE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let capacities = CacheCapacities {
            l1: parse_capacity("CACHE_L1_CAPACITY", 100)?,
            l2: parse_capacity("CACHE_L2_CAPACITY", 500)?,
            l3: parse_capacity("CACHE_L3_CAPACITY", 2000)?,
        };

        let recency_half_life_secs =
            parse_var("CACHE_RECENCY_HALF_LIFE_SECS", DEFAULT_HALF_LIFE_SECS)?;
        if !recency_half_life_secs.is_finite() || recency_half_life_secs <= 0.0 {
            return Err(ConfigError::InvalidNumber {
                var: "CACHE_RECENCY_HALF_LIFE_SECS",
                value: recency_half_life_secs.to_string(),
            });
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            pipeline: PipelineConfig {
                feasibility_threshold,
                vendor_table_path,
            },
            cache: CacheConfig {
                capacities,
                recency_half_life_secs,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Knobs consumed by the transformation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub feasibility_threshold: f64,
    pub vendor_table_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feasibility_threshold: DEFAULT_FEASIBILITY_THRESHOLD,
            vendor_table_path: None,
        }
    }
}

/// Tier sizing and recency decay for the assessment cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub capacities: CacheCapacities,
    pub recency_half_life_secs: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacities: CacheCapacities::default(),
            recency_half_life_secs: DEFAULT_HALF_LIFE_SECS,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_var(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var,
                    value: raw.clone(),
                })
        }
        _ => Ok(default),
    }
}

fn parse_capacity(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    let capacity = match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var,
                    value: raw.clone(),
                })?
        }
        _ => default,
    };

    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity(var));
    }

    Ok(capacity)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    InvalidThreshold(f64),
    ZeroCapacity(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be numeric (found '{value}')")
            }
            ConfigError::InvalidThreshold(value) => write!(
                f,
                "PIPELINE_FEASIBILITY_THRESHOLD must be within 0.0..=1.0 (found {value})"
            ),
            ConfigError::ZeroCapacity(var) => write!(f, "{var} must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
