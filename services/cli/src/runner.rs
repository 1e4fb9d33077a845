use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use hospital_transform::config::AppConfig;
use hospital_transform::error::AppError;
use hospital_transform::pipeline::questionnaire::RawQuestionnaire;
use hospital_transform::telemetry;
use hospital_transform::{CancellationFlag, TransformationEngine, TransformationResult};
use tracing::info;

use crate::infra::{resolve_vendor_table, TracingEventPublisher};

#[derive(Args, Debug)]
pub(crate) struct TransformArgs {
    /// Questionnaire JSON files to transform
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Vendor knowledge table CSV (overrides VENDOR_TABLE_PATH)
    #[arg(long)]
    pub(crate) vendor_table: Option<PathBuf>,
    /// Print the persistence record as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct VendorArgs {
    /// Vendor knowledge table CSV (overrides VENDOR_TABLE_PATH)
    #[arg(long)]
    pub(crate) vendor_table: Option<PathBuf>,
}

pub(crate) async fn run_transform(args: TransformArgs) -> Result<(), AppError> {
    let TransformArgs {
        files,
        vendor_table,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let (vendors, source) =
        resolve_vendor_table(vendor_table, config.pipeline.vendor_table_path.as_deref())?;
    let source = source.map_or_else(|| "built-in".to_string(), |path| path.display().to_string());
    info!(
        vendors = vendors.len(),
        %source,
        files = files.len(),
        "starting transformations"
    );

    let engine = Arc::new(TransformationEngine::from_config(
        &config,
        vendors,
        Arc::new(TracingEventPublisher),
    ));
    let cancel = CancellationFlag::new();

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let engine = Arc::clone(&engine);
        let cancel = cancel.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let outcome = transform_file(&engine, &path, &cancel);
            (path, outcome)
        }));
    }

    let mut first_error = None;
    for handle in handles {
        let (path, outcome) = handle
            .await
            .map_err(|err| AppError::Task(err.to_string()))?;
        match outcome {
            Ok(result) if json => {
                let record = result.to_record()?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            Ok(result) => render_summary(&path, &result),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    let stats = engine.cache_stats();
    info!(
        hits = stats.hits(),
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        "assessment cache summary"
    );

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn transform_file(
    engine: &TransformationEngine,
    path: &Path,
    cancel: &CancellationFlag,
) -> Result<TransformationResult, AppError> {
    let data = std::fs::read_to_string(path)?;
    let raw: RawQuestionnaire = serde_json::from_str(&data)?;
    Ok(engine.transform(&raw, cancel)?)
}

fn render_summary(path: &Path, result: &TransformationResult) {
    let summary = &result.executive_summary;

    println!("{} ({})", summary.hospital_name, path.display());
    println!("Transformation: {}", result.transformation_id);
    println!("{}", summary.headline);
    println!(
        "Quality {:.2}, feasibility {:.2}, overall risk {}",
        result.quality_score,
        summary.feasibility_score,
        summary.overall_risk.label()
    );
    if let Some(refinement) = result.metrics.refinement {
        println!(
            "Refined once: feasibility {:.2} -> {:.2} ({} suggestion(s))",
            refinement.feasibility_before,
            refinement.feasibility_after,
            refinement.suggestions_applied
        );
    }

    println!("\nVendor recommendations");
    if result.vendor_recommendations.is_empty() {
        println!("- none above the compatibility threshold");
    }
    for ranked in &result.vendor_recommendations {
        println!(
            "- {}: ranking {:.3}, compatibility {:.3}, ~{:.0} months",
            ranked.vendor.vendor_name,
            ranked.ranking_score,
            ranked.vendor.compatibility_score,
            ranked.vendor.predicted_timeline_months
        );
    }

    println!("\nRoadmap");
    for milestone in &result.implementation_roadmap.milestones {
        println!(
            "- {}: months {:.1}-{:.1}, {} FTE",
            milestone.name, milestone.start_month, milestone.end_month, milestone.staff_fte
        );
    }

    println!("\nKey findings");
    for finding in &summary.key_findings {
        println!("- {finding}");
    }
    if !result.validation.issues.is_empty() {
        println!("\nValidation issues");
        for issue in &result.validation.issues {
            println!("- [{}] {}", issue.section.label(), issue.message);
        }
    }
    println!();
}

pub(crate) fn run_vendors(args: VendorArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let (vendors, source) =
        resolve_vendor_table(args.vendor_table, config.pipeline.vendor_table_path.as_deref())?;

    match source {
        Some(path) => println!("Vendor knowledge table ({})", path.display()),
        None => println!("Vendor knowledge table (built-in)"),
    }
    println!(
        "{:<16} {:>10} {:>11} {:>5} {:>6} {:>6} {:>6} {:>8} {:>7}",
        "vendor", "complexity", "difficulty", "api", "small", "medium", "large", "success", "months"
    );
    for vendor in vendors.vendors() {
        println!(
            "{:<16} {:>10.2} {:>11.2} {:>5.2} {:>6.2} {:>6.2} {:>6.2} {:>8.2} {:>7.1}",
            vendor.name,
            vendor.complexity_score,
            vendor.integration_difficulty,
            vendor.api_maturity,
            vendor.small_fit,
            vendor.medium_fit,
            vendor.large_fit,
            vendor.deployment_success_rate,
            vendor.average_implementation_time_months
        );
    }
    Ok(())
}
