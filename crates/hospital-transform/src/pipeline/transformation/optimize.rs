use super::stage::StageFailure;
use crate::pipeline::formulas::ComputedMetrics;
use crate::pipeline::specification::Specification;

/// Final clean-up pass over a validated specification.
///
/// Returns a new specification with duplicate standards removed, risk
/// mitigations ordered from most to least severe, and storage tiering notes
/// on the infrastructure section. Running it twice changes nothing further.
pub(crate) fn optimize(
    spec: &Specification,
    metrics: &ComputedMetrics,
) -> Result<Specification, StageFailure> {
    ensure_finite(metrics)?;

    let mut optimized = spec.clone();

    if let Some(integration) = optimized.integration.as_mut() {
        let mut seen: Vec<String> = Vec::with_capacity(integration.standards.len());
        integration.standards.retain(|standard| {
            let key = standard.trim().to_ascii_uppercase();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });
    }

    if let Some(mitigation) = optimized.risk_mitigation.as_mut() {
        mitigation
            .items
            .sort_by(|left, right| right.level.cmp(&left.level));
    }

    if let Some(infrastructure) = optimized.infrastructure.as_mut() {
        let storage = metrics.raf.storage;
        for note in [
            format!("Hot tier: {:.2} TB on low-latency block storage", storage.hot_tb),
            format!("Warm tier: {:.2} TB on standard block storage", storage.warm_tb),
            format!("Cold tier: {:.2} TB on archival object storage", storage.cold_tb),
        ] {
            if !infrastructure.notes.contains(&note) {
                infrastructure.notes.push(note);
            }
        }
    }

    Ok(optimized)
}

fn ensure_finite(metrics: &ComputedMetrics) -> Result<(), StageFailure> {
    let raf = &metrics.raf;
    let checks = [
        ("hcs", metrics.hcs),
        ("sidi", metrics.sidi),
        ("storage.hot_tb", raf.storage.hot_tb),
        ("storage.warm_tb", raf.storage.warm_tb),
        ("storage.cold_tb", raf.storage.cold_tb),
        ("cost.monthly_usd", raf.cost.monthly_usd),
        ("cost.annual_usd", raf.cost.annual_usd),
    ];

    match checks.iter().find(|(_, value)| !value.is_finite()) {
        Some((metric, _)) => Err(StageFailure::NonFiniteMetric { metric: *metric }),
        None => Ok(()),
    }
}
