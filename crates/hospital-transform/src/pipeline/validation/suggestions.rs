use serde::{Deserialize, Serialize};

use super::dimensions::{lacks_high_availability, sidi_penalty};
use super::FeasibilityBreakdown;
use crate::pipeline::formulas::bounded::round_to;
use crate::pipeline::specification::{SpecSection, Specification};

/// Contracted staff may at most match the internal team they join.
const MAX_CONTRACTED_PER_INTERNAL_FTE: u32 = 1;
/// A refined target or budget may exceed the declared one by at most half again.
const MAX_EXTENSION_FACTOR: f64 = 1.5;

/// Specification field a refinement suggestion targets. Declared inputs
/// (internal staff, requested target, declared budget) are never targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecField {
    DedicatedInterfaceEngine,
    HighAvailability,
    ContractedFte,
    RevisedTargetMonths,
    RecommendedBudgetUsd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RefinementValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementSuggestion {
    pub section: SpecSection,
    pub field: SpecField,
    pub recommended: RefinementValue,
    pub reason: String,
    pub priority: SuggestionPriority,
}

fn priority_for(score: f64) -> SuggestionPriority {
    if score < 0.5 {
        SuggestionPriority::High
    } else if score < 0.8 {
        SuggestionPriority::Medium
    } else {
        SuggestionPriority::Low
    }
}

/// Suggestions for every feasibility component below 1.0, highest priority first.
pub(crate) fn suggest(
    spec: &Specification,
    breakdown: &FeasibilityBreakdown,
) -> Vec<RefinementSuggestion> {
    let mut suggestions = Vec::new();

    let penalty = sidi_penalty(spec);
    if penalty > 0.0 {
        let difficulty = spec
            .integration
            .as_ref()
            .map(|integration| integration.difficulty_index)
            .unwrap_or_default();
        suggestions.push(RefinementSuggestion {
            section: SpecSection::Integration,
            field: SpecField::DedicatedInterfaceEngine,
            recommended: RefinementValue::Flag(true),
            reason: format!(
                "Integration difficulty index {difficulty:.2} calls for a dedicated interface engine"
            ),
            priority: if penalty >= 0.3 {
                SuggestionPriority::High
            } else {
                SuggestionPriority::Medium
            },
        });
    }

    if lacks_high_availability(spec) {
        suggestions.push(RefinementSuggestion {
            section: SpecSection::Infrastructure,
            field: SpecField::HighAvailability,
            recommended: RefinementValue::Flag(true),
            reason: "Availability target of 99.99% or more needs redundant infrastructure"
                .to_string(),
            priority: SuggestionPriority::High,
        });
    }

    if let Some(resources) = spec.resource_allocation.as_ref() {
        let ceiling = resources
            .available_fte
            .saturating_mul(MAX_CONTRACTED_PER_INTERNAL_FTE);
        let contracted = resources.shortfall_fte.min(ceiling);
        if breakdown.resource < 1.0 && contracted > resources.contracted_fte {
            let mut reason = format!(
                "Peak demand of {} FTE exceeds {} internal staff",
                resources.peak_demand_fte, resources.available_fte
            );
            if contracted < resources.shortfall_fte {
                reason.push_str("; contracting is capped at the internal team size");
            }
            suggestions.push(RefinementSuggestion {
                section: SpecSection::ResourceAllocation,
                field: SpecField::ContractedFte,
                recommended: RefinementValue::Number(contracted as f64),
                reason,
                priority: priority_for(breakdown.resource),
            });
        }
    }

    if let Some(timeline) = spec.implementation_timeline.as_ref() {
        let needed = timeline.risk_adjusted_months.ceil();
        let ceiling = (timeline.target_months * MAX_EXTENSION_FACTOR).ceil();
        let revised = needed.min(ceiling);
        if breakdown.timeline < 1.0 && revised > timeline.effective_target_months() {
            suggestions.push(RefinementSuggestion {
                section: SpecSection::ImplementationTimeline,
                field: SpecField::RevisedTargetMonths,
                recommended: RefinementValue::Number(revised),
                reason: format!(
                    "Risk-adjusted plan of {:.1} months exceeds the requested {:.0}-month target",
                    timeline.risk_adjusted_months, timeline.target_months
                ),
                priority: priority_for(breakdown.timeline),
            });
        }
    }

    if let Some(infrastructure) = spec.infrastructure.as_ref() {
        if let Some(declared) = infrastructure.budget_usd {
            let needed = round_to(infrastructure.estimated_annual_cost_usd, 2);
            let ceiling = round_to(declared * MAX_EXTENSION_FACTOR, 2);
            let recommended = needed.min(ceiling);
            let current = infrastructure.effective_budget_usd().unwrap_or(declared);
            if breakdown.budget < 1.0 && recommended > current {
                suggestions.push(RefinementSuggestion {
                    section: SpecSection::Infrastructure,
                    field: SpecField::RecommendedBudgetUsd,
                    recommended: RefinementValue::Number(recommended),
                    reason: "Declared budget does not cover the estimated annual infrastructure cost"
                        .to_string(),
                    priority: priority_for(breakdown.budget),
                });
            }
        }
    }

    suggestions.sort_by(|left, right| {
        left.priority
            .cmp(&right.priority)
            .then_with(|| left.section.cmp(&right.section))
    });
    suggestions
}

/// Apply suggestions to a copy of `spec`. Suggestions whose section is
/// absent or whose value kind does not fit the field are skipped. Declared
/// staffing, target and budget are left as they were; refinement is recorded
/// beside them.
pub fn refine(spec: &Specification, suggestions: &[RefinementSuggestion]) -> Specification {
    let mut refined = spec.clone();

    for suggestion in suggestions {
        match (suggestion.field, &suggestion.recommended) {
            (SpecField::DedicatedInterfaceEngine, RefinementValue::Flag(flag)) => {
                if let Some(integration) = refined.integration.as_mut() {
                    integration.dedicated_interface_engine = *flag;
                }
            }
            (SpecField::HighAvailability, RefinementValue::Flag(flag)) => {
                if let Some(infrastructure) = refined.infrastructure.as_mut() {
                    infrastructure.high_availability = *flag;
                }
            }
            (SpecField::ContractedFte, RefinementValue::Number(fte))
                if fte.is_finite() && *fte >= 0.0 =>
            {
                if let Some(resources) = refined.resource_allocation.as_mut() {
                    *resources = resources.with_contracted(fte.ceil() as u32);
                }
            }
            (SpecField::RevisedTargetMonths, RefinementValue::Number(months))
                if months.is_finite() && *months > 0.0 =>
            {
                if let Some(timeline) = refined.implementation_timeline.as_mut() {
                    timeline.revised_target_months = Some(*months);
                }
            }
            (SpecField::RecommendedBudgetUsd, RefinementValue::Number(budget))
                if budget.is_finite() && *budget > 0.0 =>
            {
                if let Some(infrastructure) = refined.infrastructure.as_mut() {
                    infrastructure.recommended_budget_usd = Some(*budget);
                }
            }
            _ => {}
        }
    }

    refined
}
