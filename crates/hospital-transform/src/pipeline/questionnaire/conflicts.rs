use serde::{Deserialize, Serialize};

use super::requirements::Requirement;

/// Mutually exclusive delivery constraints detected in requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentConstraint {
    CloudHosted,
    OnPremise,
    Hybrid,
    OnPremiseDataResidency,
    AcceleratedRollout,
    PhasedRollout,
}

impl DeploymentConstraint {
    pub fn conflicts_with(self, other: Self) -> bool {
        use DeploymentConstraint::*;
        matches!(
            (self, other),
            (CloudHosted, OnPremise)
                | (OnPremise, CloudHosted)
                | (CloudHosted, OnPremiseDataResidency)
                | (OnPremiseDataResidency, CloudHosted)
                | (AcceleratedRollout, PhasedRollout)
                | (PhasedRollout, AcceleratedRollout)
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CloudHosted => "cloud hosting",
            Self::OnPremise => "on-premise hosting",
            Self::Hybrid => "hybrid hosting",
            Self::OnPremiseDataResidency => "on-premise data residency",
            Self::AcceleratedRollout => "accelerated rollout",
            Self::PhasedRollout => "phased rollout",
        }
    }
}

/// Annotation left on a requirement that lost a conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub superseded_by: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementConflict {
    pub kept: String,
    pub superseded: String,
    pub kept_constraint: DeploymentConstraint,
    pub superseded_constraint: DeploymentConstraint,
}

/// Walk a priority-sorted list and supersede the lower-ranked side of each conflicting pair.
pub(crate) fn resolve_conflicts(requirements: &mut [Requirement]) -> Vec<RequirementConflict> {
    let mut conflicts = Vec::new();

    for i in 0..requirements.len() {
        if requirements[i].resolution.is_some() {
            continue;
        }
        let Some(kept_constraint) = requirements[i].kind.constraint() else {
            continue;
        };

        for j in (i + 1)..requirements.len() {
            if requirements[j].resolution.is_some() {
                continue;
            }
            let Some(other) = requirements[j].kind.constraint() else {
                continue;
            };
            if !kept_constraint.conflicts_with(other) {
                continue;
            }

            let kept_id = requirements[i].id.clone();
            requirements[j].resolution = Some(ConflictResolution {
                superseded_by: kept_id.clone(),
                reason: format!(
                    "{} conflicts with higher-priority {} ({})",
                    other.label(),
                    kept_constraint.label(),
                    kept_id
                ),
            });
            conflicts.push(RequirementConflict {
                kept: kept_id,
                superseded: requirements[j].id.clone(),
                kept_constraint,
                superseded_constraint: other,
            });
        }
    }

    conflicts
}
