use serde::{Deserialize, Serialize};

use super::plan::{ImplementationApproach, PlanPhase, ResourceOptimization};
use crate::pipeline::assessment::{RiskCategory, RiskLevel};
use crate::pipeline::formulas::{ServerCounts, StorageTiers};
use crate::pipeline::questionnaire::{InfrastructureModel, RolloutStrategy};

/// The ten sections a complete technical specification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSection {
    Infrastructure,
    Integration,
    Security,
    Compliance,
    Deployment,
    Monitoring,
    BackupRecovery,
    ImplementationTimeline,
    ResourceAllocation,
    RiskMitigation,
}

impl SpecSection {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Infrastructure,
            Self::Integration,
            Self::Security,
            Self::Compliance,
            Self::Deployment,
            Self::Monitoring,
            Self::BackupRecovery,
            Self::ImplementationTimeline,
            Self::ResourceAllocation,
            Self::RiskMitigation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Integration => "integration",
            Self::Security => "security",
            Self::Compliance => "compliance",
            Self::Deployment => "deployment",
            Self::Monitoring => "monitoring",
            Self::BackupRecovery => "backup_recovery",
            Self::ImplementationTimeline => "implementation_timeline",
            Self::ResourceAllocation => "resource_allocation",
            Self::RiskMitigation => "risk_mitigation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureSpec {
    pub deployment_model: InfrastructureModel,
    pub data_residency_on_premise: bool,
    pub servers: ServerCounts,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub storage: StorageTiers,
    pub high_availability: bool,
    pub availability_target: f64,
    pub estimated_monthly_cost_usd: f64,
    pub estimated_annual_cost_usd: f64,
    pub budget_usd: Option<f64>,
    /// Budget proposed during refinement; `budget_usd` stays as declared.
    #[serde(default)]
    pub recommended_budget_usd: Option<f64>,
    pub notes: Vec<String>,
}

impl InfrastructureSpec {
    pub fn effective_budget_usd(&self) -> Option<f64> {
        self.recommended_budget_usd.or(self.budget_usd)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSpec {
    pub primary_ehr: Option<String>,
    pub vendor: Option<String>,
    pub interface_engine: String,
    pub dedicated_interface_engine: bool,
    pub difficulty_index: f64,
    pub standards: Vec<String>,
    pub interfaces: Vec<String>,
    pub estimated_interfaces: u32,
    pub custom_api_gateway: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySpec {
    pub mfa_required: bool,
    pub role_based_access: bool,
    pub encryption_at_rest: bool,
    pub encryption_in_transit: bool,
    pub encryption_standard: String,
    pub audit_logging: bool,
    pub controls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSpec {
    pub frameworks: Vec<String>,
    pub hipaa_safeguards: bool,
    pub audit_retention_years: u32,
    pub controls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub model: InfrastructureModel,
    pub environments: Vec<String>,
    pub rollout: RolloutStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSpec {
    pub uptime_target: f64,
    pub alert_rules: u32,
    pub metrics_retention_days: u32,
    pub support_coverage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecoverySpec {
    pub rpo_hours: f64,
    pub rto_hours: f64,
    pub backup_frequency: String,
    pub offsite_copies: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationTimeline {
    pub approach: ImplementationApproach,
    pub phases: Vec<PlanPhase>,
    pub total_months: f64,
    pub risk_buffer: f64,
    pub risk_adjusted_months: f64,
    pub target_months: f64,
    #[serde(default)]
    pub revised_target_months: Option<f64>,
}

impl ImplementationTimeline {
    pub fn effective_target_months(&self) -> f64 {
        self.revised_target_months.unwrap_or(self.target_months)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationItem {
    pub category: RiskCategory,
    pub level: RiskLevel,
    pub risk: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMitigationSpec {
    pub items: Vec<MitigationItem>,
}

/// Generated technical specification; absent sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub infrastructure: Option<InfrastructureSpec>,
    pub integration: Option<IntegrationSpec>,
    pub security: Option<SecuritySpec>,
    pub compliance: Option<ComplianceSpec>,
    pub deployment: Option<DeploymentSpec>,
    pub monitoring: Option<MonitoringSpec>,
    pub backup_recovery: Option<BackupRecoverySpec>,
    pub implementation_timeline: Option<ImplementationTimeline>,
    pub resource_allocation: Option<ResourceOptimization>,
    pub risk_mitigation: Option<RiskMitigationSpec>,
}

impl Specification {
    pub fn has_section(&self, section: SpecSection) -> bool {
        match section {
            SpecSection::Infrastructure => self.infrastructure.is_some(),
            SpecSection::Integration => self.integration.is_some(),
            SpecSection::Security => self.security.is_some(),
            SpecSection::Compliance => self.compliance.is_some(),
            SpecSection::Deployment => self.deployment.is_some(),
            SpecSection::Monitoring => self.monitoring.is_some(),
            SpecSection::BackupRecovery => self.backup_recovery.is_some(),
            SpecSection::ImplementationTimeline => self.implementation_timeline.is_some(),
            SpecSection::ResourceAllocation => self.resource_allocation.is_some(),
            SpecSection::RiskMitigation => self.risk_mitigation.is_some(),
        }
    }

    pub fn present_sections(&self) -> Vec<SpecSection> {
        SpecSection::ordered()
            .into_iter()
            .filter(|section| self.has_section(*section))
            .collect()
    }

    pub fn missing_sections(&self) -> Vec<SpecSection> {
        SpecSection::ordered()
            .into_iter()
            .filter(|section| !self.has_section(*section))
            .collect()
    }

    /// Share of the ten sections that are populated.
    pub fn populated_share(&self) -> f64 {
        self.present_sections().len() as f64 / SpecSection::ordered().len() as f64
    }
}
