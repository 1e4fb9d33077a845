use crate::pipeline::questionnaire::domain::vendor_matches;
use crate::pipeline::questionnaire::HospitalType;

/// Defaults a specification starts from before requirements are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BaseTemplate {
    pub(crate) availability_target: f64,
    pub(crate) high_availability: bool,
    pub(crate) rpo_hours: f64,
    pub(crate) rto_hours: f64,
    pub(crate) backup_frequency: &'static str,
    pub(crate) offsite_copies: u32,
    pub(crate) audit_retention_years: u32,
    pub(crate) environments: &'static [&'static str],
    pub(crate) interface_engine: &'static str,
    pub(crate) dedicated_interface_engine: bool,
    pub(crate) metrics_retention_days: u32,
    pub(crate) mfa_required: bool,
    pub(crate) support_coverage: &'static str,
}

pub(crate) fn base_template(hospital_type: HospitalType) -> BaseTemplate {
    match hospital_type {
        HospitalType::Academic => BaseTemplate {
            availability_target: 99.99,
            high_availability: true,
            rpo_hours: 1.0,
            rto_hours: 4.0,
            backup_frequency: "hourly",
            offsite_copies: 2,
            audit_retention_years: 7,
            environments: &["development", "test", "staging", "training", "production"],
            interface_engine: "Enterprise interface engine",
            dedicated_interface_engine: true,
            metrics_retention_days: 395,
            mfa_required: true,
            support_coverage: "24x7",
        },
        HospitalType::MultiSite => BaseTemplate {
            availability_target: 99.95,
            high_availability: true,
            rpo_hours: 1.0,
            rto_hours: 4.0,
            backup_frequency: "hourly",
            offsite_copies: 2,
            audit_retention_years: 7,
            environments: &["development", "test", "staging", "production"],
            interface_engine: "Enterprise interface engine",
            dedicated_interface_engine: true,
            metrics_retention_days: 365,
            mfa_required: true,
            support_coverage: "24x7",
        },
        HospitalType::Specialty => BaseTemplate {
            availability_target: 99.9,
            high_availability: true,
            rpo_hours: 4.0,
            rto_hours: 8.0,
            backup_frequency: "every 4 hours",
            offsite_copies: 1,
            audit_retention_years: 6,
            environments: &["test", "staging", "production"],
            interface_engine: "Standard interface engine",
            dedicated_interface_engine: false,
            metrics_retention_days: 180,
            mfa_required: false,
            support_coverage: "business hours with on-call",
        },
        HospitalType::Community => BaseTemplate {
            availability_target: 99.9,
            high_availability: false,
            rpo_hours: 4.0,
            rto_hours: 8.0,
            backup_frequency: "every 4 hours",
            offsite_copies: 1,
            audit_retention_years: 6,
            environments: &["test", "staging", "production"],
            interface_engine: "Standard interface engine",
            dedicated_interface_engine: false,
            metrics_retention_days: 180,
            mfa_required: false,
            support_coverage: "business hours with on-call",
        },
        HospitalType::General => BaseTemplate {
            availability_target: 99.9,
            high_availability: false,
            rpo_hours: 4.0,
            rto_hours: 12.0,
            backup_frequency: "daily",
            offsite_copies: 1,
            audit_retention_years: 6,
            environments: &["test", "production"],
            interface_engine: "Standard interface engine",
            dedicated_interface_engine: false,
            metrics_retention_days: 90,
            mfa_required: false,
            support_coverage: "business hours",
        },
        HospitalType::CriticalAccess => BaseTemplate {
            availability_target: 99.5,
            high_availability: false,
            rpo_hours: 8.0,
            rto_hours: 24.0,
            backup_frequency: "daily",
            offsite_copies: 1,
            audit_retention_years: 6,
            environments: &["test", "production"],
            interface_engine: "Vendor-hosted interface engine",
            dedicated_interface_engine: false,
            metrics_retention_days: 90,
            mfa_required: false,
            support_coverage: "business hours",
        },
    }
}

/// Vendor-specific integration defaults layered over the base template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VendorOverlay {
    pub(crate) vendor: &'static str,
    pub(crate) interface_engine: &'static str,
    pub(crate) native_standards: &'static [&'static str],
}

const OVERLAYS: &[VendorOverlay] = &[
    VendorOverlay {
        vendor: "Epic",
        interface_engine: "Epic Bridges",
        native_standards: &["FHIR R4", "HL7V2"],
    },
    VendorOverlay {
        vendor: "Oracle Health",
        interface_engine: "Oracle Health Open Engine",
        native_standards: &["FHIR R4", "HL7V2"],
    },
    VendorOverlay {
        vendor: "Cerner",
        interface_engine: "Oracle Health Open Engine",
        native_standards: &["FHIR R4", "HL7V2"],
    },
    VendorOverlay {
        vendor: "MEDITECH",
        interface_engine: "MEDITECH Expanse interoperability services",
        native_standards: &["FHIR R4", "HL7V2"],
    },
    VendorOverlay {
        vendor: "Allscripts",
        interface_engine: "Allscripts Integration Services",
        native_standards: &["HL7V2"],
    },
    VendorOverlay {
        vendor: "athenahealth",
        interface_engine: "athenaOne API platform",
        native_standards: &["FHIR R4"],
    },
];

pub(crate) fn vendor_overlay(vendor: &str) -> Option<&'static VendorOverlay> {
    OVERLAYS
        .iter()
        .find(|overlay| vendor_matches(vendor, overlay.vendor))
}
