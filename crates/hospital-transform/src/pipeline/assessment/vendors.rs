use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::pipeline::questionnaire::domain::vendor_matches;

const SMALL_HOSPITAL_BEDS: u32 = 100;
const MEDIUM_HOSPITAL_BEDS: u32 = 400;

/// Static knowledge about one EHR vendor; every score is on a 0-1 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    #[serde(rename = "vendor")]
    pub name: String,
    pub complexity_score: f64,
    pub integration_difficulty: f64,
    pub api_maturity: f64,
    pub small_fit: f64,
    pub medium_fit: f64,
    pub large_fit: f64,
    pub integration_fit: f64,
    pub deployment_success_rate: f64,
    pub average_implementation_time_months: f64,
}

impl VendorProfile {
    /// Fit for a hospital of the given size: small under 100 beds, medium under 400.
    pub fn size_fit(&self, bed_count: u32) -> f64 {
        if bed_count < SMALL_HOSPITAL_BEDS {
            self.small_fit
        } else if bed_count < MEDIUM_HOSPITAL_BEDS {
            self.medium_fit
        } else {
            self.large_fit
        }
    }

    fn validate(&self) -> Result<(), VendorTableError> {
        if self.name.trim().is_empty() {
            return Err(VendorTableError::InvalidValue {
                vendor: self.name.clone(),
                field: "vendor",
            });
        }

        let unit_fields = [
            ("complexity_score", self.complexity_score),
            ("integration_difficulty", self.integration_difficulty),
            ("api_maturity", self.api_maturity),
            ("small_fit", self.small_fit),
            ("medium_fit", self.medium_fit),
            ("large_fit", self.large_fit),
            ("integration_fit", self.integration_fit),
            ("deployment_success_rate", self.deployment_success_rate),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(VendorTableError::InvalidValue {
                    vendor: self.name.clone(),
                    field,
                });
            }
        }

        let months = self.average_implementation_time_months;
        if !months.is_finite() || months <= 0.0 {
            return Err(VendorTableError::InvalidValue {
                vendor: self.name.clone(),
                field: "average_implementation_time_months",
            });
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum VendorTableError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue { vendor: String, field: &'static str },
    Empty,
}

impl std::fmt::Display for VendorTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorTableError::Io(err) => write!(f, "failed to read vendor table: {}", err),
            VendorTableError::Csv(err) => write!(f, "invalid vendor table CSV: {}", err),
            VendorTableError::InvalidValue { vendor, field } => {
                write!(f, "vendor '{}' has an out-of-range {}", vendor, field)
            }
            VendorTableError::Empty => write!(f, "vendor table contains no vendors"),
        }
    }
}

impl std::error::Error for VendorTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VendorTableError::Io(err) => Some(err),
            VendorTableError::Csv(err) => Some(err),
            VendorTableError::InvalidValue { .. } | VendorTableError::Empty => None,
        }
    }
}

impl From<std::io::Error> for VendorTableError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for VendorTableError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Vendors the assessment engine scores every hospital against.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorKnowledgeTable {
    vendors: Vec<VendorProfile>,
}

impl VendorKnowledgeTable {
    pub fn new(vendors: Vec<VendorProfile>) -> Result<Self, VendorTableError> {
        if vendors.is_empty() {
            return Err(VendorTableError::Empty);
        }
        for vendor in &vendors {
            vendor.validate()?;
        }
        Ok(Self { vendors })
    }

    /// Built-in table covering the major acute-care EHR vendors.
    pub fn standard() -> Self {
        Self {
            vendors: vec![
                vendor("Epic", [0.8, 0.5, 0.9, 0.6, 0.85, 0.95, 0.9, 0.92], 18.0),
                vendor("Oracle Health", [0.75, 0.6, 0.85, 0.65, 0.85, 0.9, 0.85, 0.88], 16.0),
                vendor("MEDITECH", [0.6, 0.55, 0.75, 0.85, 0.8, 0.65, 0.75, 0.86], 12.0),
                vendor("Allscripts", [0.55, 0.65, 0.7, 0.8, 0.75, 0.6, 0.7, 0.82], 10.0),
                vendor("athenahealth", [0.4, 0.4, 0.85, 0.9, 0.7, 0.45, 0.8, 0.9], 6.0),
            ],
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VendorTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, VendorTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut vendors = Vec::new();
        for record in csv_reader.deserialize::<VendorProfile>() {
            vendors.push(record?);
        }

        Self::new(vendors)
    }

    pub fn vendors(&self) -> &[VendorProfile] {
        &self.vendors
    }

    pub fn get(&self, name: &str) -> Option<&VendorProfile> {
        self.vendors
            .iter()
            .find(|vendor| vendor_matches(name, &vendor.name))
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

impl Default for VendorKnowledgeTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn vendor(name: &str, scores: [f64; 8], months: f64) -> VendorProfile {
    let [complexity_score, integration_difficulty, api_maturity, small_fit, medium_fit, large_fit, integration_fit, deployment_success_rate] =
        scores;
    VendorProfile {
        name: name.to_string(),
        complexity_score,
        integration_difficulty,
        api_maturity,
        small_fit,
        medium_fit,
        large_fit,
        integration_fit,
        deployment_success_rate,
        average_implementation_time_months: months,
    }
}
