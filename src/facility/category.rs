use std::fmt;

use serde::{Deserialize, Serialize};

/// Map/filter category a facility is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityCategory {
    Slaughter,
    Processing,
    /// Breeding and animal production (farms, aquaculture, licensed breeders).
    Breeder,
    Exhibitor,
}

impl FacilityCategory {
    pub const ALL: [FacilityCategory; 4] = [
        FacilityCategory::Slaughter,
        FacilityCategory::Processing,
        FacilityCategory::Breeder,
        FacilityCategory::Exhibitor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slaughter => "slaughter",
            Self::Processing => "processing",
            Self::Breeder => "breeder",
            Self::Exhibitor => "exhibitor",
        }
    }

    /// Parse a category name as used in query strings and CLI flags.
    /// `production` is accepted as an alias for `breeder`.
    pub fn parse(raw: &str) -> Option<FacilityCategory> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "slaughter" => Some(Self::Slaughter),
            "processing" => Some(Self::Processing),
            "breeder" | "breeders" | "production" => Some(Self::Breeder),
            "exhibitor" | "exhibitors" => Some(Self::Exhibitor),
            _ => None,
        }
    }
}

impl fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category plus the label shown on the map and in exports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FacilityClass {
    pub category: FacilityCategory,
    pub label: String,
}

impl FacilityClass {
    pub fn new(category: FacilityCategory, label: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
        }
    }
}

/// License kinds carried by breeder/dealer/exhibitor registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    Breeder,
    Dealer,
    Exhibitor,
}

impl LicenseType {
    /// Upstream values vary ("Breeder", "Class A - Breeder", "DEALER").
    pub fn parse(raw: &str) -> Option<LicenseType> {
        let lower = raw.to_lowercase();
        if lower.contains("breeder") {
            Some(Self::Breeder)
        } else if lower.contains("dealer") {
            Some(Self::Dealer)
        } else if lower.contains("exhibitor") {
            Some(Self::Exhibitor)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Breeder => "Breeder",
            Self::Dealer => "Dealer",
            Self::Exhibitor => "Exhibitor",
        }
    }

    /// Dealers trade bred animals and are filtered with breeders.
    pub fn category(self) -> FacilityCategory {
        match self {
            Self::Breeder | Self::Dealer => FacilityCategory::Breeder,
            Self::Exhibitor => FacilityCategory::Exhibitor,
        }
    }
}
