//! Source record variants as served by the data API.
//!
//! Field names follow the upstream datasets exactly, including the spaced and
//! hyphenated keys of the research and license exports. Every field defaults so
//! a sparse or partially broken row still deserializes.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::facility::animals::{self, TestedCounts};
use crate::facility::{classify_facility_type, FacilityCategory, FacilityClass, LicenseType};
use crate::geo::{region_from_city_state_zip, Locatable};

/// Slaughterhouse or processing plant from an inspection-agency establishment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustrialFacility {
    pub establishment_id: String,
    pub establishment_name: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    /// Raw free-text type ("Meat Slaughter, Meat Processing", "Pig Farm", ...).
    #[serde(rename = "type", alias = "activities")]
    pub facility_type: String,
    pub state: String,
    pub city: String,
    pub street: String,
    pub zip: String,
    /// Legacy `"Yes"` flag from datasets without a meaningful `type`.
    pub slaughter: String,
    pub animals_slaughtered: String,
    pub animals_processed: String,
    /// Ordinal throughput bucket, "1" (smallest) to "5" (largest).
    pub slaughter_volume_category: String,
    pub processing_volume_category: String,
    pub dbas: String,
    pub phone: String,
    pub grant_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl IndustrialFacility {
    /// Build from a header -> cell map of the compiled locations CSV. Species
    /// columns are folded into the animal summaries here.
    pub fn from_csv_row(row: &HashMap<String, String>) -> Self {
        let cell = |key: &str| row.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let coordinate = |key: &str| row.get(key).and_then(|v| v.trim().parse::<f64>().ok());
        let column = |key: &str| row.get(key).map(String::as_str);

        let establishment_id = match cell("establishment_id") {
            id if id.is_empty() => cell("establishment_number"),
            id => id,
        };
        let facility_type = match cell("type") {
            t if t.is_empty() => cell("activities"),
            t => t,
        };
        let animals_slaughtered = match cell("animals_slaughtered") {
            s if s.is_empty() => animals::slaughtered_animals(column),
            s => s,
        };
        let animals_processed = match cell("animals_processed") {
            s if s.is_empty() => animals::processed_animals(column),
            s => s,
        };

        Self {
            establishment_id,
            establishment_name: cell("establishment_name"),
            latitude: coordinate("latitude"),
            longitude: coordinate("longitude"),
            facility_type,
            state: cell("state"),
            city: cell("city"),
            street: cell("street"),
            zip: cell("zip"),
            slaughter: cell("slaughter"),
            animals_slaughtered,
            animals_processed,
            slaughter_volume_category: cell("slaughter_volume_category"),
            processing_volume_category: cell("processing_volume_category"),
            dbas: cell("dbas"),
            phone: cell("phone"),
            grant_date: cell("grant_date"),
            country: Some(cell("country")).filter(|c| !c.is_empty()),
        }
    }

    pub fn is_slaughter_flagged(&self) -> bool {
        self.slaughter.trim().eq_ignore_ascii_case("yes")
    }

    /// Category and label. With a `type` string the type mapper decides;
    /// otherwise the legacy slaughter flag picks between the two original
    /// categories.
    pub fn facility_class(&self) -> FacilityClass {
        if self.facility_type.trim().is_empty() {
            legacy_class(self.is_slaughter_flagged())
        } else {
            classify_facility_type(&self.facility_type, Some(self.establishment_name.as_str()))
        }
    }
}

/// Two-category classification for records that predate the `type` field.
pub fn legacy_class(is_slaughter: bool) -> FacilityClass {
    if is_slaughter {
        FacilityClass::new(FacilityCategory::Slaughter, "Slaughterhouse")
    } else {
        FacilityClass::new(FacilityCategory::Processing, "Processing Facility")
    }
}

impl Locatable for IndustrialFacility {
    fn explicit_country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    fn region_code(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.state)
    }

    fn establishment_id(&self) -> Option<&str> {
        Some(&self.establishment_id)
    }

    fn inference_point(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Research facility registered to use animals in testing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchRegistrant {
    #[serde(rename = "Account Name")]
    pub account_name: String,
    #[serde(rename = "Customer Number", alias = "Customer Number_x")]
    pub customer_number: String,
    #[serde(rename = "Certificate Number")]
    pub certificate_number: String,
    #[serde(rename = "Registration Type")]
    pub registration_type: String,
    #[serde(rename = "Certificate Status")]
    pub certificate_status: String,
    #[serde(rename = "Status Date")]
    pub status_date: String,
    #[serde(rename = "Address Line 1")]
    pub address_line_1: String,
    #[serde(rename = "Address Line 2")]
    pub address_line_2: String,
    #[serde(rename = "City-State-Zip")]
    pub city_state_zip: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Dogs")]
    pub dogs: String,
    #[serde(rename = "Cats")]
    pub cats: String,
    #[serde(rename = "Guinea Pigs")]
    pub guinea_pigs: String,
    #[serde(rename = "Hamsters")]
    pub hamsters: String,
    #[serde(rename = "Rabbits")]
    pub rabbits: String,
    #[serde(rename = "Non-Human Primates")]
    pub non_human_primates: String,
    #[serde(rename = "Sheep")]
    pub sheep: String,
    #[serde(rename = "Pigs")]
    pub pigs: String,
    #[serde(rename = "Other Farm Animals")]
    pub other_farm_animals: String,
    #[serde(rename = "All Other Animals")]
    pub all_other_animals: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "Animals Tested On")]
    pub animals_tested: Option<String>,
}

impl ResearchRegistrant {
    pub fn tested_counts(&self) -> TestedCounts<'_> {
        TestedCounts {
            counts: [
                (self.dogs.as_str(), "Dogs"),
                (self.cats.as_str(), "Cats"),
                (self.guinea_pigs.as_str(), "Guinea Pigs"),
                (self.hamsters.as_str(), "Hamsters"),
                (self.rabbits.as_str(), "Rabbits"),
                (self.non_human_primates.as_str(), "Non-Human Primates"),
                (self.sheep.as_str(), "Sheep"),
                (self.pigs.as_str(), "Pigs"),
                (self.other_farm_animals.as_str(), "Other Farm Animals"),
                (self.all_other_animals.as_str(), "All Other Animals"),
            ],
        }
    }

    /// Precomputed summary when present, otherwise derived from the counts.
    pub fn animals_tested_summary(&self) -> Cow<'_, str> {
        match self.animals_tested.as_deref().map(str::trim) {
            Some(summary) if !summary.is_empty() => Cow::Borrowed(summary),
            _ => Cow::Owned(animals::tested_animals(&self.tested_counts())),
        }
    }

    /// Fill in `animals_tested` from the per-species counts if it is missing.
    pub fn with_tested_summary(mut self) -> Self {
        if self.animals_tested.as_deref().map_or(true, |s| s.trim().is_empty()) {
            self.animals_tested = Some(animals::tested_animals(&self.tested_counts()));
        }
        self
    }
}

impl Locatable for ResearchRegistrant {
    fn region_code(&self) -> Cow<'_, str> {
        Cow::Borrowed(region_from_city_state_zip(&self.city_state_zip).unwrap_or_default())
    }
}

/// Breeder, dealer or exhibitor license registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseRegistrant {
    #[serde(rename = "Account Name")]
    pub account_name: String,
    #[serde(rename = "Customer Number")]
    pub customer_number: String,
    #[serde(rename = "Certificate Number")]
    pub certificate_number: String,
    #[serde(rename = "License Type")]
    pub license_type: String,
    #[serde(rename = "Certificate Status")]
    pub certificate_status: String,
    #[serde(rename = "Status Date")]
    pub status_date: String,
    #[serde(rename = "Address Line 1")]
    pub address_line_1: String,
    #[serde(rename = "Address Line 2")]
    pub address_line_2: String,
    #[serde(rename = "City-State-Zip")]
    pub city_state_zip: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Zip")]
    pub zip: String,
    #[serde(rename = "Geocodio Latitude", deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Geocodio Longitude", deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
}

impl LicenseRegistrant {
    pub fn license_kind(&self) -> Option<LicenseType> {
        LicenseType::parse(&self.license_type)
    }

    /// Filter category. Unrecognized license types are grouped with breeders.
    pub fn category(&self) -> FacilityCategory {
        self.license_kind()
            .map(LicenseType::category)
            .unwrap_or(FacilityCategory::Breeder)
    }
}

impl Locatable for LicenseRegistrant {
    fn region_code(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.state.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{classify_country, Country};

    #[test]
    fn csv_row_fills_summaries_and_coordinates() {
        let row: HashMap<String, String> = [
            ("establishment_id", "M123+P123"),
            ("establishment_name", "Prairie Packing"),
            ("state", "IA"),
            ("latitude", "41.5"),
            ("longitude", "not-a-number"),
            ("activities", "Meat Slaughter"),
            ("sow_slaughter", "Yes"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let facility = IndustrialFacility::from_csv_row(&row);
        assert_eq!(facility.facility_type, "Meat Slaughter");
        assert_eq!(facility.latitude, Some(41.5));
        assert_eq!(facility.longitude, None);
        assert_eq!(facility.animals_slaughtered, "Pigs");
        assert_eq!(facility.animals_processed, "N/A");
        assert_eq!(facility.country, None);
        assert_eq!(facility.inference_point(), None);
    }

    #[test]
    fn legacy_mode_without_type() {
        let facility = IndustrialFacility {
            slaughter: "Yes".to_string(),
            ..Default::default()
        };
        assert_eq!(facility.facility_class().category, FacilityCategory::Slaughter);

        let facility = IndustrialFacility::default();
        assert_eq!(facility.facility_class().category, FacilityCategory::Processing);
    }

    #[test]
    fn research_region_comes_from_composite_address() {
        let report = ResearchRegistrant {
            city_state_zip: "Madison, WI 53706".to_string(),
            ..Default::default()
        };
        assert_eq!(report.region_code(), "WI");
        assert_eq!(classify_country(&report), Country::Us);
    }

    #[test]
    fn research_json_uses_upstream_keys() {
        let json = r#"{"Account Name":"Lab","Certificate Number":"34-R-0001",
            "City-State-Zip":"Boston, MA 02115","Dogs":"4","latitude":42.3,"longitude":null}"#;
        let report: ResearchRegistrant = serde_json::from_str(json).unwrap();
        assert_eq!(report.certificate_number, "34-R-0001");
        assert_eq!(report.latitude, Some(42.3));
        assert_eq!(report.longitude, None);
        assert_eq!(report.animals_tested_summary(), "4 Dogs");
    }

    #[test]
    fn license_category_follows_license_type() {
        let exhibitor = LicenseRegistrant {
            license_type: "Class C - Exhibitor".to_string(),
            ..Default::default()
        };
        assert_eq!(exhibitor.category(), FacilityCategory::Exhibitor);
        assert_eq!(LicenseRegistrant::default().category(), FacilityCategory::Breeder);
    }
}
