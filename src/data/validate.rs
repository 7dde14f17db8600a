use std::collections::HashSet;
use std::fmt;

use crate::config::AppConfig;
use crate::data::app_state::AppState;
use crate::data::records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
use crate::facility::{default_class, matching_rule};
use crate::geo::{classify, region_from_city_state_zip, Country};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Rough continental-US box used to spot US records that fell into the UK
/// catch-all: (lat_min, lat_max, lon_min, lon_max).
const US_BBOX: (f64, f64, f64, f64) = (24.0, 50.0, -125.0, -66.0);

/// Words that suggest an animal facility even though no type rule fired.
const SUSPICIOUS_TYPE_WORDS: &[&str] = &[
    "abattoir", "butcher", "hatchery", "livestock", "breed", "kennel", "zoo", "kill",
];

fn in_us_bbox(latitude: f64, longitude: f64) -> bool {
    let (lat_min, lat_max, lon_min, lon_max) = US_BBOX;
    (lat_min..=lat_max).contains(&latitude) && (lon_min..=lon_max).contains(&longitude)
}

fn check_coordinates(
    report: &mut ValidationReport,
    context: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.coordinates"),
                    format!("coordinates out of range ({lat}, {lon})"),
                );
            }
        }
        _ => report.push(
            ValidationSeverity::Info,
            format!("{context}.coordinates"),
            "missing coordinates; record cannot be placed on the map",
        ),
    }
}

/// Data-quality diagnostics over every loaded record. Nothing here rejects a
/// record at runtime; the report is for the upstream collection scripts.
pub fn validate_state(state: &AppState) -> ValidationReport {
    let mut report = ValidationReport::default();

    if state.total_records() == 0 {
        report.push(
            ValidationSeverity::Warning,
            "datasets",
            "no records loaded from any dataset",
        );
    }

    let mut seen_ids = HashSet::new();
    for (index, facility) in state.industrial.iter().enumerate() {
        validate_industrial(&mut report, &mut seen_ids, index, facility);
    }
    for (index, registrant) in state.research.iter().enumerate() {
        validate_research(&mut report, index, registrant);
    }
    for (index, registrant) in state.license.iter().enumerate() {
        validate_license(&mut report, index, registrant);
    }

    tracing::debug!(
        errors = report.count(ValidationSeverity::Error),
        warnings = report.count(ValidationSeverity::Warning),
        "validation finished"
    );
    report
}

fn validate_industrial<'a>(
    report: &mut ValidationReport,
    seen_ids: &mut HashSet<&'a str>,
    index: usize,
    facility: &'a IndustrialFacility,
) {
    let id = facility.establishment_id.trim();
    let context = format!("industrial[{index}] id='{id}'");

    if id.is_empty() && facility.establishment_name.trim().is_empty() {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            "record has neither an establishment id nor a name",
        );
    }
    if !id.is_empty() && !seen_ids.insert(id) {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.establishment_id"),
            format!("duplicate establishment id '{id}'"),
        );
    }

    let class = classify(facility);
    if class.country == Country::Uk {
        if let Some((lat, lon)) = facility.latitude.zip(facility.longitude) {
            if in_us_bbox(lat, lon) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.state"),
                    format!(
                        "region code '{}' is not a known US state but coordinates are in the US",
                        facility.state
                    ),
                );
            }
        }
    } else if class.country == Country::Unknown {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.state"),
            "country could not be determined",
        );
    }

    let raw_type = facility.facility_type.trim();
    if !raw_type.is_empty() && matching_rule(raw_type).is_none() {
        let lower = raw_type.to_lowercase();
        if let Some(word) = SUSPICIOUS_TYPE_WORDS.iter().find(|w| lower.contains(*w)) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.type"),
                format!(
                    "type '{raw_type}' mentions '{word}' but falls through to '{}'",
                    default_class().label
                ),
            );
        }
    }

    check_coordinates(report, &context, facility.latitude, facility.longitude);
}

fn validate_research(report: &mut ValidationReport, index: usize, registrant: &ResearchRegistrant) {
    let context = format!(
        "research[{index}] certificate='{}'",
        registrant.certificate_number.trim()
    );
    if region_from_city_state_zip(&registrant.city_state_zip).is_none() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.City-State-Zip"),
            format!(
                "no region token in '{}'",
                registrant.city_state_zip.trim()
            ),
        );
    }
    check_coordinates(report, &context, registrant.latitude, registrant.longitude);
}

fn validate_license(report: &mut ValidationReport, index: usize, registrant: &LicenseRegistrant) {
    let context = format!(
        "license[{index}] certificate='{}'",
        registrant.certificate_number.trim()
    );
    if registrant.state.trim().is_empty() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.State"),
            "missing State",
        );
    }
    if registrant.license_kind().is_none() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.License Type"),
            format!(
                "unrecognized license type '{}'; grouped with breeders",
                registrant.license_type
            ),
        );
    }
    check_coordinates(report, &context, registrant.latitude, registrant.longitude);
}

/// Check that each configured dataset file exists. A missing file is loaded as
/// an empty dataset, so this only warns.
pub fn validate_data_files(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let files = [
        ("industrial", config.industrial_path()),
        ("research", config.research_path()),
        ("license", config.license_path()),
    ];
    for (name, path) in files {
        if !path.exists() {
            report.push(
                ValidationSeverity::Warning,
                name,
                format!("dataset file missing: {}", path.display()),
            );
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(report: &ValidationReport, severity: ValidationSeverity) -> Vec<String> {
        report
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.to_string())
            .collect()
    }

    #[test]
    fn empty_state_only_warns() {
        let report = validate_state(&AppState::default());
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 1);
    }

    #[test]
    fn uk_catch_all_with_us_coordinates_is_flagged() {
        let facility = IndustrialFacility {
            establishment_id: "M1".to_string(),
            establishment_name: "Typo Meats".to_string(),
            state: "Iowa".to_string(),
            latitude: Some(41.6),
            longitude: Some(-93.6),
            facility_type: "Meat Processing".to_string(),
            ..Default::default()
        };
        let state = AppState::from_records(vec![facility], Vec::new(), Vec::new());
        let warnings = messages(&validate_state(&state), ValidationSeverity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("coordinates are in the US"));
    }

    #[test]
    fn nameless_record_and_bad_coordinates_are_errors() {
        let facility = IndustrialFacility {
            state: "TX".to_string(),
            latitude: Some(123.0),
            longitude: Some(0.0),
            ..Default::default()
        };
        let state = AppState::from_records(vec![facility], Vec::new(), Vec::new());
        let report = validate_state(&state);
        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Error), 2);
    }

    #[test]
    fn suspicious_unmatched_type_and_duplicate_ids() {
        let facility = IndustrialFacility {
            establishment_id: "M7".to_string(),
            establishment_name: "Hatchery".to_string(),
            state: "GA".to_string(),
            latitude: Some(33.7),
            longitude: Some(-84.4),
            facility_type: "Egg Hatchery".to_string(),
            ..Default::default()
        };
        let state = AppState::from_records(vec![facility.clone(), facility], Vec::new(), Vec::new());
        let warnings = messages(&validate_state(&state), ValidationSeverity::Warning);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("duplicate establishment id 'M7'")));
        assert!(warnings.iter().any(|w| w.contains("mentions 'hatchery'")));
    }

    #[test]
    fn research_and_license_diagnostics() {
        let research = ResearchRegistrant {
            certificate_number: "34-R-1".to_string(),
            city_state_zip: "Springfield".to_string(),
            ..Default::default()
        };
        let license = LicenseRegistrant {
            certificate_number: "42-A-1".to_string(),
            license_type: "Class Z".to_string(),
            latitude: Some(38.0),
            longitude: Some(-92.0),
            ..Default::default()
        };
        let state = AppState::from_records(Vec::new(), vec![research], vec![license]);
        let report = validate_state(&state);
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 3);
        assert_eq!(report.count(ValidationSeverity::Info), 1);
        assert_eq!(
            report.diagnostics[0].to_string(),
            "[warning] research[0] certificate='34-R-1'.City-State-Zip: no region token in 'Springfield'"
        );
    }

    #[test]
    fn missing_files_are_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_data_dir(dir.path());
        let report = validate_data_files(&config);
        assert_eq!(report.count(ValidationSeverity::Warning), 3);
        assert!(!report.has_errors());
    }
}
