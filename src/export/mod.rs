//! Tabular export: every record variant projected onto one flat row shape and
//! written as CSV under a single header.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
use crate::error::Result;
use crate::geo::{classify_country, parse_city_state_zip};

/// Column order of every export. Must match the field order of [`FlatRow`].
pub const FLAT_ROW_HEADER: [&str; 20] = [
    "Type",
    "Name",
    "State",
    "City",
    "ZIP",
    "Address",
    "Latitude",
    "Longitude",
    "EstablishmentID",
    "CertificateNumber",
    "Phone",
    "DBAs",
    "SlaughterVolume",
    "ProcessingVolume",
    "AnimalsSlaughtered",
    "AnimalsProcessed",
    "RegistrationType",
    "LicenseType",
    "AnimalsTestedOn",
    "Country",
];

pub const RESEARCH_TYPE_LABEL: &str = "Research Facility";

/// Union of the fields of all record variants. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatRow {
    #[serde(rename = "Type")]
    pub facility_type: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "ZIP")]
    pub zip: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "EstablishmentID")]
    pub establishment_id: String,
    #[serde(rename = "CertificateNumber")]
    pub certificate_number: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "DBAs")]
    pub dbas: String,
    #[serde(rename = "SlaughterVolume")]
    pub slaughter_volume: String,
    #[serde(rename = "ProcessingVolume")]
    pub processing_volume: String,
    #[serde(rename = "AnimalsSlaughtered")]
    pub animals_slaughtered: String,
    #[serde(rename = "AnimalsProcessed")]
    pub animals_processed: String,
    #[serde(rename = "RegistrationType")]
    pub registration_type: String,
    #[serde(rename = "LicenseType")]
    pub license_type: String,
    #[serde(rename = "AnimalsTestedOn")]
    pub animals_tested_on: String,
    #[serde(rename = "Country")]
    pub country: String,
}

/// Borrowed record of any variant, ready to be flattened.
#[derive(Debug, Clone, Copy)]
pub enum ExportRecord<'a> {
    Industrial(&'a IndustrialFacility),
    Research(&'a ResearchRegistrant),
    License(&'a LicenseRegistrant),
}

impl ExportRecord<'_> {
    pub fn normalize(self) -> FlatRow {
        match self {
            Self::Industrial(record) => normalize_industrial(record),
            Self::Research(record) => normalize_research(record),
            Self::License(record) => normalize_license(record),
        }
    }
}

/// Meaning of an ordinal throughput bucket. Unknown codes pass through.
pub fn volume_label(code: &str) -> String {
    let code = code.trim();
    let label = match code {
        "1" => "Very Small",
        "2" => "Small",
        "3" => "Medium",
        "4" => "Large",
        "5" => "Very Large",
        _ => return code.to_string(),
    };
    format!("{label} ({code})")
}

fn coordinate(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn join_address(line_1: &str, line_2: &str) -> String {
    match (line_1.trim(), line_2.trim()) {
        (first, "") => first.to_string(),
        ("", second) => second.to_string(),
        (first, second) => format!("{first}, {second}"),
    }
}

/// Industrial facilities use the type mapper's label when a `type` string is
/// present, otherwise the legacy slaughter flag decides.
pub fn normalize_industrial(record: &IndustrialFacility) -> FlatRow {
    FlatRow {
        facility_type: record.facility_class().label,
        name: record.establishment_name.clone(),
        state: record.state.clone(),
        city: record.city.clone(),
        zip: record.zip.clone(),
        address: record.street.clone(),
        latitude: coordinate(record.latitude),
        longitude: coordinate(record.longitude),
        establishment_id: record.establishment_id.clone(),
        phone: record.phone.clone(),
        dbas: record.dbas.clone(),
        slaughter_volume: volume_label(&record.slaughter_volume_category),
        processing_volume: volume_label(&record.processing_volume_category),
        animals_slaughtered: record.animals_slaughtered.clone(),
        animals_processed: record.animals_processed.clone(),
        country: classify_country(record).code().to_string(),
        ..FlatRow::default()
    }
}

pub fn normalize_research(record: &ResearchRegistrant) -> FlatRow {
    let parsed = parse_city_state_zip(&record.city_state_zip);
    FlatRow {
        facility_type: RESEARCH_TYPE_LABEL.to_string(),
        name: record.account_name.clone(),
        state: parsed.state,
        city: parsed.city,
        zip: parsed.zip,
        address: join_address(&record.address_line_1, &record.address_line_2),
        latitude: coordinate(record.latitude),
        longitude: coordinate(record.longitude),
        certificate_number: record.certificate_number.clone(),
        registration_type: record.registration_type.clone(),
        animals_tested_on: record.animals_tested_summary().into_owned(),
        country: classify_country(record).code().to_string(),
        ..FlatRow::default()
    }
}

/// License rows carry separate City/State/Zip columns; the composite column is
/// only used to fill gaps.
pub fn normalize_license(record: &LicenseRegistrant) -> FlatRow {
    let parsed = parse_city_state_zip(&record.city_state_zip);
    let or_parsed = |own: &str, parsed: String| {
        if own.trim().is_empty() {
            parsed
        } else {
            own.trim().to_string()
        }
    };
    FlatRow {
        facility_type: record
            .license_kind()
            .map(|kind| kind.label().to_string())
            .unwrap_or_else(|| record.license_type.trim().to_string()),
        name: record.account_name.clone(),
        state: or_parsed(&record.state, parsed.state),
        city: or_parsed(&record.city, parsed.city),
        zip: or_parsed(&record.zip, parsed.zip),
        address: join_address(&record.address_line_1, &record.address_line_2),
        latitude: coordinate(record.latitude),
        longitude: coordinate(record.longitude),
        certificate_number: record.certificate_number.clone(),
        license_type: record.license_type.clone(),
        country: classify_country(record).code().to_string(),
        ..FlatRow::default()
    }
}

/// Write rows as CSV. The header is always written, so an empty export is a
/// valid one-line file.
pub fn write_csv<W: Write>(rows: &[FlatRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    csv_writer.write_record(FLAT_ROW_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[FlatRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Whether an export holds the complete dataset or a filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Filtered,
}

impl ExportScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Filtered => "filtered",
        }
    }
}

pub fn export_filename(scope: ExportScope, date: NaiveDate) -> String {
    format!("cagemap_{}_{}.csv", scope.as_str(), date.format("%Y-%m-%d"))
}

pub fn export_filename_today(scope: ExportScope) -> String {
    export_filename(scope, chrono::Utc::now().date_naive())
}
