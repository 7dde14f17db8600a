//! CSV/JSON dataset loading. Graceful: a missing file is an empty dataset, a
//! malformed row is skipped with a warning, and only an unreadable header or a
//! broken JSON document is an error.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::data::records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
use crate::error::{CagemapError, Result};

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

/// Deserialize every row of a CSV source, skipping rows that fail to parse.
fn load_csv_rows<T: DeserializeOwned, R: Read>(source: R, dataset: &str) -> Result<Vec<T>> {
    let mut reader = csv_reader(source);
    reader.headers()?;
    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => tracing::warn!(dataset, row = index + 1, error = %err, "skipping malformed row"),
        }
    }
    Ok(rows)
}

/// A JSON document holding either a bare array or `{ "<key>": [...] }`.
fn load_json_array<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)?;
    let payload: serde_json::Value = serde_json::from_str(&raw)?;
    let entries = match payload {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Object(mut object) => match object.remove(key) {
            Some(serde_json::Value::Array(entries)) => entries,
            _ => {
                return Err(CagemapError::Dataset {
                    name: key.to_string(),
                    reason: format!("expected top-level array or {{ \"{key}\": [...] }}"),
                })
            }
        },
        _ => {
            return Err(CagemapError::Dataset {
                name: key.to_string(),
                reason: "expected a JSON array".to_string(),
            })
        }
    };

    let mut rows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry) {
            Ok(row) => rows.push(row),
            Err(err) => tracing::warn!(dataset = key, row = index, error = %err, "skipping malformed entry"),
        }
    }
    Ok(rows)
}

fn missing(path: &Path, dataset: &str) -> bool {
    if path.exists() {
        return false;
    }
    tracing::warn!(dataset, path = %path.display(), "dataset file not found; using empty set");
    true
}

/// Industrial establishments from the compiled locations CSV. Rows are read as
/// header -> cell maps so the per-species columns can be folded into animal
/// summaries.
pub fn load_industrial_csv<R: Read>(reader: R) -> Result<Vec<IndustrialFacility>> {
    let rows: Vec<HashMap<String, String>> = load_csv_rows(reader, "industrial")?;
    Ok(rows.iter().map(IndustrialFacility::from_csv_row).collect())
}

/// Research registrants, with the tested-animals summary filled in.
pub fn load_research_csv<R: Read>(reader: R) -> Result<Vec<ResearchRegistrant>> {
    let rows: Vec<ResearchRegistrant> = load_csv_rows(reader, "research")?;
    Ok(rows
        .into_iter()
        .map(ResearchRegistrant::with_tested_summary)
        .collect())
}

pub fn load_license_csv<R: Read>(reader: R) -> Result<Vec<LicenseRegistrant>> {
    load_csv_rows(reader, "license")
}

/// Industrial dataset from a `.csv` or `.json` file.
pub fn load_industrial(path: &Path) -> Result<Vec<IndustrialFacility>> {
    if missing(path, "industrial") {
        return Ok(Vec::new());
    }
    if is_json(path) {
        return load_json_array(path, "locations");
    }
    load_industrial_csv(fs::File::open(path)?)
}

pub fn load_research(path: &Path) -> Result<Vec<ResearchRegistrant>> {
    if missing(path, "research") {
        return Ok(Vec::new());
    }
    if is_json(path) {
        let rows: Vec<ResearchRegistrant> = load_json_array(path, "reports")?;
        return Ok(rows
            .into_iter()
            .map(ResearchRegistrant::with_tested_summary)
            .collect());
    }
    load_research_csv(fs::File::open(path)?)
}

pub fn load_license(path: &Path) -> Result<Vec<LicenseRegistrant>> {
    if missing(path, "license") {
        return Ok(Vec::new());
    }
    if is_json(path) {
        load_json_array(path, "reports")
    } else {
        load_license_csv(fs::File::open(path)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn research_csv_from_reader_skips_nothing_valid() {
        let data = "Account Name,City-State-Zip,Dogs,latitude,longitude\n\
                    Lab One,\"Madison, WI 53706\",3,43.07,-89.40\n\
                    Lab Two,,,,\n";
        let rows = load_research_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].animals_tested.as_deref(), Some("3 Dogs"));
        assert_eq!(rows[1].latitude, None);
    }

    #[test]
    fn missing_file_is_empty_dataset() {
        let rows = load_license(Path::new("/definitely/not/here.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn industrial_csv_keeps_rows_with_bad_coordinates() {
        let file = temp_file(
            ".csv",
            "establishment_id,establishment_name,state,latitude,longitude,activities,beef_processing\n\
             M1,Alpha Meats,IA,41.6,-93.6,Meat Processing,Yes\n\
             M2,Beta Meats,TX,,oops,Meat Slaughter,\n",
        );
        let rows = load_industrial(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].animals_processed, "Beef");
        assert_eq!(rows[1].latitude, None);
        assert_eq!(rows[1].longitude, None);
    }

    #[test]
    fn license_csv_uses_spaced_headers() {
        let file = temp_file(
            ".csv",
            "Account Name,Certificate Number,License Type,State,Geocodio Latitude,Geocodio Longitude\n\
             Puppy Place,42-A-0001,Class A - Breeder,MO,37.1,-92.5\n",
        );
        let rows = load_license(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_name, "Puppy Place");
        assert_eq!(rows[0].latitude, Some(37.1));
    }

    #[test]
    fn research_json_wrapped_object() {
        let file = temp_file(
            ".json",
            r#"{"reports":[{"Account Name":"Lab","Rabbits":"2"},{"Account Name":"Other"}]}"#,
        );
        let rows = load_research(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].animals_tested.as_deref(), Some("2 Rabbits"));
        assert_eq!(rows[1].animals_tested.as_deref(), Some("Unknown"));
    }

    #[test]
    fn json_scalar_is_dataset_error() {
        let file = temp_file(".json", "42");
        assert!(matches!(
            load_license(file.path()),
            Err(CagemapError::Dataset { .. })
        ));
    }
}
