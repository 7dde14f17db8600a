//! Request parsing and response payloads for the HTTP API. Handlers in
//! `routes` stay thin: they call into here and map errors to status codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::AppState;
use crate::error::CagemapError;
use crate::export::{export_filename_today, to_csv_string, ExportScope};
use crate::facility::{classify_facility_type, matching_rule, FacilityCategory};
use crate::filter::{filter, FilterCounts, FilterParams, VisibleRecords};
use crate::geo::Country;

/// Query values that select everything.
const ALL_SELECTOR: &str = "all";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("missing required parameter '{0}'")]
    Missing(&'static str),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Internal(#[from] CagemapError),
}

/// Query string shared by `/api/filter` and `/api/export.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub country: Option<String>,
    pub region: Option<String>,
    pub q: Option<String>,
    pub categories: Option<String>,
    pub research: Option<String>,
    pub license: Option<String>,
}

fn selector(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SELECTOR))
}

/// `None`/empty/`all` select every country; anything else must be a known tag.
pub fn parse_country(raw: Option<&str>) -> Result<Option<Country>, QueryError> {
    match selector(raw) {
        None => Ok(None),
        Some(tag) => Country::from_tag(tag)
            .map(Some)
            .ok_or_else(|| QueryError::UnknownCountry(tag.to_string())),
    }
}

/// Comma-separated category names; absent or empty enables all of them.
pub fn parse_categories(raw: Option<&str>) -> Result<Vec<FacilityCategory>, QueryError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(FacilityCategory::ALL.to_vec());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            FacilityCategory::parse(name).ok_or_else(|| QueryError::UnknownCategory(name.to_string()))
        })
        .collect()
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "0" || v == "false" || v == "no" => false,
        Some(v) if v == "1" || v == "true" || v == "yes" => true,
        _ => default,
    }
}

impl FilterQuery {
    pub fn to_params(&self) -> Result<FilterParams, QueryError> {
        Ok(FilterParams {
            country: parse_country(self.country.as_deref())?,
            region: selector(self.region.as_deref()).map(str::to_string),
            search: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            categories: parse_categories(self.categories.as_deref())?
                .into_iter()
                .collect(),
            include_research: parse_flag(self.research.as_deref(), true),
            include_license: parse_flag(self.license.as_deref(), true),
        })
    }
}

pub fn health_payload(state: &AppState) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "service": "cagemap-api",
        "version": env!("CARGO_PKG_VERSION"),
        "records": {
            "industrial": state.industrial.len(),
            "research": state.research.len(),
            "license": state.license.len(),
        }
    })
}

#[derive(Debug, Serialize)]
pub struct FilterResponse<'a> {
    #[serde(flatten)]
    pub visible: VisibleRecords<'a>,
    pub summary: String,
}

pub fn filter_payload<'a>(
    state: &'a AppState,
    query: &FilterQuery,
) -> Result<FilterResponse<'a>, QueryError> {
    let params = query.to_params()?;
    let visible = filter(state, &params);
    let summary = visible.counts.summary();
    Ok(FilterResponse { visible, summary })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionsResponse {
    pub country: Country,
    pub regions: Vec<RegionOption>,
}

pub fn regions_payload(state: &AppState, country: Option<&str>) -> Result<RegionsResponse, QueryError> {
    let country = parse_country(country)?.ok_or(QueryError::Missing("country"))?;
    let regions = state
        .region_options(country)
        .into_iter()
        .map(|(code, name)| RegionOption { code, name })
        .collect();
    Ok(RegionsResponse { country, regions })
}

pub struct CsvExport {
    pub filename: String,
    pub body: String,
    pub counts: FilterCounts,
}

pub fn export_payload(state: &AppState, query: &FilterQuery) -> Result<CsvExport, ApiError> {
    let params = query.to_params()?;
    let visible = filter(state, &params);
    let scope = if params.is_unfiltered() {
        ExportScope::All
    } else {
        ExportScope::Filtered
    };
    let body = to_csv_string(&visible.flat_rows())?;
    Ok(CsvExport {
        filename: export_filename_today(scope),
        body,
        counts: visible.counts,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyQuery {
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyResponse {
    pub category: FacilityCategory,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
}

pub fn classify_payload(query: &ClassifyQuery) -> Result<ClassifyResponse, QueryError> {
    let raw_type = query.facility_type.as_deref().unwrap_or_default();
    let name = query.name.as_deref();
    if raw_type.trim().is_empty() && name.map_or(true, |n| n.trim().is_empty()) {
        return Err(QueryError::Missing("type"));
    }
    let class = classify_facility_type(raw_type, name);
    let source = if raw_type.trim().is_empty() {
        name.unwrap_or_default()
    } else {
        raw_type
    };
    Ok(ClassifyResponse {
        category: class.category,
        label: class.label,
        rule: matching_rule(source.trim()),
    })
}
