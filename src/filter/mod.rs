//! Filter engine: the visible subset of every dataset for one selection of
//! country, region, search text and categories.
//!
//! A pass is a single linear scan per dataset over the in-memory records. The
//! only state is a type-string memo local to the pass.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::data::records::{IndustrialFacility, LicenseRegistrant, ResearchRegistrant};
use crate::data::AppState;
use crate::export::{ExportRecord, FlatRow};
use crate::facility::{FacilityCategory, FacilityClass};
use crate::geo::{classify, matches_region, Country, Locatable};

/// Search synonyms, applied to species text only.
const SPECIES_SYNONYMS: &[(&[&str], &[&str])] = &[
    (
        &["cow", "cows", "bull", "bulls", "steer", "steers", "heifer", "heifers", "beef"],
        &["cattle"],
    ),
    (&["calf", "veal"], &["calves"]),
    (&["hog", "hogs", "swine", "sow", "sows", "pork"], &["pigs"]),
    (&["hen", "hens", "broiler", "broilers", "chicken"], &["chickens"]),
    (&["monkey", "monkeys", "primate", "macaque", "macaques"], &["primates"]),
    (&["lamb", "lambs", "mutton", "ewe", "ewes"], &["sheep"]),
    (&["goat", "kid", "kids"], &["goats"]),
    (&["bunny", "bunnies", "rabbit"], &["rabbits"]),
    (&["dog", "puppy", "puppies"], &["dogs"]),
    (&["cat", "kitten", "kittens"], &["cats"]),
    (&["turkey"], &["turkeys"]),
    (&["fish", "salmon", "trout"], &["aquatic"]),
];

/// One filter selection. `None` fields select everything.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub country: Option<Country>,
    pub region: Option<String>,
    pub search: Option<String>,
    pub categories: BTreeSet<FacilityCategory>,
    /// Research registrants have no facility category; they are toggled as a layer.
    pub include_research: bool,
    pub include_license: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            country: None,
            region: None,
            search: None,
            categories: FacilityCategory::ALL.into_iter().collect(),
            include_research: true,
            include_license: true,
        }
    }
}

impl FilterParams {
    /// True when nothing is narrowed, so a pass returns every record.
    pub fn is_unfiltered(&self) -> bool {
        self.country.is_none()
            && self.region.is_none()
            && self.search_term().is_none()
            && self.categories.len() == FacilityCategory::ALL.len()
            && self.include_research
            && self.include_license
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

/// Industrial facility plus its classification, as shown on the map.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleFacility<'a> {
    #[serde(flatten)]
    pub record: &'a IndustrialFacility,
    pub category: FacilityCategory,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub industrial: usize,
    pub research: usize,
    pub license: usize,
    pub total: usize,
    pub by_category: BTreeMap<FacilityCategory, usize>,
}

impl FilterCounts {
    /// Status line for the map footer.
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "No facilities match the current filters".to_string();
        }
        format!(
            "Showing {} facilities ({} industrial, {} research, {} licensed)",
            self.total, self.industrial, self.research, self.license
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VisibleRecords<'a> {
    pub industrial: Vec<VisibleFacility<'a>>,
    pub research: Vec<&'a ResearchRegistrant>,
    pub license: Vec<&'a LicenseRegistrant>,
    pub counts: FilterCounts,
}

impl VisibleRecords<'_> {
    /// Export rows for every visible record, industrial first.
    pub fn flat_rows(&self) -> Vec<FlatRow> {
        self.industrial
            .iter()
            .map(|f| ExportRecord::Industrial(f.record))
            .chain(self.research.iter().map(|r| ExportRecord::Research(*r)))
            .chain(self.license.iter().map(|r| ExportRecord::License(*r)))
            .map(ExportRecord::normalize)
            .collect()
    }
}

/// Lower-cased search term and the species words it expands to.
struct SearchTerm {
    term: String,
    species_terms: Vec<&'static str>,
}

impl SearchTerm {
    fn new(term: String) -> Self {
        let species_terms = SPECIES_SYNONYMS
            .iter()
            .filter(|(words, _)| words.contains(&term.as_str()))
            .flat_map(|(_, expansions)| expansions.iter().copied())
            .collect();
        Self {
            term,
            species_terms,
        }
    }

    fn matches(&self, names: &[&str], species: &[&str]) -> bool {
        let contains = |field: &str, needle: &str| field.to_lowercase().contains(needle);
        names.iter().any(|field| contains(*field, &self.term))
            || species.iter().any(|field| {
                contains(*field, &self.term)
                    || self.species_terms.iter().any(|syn| contains(*field, *syn))
            })
    }
}

/// Whether a search term hits any name field directly or any species field
/// directly or through a synonym.
pub fn matches_search(term: &str, names: &[&str], species: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    SearchTerm::new(term).matches(names, species)
}

/// Type-mapper results for one pass, keyed by raw type string.
#[derive(Default)]
struct TypeMemo<'a> {
    classes: HashMap<&'a str, FacilityClass>,
}

impl<'a> TypeMemo<'a> {
    fn class_of(&mut self, record: &'a IndustrialFacility) -> FacilityClass {
        let raw = record.facility_type.trim();
        if raw.is_empty() {
            return record.facility_class();
        }
        self.classes
            .entry(raw)
            .or_insert_with(|| record.facility_class())
            .clone()
    }
}

/// A region selected without a country still narrows by region code.
fn location_matches<R: Locatable + ?Sized>(record: &R, params: &FilterParams) -> bool {
    if params.country.is_none() && params.region.is_none() {
        return true;
    }
    let class = classify(record);
    params.country.map_or(true, |country| class.country == country)
        && matches_region(record, &class, params.country, params.region.as_deref())
}

/// Compute the visible records for `params`. Pure recomputation over the full
/// record sets; safe to call on every keystroke.
pub fn filter<'a>(state: &'a AppState, params: &FilterParams) -> VisibleRecords<'a> {
    let search = params.search_term().map(SearchTerm::new);
    let search_hits = |names: &[&str], species: &[&str]| {
        search.as_ref().map_or(true, |s| s.matches(names, species))
    };

    let mut memo = TypeMemo::default();
    let mut visible = VisibleRecords::default();

    for record in &state.industrial {
        if !location_matches(record, params) {
            continue;
        }
        if !search_hits(
            &[record.establishment_name.as_str(), record.dbas.as_str()],
            &[
                record.animals_slaughtered.as_str(),
                record.animals_processed.as_str(),
            ],
        ) {
            continue;
        }
        let class = memo.class_of(record);
        if !params.categories.contains(&class.category) {
            continue;
        }
        visible.industrial.push(VisibleFacility {
            record,
            category: class.category,
            label: class.label,
        });
    }

    if params.include_research {
        for record in &state.research {
            let tested = record.animals_tested_summary();
            if location_matches(record, params)
                && search_hits(&[record.account_name.as_str()], &[tested.as_ref()])
            {
                visible.research.push(record);
            }
        }
    }

    if params.include_license {
        for record in &state.license {
            if location_matches(record, params)
                && search_hits(&[record.account_name.as_str()], &[])
                && params.categories.contains(&record.category())
            {
                visible.license.push(record);
            }
        }
    }

    visible.counts = count(&visible);
    tracing::debug!(
        total = visible.counts.total,
        memoized_types = memo.classes.len(),
        "filter pass complete"
    );
    visible
}

fn count(visible: &VisibleRecords<'_>) -> FilterCounts {
    let mut by_category = BTreeMap::new();
    for facility in &visible.industrial {
        *by_category.entry(facility.category).or_insert(0) += 1;
    }
    for record in &visible.license {
        *by_category.entry(record.category()).or_insert(0) += 1;
    }
    FilterCounts {
        industrial: visible.industrial.len(),
        research: visible.research.len(),
        license: visible.license.len(),
        total: visible.industrial.len() + visible.research.len() + visible.license.len(),
        by_category,
    }
}
