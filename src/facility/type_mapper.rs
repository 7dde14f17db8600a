//! Free-text facility type -> category + display label.
//!
//! Upstream type strings come from different agencies ("Meat Slaughter, Meat
//! Processing", "Intensive Pig Farm", "Mixed Slaughterhouse (Cattle
//! Slaughterhouse, Pig Slaughterhouse)", ...). Matching is case-insensitive
//! substring search over [`RULES`], first match wins. The order runs from most
//! specific to most generic; moving a generic rule up changes the outcome for
//! real records.

use once_cell::sync::Lazy;
use regex::Regex;

use super::category::{FacilityCategory, FacilityClass};

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([^)]+)\)").expect("parenthetical regex is hardcoded and valid")
});

const DEFAULT_LABEL: &str = "Processing Facility";

const COMPOUND_TYPES: &[(&str, &str)] = &[
    ("dairy farm", "Dairy Farm"),
    ("intensive sow pig farm", "Intensive Sow Pig Farm"),
    ("intensive pig farm", "Intensive Pig Farm"),
    ("intensive poultry farm", "Intensive Poultry Farm"),
    ("finishing unit", "Finishing Unit"),
];

const NAMED_SLAUGHTERHOUSES: &[(&str, &str)] = &[
    ("cattle slaughterhouse", "Cattle Slaughterhouse"),
    ("cow slaughterhouse", "Cattle Slaughterhouse"),
    ("pig slaughterhouse", "Pig Slaughterhouse"),
    ("poultry slaughterhouse", "Poultry Slaughterhouse"),
    ("sheep & lamb slaughterhouse", "Sheep & Lamb Slaughterhouse"),
    ("sheep and lamb slaughterhouse", "Sheep & Lamb Slaughterhouse"),
    ("goat slaughterhouse", "Goat Slaughterhouse"),
    ("horse slaughterhouse", "Horse Slaughterhouse"),
    ("other mammal slaughterhouse", "Other Mammal Slaughterhouse"),
    ("large bird slaughterhouse", "Large Bird Slaughterhouse"),
    ("wild bird slaughterhouse", "Wild Bird Slaughterhouse"),
    ("wild rabbit slaughterhouse", "Wild Rabbit Slaughterhouse"),
];

const NAMED_PRODUCTION: &[(&str, &str)] = &[
    ("pig breeding farm", "Pig Breeding Farm"),
    ("pig farm", "Pig Farm"),
    ("poultry farm", "Poultry Farm"),
    ("aquaculture", "Aquaculture"),
];

const FARM_ANIMALS: &[&str] = &[
    "dairy", "pig", "poultry", "cattle", "beef", "sheep", "goat", "chicken", "duck", "turkey",
    "lamb", "horse", "deer", "rabbit", "pheasant", "quail", "ostrich", "emu", "bison", "buffalo",
    "elk", "goose",
];

/// Input as seen by every rule: the raw string (for label extraction) and its
/// lowercase form (for matching).
struct TypeInput<'a> {
    raw: &'a str,
    lower: String,
}

type Rule = fn(&TypeInput<'_>) -> Option<FacilityClass>;

/// Ordered rule list. See the module docs before reordering.
const RULES: &[(&str, Rule)] = &[
    ("compound_type", compound_type),
    ("mixed_composite", mixed_composite),
    ("named_slaughterhouse", named_slaughterhouse),
    ("generic_slaughter", generic_slaughter),
    ("named_production", named_production),
    ("generic_farm", generic_farm),
    ("animal_production", animal_production),
    ("exhibition", exhibition),
    ("aquatic", aquatic),
];

fn lookup(
    table: &[(&str, &'static str)],
    input: &TypeInput<'_>,
    category: FacilityCategory,
) -> Option<FacilityClass> {
    table
        .iter()
        .find(|(needle, _)| input.lower.contains(needle))
        .map(|(_, label)| FacilityClass::new(category, *label))
}

fn compound_type(input: &TypeInput<'_>) -> Option<FacilityClass> {
    lookup(COMPOUND_TYPES, input, FacilityCategory::Breeder)
}

fn mixed_composite(input: &TypeInput<'_>) -> Option<FacilityClass> {
    let (category, base) = if input.lower.contains("mixed farm") {
        (FacilityCategory::Breeder, "Mixed Farm")
    } else if input.lower.contains("mixed slaughterhouse") {
        (FacilityCategory::Slaughter, "Mixed Slaughterhouse")
    } else {
        return None;
    };
    let label = match parenthetical(input.raw) {
        Some(inner) => format!("{base} ({inner})"),
        None => base.to_string(),
    };
    Some(FacilityClass::new(category, label))
}

fn named_slaughterhouse(input: &TypeInput<'_>) -> Option<FacilityClass> {
    lookup(NAMED_SLAUGHTERHOUSES, input, FacilityCategory::Slaughter)
}

fn generic_slaughter(input: &TypeInput<'_>) -> Option<FacilityClass> {
    (input.lower.contains("meat slaughter") || input.lower.contains("slaughter"))
        .then(|| FacilityClass::new(FacilityCategory::Slaughter, "Slaughterhouse"))
}

fn named_production(input: &TypeInput<'_>) -> Option<FacilityClass> {
    lookup(NAMED_PRODUCTION, input, FacilityCategory::Breeder)
}

fn generic_farm(input: &TypeInput<'_>) -> Option<FacilityClass> {
    if !input.lower.contains("farm") || input.lower.contains("slaughter") {
        return None;
    }
    let label = match FARM_ANIMALS.iter().find(|animal| input.lower.contains(*animal)) {
        Some(animal) => format!("{} Farm", capitalize(animal)),
        None if input.lower.contains("intensive") => "Intensive Farm".to_string(),
        None => "Farm".to_string(),
    };
    Some(FacilityClass::new(FacilityCategory::Breeder, label))
}

fn animal_production(input: &TypeInput<'_>) -> Option<FacilityClass> {
    if !input.lower.contains("animal production") {
        return None;
    }
    let label = if input.lower.contains("hunting") || input.lower.contains("game") {
        "Game/Hunting Facility"
    } else {
        "Animal Farm"
    };
    Some(FacilityClass::new(FacilityCategory::Breeder, label))
}

fn exhibition(input: &TypeInput<'_>) -> Option<FacilityClass> {
    input
        .lower
        .contains("exhibition")
        .then(|| FacilityClass::new(FacilityCategory::Exhibitor, "Exhibition Facility"))
}

fn aquatic(input: &TypeInput<'_>) -> Option<FacilityClass> {
    if !input.lower.contains("aquatic") {
        return None;
    }
    if input.lower.contains("processing") {
        Some(FacilityClass::new(
            FacilityCategory::Slaughter,
            "Aquatic Processing Facility",
        ))
    } else {
        Some(FacilityClass::new(
            FacilityCategory::Breeder,
            "Aquatic Production Facility",
        ))
    }
}

fn parenthetical(raw: &str) -> Option<&str> {
    PARENTHETICAL
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|inner| !inner.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn run_rules(raw: &str) -> Option<FacilityClass> {
    let input = TypeInput {
        raw,
        lower: raw.to_lowercase(),
    };
    RULES.iter().find_map(|(_, rule)| rule(&input))
}

/// Classify a raw type string. When the type is blank the establishment name is
/// tried instead; anything unmatched is a generic processing facility.
pub fn classify_facility_type(raw_type: &str, establishment_name: Option<&str>) -> FacilityClass {
    let raw_type = raw_type.trim();
    let source = if raw_type.is_empty() {
        establishment_name.map(str::trim).unwrap_or_default()
    } else {
        raw_type
    };
    run_rules(source).unwrap_or_else(default_class)
}

/// Name of the rule that fires for `raw`, for diagnostics.
pub fn matching_rule(raw: &str) -> Option<&'static str> {
    let input = TypeInput {
        raw,
        lower: raw.to_lowercase(),
    };
    RULES
        .iter()
        .find(|(_, rule)| rule(&input).is_some())
        .map(|(name, _)| *name)
}

pub fn default_class() -> FacilityClass {
    FacilityClass::new(FacilityCategory::Processing, DEFAULT_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(raw: &str) -> FacilityClass {
        classify_facility_type(raw, None)
    }

    #[test]
    fn mixed_slaughterhouse_extracts_parenthetical() {
        let result = class("Mixed Slaughterhouse (Cattle, Pig)");
        assert_eq!(result.category, FacilityCategory::Slaughter);
        assert_eq!(result.label, "Mixed Slaughterhouse (Cattle, Pig)");
        assert_eq!(matching_rule("Mixed Slaughterhouse (Cattle, Pig)"), Some("mixed_composite"));
    }

    #[test]
    fn mixed_without_parenthetical_uses_generic_label() {
        assert_eq!(class("mixed farm").label, "Mixed Farm");
        assert_eq!(class("Mixed Slaughterhouse ()").label, "Mixed Slaughterhouse");
    }

    #[test]
    fn compound_types_win_over_animal_scan() {
        assert_eq!(class("Dairy Farm"), FacilityClass::new(FacilityCategory::Breeder, "Dairy Farm"));
        assert_eq!(class("Intensive Poultry Farm").label, "Intensive Poultry Farm");
        assert_eq!(class("Intensive Sow Pig Farm").label, "Intensive Sow Pig Farm");
        assert_eq!(class("FINISHING UNIT").label, "Finishing Unit");
    }

    #[test]
    fn named_slaughterhouses_before_generic() {
        assert_eq!(class("Pig Slaughterhouse").label, "Pig Slaughterhouse");
        assert_eq!(class("Sheep and Lamb Slaughterhouse").label, "Sheep & Lamb Slaughterhouse");
        let generic = class("Meat Slaughter, Meat Processing");
        assert_eq!(generic.category, FacilityCategory::Slaughter);
        assert_eq!(generic.label, "Slaughterhouse");
    }

    #[test]
    fn named_production_types() {
        assert_eq!(class("Pig Breeding Farm").label, "Pig Breeding Farm");
        assert_eq!(class("Aquaculture").category, FacilityCategory::Breeder);
    }

    #[test]
    fn generic_farm_scans_animals_then_intensive() {
        assert_eq!(class("Goat farm").label, "Goat Farm");
        assert_eq!(class("Intensive livestock farm").label, "Intensive Farm");
        assert_eq!(class("Farm").label, "Farm");
    }

    #[test]
    fn animal_production_and_game() {
        assert_eq!(class("Animal production").label, "Animal Farm");
        assert_eq!(class("Animal production - hunting").label, "Game/Hunting Facility");
    }

    #[test]
    fn exhibition_and_aquatic() {
        assert_eq!(class("Animal exhibition").category, FacilityCategory::Exhibitor);
        assert_eq!(class("Aquatic animal processing").category, FacilityCategory::Slaughter);
        assert_eq!(class("Aquatic animals").label, "Aquatic Production Facility");
    }

    #[test]
    fn unmatched_falls_back_to_processing() {
        assert_eq!(class("Storage Warehouse"), default_class());
        assert_eq!(class(""), default_class());
        assert_eq!(matching_rule("Storage Warehouse"), None);
    }

    #[test]
    fn blank_type_uses_establishment_name() {
        let result = classify_facility_type("  ", Some("Hillside Pig Slaughterhouse Ltd"));
        assert_eq!(result.label, "Pig Slaughterhouse");
    }
}
