//! Human-readable animal summaries derived from per-species source columns.
//!
//! Industrial datasets flag each species with a `"Yes"` column; research
//! registrations carry per-species counts. The summaries built here are the
//! species text shown in popups and searched by the filter engine.

/// Groups of `*_slaughter` columns reported under one display name.
const SLAUGHTER_GROUPS: &[(&[&str], &str)] = &[
    (
        &[
            "beef_cow_slaughter",
            "steer_slaughter",
            "heifer_slaughter",
            "bull_stag_slaughter",
            "dairy_cow_slaughter",
        ],
        "Cattle (Cows, Bulls)",
    ),
    (
        &[
            "heavy_calf_slaughter",
            "bob_veal_slaughter",
            "formula_fed_veal_slaughter",
            "non_formula_fed_veal_slaughter",
        ],
        "Calves (Veal)",
    ),
    (
        &[
            "market_swine_slaughter",
            "sow_slaughter",
            "roaster_swine_slaughter",
            "boar_stag_swine_slaughter",
            "stag_swine_slaughter",
            "feral_swine_slaughter",
        ],
        "Pigs",
    ),
    (
        &["goat_slaughter", "young_goat_slaughter", "adult_goat_slaughter"],
        "Goats",
    ),
    (&["sheep_slaughter", "lamb_slaughter"], "Sheep & Lambs"),
    (&["deer_reindeer_slaughter"], "Deer & Reindeer"),
    (&["antelope_slaughter"], "Antelope"),
    (&["elk_slaughter"], "Elk"),
    (
        &[
            "bison_slaughter",
            "buffalo_slaughter",
            "water_buffalo_slaughter",
            "cattalo_slaughter",
        ],
        "Bison & Buffalo",
    ),
    (&["yak_slaughter"], "Yak"),
    (&["other_voluntary_livestock_slaughter"], "Other Livestock"),
    (&["rabbit_slaughter"], "Rabbits"),
    (
        &[
            "young_chicken_slaughter",
            "light_fowl_slaughter",
            "heavy_fowl_slaughter",
            "capon_slaughter",
        ],
        "Chickens",
    ),
    (
        &[
            "young_turkey_slaughter",
            "young_breeder_turkey_slaughter",
            "old_breeder_turkey_slaughter",
            "fryer_roaster_turkey_slaughter",
        ],
        "Turkeys",
    ),
    (&["duck_slaughter"], "Ducks"),
    (&["goose_slaughter"], "Geese"),
    (&["pheasant_slaughter"], "Pheasants"),
    (&["quail_slaughter"], "Quail"),
    (&["guinea_slaughter"], "Guinea Fowl"),
    (
        &["ostrich_slaughter", "emu_slaughter", "rhea_slaughter"],
        "Ratites (Ostrich, Emu, etc.)",
    ),
    (&["squab_slaughter"], "Pigeons (Squab)"),
    (&["other_voluntary_poultry_slaughter"], "Other Poultry"),
];

const PROCESSING_COLUMNS: &[(&str, &str)] = &[
    ("beef_processing", "Beef"),
    ("pork_processing", "Pork"),
    ("antelope_processing", "Antelope"),
    ("bison_processing", "Bison"),
    ("buffalo_processing", "Buffalo"),
    ("deer_processing", "Deer"),
    ("elk_processing", "Elk"),
    ("goat_processing", "Goat"),
    (
        "other_voluntary_livestock_processing",
        "Other Voluntary Livestock",
    ),
    ("rabbit_processing", "Rabbit"),
    ("reindeer_processing", "Reindeer"),
    ("sheep_processing", "Sheep"),
    ("yak_processing", "Yak"),
    ("chicken_processing", "Chicken"),
    ("duck_processing", "Duck"),
    ("goose_processing", "Goose"),
    ("pigeon_processing", "Pigeon"),
    ("ratite_processing", "Ratite (Ostrich/Emu)"),
    ("turkey_processing", "Turkey"),
    ("exotic_poultry_processing", "Exotic Poultry"),
    ("other_voluntary_poultry_processing", "Other Voluntary Poultry"),
];

pub const NO_PROCESSED_ANIMALS: &str = "N/A";
pub const NO_TESTED_ANIMALS: &str = "Unknown";

/// Species counts from a research registration, in display order.
pub struct TestedCounts<'a> {
    pub counts: [(&'a str, &'static str); 10],
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"))
}

/// Slaughtered species groups, joined with `", "`. Empty when none are flagged.
pub fn slaughtered_animals<'a>(column: impl Fn(&str) -> Option<&'a str>) -> String {
    SLAUGHTER_GROUPS
        .iter()
        .filter(|(columns, _)| columns.iter().any(|c| is_yes(column(c))))
        .map(|(_, label)| *label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Processed species, joined with `", "`; [`NO_PROCESSED_ANIMALS`] when none.
pub fn processed_animals<'a>(column: impl Fn(&str) -> Option<&'a str>) -> String {
    let processed: Vec<&str> = PROCESSING_COLUMNS
        .iter()
        .filter(|(c, _)| is_yes(column(c)))
        .map(|(_, label)| *label)
        .collect();
    if processed.is_empty() {
        NO_PROCESSED_ANIMALS.to_string()
    } else {
        processed.join(", ")
    }
}

/// `"{n} {Species}"` for every positive count; [`NO_TESTED_ANIMALS`] when none.
/// Counts may arrive as `"12"` or `"12.0"`; anything unparsable or non-finite
/// is skipped, and fractional counts are shown as given.
pub fn tested_animals(counts: &TestedCounts<'_>) -> String {
    let tested: Vec<String> = counts
        .counts
        .iter()
        .filter_map(|(raw, species)| {
            let count = raw.trim().parse::<f64>().ok().filter(|c| c.is_finite())?;
            if count <= 0.0 {
                return None;
            }
            Some(if count.fract() == 0.0 {
                format!("{} {}", count as u64, species)
            } else {
                format!("{count} {species}")
            })
        })
        .collect();
    if tested.is_empty() {
        NO_TESTED_ANIMALS.to_string()
    } else {
        tested.join(", ")
    }
}
