//! Region registry: per-country tables of region code -> display name.
//!
//! Codes are matched exactly: case-sensitive, no trimming. Upstream cleaning
//! scripts normalize them before they get here.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::country::Country;

const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("AS", "American Samoa"),
    ("GU", "Guam"),
    ("MP", "Northern Mariana Islands"),
    ("PR", "Puerto Rico"),
    ("VI", "U.S. Virgin Islands"),
];

const GERMAN_STATES: &[(&str, &str)] = &[
    ("BW", "Baden-Württemberg"),
    ("BY", "Bayern"),
    ("BE", "Berlin"),
    ("BB", "Brandenburg"),
    ("HB", "Bremen"),
    ("HH", "Hamburg"),
    ("HE", "Hessen"),
    ("MV", "Mecklenburg-Vorpommern"),
    ("NI", "Niedersachsen"),
    ("NW", "Nordrhein-Westfalen"),
    ("RP", "Rheinland-Pfalz"),
    ("SL", "Saarland"),
    ("SN", "Sachsen"),
    ("ST", "Sachsen-Anhalt"),
    ("SH", "Schleswig-Holstein"),
    ("TH", "Thüringen"),
];

// Spanish data carries autonomous-community names rather than codes.
const SPANISH_REGIONS: &[(&str, &str)] = &[
    ("Andalucía", "Andalucía"),
    ("Aragón", "Aragón"),
    ("Asturias", "Asturias"),
    ("Islas Baleares", "Islas Baleares"),
    ("Canarias", "Canarias"),
    ("Cantabria", "Cantabria"),
    ("Castilla-La Mancha", "Castilla-La Mancha"),
    ("Castilla y León", "Castilla y León"),
    ("Cataluña", "Cataluña"),
    ("Comunidad Valenciana", "Comunidad Valenciana"),
    ("Extremadura", "Extremadura"),
    ("Galicia", "Galicia"),
    ("La Rioja", "La Rioja"),
    ("Comunidad de Madrid", "Comunidad de Madrid"),
    ("Región de Murcia", "Región de Murcia"),
    ("Navarra", "Navarra"),
    ("País Vasco", "País Vasco"),
    ("Ceuta", "Ceuta"),
    ("Melilla", "Melilla"),
];

const FRENCH_DEPARTMENTS: &[(&str, &str)] = &[
    ("01", "Ain"),
    ("02", "Aisne"),
    ("03", "Allier"),
    ("04", "Alpes-de-Haute-Provence"),
    ("05", "Hautes-Alpes"),
    ("06", "Alpes-Maritimes"),
    ("07", "Ardèche"),
    ("08", "Ardennes"),
    ("09", "Ariège"),
    ("10", "Aube"),
    ("11", "Aude"),
    ("12", "Aveyron"),
    ("13", "Bouches-du-Rhône"),
    ("14", "Calvados"),
    ("15", "Cantal"),
    ("16", "Charente"),
    ("17", "Charente-Maritime"),
    ("18", "Cher"),
    ("19", "Corrèze"),
    ("2A", "Corse-du-Sud"),
    ("2B", "Haute-Corse"),
    ("21", "Côte-d'Or"),
    ("22", "Côtes-d'Armor"),
    ("23", "Creuse"),
    ("24", "Dordogne"),
    ("25", "Doubs"),
    ("26", "Drôme"),
    ("27", "Eure"),
    ("28", "Eure-et-Loir"),
    ("29", "Finistère"),
    ("30", "Gard"),
    ("31", "Haute-Garonne"),
    ("32", "Gers"),
    ("33", "Gironde"),
    ("34", "Hérault"),
    ("35", "Ille-et-Vilaine"),
    ("36", "Indre"),
    ("37", "Indre-et-Loire"),
    ("38", "Isère"),
    ("39", "Jura"),
    ("40", "Landes"),
    ("41", "Loir-et-Cher"),
    ("42", "Loire"),
    ("43", "Haute-Loire"),
    ("44", "Loire-Atlantique"),
    ("45", "Loiret"),
    ("46", "Lot"),
    ("47", "Lot-et-Garonne"),
    ("48", "Lozère"),
    ("49", "Maine-et-Loire"),
    ("50", "Manche"),
    ("51", "Marne"),
    ("52", "Haute-Marne"),
    ("53", "Mayenne"),
    ("54", "Meurthe-et-Moselle"),
    ("55", "Meuse"),
    ("56", "Morbihan"),
    ("57", "Moselle"),
    ("58", "Nièvre"),
    ("59", "Nord"),
    ("60", "Oise"),
    ("61", "Orne"),
    ("62", "Pas-de-Calais"),
    ("63", "Puy-de-Dôme"),
    ("64", "Pyrénées-Atlantiques"),
    ("65", "Hautes-Pyrénées"),
    ("66", "Pyrénées-Orientales"),
    ("67", "Bas-Rhin"),
    ("68", "Haut-Rhin"),
    ("69", "Rhône"),
    ("70", "Haute-Saône"),
    ("71", "Saône-et-Loire"),
    ("72", "Sarthe"),
    ("73", "Savoie"),
    ("74", "Haute-Savoie"),
    ("75", "Paris"),
    ("76", "Seine-Maritime"),
    ("77", "Seine-et-Marne"),
    ("78", "Yvelines"),
    ("79", "Deux-Sèvres"),
    ("80", "Somme"),
    ("81", "Tarn"),
    ("82", "Tarn-et-Garonne"),
    ("83", "Var"),
    ("84", "Vaucluse"),
    ("85", "Vendée"),
    ("86", "Vienne"),
    ("87", "Haute-Vienne"),
    ("88", "Vosges"),
    ("89", "Yonne"),
    ("90", "Territoire de Belfort"),
    ("91", "Essonne"),
    ("92", "Hauts-de-Seine"),
    ("93", "Seine-Saint-Denis"),
    ("94", "Val-de-Marne"),
    ("95", "Val-d'Oise"),
    ("971", "Guadeloupe"),
    ("972", "Martinique"),
    ("973", "Guyane"),
    ("974", "La Réunion"),
    ("976", "Mayotte"),
];

/// Countries with a registry table, in lookup priority order. A code present in
/// more than one table resolves to the earliest country here.
pub const TABLE_PRIORITY: [Country; 4] = [Country::Us, Country::De, Country::Es, Country::Fr];

static TABLES: Lazy<HashMap<Country, HashMap<&'static str, &'static str>>> = Lazy::new(|| {
    [
        (Country::Us, US_STATES),
        (Country::De, GERMAN_STATES),
        (Country::Es, SPANISH_REGIONS),
        (Country::Fr, FRENCH_DEPARTMENTS),
    ]
    .into_iter()
    .map(|(country, rows)| (country, rows.iter().copied().collect()))
    .collect()
});

/// Ordered `(code, name)` rows for a country; empty for countries without a table.
pub fn regions_of(country: Country) -> &'static [(&'static str, &'static str)] {
    match country {
        Country::Us => US_STATES,
        Country::De => GERMAN_STATES,
        Country::Es => SPANISH_REGIONS,
        Country::Fr => FRENCH_DEPARTMENTS,
        Country::Dk | Country::Uk | Country::Unknown => &[],
    }
}

/// Display name of `code` within one country's table.
pub fn region_name(country: Country, code: &str) -> Option<&'static str> {
    TABLES.get(&country)?.get(code).copied()
}

fn in_any_table(code: &str) -> bool {
    TABLE_PRIORITY
        .iter()
        .any(|country| region_name(*country, code).is_some())
}

/// Whether `code` is a region of `country`. Each country's unknown-region
/// sentinel always belongs to it. UK is the catch-all: any non-empty code no
/// table claims. Denmark has no table and only matches its sentinel.
pub fn belongs_to(country: Country, code: &str) -> bool {
    if code == country.unknown_region() {
        return true;
    }
    match country {
        Country::Us | Country::De | Country::Es | Country::Fr => {
            region_name(country, code).is_some()
        }
        Country::Uk => !code.trim().is_empty() && !in_any_table(code),
        Country::Dk | Country::Unknown => false,
    }
}

/// Human-readable name for any region code. Tables are tried in priority order;
/// unknown codes come back unchanged so the caller always has something to show.
pub fn display_name(code: &str) -> String {
    if code.is_empty() {
        return "Unknown".to_string();
    }
    if let Some(country) = Country::ALL.iter().find(|c| c.unknown_region() == code) {
        return match country {
            Country::Unknown => "Unknown region".to_string(),
            other => format!("Unknown region ({})", other.name()),
        };
    }
    TABLE_PRIORITY
        .iter()
        .find_map(|country| region_name(*country, code))
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_have_no_duplicate_codes() {
        for country in TABLE_PRIORITY {
            let rows = regions_of(country);
            let table = TABLES.get(&country).unwrap();
            assert_eq!(rows.len(), table.len(), "duplicate code in {country} table");
        }
    }

    #[test]
    fn lookup_is_exact_match() {
        assert!(belongs_to(Country::Us, "IL"));
        assert!(!belongs_to(Country::Us, "il"));
        assert!(!belongs_to(Country::Us, " IL"));
    }

    #[test]
    fn de_code_is_delaware_not_germany() {
        // "DE" is Delaware; Germany's table uses Bundesland codes only.
        assert!(belongs_to(Country::Us, "DE"));
        assert!(!belongs_to(Country::De, "DE"));
    }

    #[test]
    fn sentinel_belongs_to_its_country_only() {
        assert!(belongs_to(Country::De, "DE_UNKNOWN"));
        assert!(!belongs_to(Country::Us, "DE_UNKNOWN"));
        assert!(belongs_to(Country::Dk, "DK_UNKNOWN"));
    }

    #[test]
    fn uk_is_the_catch_all() {
        assert!(belongs_to(Country::Uk, "ZZ"));
        assert!(!belongs_to(Country::Uk, "TX"));
        assert!(!belongs_to(Country::Uk, ""));
    }

    #[test]
    fn display_name_falls_back_to_code() {
        assert_eq!(display_name("BY"), "Bayern");
        assert_eq!(display_name("2A"), "Corse-du-Sud");
        assert_eq!(display_name("Galicia"), "Galicia");
        assert_eq!(display_name("Yorkshire"), "Yorkshire");
        assert_eq!(display_name("DE_UNKNOWN"), "Unknown region (Germany)");
        assert_eq!(display_name(""), "Unknown");
        assert_eq!(display_name("  "), "  ");
    }
}
