//! Best-effort parsing of composite "City, ST ZIP" strings.
//!
//! Upstream research and license exports pack city, state and ZIP into one
//! `City-State-Zip` column. Nothing here fails: missing pieces come back empty.

use once_cell::sync::Lazy;
use regex::Regex;

static REGION_AFTER_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r",\s*([A-Z]{2})\b").expect("region regex is hardcoded and valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityStateZip {
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Two-uppercase-letter token following a comma, e.g. `"IL"` in
/// `"Springfield, IL 62704"`.
pub fn region_from_city_state_zip(raw: &str) -> Option<&str> {
    REGION_AFTER_COMMA
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split on the first comma: city before it, the first token after it is the
/// region, the last token after it is the ZIP (only when there are at least two
/// tokens). Without a comma the whole string is taken as the city.
pub fn parse_city_state_zip(raw: &str) -> CityStateZip {
    let raw = raw.trim();
    let Some((city, rest)) = raw.split_once(',') else {
        return CityStateZip {
            city: raw.to_string(),
            ..CityStateZip::default()
        };
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let state = tokens.first().copied().unwrap_or_default();
    let zip = if tokens.len() >= 2 {
        tokens.last().copied().unwrap_or_default()
    } else {
        ""
    };

    CityStateZip {
        city: city.trim().to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_well_formed_input() {
        let parsed = parse_city_state_zip("Springfield, IL 62704");
        assert_eq!(parsed.city, "Springfield");
        assert_eq!(parsed.state, "IL");
        assert_eq!(parsed.zip, "62704");
        assert_eq!(region_from_city_state_zip("Springfield, IL 62704"), Some("IL"));
    }

    #[test]
    fn keeps_zip_plus_four() {
        let parsed = parse_city_state_zip("LOS ANGELES, CA 90023-1234");
        assert_eq!(parsed.city, "LOS ANGELES");
        assert_eq!(parsed.zip, "90023-1234");
    }

    #[test]
    fn missing_comma_yields_empty_region() {
        let parsed = parse_city_state_zip("Springfield");
        assert_eq!(parsed.city, "Springfield");
        assert_eq!(parsed.state, "");
        assert_eq!(parsed.zip, "");
        assert_eq!(region_from_city_state_zip("Springfield"), None);
    }

    #[test]
    fn state_without_zip_does_not_duplicate_into_zip() {
        let parsed = parse_city_state_zip("Ames, IA");
        assert_eq!(parsed.state, "IA");
        assert_eq!(parsed.zip, "");
    }

    #[test]
    fn lowercase_state_is_not_a_region_token() {
        assert_eq!(region_from_city_state_zip("Ames, ia 50010"), None);
        assert_eq!(parse_city_state_zip("").city, "");
    }
}
