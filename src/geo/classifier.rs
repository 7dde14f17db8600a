//! Country / region classification for any record variant.
//!
//! Resolution order for a record:
//! 1. explicit `country` tag (authoritative where region codes are unreliable)
//! 2. region code tested against [`REGION_PREDICATES`] in order
//! 3. Bundesland prefix of a German establishment id
//! 4. Germany's bounding box, for records that opt into coordinate inference
//! 5. `Country::Unknown`
//!
//! Every step is total: malformed input falls through to the next one.

use std::borrow::Cow;

use serde::Serialize;

use super::country::Country;
use super::registry;

/// Approximate bounding box for Germany: (lat_min, lat_max, lon_min, lon_max).
pub const GERMANY_BBOX: (f64, f64, f64, f64) = (47.0, 56.0, 5.0, 16.0);

type RegionPredicate = fn(&str) -> bool;

/// Ordered membership tests for a bare region code. Order is load-bearing: a
/// code claimed by two tables goes to the first one listed. UK comes last as the
/// catch-all for anything non-empty.
pub const REGION_PREDICATES: [(Country, RegionPredicate); 5] = [
    (Country::Us, is_us_region),
    (Country::De, is_german_region),
    (Country::Es, is_spanish_region),
    (Country::Fr, is_french_region),
    (Country::Uk, is_non_empty),
];

fn is_us_region(code: &str) -> bool {
    registry::belongs_to(Country::Us, code)
}

fn is_german_region(code: &str) -> bool {
    registry::belongs_to(Country::De, code)
}

fn is_spanish_region(code: &str) -> bool {
    registry::belongs_to(Country::Es, code)
}

fn is_french_region(code: &str) -> bool {
    registry::belongs_to(Country::Fr, code)
}

fn is_non_empty(code: &str) -> bool {
    !code.trim().is_empty()
}

/// What the classifier needs from a record. Each variant keeps its region code
/// under a different field, so it is exposed through this seam.
pub trait Locatable {
    /// Upstream `country` tag, if the dataset carries one.
    fn explicit_country(&self) -> Option<&str> {
        None
    }

    /// Region code as carried (or parsed) from the record; empty when absent.
    fn region_code(&self) -> Cow<'_, str>;

    /// Establishment id that may encode a German Bundesland prefix.
    fn establishment_id(&self) -> Option<&str> {
        None
    }

    /// Coordinates usable for country inference. Only industrial facilities
    /// provide these; other variants keep the default.
    fn inference_point(&self) -> Option<(f64, f64)> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoClass {
    pub country: Country,
    /// A registry code, a free-form code carried verbatim, or the country's
    /// unknown-region sentinel.
    pub region: String,
}

/// Country owning a bare region code, by [`REGION_PREDICATES`] order.
pub fn country_for_region_code(code: &str) -> Country {
    REGION_PREDICATES
        .iter()
        .find(|(_, belongs)| belongs(code))
        .map(|(country, _)| *country)
        .unwrap_or(Country::Unknown)
}

pub fn in_germany_bbox(latitude: f64, longitude: f64) -> bool {
    let (lat_min, lat_max, lon_min, lon_max) = GERMANY_BBOX;
    (lat_min..=lat_max).contains(&latitude) && (lon_min..=lon_max).contains(&longitude)
}

/// Bundesland code at the start of a German approval number, e.g. `"BY"` in
/// `"DE BY 12345 EG"`, `"BY-1234"` or `"NW 10203"`. A leading `"DE"` token is
/// skipped first.
pub fn german_region_from_establishment_id(id: &str) -> Option<&'static str> {
    let mut tokens = id
        .split(|c: char| c.is_whitespace() || c == '-' || c == '.' || c == '/')
        .filter(|t| !t.is_empty());
    let mut token = tokens.next()?;
    if token == "DE" {
        token = tokens.next()?;
    }
    if token.len() != 2 {
        return None;
    }
    registry::regions_of(Country::De)
        .iter()
        .find(|(code, _)| *code == token)
        .map(|(code, _)| *code)
}

/// Country of a record. See the module docs for the resolution order.
pub fn classify_country<R: Locatable + ?Sized>(record: &R) -> Country {
    classify(record).country
}

/// Country and region of a record.
pub fn classify<R: Locatable + ?Sized>(record: &R) -> GeoClass {
    let region = record.region_code();
    let region = region.trim();

    if let Some(country) = record.explicit_country().and_then(Country::from_tag) {
        let region = if !region.is_empty() {
            region.to_string()
        } else if let Some(code) = record
            .establishment_id()
            .filter(|_| country == Country::De)
            .and_then(german_region_from_establishment_id)
        {
            code.to_string()
        } else {
            country.unknown_region().to_string()
        };
        return GeoClass { country, region };
    }

    if !region.is_empty() {
        return GeoClass {
            country: country_for_region_code(region),
            region: region.to_string(),
        };
    }

    if let Some(code) = record
        .establishment_id()
        .and_then(german_region_from_establishment_id)
    {
        return GeoClass {
            country: Country::De,
            region: code.to_string(),
        };
    }

    if let Some((lat, lon)) = record.inference_point() {
        // Germany only: no other country has a coordinate fallback.
        if in_germany_bbox(lat, lon) {
            return GeoClass {
                country: Country::De,
                region: Country::De.unknown_region().to_string(),
            };
        }
    }

    GeoClass {
        country: Country::Unknown,
        region: Country::Unknown.unknown_region().to_string(),
    }
}

/// Region filter for a record already known to be in `selected_country`.
///
/// `None` selects every region. France and Denmark records do not carry usable
/// region codes in the current datasets, so for those countries any record
/// explicitly tagged with the country matches whatever region is selected.
/// Without this every French and Danish record disappears once a region is
/// picked.
pub fn matches_region<R: Locatable + ?Sized>(
    record: &R,
    class: &GeoClass,
    selected_country: Option<Country>,
    selected_region: Option<&str>,
) -> bool {
    let Some(selected_region) = selected_region else {
        return true;
    };
    if let Some(country) = selected_country.filter(|c| c.has_unreliable_regions()) {
        let tagged = record
            .explicit_country()
            .and_then(Country::from_tag)
            .is_some_and(|tag| tag == country);
        if tagged {
            return true;
        }
    }
    class.region == selected_region
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Located {
        country: Option<&'static str>,
        region: &'static str,
        id: Option<&'static str>,
        point: Option<(f64, f64)>,
    }

    impl Locatable for Located {
        fn explicit_country(&self) -> Option<&str> {
            self.country
        }
        fn region_code(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.region)
        }
        fn establishment_id(&self) -> Option<&str> {
            self.id
        }
        fn inference_point(&self) -> Option<(f64, f64)> {
            self.point
        }
    }

    fn located(region: &'static str) -> Located {
        Located {
            country: None,
            region,
            id: None,
            point: None,
        }
    }

    #[test]
    fn priority_order_us_de_es_fr_then_uk() {
        assert_eq!(country_for_region_code("IA"), Country::Us);
        assert_eq!(country_for_region_code("NW"), Country::De);
        assert_eq!(country_for_region_code("Galicia"), Country::Es);
        assert_eq!(country_for_region_code("75"), Country::Fr);
        assert_eq!(country_for_region_code("ZZ"), Country::Uk);
        assert_eq!(country_for_region_code(""), Country::Unknown);
    }

    #[test]
    fn explicit_tag_beats_region_code() {
        let record = Located {
            country: Some("fr"),
            ..located("IA")
        };
        let class = classify(&record);
        assert_eq!(class.country, Country::Fr);
        assert_eq!(class.region, "IA");
    }

    #[test]
    fn unrecognized_tag_falls_back_to_inference() {
        let record = Located {
            country: Some("narnia"),
            ..located("TX")
        };
        assert_eq!(classify_country(&record), Country::Us);
    }

    #[test]
    fn establishment_prefix_gives_bundesland() {
        assert_eq!(german_region_from_establishment_id("DE BY 12345 EG"), Some("BY"));
        assert_eq!(german_region_from_establishment_id("NW-10203"), Some("NW"));
        assert_eq!(german_region_from_establishment_id("M1234+P1234"), None);
        assert_eq!(german_region_from_establishment_id("DE"), None);
        assert_eq!(german_region_from_establishment_id(""), None);

        let record = Located {
            id: Some("DE SN 0042 EG"),
            ..located("")
        };
        assert_eq!(
            classify(&record),
            GeoClass {
                country: Country::De,
                region: "SN".to_string()
            }
        );
    }

    #[test]
    fn bbox_fallback_only_for_germany() {
        let berlin = Located {
            point: Some((52.5, 13.4)),
            ..located("")
        };
        let class = classify(&berlin);
        assert_eq!(class.country, Country::De);
        assert_eq!(class.region, "DE_UNKNOWN");

        let illinois = Located {
            point: Some((40.0, -90.0)),
            ..located("")
        };
        assert_eq!(classify_country(&illinois), Country::Unknown);
    }

    #[test]
    fn blank_region_code_is_treated_as_missing() {
        let berlin = Located {
            point: Some((52.5, 13.4)),
            ..located("  ")
        };
        let class = classify(&berlin);
        assert_eq!(class.country, Country::De);
        assert_eq!(class.region, "DE_UNKNOWN");

        let nowhere = located(" ");
        let class = classify(&nowhere);
        assert_eq!(class.country, Country::Unknown);
        assert_eq!(class.region, Country::Unknown.unknown_region());
    }

    #[test]
    fn degraded_region_matching_for_tagged_french_records() {
        let record = Located {
            country: Some("fr"),
            ..located("")
        };
        let class = classify(&record);
        assert!(matches_region(&record, &class, Some(Country::Fr), Some("anything")));

        let untagged = located("75");
        let class = classify(&untagged);
        assert!(!matches_region(&untagged, &class, Some(Country::Fr), Some("13")));
        assert!(matches_region(&untagged, &class, Some(Country::Fr), Some("75")));
    }

    #[test]
    fn region_matching_is_exact_elsewhere() {
        let record = located("IA");
        let class = classify(&record);
        assert!(matches_region(&record, &class, Some(Country::Us), None));
        assert!(matches_region(&record, &class, Some(Country::Us), Some("IA")));
        assert!(!matches_region(&record, &class, Some(Country::Us), Some("IL")));
    }
}
