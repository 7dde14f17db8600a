use std::fmt;

use serde::{Deserialize, Serialize};

/// Countries with their own classification rules. `Uk` doubles as the catch-all
/// bucket for non-empty region codes no registry table claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "DE")]
    De,
    #[serde(rename = "ES")]
    Es,
    #[serde(rename = "FR")]
    Fr,
    #[serde(rename = "DK")]
    Dk,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Country {
    pub const ALL: [Country; 7] = [
        Country::Us,
        Country::De,
        Country::Es,
        Country::Fr,
        Country::Dk,
        Country::Uk,
        Country::Unknown,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::De => "DE",
            Self::Es => "ES",
            Self::Fr => "FR",
            Self::Dk => "DK",
            Self::Uk => "UK",
            Self::Unknown => "unknown",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Us => "United States",
            Self::De => "Germany",
            Self::Es => "Spain",
            Self::Fr => "France",
            Self::Dk => "Denmark",
            Self::Uk => "United Kingdom",
            Self::Unknown => "Unknown",
        }
    }

    /// Region sentinel for records whose country is known but whose region is not.
    pub fn unknown_region(self) -> &'static str {
        match self {
            Self::Us => "US_UNKNOWN",
            Self::De => "DE_UNKNOWN",
            Self::Es => "ES_UNKNOWN",
            Self::Fr => "FR_UNKNOWN",
            Self::Dk => "DK_UNKNOWN",
            Self::Uk => "UK_UNKNOWN",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse an explicit `country` tag carried by a record. Case-insensitive;
    /// accepts ISO-style codes and English names. Unrecognized tags yield `None`
    /// so the caller falls back to region-code inference.
    pub fn from_tag(tag: &str) -> Option<Country> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        match tag.to_ascii_lowercase().as_str() {
            "us" | "usa" | "united states" => Some(Self::Us),
            "de" | "germany" | "deutschland" => Some(Self::De),
            "es" | "spain" | "españa" => Some(Self::Es),
            "fr" | "france" => Some(Self::Fr),
            "dk" | "denmark" | "danmark" => Some(Self::Dk),
            "uk" | "gb" | "united kingdom" => Some(Self::Uk),
            _ => None,
        }
    }

    /// Countries whose region codes are not reliable in the current datasets.
    /// Region filtering for these degrades to country-level matching on the
    /// explicit country tag; see `geo::classifier::matches_region`.
    pub fn has_unreliable_regions(self) -> bool {
        matches!(self, Self::Fr | Self::Dk)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
