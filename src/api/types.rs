//! Typed schema for REST Countries v3.1 records.
//!
//! The provider leaves many fields out for edge-case territories, so every
//! optional field is defaulted here at the deserialization boundary. Store
//! and presentation code can rely on the shape and never re-check for
//! absence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fallback shown for absent optional display fields.
pub const UNKNOWN: &str = "Unknown";

/// Display names for a country.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CountryName {
    pub common: String,
    pub official: String,
    /// Localized names keyed by language code.
    #[serde(default, rename = "nativeName")]
    pub native_name: HashMap<String, NativeName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Flag image URIs. Territories without uploaded art come back empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One country record as served by the provider.
///
/// `cca3` is the primary key and is unique within a fetched collection;
/// `cca2` is a secondary two-letter code that some territories omit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    pub cca3: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub population: u64,
    /// Currency descriptors keyed by currency code.
    #[serde(default)]
    pub currencies: HashMap<String, Currency>,
    /// Language display names keyed by language code.
    #[serde(default)]
    pub languages: HashMap<String, String>,
    /// Neighbouring country cca3 codes. Resolved by lookup, not ownership.
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub tld: Vec<String>,
}

impl Country {
    /// The canonical capital (first entry), or [`UNKNOWN`] if none.
    pub fn display_capital(&self) -> &str {
        self.capital.first().map(String::as_str).unwrap_or(UNKNOWN)
    }

    /// The subregion, or [`UNKNOWN`] if the provider omitted it.
    pub fn display_subregion(&self) -> &str {
        self.subregion.as_deref().unwrap_or(UNKNOWN)
    }

    /// Whether `code` identifies this country: cca3 or cca2 exactly, or the
    /// common name case-insensitively.
    pub fn matches_code(&self, code: &str) -> bool {
        self.cca3 == code
            || (!self.cca2.is_empty() && self.cca2 == code)
            || self.name.common.eq_ignore_ascii_case(code)
    }
}
