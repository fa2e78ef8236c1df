//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::api::{ApiError, Country, CountryName, CountrySource, Flags};
use crate::core::storage::LocalStore;

/// Builds a country record without going through the provider.
pub fn country(
    common: &str,
    official: &str,
    cca2: &str,
    cca3: &str,
    region: &str,
    languages: &[(&str, &str)],
) -> Country {
    Country {
        name: CountryName {
            common: common.to_string(),
            official: official.to_string(),
            native_name: HashMap::new(),
        },
        cca2: cca2.to_string(),
        cca3: cca3.to_string(),
        region: region.to_string(),
        subregion: None,
        capital: Vec::new(),
        population: 0,
        currencies: HashMap::new(),
        languages: languages
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect(),
        borders: Vec::new(),
        flags: Flags::default(),
        tld: Vec::new(),
    }
}

pub fn finland() -> Country {
    let mut finland = country(
        "Finland",
        "Republic of Finland",
        "FI",
        "FIN",
        "Europe",
        &[("fin", "Finnish"), ("swe", "Swedish")],
    );
    finland.capital = vec!["Helsinki".to_string()];
    finland.subregion = Some("Northern Europe".to_string());
    finland.population = 5_530_719;
    finland.borders = vec!["NOR".to_string(), "SWE".to_string(), "RUS".to_string()];
    finland
}

pub fn japan() -> Country {
    let mut japan = country("Japan", "Japan", "JP", "JPN", "Asia", &[("jpn", "Japanese")]);
    japan.capital = vec!["Tokyo".to_string()];
    japan.population = 125_836_021;
    japan
}

pub fn sweden() -> Country {
    let mut sweden = country(
        "Sweden",
        "Kingdom of Sweden",
        "SE",
        "SWE",
        "Europe",
        &[("swe", "Swedish")],
    );
    sweden.capital = vec!["Stockholm".to_string()];
    sweden.population = 10_353_442;
    sweden.borders = vec!["FIN".to_string(), "NOR".to_string()];
    sweden
}

/// A canned source serving a fixed collection, mimicking the provider's
/// matching contracts (substring name search, region equality, 404 on
/// empty match).
pub struct StaticSource {
    countries: Vec<Country>,
}

impl StaticSource {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }
}

#[async_trait]
impl CountrySource for StaticSource {
    async fn list_all(&self) -> Result<Vec<Country>, ApiError> {
        Ok(self.countries.clone())
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Country>, ApiError> {
        let needle = name.to_lowercase();
        let matches: Vec<Country> = self
            .countries
            .iter()
            .filter(|c| {
                c.name.common.to_lowercase().contains(&needle)
                    || c.name.official.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        if matches.is_empty() {
            return Err(ApiError::NotFound(format!("name/{name}")));
        }
        Ok(matches)
    }

    async fn list_by_region(&self, region: &str) -> Result<Vec<Country>, ApiError> {
        let matches: Vec<Country> = self
            .countries
            .iter()
            .filter(|c| c.region.eq_ignore_ascii_case(region))
            .cloned()
            .collect();
        if matches.is_empty() {
            return Err(ApiError::NotFound(format!("region/{region}")));
        }
        Ok(matches)
    }

    async fn get_by_code(&self, code: &str) -> Result<Country, ApiError> {
        self.countries
            .iter()
            .find(|c| c.matches_code(code))
            .cloned()
            .ok_or_else(|| ApiError::NotFound(code.to_string()))
    }
}

/// A source whose every call fails at the transport level.
pub struct FailingSource;

#[async_trait]
impl CountrySource for FailingSource {
    async fn list_all(&self) -> Result<Vec<Country>, ApiError> {
        Err(ApiError::Network("connection refused".to_string()))
    }

    async fn search_by_name(&self, _name: &str) -> Result<Vec<Country>, ApiError> {
        Err(ApiError::Network("connection refused".to_string()))
    }

    async fn list_by_region(&self, _region: &str) -> Result<Vec<Country>, ApiError> {
        Err(ApiError::Network("connection refused".to_string()))
    }

    async fn get_by_code(&self, _code: &str) -> Result<Country, ApiError> {
        Err(ApiError::Network("connection refused".to_string()))
    }
}

/// A unique directory path for a disposable store.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("atlas-test-{}", uuid::Uuid::new_v4()))
}

/// Opens a [`LocalStore`] under a unique temp directory.
pub fn temp_store() -> LocalStore {
    LocalStore::open(temp_dir()).expect("temp store")
}
