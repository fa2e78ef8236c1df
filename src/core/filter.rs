//! Pure narrowing of a country collection by the active filter criteria.
//!
//! No network access and no mutation of input: [`apply`] is a stable filter,
//! so the output is an order-preserving subsequence of the input. The
//! directory store owns when to recompute; this module only answers "does
//! this country match".

use serde::{Deserialize, Serialize};

use crate::api::Country;

/// The active (search term, region, language) tuple narrowing the visible
/// country list. An empty field means unconstrained.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub region: String,
    pub language: String,
}

/// A partial change to the criteria. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub search_term: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl FilterCriteria {
    /// Merges a partial update into the criteria. Merging the same update
    /// twice leaves the criteria unchanged.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(term) = update.search_term {
            self.search_term = term;
        }
        if let Some(region) = update.region {
            self.region = region;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search_term.is_empty() && self.region.is_empty() && self.language.is_empty()
    }

    /// All three predicates ANDed.
    pub fn matches(&self, country: &Country) -> bool {
        matches_search(country, &self.search_term)
            && matches_region(country, &self.region)
            && matches_language(country, &self.language)
    }
}

/// Case-insensitive substring match against the common or official name.
fn matches_search(country: &Country, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    country.name.common.to_lowercase().contains(&needle)
        || country.name.official.to_lowercase().contains(&needle)
}

fn matches_region(country: &Country, region: &str) -> bool {
    region.is_empty() || country.region.eq_ignore_ascii_case(region)
}

/// A country without language data matches no specific language filter.
fn matches_language(country: &Country, language: &str) -> bool {
    if language.is_empty() {
        return true;
    }
    country
        .languages
        .values()
        .any(|lang| lang.eq_ignore_ascii_case(language))
}

/// The subsequence of `countries` matching `criteria`, in input order.
pub fn apply(countries: &[Country], criteria: &FilterCriteria) -> Vec<Country> {
    countries
        .iter()
        .filter(|country| criteria.matches(country))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{finland, japan};

    /// Macro to generate search-term matching cases against the Finland
    /// fixture (common "Finland", official "Republic of Finland").
    /// $name:ident names the test, $term:expr is the search term, and
    /// $expected:expr is whether Finland should match it.
    macro_rules! test_search_rules {
        ( $($name:ident: $term:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    let criteria = FilterCriteria {
                        search_term: $term.to_string(),
                        ..Default::default()
                    };
                    assert_eq!(criteria.matches(&finland()), $expected);
                }
            )+
        };
    }

    test_search_rules! {
        test_search_rules_empty_term_matches: "" => true,
        test_search_rules_exact_common_name: "Finland" => true,
        test_search_rules_case_insensitive: "fInLaNd" => true,
        test_search_rules_substring_of_common: "land" => true,
        test_search_rules_substring_of_official: "republic" => true,
        test_search_rules_official_words_count: "of finland" => true,
        test_search_rules_no_match: "Japan" => false,
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let countries = vec![finland(), japan()];
        let filtered = apply(&countries, &FilterCriteria::default());
        assert_eq!(filtered, countries);
    }

    #[test]
    fn test_region_matches_case_insensitively() {
        let criteria = FilterCriteria {
            region: "eUrOpE".to_string(),
            ..Default::default()
        };
        assert!(criteria.matches(&finland()));
        assert!(!criteria.matches(&japan()));
    }

    #[test]
    fn test_language_matches_any_value() {
        let criteria = FilterCriteria {
            language: "swedish".to_string(),
            ..Default::default()
        };
        assert!(criteria.matches(&finland()));
        assert!(!criteria.matches(&japan()));
    }

    /// Language matching is equality, not substring.
    #[test]
    fn test_language_requires_full_name() {
        let criteria = FilterCriteria {
            language: "finn".to_string(),
            ..Default::default()
        };
        assert!(!criteria.matches(&finland()));
    }

    #[test]
    fn test_missing_languages_map_never_matches_a_language() {
        let mut country = finland();
        country.languages.clear();
        let criteria = FilterCriteria {
            language: "Finnish".to_string(),
            ..Default::default()
        };
        assert!(!criteria.matches(&country));
        // But it still matches once the language constraint is lifted.
        assert!(FilterCriteria::default().matches(&country));
    }

    #[test]
    fn test_predicates_are_anded() {
        let criteria = FilterCriteria {
            search_term: "Finland".to_string(),
            region: "Asia".to_string(),
            language: String::new(),
        };
        assert!(!criteria.matches(&finland()));
    }

    #[test]
    fn test_apply_preserves_input_order() {
        let countries = vec![japan(), finland()];
        let criteria = FilterCriteria {
            search_term: "a".to_string(), // matches both (Japan, Finland)
            ..Default::default()
        };
        let filtered = apply(&countries, &criteria);
        assert_eq!(filtered[0].cca3, "JPN");
        assert_eq!(filtered[1].cca3, "FIN");
    }

    #[test]
    fn test_merge_is_partial() {
        let mut criteria = FilterCriteria {
            search_term: "fin".to_string(),
            region: "Europe".to_string(),
            language: String::new(),
        };
        criteria.merge(FilterUpdate {
            region: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(criteria.search_term, "fin");
        assert_eq!(criteria.region, "");
    }

    #[test]
    fn test_merge_same_update_twice_is_idempotent() {
        let update = FilterUpdate {
            search_term: Some("fin".to_string()),
            region: Some("Europe".to_string()),
            language: None,
        };
        let mut once = FilterCriteria::default();
        once.merge(update.clone());
        let mut twice = FilterCriteria::default();
        twice.merge(update.clone());
        twice.merge(update);
        assert_eq!(once, twice);
    }
}
