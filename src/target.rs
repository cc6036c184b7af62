//! # Target resolver
//!
//! Classifies a free-text target string as a numeric catalog identifier or a star
//! name, and dispatches the archive search accordingly.
//!
//! A numeric ID (possibly written with a TIC/KIC/EPIC prefix) is unambiguous
//! across catalogs, so an ID search ignores the caller's mission/author filters
//! and searches everything. A name search is only attempted when the caller has
//! selected at least one mission and one author; an empty filter set is an input
//! error, not a search.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::archive::{LightCurveArchive, SearchEntry, SearchFilters};
use crate::constants::CatalogId;
use crate::exohunt_errors::ExohuntError;

/// Input-catalog prefixes that may precede a numeric identifier.
pub const ID_PREFIXES: [&str; 3] = ["TIC", "KIC", "EPIC"];

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:TIC|KIC|EPIC)?\s*([0-9]+)$").expect("ID pattern is valid"));

/// A classified target search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetQuery {
    /// A numeric input-catalog identifier, stripped of any TIC/KIC/EPIC prefix.
    Id(CatalogId),
    /// A star name, passed through as typed.
    Name(String),
}

impl TargetQuery {
    /// Classify a free-text input.
    ///
    /// The input is trimmed and case-folded; a known ID prefix is stripped. If
    /// what remains is all digits the query is an ID search, otherwise a name
    /// search.
    ///
    /// Arguments
    /// ---------
    /// * `input`: the raw search string
    ///
    /// Return
    /// ------
    /// * The classified query, or [`ExohuntError::EmptySearchString`] when the
    ///   trimmed input is empty.
    pub fn parse(input: &str) -> Result<TargetQuery, ExohuntError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ExohuntError::EmptySearchString);
        }

        let upper = trimmed.to_uppercase();
        if let Some(captures) = ID_PATTERN.captures(&upper) {
            if let Ok(number) = captures[1].parse::<CatalogId>() {
                return Ok(TargetQuery::Id(number));
            }
        }
        Ok(TargetQuery::Name(trimmed.to_string()))
    }

    pub fn is_id(&self) -> bool {
        matches!(self, TargetQuery::Id(_))
    }

    /// The term handed to the archive search service.
    pub fn search_term(&self) -> String {
        match self {
            TargetQuery::Id(number) => number.to_string(),
            TargetQuery::Name(name) => name.clone(),
        }
    }
}

/// Search the archive for a classified query.
///
/// ID searches run unfiltered across all missions and authors. Name searches
/// require non-empty mission and author filter sets. An empty result is not an
/// error; it surfaces to the caller as "no data found".
///
/// Arguments
/// ---------
/// * `archive`: the archive search service
/// * `query`: the classified target
/// * `filters`: the caller's mission/author selection (ignored for ID searches)
///
/// Return
/// ------
/// * Zero or more downloadable search entries, or
///   [`ExohuntError::EmptySearchFilter`] for a name search with an empty filter
///   set.
pub fn resolve(
    archive: &dyn LightCurveArchive,
    query: &TargetQuery,
    filters: &SearchFilters,
) -> Result<Vec<SearchEntry>, ExohuntError> {
    match query {
        TargetQuery::Id(_) => {
            log::info!("numeric ID detected, searching all missions and authors");
            archive.search(query, &SearchFilters::unrestricted())
        }
        TargetQuery::Name(_) => {
            if filters.missions.is_empty() || filters.authors.is_empty() {
                return Err(ExohuntError::EmptySearchFilter);
            }
            archive.search(query, filters)
        }
    }
}

#[cfg(test)]
mod target_test {
    use super::*;
    use crate::lightcurve::Segment;
    use std::cell::RefCell;

    #[test]
    fn test_prefixed_id_is_an_id_search() {
        assert_eq!(
            TargetQuery::parse("TIC 261136679").unwrap(),
            TargetQuery::Id(261136679)
        );
        assert_eq!(
            TargetQuery::parse("kic 8462852").unwrap(),
            TargetQuery::Id(8462852)
        );
        assert_eq!(
            TargetQuery::parse("EPIC201367065").unwrap(),
            TargetQuery::Id(201367065)
        );
        assert_eq!(TargetQuery::parse(" 42 ").unwrap(), TargetQuery::Id(42));
    }

    #[test]
    fn test_names_stay_names() {
        assert_eq!(
            TargetQuery::parse("Proxima Centauri").unwrap(),
            TargetQuery::Name("Proxima Centauri".to_string())
        );
        // A prefix followed by non-digits is not an ID.
        assert_eq!(
            TargetQuery::parse("TIC alpha").unwrap(),
            TargetQuery::Name("TIC alpha".to_string())
        );
    }

    #[test]
    fn test_empty_input_is_an_input_error() {
        assert!(matches!(
            TargetQuery::parse("   "),
            Err(ExohuntError::EmptySearchString)
        ));
    }

    /// Archive stub recording the filters it was searched with.
    struct RecordingArchive {
        seen_filters: RefCell<Option<SearchFilters>>,
    }

    impl RecordingArchive {
        fn new() -> Self {
            RecordingArchive {
                seen_filters: RefCell::new(None),
            }
        }
    }

    impl LightCurveArchive for RecordingArchive {
        fn search(
            &self,
            _query: &TargetQuery,
            filters: &SearchFilters,
        ) -> Result<Vec<SearchEntry>, ExohuntError> {
            *self.seen_filters.borrow_mut() = Some(filters.clone());
            Ok(Vec::new())
        }

        fn download(&self, _entry: &SearchEntry) -> Result<Option<Segment>, ExohuntError> {
            Ok(None)
        }
    }

    #[test]
    fn test_id_search_ignores_restrictive_filters() {
        let archive = RecordingArchive::new();
        let empty_filters = SearchFilters {
            missions: Vec::new(),
            authors: Vec::new(),
        };

        let query = TargetQuery::parse("TIC 261136679").unwrap();
        let entries = resolve(&archive, &query, &empty_filters).unwrap();
        assert!(entries.is_empty());

        let seen = archive.seen_filters.borrow().clone().unwrap();
        assert_eq!(seen.missions.len(), 3);
        assert!(!seen.authors.is_empty());
    }

    #[test]
    fn test_name_search_with_empty_filters_never_reaches_the_archive() {
        let archive = RecordingArchive::new();
        let empty_filters = SearchFilters {
            missions: Vec::new(),
            authors: vec!["SPOC".to_string()],
        };

        let query = TargetQuery::parse("Kepler-10").unwrap();
        let result = resolve(&archive, &query, &empty_filters);
        assert!(matches!(result, Err(ExohuntError::EmptySearchFilter)));
        assert!(archive.seen_filters.borrow().is_none());
    }

    #[test]
    fn test_name_search_passes_filters_through() {
        let archive = RecordingArchive::new();
        let filters = SearchFilters::default();

        let query = TargetQuery::parse("Kepler-10").unwrap();
        resolve(&archive, &query, &filters).unwrap();

        let seen = archive.seen_filters.borrow().clone().unwrap();
        assert_eq!(seen.missions, filters.missions);
        assert_eq!(seen.authors, filters.authors);
    }
}
