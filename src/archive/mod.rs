//! # Light-curve archive seam
//!
//! The time-series archive is an external collaborator: given a search term plus
//! optional mission/author filters it returns an ordered collection of
//! downloadable segment references. This module defines that seam as a trait so
//! the resolver and pipeline can be exercised against a stub archive, with the
//! MAST-backed implementation in [`mast`].

pub mod mast;

use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::Segment;
use crate::missions::Mission;
use crate::target::TargetQuery;

/// Data authors/pipelines the archives publish light curves under.
pub const KNOWN_AUTHORS: [&str; 5] = ["SPOC", "Kepler", "K2", "QLP", "TESS-SPOC"];

/// Mission and author restrictions applied to a name search.
///
/// These only matter for name searches; ID searches are unambiguous and always
/// run unrestricted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub missions: Vec<Mission>,
    pub authors: Vec<String>,
}

impl Default for SearchFilters {
    /// All missions, with the default author selection (SPOC, Kepler, K2).
    fn default() -> Self {
        SearchFilters {
            missions: Mission::ALL.to_vec(),
            authors: vec!["SPOC".to_string(), "Kepler".to_string(), "K2".to_string()],
        }
    }
}

impl SearchFilters {
    /// All missions and every known author: the filter set used for ID searches.
    pub fn unrestricted() -> Self {
        SearchFilters {
            missions: Mission::ALL.to_vec(),
            authors: KNOWN_AUTHORS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// One downloadable data product found by an archive search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    /// Archive-assigned product identifier.
    pub product_id: String,
    /// The archive's name for the target (usually the prefixed catalog ID).
    pub target_name: String,
    pub mission: Option<Mission>,
    /// Pipeline that produced the product (SPOC, QLP, ...).
    pub author: String,
    /// Endpoint serving the product's time-series table, when the archive
    /// exposes one.
    pub data_url: Option<String>,
    /// Human-browsable detail page for the target, when one can be derived.
    pub archive_url: Option<String>,
}

/// Archive search service: free-text search plus per-entry segment download.
pub trait LightCurveArchive {
    /// Search for downloadable products matching `query` under `filters`.
    /// An empty result is a valid outcome, not an error.
    fn search(
        &self,
        query: &TargetQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchEntry>, ExohuntError>;

    /// Download one product. `Ok(None)` models a null product (the archive lists
    /// it but serves no samples).
    fn download(&self, entry: &SearchEntry) -> Result<Option<Segment>, ExohuntError>;
}

/// Browsable detail link for a numeric catalog ID, mission permitting.
pub fn archive_link(mission: Mission, catalog_id: u64) -> String {
    format!("{}{}", mission.catalog().detail_url, catalog_id)
}
