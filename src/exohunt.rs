//! # Exohunt: environment, archive access, and catalog client
//!
//! This module defines the [`Exohunt`] struct, the central façade that wires together:
//!
//! 1. **Environment state** ([`ExohuntEnv`](crate::env_state::ExohuntEnv)) — the shared
//!    HTTP client.
//! 2. **Archive access** — the MAST-backed light-curve search/download service.
//! 3. **Catalog client** — cached candidate-catalog and untested-target queries.
//!
//! The presentation layer (a UI, a notebook, a script) is expected to hold one
//! `Exohunt` per session and drive everything through it: resolve a search input,
//! let the user pick data products, run the pipeline, and browse catalogs.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use exohunt::archive::SearchFilters;
//! use exohunt::missions::{DispositionType, Mission};
//! use exohunt::pipeline::{NullObserver, PipelineConfig};
//! use exohunt::Exohunt;
//!
//! let mut hunter = Exohunt::new();
//!
//! // Resolve a free-text input and search the archive
//! let entries = hunter.search_target("TIC 261136679", &SearchFilters::default()).unwrap();
//!
//! // Run the transit-search pipeline over the user's selection
//! let result = hunter
//!     .process_selection(&entries, &PipelineConfig::default(), &NullObserver)
//!     .unwrap();
//! println!("best period: {:.4} days", result.best_period);
//!
//! // Browse a catalog sample (cached daily, degrades to empty on failure)
//! let candidates = hunter.fetch_catalog_targets(Mission::Tess, DispositionType::Planets, 25);
//! println!("{} candidates", candidates.len());
//! ```

use crate::archive::mast::MastArchive;
use crate::archive::{LightCurveArchive, SearchEntry, SearchFilters};
use crate::catalog::{CatalogClient, TargetRow, UntestedRow};
use crate::env_state::ExohuntEnv;
use crate::exohunt_errors::ExohuntError;
use crate::missions::{DispositionType, Mission};
use crate::pipeline::{self, PipelineConfig, PipelineObserver, PipelineResult};
use crate::target::{resolve, TargetQuery};

/// Session façade over the archive, the catalogs, and the pipeline.
#[derive(Debug, Clone)]
pub struct Exohunt {
    env_state: ExohuntEnv,
    archive: MastArchive,
    catalogs: CatalogClient,
}

impl Default for Exohunt {
    fn default() -> Self {
        Self::new()
    }
}

impl Exohunt {
    /// Construct a new session context with a fresh HTTP client and empty caches.
    pub fn new() -> Self {
        let env = ExohuntEnv::new();
        Exohunt {
            archive: MastArchive::new(env.clone()),
            catalogs: CatalogClient::new(env.clone()),
            env_state: env,
        }
    }

    /// The shared environment, for callers that need their own HTTP access.
    pub fn env(&self) -> &ExohuntEnv {
        &self.env_state
    }

    /// Classify a free-text target input and search the archive for it.
    ///
    /// ID inputs search everything; name inputs are restricted by `filters` and
    /// require at least one mission and one author. An empty result means "no
    /// data found", not failure.
    pub fn search_target(
        &self,
        input: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchEntry>, ExohuntError> {
        let query = TargetQuery::parse(input)?;
        resolve(&self.archive, &query, filters)
    }

    /// Run the five-stage transit-search pipeline over selected data products.
    pub fn process_selection(
        &self,
        selection: &[SearchEntry],
        config: &PipelineConfig,
        observer: &dyn PipelineObserver,
    ) -> Result<PipelineResult, ExohuntError> {
        pipeline::run(&self.archive, selection, config, observer)
    }

    /// A daily-cached random sample of catalog targets with the requested
    /// disposition; empty on failure (with a warning logged).
    pub fn fetch_catalog_targets(
        &mut self,
        mission: Mission,
        disposition: DispositionType,
        count: usize,
    ) -> Vec<TargetRow> {
        self.catalogs
            .fetch_catalog_targets(mission, disposition, count)
    }

    /// A daily-cached sample of bright, nearby stars not on the TOI list; empty
    /// on failure (with a warning logged).
    pub fn fetch_untested_targets(&mut self, count: usize) -> Vec<UntestedRow> {
        self.catalogs.fetch_untested_targets(count)
    }

    /// Search with an externally supplied archive implementation (tests, other
    /// back ends).
    pub fn search_target_with(
        &self,
        archive: &dyn LightCurveArchive,
        input: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchEntry>, ExohuntError> {
        let query = TargetQuery::parse(input)?;
        resolve(archive, &query, filters)
    }
}
