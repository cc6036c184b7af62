//! # Catalog client
//!
//! Read-only queries against the candidate catalogs (TESS Objects of Interest,
//! Kepler cumulative table) and the TESS Input Catalog, normalized into the
//! display schemas the presentation layer consumes. All fetches are cached for a
//! day by argument key and degrade to an empty result with a logged warning when
//! the remote side misbehaves — a failed fetch never terminates the process.

pub mod client;
pub mod records;
pub mod tic_query;

pub use client::CatalogClient;
pub use records::{TargetRow, UntestedRow};
pub use tic_query::TicQueryCriteria;
