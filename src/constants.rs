//! # Constants and type definitions for exohunt
//!
//! This module centralizes the **unit conventions**, **default parameters**, and **common type
//! definitions** used throughout the `exohunt` library.
//!
//! ## Overview
//!
//! - Time is carried as floating-point **days** on whatever offset the archive delivers
//!   (BTJD for TESS, BKJD for Kepler). The pipeline only ever works with differences and
//!   phases, so the zero point never matters.
//! - Flux is **relative flux**, centered near 1.0 after normalization.
//! - Catalog identifiers (TIC/KIC/EPIC numbers) are plain unsigned integers.
//!
//! These definitions are used by all main modules, including the light-curve pipeline,
//! the catalog client, and the target resolver.

use std::time::Duration;

/// Timestamp or time interval expressed in days.
pub type Days = f64;

/// Relative (normalized) flux, dimensionless.
pub type RelativeFlux = f64;

/// Numeric identifier of an object in a mission input catalog (TIC, KIC, EPIC).
pub type CatalogId = u64;

/// Number of minutes in a day, for cadence/bin-width conversions.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Default time-bin width applied before flattening: 10 minutes, in days.
pub const DEFAULT_BIN_WIDTH: Days = 10.0 / MINUTES_PER_DAY;

/// Default sigma-clipping threshold for outlier removal.
pub const DEFAULT_OUTLIER_SIGMA: f64 = 5.0;

/// Default number of rows returned by a catalog-target fetch.
pub const DEFAULT_CATALOG_SAMPLE: usize = 25;

/// Default number of stars sampled by an untested-target fetch.
pub const DEFAULT_UNTESTED_SAMPLE: usize = 100;

/// How long catalog query results stay valid in the process-local cache (one day).
pub const CATALOG_CACHE_TTL: Duration = Duration::from_secs(86_400);
