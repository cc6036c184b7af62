//! Normalized display rows handed to the presentation layer.
//!
//! Column headers differ across the remote catalogs; these records are the
//! common schema after renaming. The serde names match the display headers so a
//! serialized table reads exactly like the UI shows it.

use serde::Serialize;

/// One candidate-catalog row in the normalized display schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRow {
    /// Prefixed identifier ready to paste into a target search ("TIC 261136679").
    #[serde(rename = "Searchable ID")]
    pub searchable_id: String,
    /// Disposition label in the catalog's own vocabulary (CP, PC, CONFIRMED, ...).
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Orbital Period (days)")]
    pub orbital_period_days: Option<f64>,
    #[serde(rename = "Planet Radius (Earths)")]
    pub planet_radius_earths: Option<f64>,
}

/// One star from the TESS Input Catalog that is not a known object of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntestedRow {
    #[serde(rename = "Searchable ID")]
    pub searchable_id: String,
    #[serde(rename = "TESS Magnitude")]
    pub tess_magnitude: Option<f64>,
    #[serde(rename = "Distance (pc)")]
    pub distance_pc: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
}
