//! # Mission registry
//!
//! Per-mission configuration for the supported photometric surveys (TESS, Kepler, K2).
//! Each mission maps to a [`CatalogSpec`] describing the remote candidate catalog it is
//! browsed through: the CSV endpoint, the column carrying the object ID, the prefix that
//! turns a bare ID into a searchable identifier ("TIC 261136679"), the disposition column,
//! and the mission-specific disposition vocabulary.
//!
//! Keeping these mappings in one table (instead of inline conditionals at the call sites)
//! is what makes adding a new mission a one-entry change.

use std::fmt;

/// A photometric survey whose light curves and candidate catalogs are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mission {
    Tess,
    Kepler,
    K2,
}

impl Mission {
    pub const ALL: [Mission; 3] = [Mission::Tess, Mission::Kepler, Mission::K2];

    /// The mission name as the archives spell it.
    pub fn label(&self) -> &'static str {
        match self {
            Mission::Tess => "TESS",
            Mission::Kepler => "Kepler",
            Mission::K2 => "K2",
        }
    }

    /// The candidate catalog this mission is browsed through.
    ///
    /// K2 candidates are listed in the same cumulative table as Kepler's, so both
    /// missions share one spec.
    pub fn catalog(&self) -> &'static CatalogSpec {
        match self {
            Mission::Tess => &TOI_CATALOG,
            Mission::Kepler | Mission::K2 => &KOI_CATALOG,
        }
    }

    /// Parse an archive-spelled mission name ("TESS", "Kepler", "K2").
    pub fn from_label(label: &str) -> Option<Mission> {
        Mission::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which population of a candidate catalog is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispositionType {
    /// Confirmed planets and planet candidates.
    Planets,
    /// Signals vetted as non-planets.
    FalsePositives,
}

impl DispositionType {
    /// The disposition labels of this population, in the given catalog's spelling.
    pub fn labels(&self, spec: &CatalogSpec) -> &'static [&'static str] {
        match self {
            DispositionType::Planets => spec.planet_labels,
            DispositionType::FalsePositives => spec.false_positive_labels,
        }
    }
}

/// Column mapping and disposition vocabulary for one remote candidate catalog.
#[derive(Debug, Clone)]
pub struct CatalogSpec {
    /// CSV download endpoint.
    pub url: &'static str,
    /// Header of the column holding the numeric object ID.
    pub id_column: &'static str,
    /// Prefix turning a bare object ID into a searchable identifier.
    pub id_prefix: &'static str,
    /// Header of the column holding the disposition label.
    pub disposition_column: &'static str,
    /// Labels meaning "confirmed planet or planet candidate".
    pub planet_labels: &'static [&'static str],
    /// Labels meaning "vetted false positive".
    pub false_positive_labels: &'static [&'static str],
    /// Header of the orbital-period column, if the catalog exposes one.
    pub period_column: &'static str,
    /// Header of the planet-radius column, if the catalog exposes one.
    pub radius_column: &'static str,
    /// Comment prefix to skip while parsing (the cumulative table is `#`-prefixed).
    pub comment_char: Option<u8>,
    /// Landing page for a single object, completed with its bare ID.
    pub detail_url: &'static str,
}

/// TESS Objects of Interest, published by ExoFOP.
pub static TOI_CATALOG: CatalogSpec = CatalogSpec {
    url: "https://exofop.ipac.caltech.edu/tess/download_toi.php?sort=toi&output=csv",
    id_column: "TIC ID",
    id_prefix: "TIC ",
    disposition_column: "TFOPWG Disposition",
    planet_labels: &["CP", "PC"],
    false_positive_labels: &["FP"],
    period_column: "Period (days)",
    radius_column: "Planet Radius (R_earth)",
    comment_char: None,
    detail_url: "https://exofop.ipac.caltech.edu/tess/target.php?id=",
};

/// Kepler cumulative candidate table, published by the NASA Exoplanet Archive.
pub static KOI_CATALOG: CatalogSpec = CatalogSpec {
    url: "https://exoplanetarchive.ipac.caltech.edu/cgi-bin/nstedAPI/nph-nstedAPI?table=cumulative&select=kepid,koi_disposition,koi_period,koi_prad&format=csv",
    id_column: "kepid",
    id_prefix: "KIC ",
    disposition_column: "koi_disposition",
    planet_labels: &["CONFIRMED", "CANDIDATE"],
    false_positive_labels: &["FALSE POSITIVE"],
    period_column: "koi_period",
    radius_column: "koi_prad",
    comment_char: Some(b'#'),
    detail_url: "https://exoplanetarchive.ipac.caltech.edu/overview/",
};

#[cfg(test)]
mod missions_test {
    use super::*;

    #[test]
    fn test_kepler_and_k2_share_the_cumulative_table() {
        assert_eq!(Mission::Kepler.catalog().url, Mission::K2.catalog().url);
        assert_ne!(Mission::Tess.catalog().url, Mission::Kepler.catalog().url);
    }

    #[test]
    fn test_disposition_vocabulary_per_mission() {
        let toi = Mission::Tess.catalog();
        assert_eq!(DispositionType::Planets.labels(toi), &["CP", "PC"]);
        assert_eq!(DispositionType::FalsePositives.labels(toi), &["FP"]);

        let koi = Mission::Kepler.catalog();
        assert_eq!(
            DispositionType::Planets.labels(koi),
            &["CONFIRMED", "CANDIDATE"]
        );
        assert_eq!(
            DispositionType::FalsePositives.labels(koi),
            &["FALSE POSITIVE"]
        );
    }

    #[test]
    fn test_mission_label_round_trip() {
        for mission in Mission::ALL {
            assert_eq!(Mission::from_label(mission.label()), Some(mission));
        }
        assert_eq!(Mission::from_label("tess"), Some(Mission::Tess));
        assert_eq!(Mission::from_label("CoRoT"), None);
    }
}
