//! Candidate-catalog and untested-target queries.
//!
//! Two independent read operations, both cached by argument key for
//! [`CATALOG_CACHE_TTL`](crate::constants::CATALOG_CACHE_TTL):
//!
//! - [`CatalogClient::fetch_catalog_targets`] — a random sample of confirmed
//!   planets/candidates or false positives from a mission's candidate catalog;
//! - [`CatalogClient::fetch_untested_targets`] — bright, nearby TIC stars that
//!   are *not* on the TOI list, i.e. places nobody has flagged a signal yet.
//!
//! The `fetch_*` methods never fail: a remote error degrades to an empty result
//! with a `log::warn!`. The `try_*` variants expose the underlying `Result` for
//! callers that want to distinguish "empty" from "broken".

use std::collections::HashSet;

use rand::Rng;

use crate::cache::TtlCache;
use crate::catalog::records::{TargetRow, UntestedRow};
use crate::catalog::tic_query::{self, StarRecord, TicQueryCriteria};
use crate::constants::{CatalogId, CATALOG_CACHE_TTL};
use crate::env_state::ExohuntEnv;
use crate::exohunt_errors::ExohuntError;
use crate::missions::{CatalogSpec, DispositionType, Mission};

/// Cached, read-only client for the candidate catalogs and the TIC.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    env: ExohuntEnv,
    target_cache: TtlCache<(Mission, DispositionType, usize), Vec<TargetRow>>,
    untested_cache: TtlCache<usize, Vec<UntestedRow>>,
}

impl CatalogClient {
    pub fn new(env: ExohuntEnv) -> Self {
        Self::with_ttl(env, CATALOG_CACHE_TTL)
    }

    /// Client with a custom cache lifetime (used by tests).
    pub fn with_ttl(env: ExohuntEnv, ttl: std::time::Duration) -> Self {
        CatalogClient {
            env,
            target_cache: TtlCache::new(ttl),
            untested_cache: TtlCache::new(ttl),
        }
    }

    /// A random sample of up to `count` catalog targets with the requested
    /// disposition, in the normalized display schema.
    ///
    /// Degrades to an empty table with a logged warning on any fetch or parse
    /// failure. An empty table is also the legitimate result of a filter that
    /// matches nothing.
    pub fn fetch_catalog_targets(
        &mut self,
        mission: Mission,
        disposition: DispositionType,
        count: usize,
    ) -> Vec<TargetRow> {
        match self.try_fetch_catalog_targets(mission, disposition, count) {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("could not fetch {mission} {disposition:?} targets: {err}");
                Vec::new()
            }
        }
    }

    /// Fallible variant of [`fetch_catalog_targets`](Self::fetch_catalog_targets).
    pub fn try_fetch_catalog_targets(
        &mut self,
        mission: Mission,
        disposition: DispositionType,
        count: usize,
    ) -> Result<Vec<TargetRow>, ExohuntError> {
        let env = self.env.clone();
        let rows = self
            .target_cache
            .get_or_try_insert_with((mission, disposition, count), || -> Result<_, ExohuntError> {
                let spec = mission.catalog();
                let csv_text = env.get_text(spec.url)?;
                let matching =
                    parse_catalog_rows(&csv_text, spec, disposition.labels(spec))?;
                Ok(sample_rows(matching, count, &mut rand::rng()))
            })?;
        Ok(rows.clone())
    }

    /// Up to `count` bright, nearby TIC stars that are not known TESS Objects of
    /// Interest — untested places to look for new signals.
    ///
    /// Degrades to an empty table with a logged warning on failure.
    pub fn fetch_untested_targets(&mut self, count: usize) -> Vec<UntestedRow> {
        match self.try_fetch_untested_targets(count) {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!("could not fetch untested targets: {err}");
                Vec::new()
            }
        }
    }

    /// Fallible variant of [`fetch_untested_targets`](Self::fetch_untested_targets).
    pub fn try_fetch_untested_targets(
        &mut self,
        count: usize,
    ) -> Result<Vec<UntestedRow>, ExohuntError> {
        let env = self.env.clone();
        let rows = self
            .untested_cache
            .get_or_try_insert_with(count, || -> Result<_, ExohuntError> {
                let toi_spec = Mission::Tess.catalog();
                log::info!("downloading the list of known TESS objects of interest");
                let toi_csv = env.get_text(toi_spec.url)?;
                let known = parse_known_ids(&toi_csv, toi_spec)?;

                log::info!("sampling {count} stars from the TESS input catalog");
                let sample =
                    tic_query::query_tic_sample(&env, &TicQueryCriteria::default(), count)?;
                Ok(filter_untested(sample, &known))
            })?;
        Ok(rows.clone())
    }
}

/// Parse a candidate-catalog CSV and keep the rows whose disposition is in
/// `labels`, mapped to the normalized display schema with the mission's ID
/// prefix applied.
pub(crate) fn parse_catalog_rows(
    csv_text: &str,
    spec: &CatalogSpec,
    labels: &[&str],
) -> Result<Vec<TargetRow>, ExohuntError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(spec.comment_char)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_idx = column(spec.id_column)
        .ok_or_else(|| ExohuntError::MissingColumn(spec.id_column.to_string()))?;
    let disposition_idx = column(spec.disposition_column)
        .ok_or_else(|| ExohuntError::MissingColumn(spec.disposition_column.to_string()))?;
    let period_idx = column(spec.period_column);
    let radius_idx = column(spec.radius_column);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(disposition) = record.get(disposition_idx).map(str::trim) else {
            continue;
        };
        if !labels.contains(&disposition) {
            continue;
        }
        let Some(id) = record.get(id_idx).map(str::trim) else {
            continue;
        };

        let float_at = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .and_then(|s| s.trim().parse::<f64>().ok())
        };

        rows.push(TargetRow {
            searchable_id: format!("{}{}", spec.id_prefix, id),
            status: disposition.to_string(),
            orbital_period_days: float_at(period_idx),
            planet_radius_earths: float_at(radius_idx),
        });
    }
    Ok(rows)
}

/// Collect the numeric object IDs of a candidate catalog (the known-object set).
pub(crate) fn parse_known_ids(
    csv_text: &str,
    spec: &CatalogSpec,
) -> Result<HashSet<CatalogId>, ExohuntError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(spec.comment_char)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h.trim() == spec.id_column)
        .ok_or_else(|| ExohuntError::MissingColumn(spec.id_column.to_string()))?;

    let mut known = HashSet::new();
    for record in reader.records() {
        let record = record?;
        if let Some(id) = record.get(id_idx).and_then(|s| s.trim().parse::<CatalogId>().ok()) {
            known.insert(id);
        }
    }
    Ok(known)
}

/// Keep the sampled stars that are absent from the known-object set, in the
/// normalized display schema.
pub(crate) fn filter_untested(
    sample: Vec<StarRecord>,
    known: &HashSet<CatalogId>,
) -> Vec<UntestedRow> {
    sample
        .into_iter()
        .filter(|star| !known.contains(&star.id))
        .map(|star| UntestedRow {
            searchable_id: format!("TIC {}", star.id),
            tess_magnitude: star.tess_magnitude,
            distance_pc: star.distance_pc,
            ra: star.ra,
            dec: star.dec,
        })
        .collect()
}

/// A uniform random sample of up to `count` rows. Order is not preserved when a
/// true subsample is drawn.
pub(crate) fn sample_rows<R: Rng + ?Sized>(
    rows: Vec<TargetRow>,
    count: usize,
    rng: &mut R,
) -> Vec<TargetRow> {
    if rows.len() <= count {
        return rows;
    }
    rand::seq::index::sample(rng, rows.len(), count)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect()
}

#[cfg(test)]
mod catalog_client_test {
    use super::*;
    use crate::missions::{KOI_CATALOG, TOI_CATALOG};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use ureq::Agent;

    /// An environment whose every request fails fast: the agent is proxied to a
    /// closed loopback port, so no test traffic ever leaves the machine.
    fn unreachable_env() -> ExohuntEnv {
        let proxy = ureq::Proxy::new("http://127.0.0.1:9").expect("proxy url");
        let config = Agent::config_builder()
            .proxy(Some(proxy))
            .timeout_global(Some(Duration::from_millis(500)))
            .build();
        ExohuntEnv {
            http_client: config.into(),
        }
    }

    const TOI_CSV: &str = "\
TIC ID,TOI,TFOPWG Disposition,Period (days),Planet Radius (R_earth)
261136679,700.01,CP,9.977,1.07
149603524,270.01,PC,5.66,2.4
231663901,101.01,FP,1.43,13.26
38846515,178.01,PC,6.55,2.9
92226327,120.01,KP,4.1,11.0
";

    const KOI_CSV: &str = "\
# This file was produced by the NASA Exoplanet Archive
# Table: cumulative
kepid,koi_disposition,koi_period,koi_prad
10797460,CONFIRMED,9.488,2.26
10811496,FALSE POSITIVE,19.899,14.6
10854555,CANDIDATE,2.525,
10872983,FALSE POSITIVE,0.89,33.46
";

    #[test]
    fn test_tess_planet_rows_are_prefixed_and_vetted() {
        let labels = DispositionType::Planets.labels(&TOI_CATALOG);
        let rows = parse_catalog_rows(TOI_CSV, &TOI_CATALOG, labels).unwrap();

        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row.searchable_id.starts_with("TIC "));
            assert!(["CP", "PC"].contains(&row.status.as_str()));
        }
        assert_eq!(rows[0].searchable_id, "TIC 261136679");
        assert_eq!(rows[0].orbital_period_days, Some(9.977));
    }

    #[test]
    fn test_kepler_rows_skip_comment_lines() {
        let labels = DispositionType::FalsePositives.labels(&KOI_CATALOG);
        let rows = parse_catalog_rows(KOI_CSV, &KOI_CATALOG, labels).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].searchable_id, "KIC 10811496");
        assert_eq!(rows[0].status, "FALSE POSITIVE");
    }

    #[test]
    fn test_missing_radius_field_becomes_none() {
        let labels = DispositionType::Planets.labels(&KOI_CATALOG);
        let rows = parse_catalog_rows(KOI_CSV, &KOI_CATALOG, labels).unwrap();

        let candidate = rows
            .iter()
            .find(|r| r.searchable_id == "KIC 10854555")
            .unwrap();
        assert_eq!(candidate.planet_radius_earths, None);
    }

    #[test]
    fn test_zero_match_filter_yields_empty_not_error() {
        let rows = parse_catalog_rows(TOI_CSV, &TOI_CATALOG, &["NO SUCH LABEL"]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_disposition_column_is_an_error() {
        let bad_csv = "TIC ID,Period (days)\n1,2.0\n";
        assert!(matches!(
            parse_catalog_rows(bad_csv, &TOI_CATALOG, &["CP"]),
            Err(ExohuntError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_sample_caps_the_row_count() {
        let labels = DispositionType::Planets.labels(&TOI_CATALOG);
        let rows = parse_catalog_rows(TOI_CSV, &TOI_CATALOG, labels).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let sampled = sample_rows(rows.clone(), 2, &mut rng);
        assert_eq!(sampled.len(), 2);
        for row in &sampled {
            assert!(rows.contains(row));
        }

        // Asking for more than exists returns everything.
        let all = sample_rows(rows.clone(), 25, &mut rng);
        assert_eq!(all.len(), rows.len());
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty_and_is_not_cached() {
        let mut client = CatalogClient::with_ttl(unreachable_env(), Duration::from_secs(60));

        let targets = client.fetch_catalog_targets(Mission::Tess, DispositionType::Planets, 5);
        assert!(targets.is_empty());
        let untested = client.fetch_untested_targets(5);
        assert!(untested.is_empty());

        // A failed fetch stores nothing: the fallible variant still errors
        // instead of serving a cached empty table.
        assert!(client
            .try_fetch_catalog_targets(Mission::Tess, DispositionType::Planets, 5)
            .is_err());
        assert!(client.try_fetch_untested_targets(5).is_err());
    }

    #[test]
    fn test_known_ids_are_collected_from_the_toi_table() {
        let known = parse_known_ids(TOI_CSV, &TOI_CATALOG).unwrap();
        assert_eq!(known.len(), 5);
        assert!(known.contains(&261136679));
    }

    #[test]
    fn test_untested_filter_drops_known_objects() {
        let known: HashSet<CatalogId> = [11, 22].into_iter().collect();
        let sample = vec![
            StarRecord {
                id: 11,
                tess_magnitude: Some(9.1),
                distance_pc: Some(50.0),
                ra: Some(10.0),
                dec: Some(-5.0),
            },
            StarRecord {
                id: 33,
                tess_magnitude: Some(10.4),
                distance_pc: Some(120.0),
                ra: Some(200.0),
                dec: Some(44.0),
            },
        ];

        let untested = filter_untested(sample, &known);
        assert_eq!(untested.len(), 1);
        assert_eq!(untested[0].searchable_id, "TIC 33");
        assert_eq!(untested[0].distance_pc, Some(120.0));
    }
}
