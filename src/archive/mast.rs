//! MAST-backed archive implementation.
//!
//! Search goes through the MAST invoke API (`Mast.Caom.Filtered`), restricted to
//! time-series products; downloads go through the per-product time-series table
//! endpoint, which serves the photometry as JSON rows. Both responses are parsed
//! by offline-testable helpers, and every failure surfaces as an
//! [`ExohuntError`] for the caller to degrade gracefully.

use serde_json::{json, Value};

use crate::archive::{LightCurveArchive, SearchEntry, SearchFilters};
use crate::env_state::ExohuntEnv;
use crate::exohunt_errors::ExohuntError;
use crate::lightcurve::{LightCurve, Segment};
use crate::missions::Mission;
use crate::target::TargetQuery;

/// MAST mashup endpoint shared by the archive search and the TIC catalog query.
pub(crate) const MAST_INVOKE_URL: &str = "https://mast.stsci.edu/api/v0/invoke";

/// Archive client speaking the MAST invoke API.
#[derive(Debug, Clone)]
pub struct MastArchive {
    env: ExohuntEnv,
}

impl MastArchive {
    pub fn new(env: ExohuntEnv) -> Self {
        MastArchive { env }
    }
}

impl LightCurveArchive for MastArchive {
    fn search(
        &self,
        query: &TargetQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchEntry>, ExohuntError> {
        let request = build_search_request(query, filters);
        let response = self.env.post_json(MAST_INVOKE_URL, &request)?;
        parse_search_response(&response)
    }

    fn download(&self, entry: &SearchEntry) -> Result<Option<Segment>, ExohuntError> {
        let Some(url) = &entry.data_url else {
            // The archive listed the product but serves no table for it.
            return Ok(None);
        };
        let body = self.env.get_text(url)?;
        let table: Value = serde_json::from_str(&body)?;
        parse_segment(&table, entry)
    }
}

/// Build the invoke-API request for a time-series product search.
fn build_search_request(query: &TargetQuery, filters: &SearchFilters) -> Value {
    let missions: Vec<&str> = filters.missions.iter().map(|m| m.label()).collect();
    let authors: Vec<&str> = filters.authors.iter().map(|a| a.as_str()).collect();

    json!({
        "service": "Mast.Caom.Filtered",
        "format": "json",
        "params": {
            "columns": "obsid,target_name,obs_collection,provenance_name,dataURL",
            "filters": [
                { "paramName": "dataproduct_type", "values": ["timeseries"] },
                { "paramName": "target_name", "values": [query.search_term()] },
                { "paramName": "obs_collection", "values": missions },
                { "paramName": "provenance_name", "values": authors },
            ],
        },
    })
}

/// Decode a search response into entries, in the archive's order.
fn parse_search_response(response: &Value) -> Result<Vec<SearchEntry>, ExohuntError> {
    let rows = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ExohuntError::ArchiveResponse("missing `data` array in search response".to_string())
        })?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(product_id) = field_string(row, "obsid") else {
            continue;
        };
        let target_name = field_string(row, "target_name").unwrap_or_default();
        let mission = field_string(row, "obs_collection")
            .as_deref()
            .and_then(Mission::from_label);
        let author = field_string(row, "provenance_name").unwrap_or_default();

        let archive_url = mission.and_then(|m| {
            let digits: String = target_name
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            digits
                .parse::<u64>()
                .ok()
                .map(|id| super::archive_link(m, id))
        });

        entries.push(SearchEntry {
            product_id,
            target_name,
            mission,
            author,
            data_url: field_string(row, "dataURL"),
            archive_url,
        });
    }
    Ok(entries)
}

/// Decode a product's time-series table into a segment.
///
/// Rows carry `TIME`, `LC_INIT`, `LC_INIT_ERR`; a null flux becomes NaN and is
/// removed downstream. A table with no rows is a null product.
fn parse_segment(table: &Value, entry: &SearchEntry) -> Result<Option<Segment>, ExohuntError> {
    let rows = table.get("data").and_then(Value::as_array).ok_or_else(|| {
        ExohuntError::ArchiveResponse(format!(
            "missing `data` array in time-series table for product {}",
            entry.product_id
        ))
    })?;

    if rows.is_empty() {
        return Ok(None);
    }

    let mut time = Vec::with_capacity(rows.len());
    let mut flux = Vec::with_capacity(rows.len());
    let mut flux_err = Vec::with_capacity(rows.len());
    for row in rows {
        time.push(field_f64(row, "TIME").unwrap_or(f64::NAN));
        flux.push(field_f64(row, "LC_INIT").unwrap_or(f64::NAN));
        flux_err.push(field_f64(row, "LC_INIT_ERR").unwrap_or(f64::NAN));
    }

    let curve = LightCurve::new(time, flux, flux_err)?;
    Ok(Some(Segment {
        curve,
        mission: entry.mission,
        author: entry.author.clone(),
    }))
}

/// A row field as a string, tolerating numeric encodings.
fn field_string(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A row field as a float, tolerating string encodings.
fn field_f64(row: &Value, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod mast_test {
    use super::*;

    #[test]
    fn test_search_request_carries_filters() {
        let query = TargetQuery::parse("TIC 261136679").unwrap();
        let request = build_search_request(&query, &SearchFilters::default());

        assert_eq!(request["service"], "Mast.Caom.Filtered");
        let filters = request["params"]["filters"].as_array().unwrap();
        assert_eq!(filters[0]["values"][0], "timeseries");
        assert_eq!(filters[1]["values"][0], "261136679");
        assert_eq!(filters[2]["values"][0], "TESS");
    }

    #[test]
    fn test_parse_search_response_rows() {
        let response = json!({
            "status": "COMPLETE",
            "data": [
                {
                    "obsid": 17000123,
                    "target_name": "TIC 261136679",
                    "obs_collection": "TESS",
                    "provenance_name": "SPOC",
                    "dataURL": "https://mast.example/table/17000123"
                },
                { "target_name": "row without obsid is skipped" }
            ]
        });

        let entries = parse_search_response(&response).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, "17000123");
        assert_eq!(entries[0].mission, Some(Mission::Tess));
        assert_eq!(
            entries[0].archive_url.as_deref(),
            Some("https://exofop.ipac.caltech.edu/tess/target.php?id=261136679")
        );
    }

    #[test]
    fn test_parse_search_response_without_data_is_an_error() {
        let response = json!({ "status": "ERROR" });
        assert!(matches!(
            parse_search_response(&response),
            Err(ExohuntError::ArchiveResponse(_))
        ));
    }

    fn dummy_entry() -> SearchEntry {
        SearchEntry {
            product_id: "17000123".to_string(),
            target_name: "TIC 261136679".to_string(),
            mission: Some(Mission::Tess),
            author: "SPOC".to_string(),
            data_url: Some("https://mast.example/table/17000123".to_string()),
            archive_url: None,
        }
    }

    #[test]
    fn test_parse_segment_maps_nulls_to_nan() {
        let table = json!({
            "data": [
                { "TIME": 1816.05, "LC_INIT": 1.0002, "LC_INIT_ERR": 0.0011 },
                { "TIME": 1816.06, "LC_INIT": null, "LC_INIT_ERR": null },
                { "TIME": 1816.07, "LC_INIT": "0.9997", "LC_INIT_ERR": "0.0012" }
            ]
        });

        let segment = parse_segment(&table, &dummy_entry()).unwrap().unwrap();
        assert_eq!(segment.curve.len(), 3);
        assert!(segment.curve.flux[1].is_nan());
        assert_eq!(segment.curve.flux[2], 0.9997);
        assert_eq!(segment.mission, Some(Mission::Tess));
    }

    #[test]
    fn test_parse_segment_empty_table_is_a_null_product() {
        let table = json!({ "data": [] });
        assert!(parse_segment(&table, &dummy_entry()).unwrap().is_none());
    }
}
