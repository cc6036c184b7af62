//! Filtered queries against the TESS Input Catalog (TIC).
//!
//! The untested-target browse needs a random page of bright, nearby stars. The
//! query filters on **parallax**, not distance: parallax is the directly
//! measured quantity and a larger parallax means a closer star. The default
//! ranges (Vmag 9–13, parallax 2–100 mas) select stars bright enough for good
//! photometry and close enough to be worth a look.

use serde_json::{json, Value};

use crate::archive::mast::MAST_INVOKE_URL;
use crate::constants::CatalogId;
use crate::env_state::ExohuntEnv;
use crate::exohunt_errors::ExohuntError;

/// Brightness and parallax window for a TIC star sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TicQueryCriteria {
    /// Visual magnitude range (lower, upper).
    pub vmag: (f64, f64),
    /// Parallax range in milliarcseconds (lower, upper).
    pub parallax_mas: (f64, f64),
}

impl Default for TicQueryCriteria {
    fn default() -> Self {
        TicQueryCriteria {
            vmag: (9.0, 13.0),
            parallax_mas: (2.0, 100.0),
        }
    }
}

/// One star row from a filtered TIC query.
#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    pub id: CatalogId,
    pub tess_magnitude: Option<f64>,
    pub distance_pc: Option<f64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
}

/// Fetch a page of stars matching `criteria` from the filtered-TIC service.
pub(crate) fn query_tic_sample(
    env: &ExohuntEnv,
    criteria: &TicQueryCriteria,
    page_size: usize,
) -> Result<Vec<StarRecord>, ExohuntError> {
    let request = build_tic_request(criteria, page_size);
    let response = env.post_json(MAST_INVOKE_URL, &request)?;
    parse_tic_response(&response)
}

/// Build the invoke-API request for a filtered TIC page.
fn build_tic_request(criteria: &TicQueryCriteria, page_size: usize) -> Value {
    json!({
        "service": "Mast.Catalogs.Filtered.Tic",
        "format": "json",
        "params": {
            "columns": "ID,Tmag,d,ra,dec,plx,Vmag",
            "filters": [
                {
                    "paramName": "Vmag",
                    "values": [{ "min": criteria.vmag.0, "max": criteria.vmag.1 }]
                },
                {
                    "paramName": "plx",
                    "values": [{ "min": criteria.parallax_mas.0, "max": criteria.parallax_mas.1 }]
                },
            ],
            "pagesize": page_size,
            "page": 1,
        },
    })
}

/// Decode a filtered-TIC response. Rows without a usable ID are skipped; the ID
/// may arrive as a JSON number or a string.
fn parse_tic_response(response: &Value) -> Result<Vec<StarRecord>, ExohuntError> {
    let rows = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ExohuntError::ArchiveResponse("missing `data` array in TIC response".to_string())
        })?;

    let mut stars = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(id) = field_id(row, "ID") else {
            continue;
        };
        stars.push(StarRecord {
            id,
            tess_magnitude: field_f64(row, "Tmag"),
            distance_pc: field_f64(row, "d"),
            ra: field_f64(row, "ra"),
            dec: field_f64(row, "dec"),
        });
    }
    Ok(stars)
}

fn field_id(row: &Value, key: &str) -> Option<CatalogId> {
    match row.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field_f64(row: &Value, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tic_query_test {
    use super::*;

    #[test]
    fn test_request_filters_on_parallax_not_distance() {
        let request = build_tic_request(&TicQueryCriteria::default(), 100);
        let filters = request["params"]["filters"].as_array().unwrap();

        assert_eq!(filters[0]["paramName"], "Vmag");
        assert_eq!(filters[1]["paramName"], "plx");
        assert_eq!(filters[1]["values"][0]["min"], 2.0);
        assert_eq!(filters[1]["values"][0]["max"], 100.0);
        assert_eq!(request["params"]["pagesize"], 100);
    }

    #[test]
    fn test_parse_rows_with_mixed_id_encodings() {
        let response = json!({
            "data": [
                { "ID": 261136679, "Tmag": 9.9, "d": 94.5, "ra": 63.37, "dec": -69.2 },
                { "ID": "120896927", "Tmag": 10.2, "d": null },
                { "Tmag": 11.0 }
            ]
        });

        let stars = parse_tic_response(&response).unwrap();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].id, 261136679);
        assert_eq!(stars[0].distance_pc, Some(94.5));
        assert_eq!(stars[1].id, 120896927);
        assert_eq!(stars[1].distance_pc, None);
    }

    #[test]
    fn test_missing_data_array_is_an_error() {
        let response = json!({ "status": "EXECUTING" });
        assert!(matches!(
            parse_tic_response(&response),
            Err(ExohuntError::ArchiveResponse(_))
        ));
    }
}
