//! # Exohunt environment state
//!
//! This module defines [`crate::env_state::ExohuntEnv`], the **shared environment object** used
//! across the `exohunt` library. It provides access to a persistent **HTTP client** used for
//! every remote fetch (catalog CSVs, MAST queries, light-curve downloads).
//!
//! This object is designed to be **cheaply cloneable** and passed to the components that
//! require access to external data services.
//!
//! ## Overview
//!
//! The main responsibilities of `ExohuntEnv` are:
//!
//! 1. Manage a global [`ureq::Agent`] HTTP client with sensible default settings.
//! 2. Provide simple utilities for performing HTTP GET and POST-JSON requests,
//!    returning [`ExohuntError`](crate::exohunt_errors::ExohuntError) on failure so that
//!    callers can degrade to an empty result instead of crashing.
//!
//! ## Notes
//!
//! - The [`crate::env_state::ExohuntEnv`] struct is meant to be reused and shared between
//!   different parts of the crate to avoid redundant HTTP session creation.
//! - No retry logic is applied anywhere; a failed fetch surfaces immediately and must be
//!   re-triggered by the caller.
use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

use crate::exohunt_errors::ExohuntError;

/// This object is passed to the various components in the library
/// to provide access to external data services.
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
#[derive(Debug, Clone)]
pub struct ExohuntEnv {
    pub http_client: Agent,
}

impl Default for ExohuntEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl ExohuntEnv {
    /// Create a new environment with an HTTP client configured with a global timeout.
    ///
    /// Return
    /// ------
    /// * A new `ExohuntEnv` object
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        let agent: Agent = config.into();

        ExohuntEnv { http_client: agent }
    }

    /// Perform a GET request and return the response body as text.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the URL to fetch
    ///
    /// Return
    /// ------
    /// * The body of the response, or an error if the request or the read fails
    pub fn get_text(&self, url: &str) -> Result<String, ExohuntError> {
        let body = self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }

    /// POST a JSON payload and decode the JSON response.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the URL to post to
    /// * `payload`: the JSON body of the request
    ///
    /// Return
    /// ------
    /// * The decoded JSON response, or an error if the request or the decode fails
    pub fn post_json(&self, url: &str, payload: &Value) -> Result<Value, ExohuntError> {
        let body = self
            .http_client
            .post(url)
            .send_json(payload)?
            .body_mut()
            .read_json::<Value>()?;
        Ok(body)
    }
}
