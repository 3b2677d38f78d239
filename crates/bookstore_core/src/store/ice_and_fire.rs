//! An API of Ice and Fire store backend.
//!
//! # Responsibility
//! - Build remote request URLs from the optional name filter.
//! - Issue one best-effort blocking GET per fetch.
//! - Reshape the remote record list into the local envelope.
//!
//! # Invariants
//! - One request per call: no retry, no backoff, transport default timeouts.
//! - Connection failure is absorbed into a 500 error envelope.
//! - The envelope status code mirrors whatever the remote returned.

use crate::envelope::ResponseEnvelope;
use crate::model::external::ExternalBookRecord;
use crate::store::{BookStore, StoreError, StoreResult};
use log::{error, info};
use std::time::Instant;

/// Production base URL for the remote catalog.
pub const ICE_AND_FIRE_BASE_URL: &str = "https://www.anapioficeandfire.com/api/books";

/// Remote catalog backend over the Ice and Fire API.
pub struct IceAndFireStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Default for IceAndFireStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IceAndFireStore {
    pub fn new() -> Self {
        Self::with_base_url(ICE_AND_FIRE_BASE_URL)
    }

    /// Builds a store against a non-production base URL (tests, staging).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Builds the remote request URL for an optional name filter.
    ///
    /// The filter value is substituted unencoded, matching the remote API's
    /// query convention.
    pub fn request_url(&self, name: Option<&str>) -> String {
        match name {
            None | Some("") => self.base_url.clone(),
            Some(name) => format!("{}?name={}", self.base_url, name),
        }
    }

    /// Reshapes a remote response body into the local envelope.
    ///
    /// The body must be a JSON array of remote records; each is projected
    /// onto the local book shape through the allow-list mapping.
    pub fn transform_body(status_code: u16, body: &str) -> StoreResult<ResponseEnvelope> {
        let records: Vec<ExternalBookRecord> = serde_json::from_str(body)
            .map_err(|err| StoreError::UnexpectedPayload(err.to_string()))?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let view = record
                .into_view()
                .map_err(|err| StoreError::UnexpectedPayload(err.to_string()))?;
            views.push(view);
        }

        Ok(ResponseEnvelope::from_status_code(status_code).with_data(serde_json::json!(views)))
    }
}

impl BookStore for IceAndFireStore {
    fn store_id(&self) -> &'static str {
        "ice-and-fire"
    }

    fn get_books(&self, name: Option<&str>) -> StoreResult<ResponseEnvelope> {
        let started_at = Instant::now();
        let url = self.request_url(name);
        info!("event=external_fetch module=store status=start store=ice-and-fire");

        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=external_fetch module=store status=error store=ice-and-fire duration_ms={} error_code=remote_unreachable error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Ok(ResponseEnvelope::from_status_code(500)
                    .with_message(err.to_string()));
            }
        };

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| StoreError::UnexpectedPayload(err.to_string()))?;
        let envelope = Self::transform_body(status_code, &body)?;

        info!(
            "event=external_fetch module=store status=ok store=ice-and-fire duration_ms={} remote_status={}",
            started_at.elapsed().as_millis(),
            status_code
        );
        Ok(envelope)
    }
}
