// src/http/client.rs
//! Blocking HTTP transport for the discovery and verification round trips.
//!
//! The protocol needs exactly two wire operations: a Yadis discovery GET and a
//! form-encoded verification POST. Both are expressed through the [`Transport`]
//! trait so tests can substitute deterministic fakes; [`HttpTransport`] is the
//! production implementation over a shared `reqwest` blocking client.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::error::OpenIdError;

/// Yadis redirection header checked on every discovery response.
const XRDS_LOCATION_HEADER: &str = "X-Xrds-Location";

/// Per-request deadline applied to every discovery hop and verification call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One fetched discovery response, fully read into memory.
///
/// Reading the body eagerly means the underlying connection is released on
/// every exit path of the discovery engine, including error returns.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Declared `Content-Type` of the response, empty if absent or unreadable.
    pub content_type: String,
    /// Value of the `X-Xrds-Location` header, if present and non-empty.
    pub xrds_location: Option<String>,
    /// Complete response body.
    pub body: String,
}

/// Minimal blocking request/response capability used by the pipeline.
///
/// Implementations must be usable from multiple threads: each call is
/// independent and reentrant, so concurrent discovery and verification with
/// distinct inputs is safe.
pub trait Transport: Send + Sync {
    /// Issues a GET to `uri` with the given `Accept` header and returns the
    /// classified response.
    fn get(&self, uri: &str, accept: &str) -> Result<FetchedDocument, OpenIdError>;

    /// POSTs an `application/x-www-form-urlencoded` body to `uri` and returns
    /// the response body text.
    fn post_form(&self, uri: &str, body: String) -> Result<String, OpenIdError>;
}

/// Production [`Transport`] backed by a `reqwest` blocking client.
///
/// The inner client pools connections and applies a fixed request timeout, so
/// every hop of a discovery chain carries a deadline.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport with the crate's default timeout settings.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, uri: &str, accept: &str) -> Result<FetchedDocument, OpenIdError> {
        let response = self
            .client
            .get(uri)
            .header(ACCEPT, accept)
            .send()
            .map_err(|e| OpenIdError::transport(uri, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let xrds_location = response
            .headers()
            .get(XRDS_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let body = response
            .text()
            .map_err(|e| OpenIdError::transport(uri, e))?;

        Ok(FetchedDocument {
            content_type,
            xrds_location,
            body,
        })
    }

    fn post_form(&self, uri: &str, body: String) -> Result<String, OpenIdError> {
        let response = self
            .client
            .post(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .map_err(|e| OpenIdError::transport(uri, e))?;

        response.text().map_err(|e| OpenIdError::transport(uri, e))
    }
}
