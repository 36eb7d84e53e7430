//! Shared plumbing for the HTTP backend clients.
//!
//! Every client issues exactly one request per call and funnels transport
//! failures through [`transport_error`] and [`success_body`] so that all
//! three services report errors the same way.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{BackendError, Service};

/// Longest slice of an error body carried into an error detail.
const MAX_DETAIL_LEN: usize = 512;

/// Build a client whose every request is bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Join a base URL and a contracted path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Map a `reqwest` failure onto the normalized error kinds.
pub(crate) fn transport_error(service: Service, err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::timeout(service, err.to_string())
    } else if err.is_connect() {
        BackendError::unreachable(service, err.to_string())
    } else if err.is_decode() || err.is_body() {
        BackendError::bad_response(service, err.to_string())
    } else {
        BackendError::unreachable(service, err.to_string())
    }
}

/// Read the body of a 2xx response, or turn a non-2xx one into `Rejected`.
pub(crate) async fn success_body(service: Service, response: Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(service, e))?;

    if !status.is_success() {
        return Err(BackendError::rejected(
            service,
            format!("HTTP {}: {}", status, truncate(&body)),
        ));
    }
    Ok(body)
}

/// Decode a JSON body, reporting shape mismatches as `BadResponse`.
pub(crate) fn decode<T: DeserializeOwned>(service: Service, body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| {
        BackendError::bad_response(service, format!("{}: {}", e, truncate(body)))
    })
}

fn truncate(body: &str) -> &str {
    if body.len() <= MAX_DETAIL_LEN {
        return body.trim();
    }
    let mut end = MAX_DETAIL_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].trim()
}
