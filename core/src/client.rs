//! Stateless request builders and response classifiers.
//!
//! # Design
//! `CharacterClient` and `SettingsClient` hold only their endpoint
//! configuration. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that classifies an
//! `HttpResponse`. The round-trip in between belongs to a `Gateway` or to
//! an FFI host, which keeps classification a pure function of
//! `(status, body)`.
//!
//! The upstream signals "not found" with status 201, not 404. That
//! convention is checked before anything else and must not be changed to a
//! 404 check.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::decode::{decode, KeyDecoding};
use crate::error::ErrorKind;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Character, MenuEnvelope};

/// Status the upstream uses for a missing resource.
pub const NOT_FOUND_STATUS: u16 = 201;
/// Status the upstream uses for an internal failure.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Builds and classifies `GET /character/{id}` exchanges.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    endpoint: Endpoint,
}

impl CharacterClient {
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    /// The id is forwarded verbatim; no local validation is performed.
    pub fn build_get_character(&self, id: i64) -> HttpRequest {
        self.endpoint.get(&format!("character/{id}"))
    }

    pub fn parse_character(&self, response: HttpResponse) -> Result<Character, ErrorKind> {
        classify(response, KeyDecoding::UseDefaultKeys)
    }
}

/// Builds and classifies `GET /parameter/biller/menus` exchanges.
#[derive(Debug, Clone)]
pub struct SettingsClient {
    endpoint: Endpoint,
}

impl SettingsClient {
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            endpoint: Endpoint::new(config),
        }
    }

    pub fn build_get_menus(&self) -> HttpRequest {
        self.endpoint.get("parameter/biller/menus")
    }

    pub fn parse_menus(&self, response: HttpResponse) -> Result<MenuEnvelope, ErrorKind> {
        classify(response, KeyDecoding::ConvertFromSnakeCase)
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Endpoint {
    fn new(config: &EndpointConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/{path}", self.base_url),
            headers: self.headers.clone(),
        }
    }
}

/// Map a completed response to a decoded payload or an `ErrorKind`.
///
/// Order matters: 201 and 500 win over whatever the body contains, and
/// every other status (200 included) goes through the decoder.
pub fn classify<T: DeserializeOwned>(response: HttpResponse, keys: KeyDecoding) -> Result<T, ErrorKind> {
    match response.status {
        NOT_FOUND_STATUS => Err(ErrorKind::NotFound),
        SERVER_ERROR_STATUS => Err(ErrorKind::ServerError),
        status => decode(&response.body, keys).map_err(|e| {
            debug!(status, body_len = response.body.len(), error = %e, "response body rejected");
            ErrorKind::InvalidPayload
        }),
    }
}
