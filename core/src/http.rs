//! HTTP transport types shared by the clients and the gateway.
//!
//! # Design
//! Requests and responses are plain owned data. `CharacterClient` and
//! `SettingsClient` build `HttpRequest` values and classify `HttpResponse`
//! values without doing any I/O themselves; a `Gateway` (or an FFI host)
//! performs the round-trip in between. Owned fields let these values move
//! onto a worker thread or across the C boundary without lifetime concerns.

/// HTTP method for a request. The upstream API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data. Every upstream call is a
/// bodiless GET, so only the URL and headers vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// The raw outcome of a completed HTTP exchange.
///
/// Produced once per request and consumed by a single `parse_*` call.
/// `body` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
