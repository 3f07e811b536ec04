//! Client core for the character API.
//!
//! # Overview
//! Fetches one character per call, classifies the upstream response into
//! a closed `ErrorKind` taxonomy, and drives a view model that presents
//! the outcome.
//!
//! # Design
//! - `CharacterClient` / `SettingsClient` build `HttpRequest` values and
//!   classify `HttpResponse` values without touching the network.
//! - A `Gateway` executes the round-trip and reports through a one-shot
//!   completion; `UreqGateway` is the production implementation.
//! - `RemoteCharacterService` bridges the completion into a future.
//! - `CharacterViewModel` owns the observable `LoadState`.
//! - Configuration (`ApiConfig`) is loaded once and passed in at
//!   construction.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod gateway;
pub mod http;
pub mod service;
pub mod types;
pub mod view_model;

pub use client::{CharacterClient, SettingsClient};
pub use config::{ApiConfig, ConfigError, EndpointConfig};
pub use decode::KeyDecoding;
pub use error::{ErrorKind, TransportError};
pub use gateway::{Completion, Gateway, UreqGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{CharacterService, RemoteCharacterService, RemoteSettingsService, SettingsService};
pub use types::{Character, LocalizedMessage, MenuEntry, MenuEnvelope};
pub use view_model::{CharacterViewModel, LoadState, LOAD_ERROR_MESSAGE};
