//! Async services that combine a client with a gateway.
//!
//! # Design
//! `RemoteCharacterService::load` issues exactly one request per call. The
//! gateway's completion feeds a `oneshot` channel; the returned future
//! resolves from that channel only, so it resolves at most once. A gateway
//! that drops the completion without calling it resolves the future with
//! `Timeout` instead of hanging. Every transport failure is reported as
//! `ErrorKind::Timeout`; status and body classification is delegated to
//! the client.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::client::{CharacterClient, SettingsClient};
use crate::config::ApiConfig;
use crate::error::{ErrorKind, TransportError};
use crate::gateway::{Gateway, UreqGateway};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Character, MenuEnvelope};

pub trait CharacterService: Send + Sync {
    fn load(&self, id: i64) -> impl Future<Output = Result<Character, ErrorKind>> + Send;
}

pub trait SettingsService: Send + Sync {
    fn get_menus(&self) -> impl Future<Output = Result<MenuEnvelope, ErrorKind>> + Send;
}

impl<S: CharacterService> CharacterService for Arc<S> {
    fn load(&self, id: i64) -> impl Future<Output = Result<Character, ErrorKind>> + Send {
        (**self).load(id)
    }
}

impl<S: SettingsService> SettingsService for Arc<S> {
    fn get_menus(&self) -> impl Future<Output = Result<MenuEnvelope, ErrorKind>> + Send {
        (**self).get_menus()
    }
}

/// Fetches characters over a `Gateway`.
#[derive(Debug)]
pub struct RemoteCharacterService<G> {
    client: CharacterClient,
    gateway: G,
}

impl<G: Gateway> RemoteCharacterService<G> {
    pub fn new(client: CharacterClient, gateway: G) -> Self {
        Self { client, gateway }
    }
}

impl RemoteCharacterService<UreqGateway> {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(CharacterClient::new(&config.character), UreqGateway::new(config.timeout()))
    }
}

impl<G: Gateway> CharacterService for RemoteCharacterService<G> {
    async fn load(&self, id: i64) -> Result<Character, ErrorKind> {
        debug!(id, "loading character");
        let response = round_trip(&self.gateway, self.client.build_get_character(id)).await?;
        self.client.parse_character(response)
    }
}

/// Fetches the biller menu over a `Gateway`.
#[derive(Debug)]
pub struct RemoteSettingsService<G> {
    client: SettingsClient,
    gateway: G,
}

impl<G: Gateway> RemoteSettingsService<G> {
    pub fn new(client: SettingsClient, gateway: G) -> Self {
        Self { client, gateway }
    }
}

impl RemoteSettingsService<UreqGateway> {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(SettingsClient::new(&config.settings), UreqGateway::new(config.timeout()))
    }
}

impl<G: Gateway> SettingsService for RemoteSettingsService<G> {
    async fn get_menus(&self) -> Result<MenuEnvelope, ErrorKind> {
        debug!("loading biller menus");
        let response = round_trip(&self.gateway, self.client.build_get_menus()).await?;
        self.client.parse_menus(response)
    }
}

/// Hand `request` to the gateway and wait for its single completion.
async fn round_trip<G: Gateway>(gateway: &G, request: HttpRequest) -> Result<HttpResponse, ErrorKind> {
    let (tx, rx) = oneshot::channel();
    gateway.send(
        request,
        Box::new(move |outcome| {
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(outcome);
        }),
    );

    rx.await.unwrap_or(Err(TransportError::Dropped)).map_err(|e| {
        warn!(error = %e, "transport failure");
        ErrorKind::from(e)
    })
}
