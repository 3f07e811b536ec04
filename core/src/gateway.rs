//! Transport gateway: executes an `HttpRequest` and reports the outcome
//! through a one-shot completion.
//!
//! # Design
//! The gateway is callback-shaped so that hosts which already own an HTTP
//! stack can plug in without an async runtime. `Completion` is `FnOnce`,
//! so an implementation cannot report twice. Services turn the callback
//! into a future (see `service`).

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Receives the single outcome of a `Gateway::send` call.
pub type Completion = Box<dyn FnOnce(Result<HttpResponse, TransportError>) + Send + 'static>;

pub trait Gateway: Send + Sync {
    /// Execute `request` and invoke `on_complete` once with the outcome.
    ///
    /// Any HTTP status is a successful exchange. Only failures that produce
    /// no status (connection, timeout, unreadable body) are reported as
    /// `TransportError`.
    fn send(&self, request: HttpRequest, on_complete: Completion);
}

/// Name given to each request worker thread.
const WORKER_THREAD_NAME: &str = "character-gateway";

/// Blocking `ureq` agent driven from a worker thread per request.
#[derive(Clone)]
pub struct UreqGateway {
    agent: ureq::Agent,
}

impl UreqGateway {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Gateway for UreqGateway {
    fn send(&self, request: HttpRequest, on_complete: Completion) {
        let agent = self.agent.clone();
        run_on_worker(on_complete, move || execute(&agent, request), spawn_worker);
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

fn spawn_worker(job: Job) -> io::Result<()> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(job)
        .map(drop)
}

/// Hand `work` to `spawn` and report its outcome through `on_complete`.
///
/// If the worker cannot be started the completion still fires once, with
/// `TransportError::Connect`.
fn run_on_worker<W, S>(on_complete: Completion, work: W, spawn: S)
where
    W: FnOnce() -> Result<HttpResponse, TransportError> + Send + 'static,
    S: FnOnce(Job) -> io::Result<()>,
{
    let slot = Arc::new(Mutex::new(Some(on_complete)));
    let worker_slot = Arc::clone(&slot);
    let job: Job = Box::new(move || {
        if let Some(complete) = take(&worker_slot) {
            complete(work());
        }
    });

    if let Err(e) = spawn(job) {
        warn!(error = %e, "failed to start gateway worker");
        if let Some(complete) = take(&slot) {
            complete(Err(TransportError::Connect(e.to_string())));
        }
    }
}

fn take(slot: &Mutex<Option<Completion>>) -> Option<Completion> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Run one request to completion on the calling thread.
fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    debug!(method = request.method.as_str(), url = %request.url, "sending request");

    let mut builder = match request.method {
        HttpMethod::Get => agent.get(&request.url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let mut response = builder.call().map_err(|e| {
        warn!(url = %request.url, error = %e, "request failed");
        TransportError::Connect(e.to_string())
    })?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec().map_err(|e| {
        warn!(url = %request.url, status, error = %e, "failed to read response body");
        TransportError::Body(e.to_string())
    })?;

    debug!(url = %request.url, status, body_len = body.len(), "response received");
    Ok(HttpResponse { status, body })
}
