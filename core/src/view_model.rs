//! Load-state orchestration for presenting a single character.
//!
//! # Design
//! `CharacterViewModel` owns a `LoadState` behind a `watch` channel, so a
//! presentation layer can read it at any time or subscribe to changes.
//! Every `ErrorKind` collapses into the one user-facing message
//! `LOAD_ERROR_MESSAGE`; the typed error stays available to tests through
//! the service.
//!
//! Overlapping loads are not cancelled. Each `load` takes a ticket when it
//! starts and only the most recently started live load may publish its
//! outcome, so a slow stale response cannot overwrite a fresher one.
//!
//! A `load` future that is dropped before it finishes gives up its ticket.
//! If it was the newest live load, the state falls back to the newest
//! outcome that finished behind it, or to the last published terminal
//! state when older loads are no longer running. It never stays `Loading`
//! without a live load behind it.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::service::CharacterService;
use crate::types::Character;

/// Message shown for any failed load.
pub const LOAD_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(Character),
    Failed(String),
}

impl LoadState {
    pub fn character(&self) -> Option<&Character> {
        match self {
            LoadState::Loaded(character) => Some(character),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Ticket bookkeeping for loads that have started but not yet published.
#[derive(Debug, Default)]
struct Tickets {
    issued: u64,
    live: BTreeSet<u64>,
    /// Ticket whose outcome is currently published. 0 before any.
    published: u64,
    /// Last terminal state published.
    settled: LoadState,
    /// Newest outcome that finished while a newer load was still live.
    parked: Option<(u64, LoadState)>,
}

impl Tickets {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.live.insert(self.issued);
        self.issued
    }

    fn newer_is_live(&self, ticket: u64) -> bool {
        self.live.range(ticket + 1..).next().is_some()
    }

    fn publish(&mut self, ticket: u64, outcome: LoadState) -> Option<LoadState> {
        self.published = ticket;
        self.parked = None;
        self.settled = outcome.clone();
        Some(outcome)
    }

    /// State to publish once `ticket` finished with `outcome`, if any.
    fn finish(&mut self, ticket: u64, outcome: LoadState) -> Option<LoadState> {
        self.live.remove(&ticket);
        if ticket < self.published {
            return None;
        }
        if self.newer_is_live(ticket) {
            if self.parked.as_ref().is_none_or(|(parked, _)| *parked < ticket) {
                self.parked = Some((ticket, outcome));
            }
            return None;
        }
        self.publish(ticket, outcome)
    }

    /// State to publish once `ticket` was dropped without an outcome, if any.
    fn abandon(&mut self, ticket: u64) -> Option<LoadState> {
        self.live.remove(&ticket);
        if ticket < self.published || self.newer_is_live(ticket) {
            return None;
        }
        if let Some((parked, outcome)) = self.parked.take() {
            return self.publish(parked, outcome);
        }
        if !self.live.is_empty() {
            // Older loads are still running and will publish.
            return None;
        }
        Some(self.settled.clone())
    }
}

/// Observable state plus the tickets that decide who may change it.
struct Board {
    state: watch::Sender<LoadState>,
    tickets: Mutex<Tickets>,
}

impl Board {
    fn tickets(&self) -> MutexGuard<'_, Tickets> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> PendingLoad<'_> {
        let mut tickets = self.tickets();
        let ticket = tickets.issue();
        self.state.send_replace(LoadState::Loading);
        PendingLoad {
            board: self,
            ticket,
            finished: false,
        }
    }
}

/// Held across the service call; settles the ticket even if dropped early.
struct PendingLoad<'a> {
    board: &'a Board,
    ticket: u64,
    finished: bool,
}

impl PendingLoad<'_> {
    fn finish(mut self, id: i64, outcome: LoadState) {
        self.finished = true;
        let mut tickets = self.board.tickets();
        match tickets.finish(self.ticket, outcome) {
            Some(next) => {
                self.board.state.send_replace(next);
            }
            None => debug!(id, ticket = self.ticket, "outcome of superseded load not published"),
        }
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        debug!(ticket = self.ticket, "load dropped before completing");
        let mut tickets = self.board.tickets();
        if let Some(next) = tickets.abandon(self.ticket) {
            self.board.state.send_replace(next);
        }
    }
}

pub struct CharacterViewModel<S> {
    service: S,
    board: Board,
}

impl<S: CharacterService> CharacterViewModel<S> {
    /// Creates an idle view model. Nothing is loaded until `load` is called.
    pub fn new(service: S) -> Self {
        Self {
            service,
            board: Board {
                state: watch::Sender::new(LoadState::Idle),
                tickets: Mutex::new(Tickets::default()),
            },
        }
    }

    pub async fn load(&self, id: i64) {
        let pending = self.board.begin();

        let outcome = match self.service.load(id).await {
            Ok(character) => LoadState::Loaded(character),
            Err(kind) => {
                debug!(id, error = %kind, "character load failed");
                LoadState::Failed(LOAD_ERROR_MESSAGE.to_string())
            }
        };

        pending.finish(id, outcome);
    }

    pub fn state(&self) -> LoadState {
        self.board.state.borrow().clone()
    }

    pub fn character(&self) -> Option<Character> {
        self.board.state.borrow().character().cloned()
    }

    pub fn error_message(&self) -> Option<String> {
        self.board.state.borrow().error_message().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.board.state.borrow(), LoadState::Loading)
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.board.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    type Gate = oneshot::Sender<Result<Character, ErrorKind>>;

    fn rick() -> Character {
        Character {
            id: 1,
            name: "Rick Sanchez".to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            gender: "Male".to_string(),
        }
    }

    /// Returns scripted outcomes in order and counts calls.
    struct ServiceSpy {
        outcomes: Mutex<VecDeque<Result<Character, ErrorKind>>>,
        load_calls: AtomicUsize,
    }

    impl ServiceSpy {
        fn with(outcomes: impl IntoIterator<Item = Result<Character, ErrorKind>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                load_calls: AtomicUsize::new(0),
            })
        }
    }

    impl CharacterService for ServiceSpy {
        fn load(&self, _id: i64) -> impl Future<Output = Result<Character, ErrorKind>> + Send {
            self.load_calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or(Err(ErrorKind::Timeout));
            async move { outcome }
        }
    }

    /// Each load waits on a gate the test opens explicitly.
    struct GatedService {
        gates: Mutex<VecDeque<oneshot::Receiver<Result<Character, ErrorKind>>>>,
    }

    impl CharacterService for GatedService {
        fn load(&self, _id: i64) -> impl Future<Output = Result<Character, ErrorKind>> + Send {
            let gate = self.gates.lock().unwrap().pop_front();
            async move {
                match gate {
                    Some(rx) => rx.await.unwrap_or(Err(ErrorKind::Timeout)),
                    None => Err(ErrorKind::Timeout),
                }
            }
        }
    }

    #[test]
    fn init_does_not_load() {
        let spy = ServiceSpy::with([]);
        let view_model = CharacterViewModel::new(spy.clone());
        assert_eq!(spy.load_calls.load(Ordering::SeqCst), 0);
        assert_eq!(view_model.state(), LoadState::Idle);
        assert!(view_model.character().is_none());
        assert!(view_model.error_message().is_none());
        assert!(!view_model.is_loading());
    }

    #[tokio::test]
    async fn load_calls_service_once() {
        let spy = ServiceSpy::with([Ok(rick())]);
        let view_model = CharacterViewModel::new(spy.clone());
        view_model.load(1).await;
        assert_eq!(spy.load_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_load_exposes_character() {
        let view_model = CharacterViewModel::new(ServiceSpy::with([Ok(rick())]));
        view_model.load(1).await;
        assert_eq!(view_model.character(), Some(rick()));
        assert!(view_model.error_message().is_none());
        assert_eq!(view_model.state(), LoadState::Loaded(rick()));
    }

    #[tokio::test]
    async fn every_error_kind_shows_the_same_message() {
        for kind in ErrorKind::ALL {
            let view_model = CharacterViewModel::new(ServiceSpy::with([Err(kind)]));
            view_model.load(1).await;
            assert_eq!(view_model.error_message().as_deref(), Some(LOAD_ERROR_MESSAGE), "{kind:?}");
            assert!(view_model.character().is_none(), "{kind:?}");
        }
    }

    #[tokio::test]
    async fn success_after_failure_clears_error() {
        let view_model = CharacterViewModel::new(ServiceSpy::with([Err(ErrorKind::ServerError), Ok(rick())]));
        view_model.load(1).await;
        assert!(view_model.error_message().is_some());
        view_model.load(1).await;
        assert!(view_model.error_message().is_none());
        assert_eq!(view_model.character(), Some(rick()));
    }

    #[tokio::test]
    async fn failure_after_success_clears_character() {
        let view_model = CharacterViewModel::new(ServiceSpy::with([Ok(rick()), Err(ErrorKind::NotFound)]));
        view_model.load(1).await;
        view_model.load(2).await;
        assert!(view_model.character().is_none());
        assert_eq!(view_model.error_message().as_deref(), Some(LOAD_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn state_is_loading_while_request_is_in_flight() {
        let (tx, rx) = oneshot::channel();
        let view_model = Arc::new(CharacterViewModel::new(GatedService {
            gates: Mutex::new(VecDeque::from([rx])),
        }));
        let mut states = view_model.subscribe();

        let task = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(1).await }
        });

        states.wait_for(|s| *s == LoadState::Loading).await.unwrap();
        assert!(view_model.is_loading());

        tx.send(Ok(rick())).unwrap();
        task.await.unwrap();
        assert_eq!(view_model.state(), LoadState::Loaded(rick()));
    }

    /// One gate per expected load, opened by the test through the senders.
    fn gated(count: usize) -> (Arc<CharacterViewModel<GatedService>>, Vec<Gate>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) = (0..count).map(|_| oneshot::channel()).unzip();
        let view_model = CharacterViewModel::new(GatedService {
            gates: Mutex::new(receivers),
        });
        (Arc::new(view_model), senders)
    }

    fn issued(view_model: &CharacterViewModel<GatedService>) -> u64 {
        view_model.board.tickets().issued
    }

    fn morty() -> Character {
        Character {
            id: 2,
            name: "Morty Smith".to_string(),
            ..rick()
        }
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_newer_load() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let view_model = Arc::new(CharacterViewModel::new(GatedService {
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
        }));

        let first = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(1).await }
        });
        let mut states = view_model.subscribe();
        states.wait_for(|s| *s == LoadState::Loading).await.unwrap();

        let second = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(2).await }
        });
        // Let the second load take its ticket before either completes.
        while issued(&view_model) < 2 {
            tokio::task::yield_now().await;
        }

        second_tx.send(Ok(morty())).unwrap();
        second.await.unwrap();

        first_tx.send(Err(ErrorKind::ServerError)).unwrap();
        first.await.unwrap();

        assert_eq!(view_model.state(), LoadState::Loaded(morty()));
    }

    #[tokio::test]
    async fn dropped_first_load_returns_to_idle() {
        let (view_model, _gates) = gated(1);
        let timed_out = tokio::time::timeout(Duration::from_millis(10), view_model.load(1)).await;
        assert!(timed_out.is_err());
        assert_eq!(view_model.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn dropped_load_restores_previous_outcome() {
        let (view_model, mut gates) = gated(2);
        gates.remove(0).send(Ok(rick())).unwrap();
        view_model.load(1).await;

        let timed_out = tokio::time::timeout(Duration::from_millis(10), view_model.load(2)).await;
        assert!(timed_out.is_err());
        assert_eq!(view_model.state(), LoadState::Loaded(rick()));
        assert!(!view_model.is_loading());
    }

    #[tokio::test]
    async fn dropping_newer_load_lets_older_load_publish() {
        let (view_model, mut gates) = gated(2);
        let first_tx = gates.remove(0);

        let first = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(1).await }
        });
        while issued(&view_model) < 1 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(2).await }
        });
        while issued(&view_model) < 2 {
            tokio::task::yield_now().await;
        }

        second.abort();
        assert!(second.await.unwrap_err().is_cancelled());
        // The first load is still running.
        assert_eq!(view_model.state(), LoadState::Loading);

        first_tx.send(Ok(rick())).unwrap();
        first.await.unwrap();
        assert_eq!(view_model.state(), LoadState::Loaded(rick()));
    }

    #[tokio::test]
    async fn outcome_parked_behind_dropped_load_is_published() {
        let (view_model, mut gates) = gated(2);
        let first_tx = gates.remove(0);

        let first = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(1).await }
        });
        while issued(&view_model) < 1 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let view_model = Arc::clone(&view_model);
            async move { view_model.load(2).await }
        });
        while issued(&view_model) < 2 {
            tokio::task::yield_now().await;
        }

        first_tx.send(Err(ErrorKind::NotFound)).unwrap();
        first.await.unwrap();
        assert_eq!(view_model.state(), LoadState::Loading);

        second.abort();
        assert!(second.await.unwrap_err().is_cancelled());
        assert_eq!(view_model.error_message().as_deref(), Some(LOAD_ERROR_MESSAGE));
    }

    #[test]
    fn load_state_accessors() {
        assert_eq!(LoadState::Loaded(rick()).character(), Some(&rick()));
        assert!(LoadState::Loaded(rick()).error_message().is_none());
        assert_eq!(LoadState::Failed("x".into()).error_message(), Some("x"));
        assert!(LoadState::Idle.character().is_none());
        assert!(LoadState::Loading.error_message().is_none());
    }
}
