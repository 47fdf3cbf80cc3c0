//! Generic async data loader for protected views.
//!
//! DESIGN
//! ======
//! A `ViewDataLoader<T>` wraps one fetch operation and a fallback value and
//! exposes exactly one `LoadState<T>` at a time:
//!
//! ```text
//!   Idle ──start──▶ Loading ──ok──▶ Loaded(v)
//!                      │
//!                      └──err──▶ Failed(e)     (view shows the fallback)
//!
//!   Loaded / Failed ──start──▶ Loading         (manual refresh)
//! ```
//!
//! State is published through a `tokio::sync::watch` channel so views can
//! subscribe; `view()` collapses it to "indicator" or "ready value" so a view
//! never sees anything partial.
//!
//! ORDERING
//! ========
//! Every `start` takes a generation ticket. `finish` only applies a result
//! whose ticket is still current, so when refreshes overlap the newest
//! request wins even if an older response arrives later. Superseded fetches
//! are not cancelled; their results are dropped.
//!
//! There is no timeout here. A fetch that never resolves leaves the loader in
//! `Loading`; the HTTP client's request timeout bounds real network calls.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::net::api::ApiError;

// =============================================================================
// FAILURE
// =============================================================================

/// Why a fetch did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchFailure {
    message: String,
    status: Option<u16>,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True when the server refused the session's token.
    #[must_use]
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

impl From<ApiError> for FetchFailure {
    fn from(e: ApiError) -> Self {
        let status = match &e {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        };
        Self { message: e.to_string(), status }
    }
}

// =============================================================================
// STATES
// =============================================================================

/// Lifecycle of one view's data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(FetchFailure),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// `Loaded` and `Failed` end an invocation; only a new `start` leaves them.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }
}

/// What a view renders: a loading indicator or a complete value.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
}

/// Proof of which `start` a result belongs to. Consumed by `finish`, so one
/// `start` yields at most one result.
///
/// ```compile_fail
/// # use admin_console::state::loader::{FetchFailure, ViewDataLoader};
/// let loader = ViewDataLoader::new("doc", 0u32, || async { Ok::<u32, FetchFailure>(1) });
/// let ticket = loader.start();
/// loader.finish(ticket, Ok(1));
/// loader.finish(ticket, Ok(2));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

// =============================================================================
// LOADER
// =============================================================================

type FetchFn<T> = dyn Fn() -> BoxFuture<'static, Result<T, FetchFailure>> + Send + Sync;

struct Shared<T> {
    name: &'static str,
    fetch: Box<FetchFn<T>>,
    fallback: T,
    generation: Mutex<u64>,
    state: watch::Sender<LoadState<T>>,
}

/// Async-fetch state machine. Clones share the same state.
pub struct ViewDataLoader<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ViewDataLoader<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T> ViewDataLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle loader. `name` labels log lines for this view.
    pub fn new<F, Fut>(name: &'static str, fallback: T, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchFailure>> + Send + 'static,
    {
        let (state, _) = watch::channel(LoadState::Idle);
        let fetch: Box<FetchFn<T>> =
            Box::new(move || -> BoxFuture<'static, Result<T, FetchFailure>> { Box::pin(fetch()) });
        Self { shared: Arc::new(Shared { name, fetch, fallback, generation: Mutex::new(0), state }) }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoadState<T> {
        self.shared.state.borrow().clone()
    }

    /// Receive every state change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn fallback(&self) -> &T {
        &self.shared.fallback
    }

    /// Enter `Loading` from any state and return the ticket for the result.
    pub fn start(&self) -> LoadTicket {
        let mut generation = self.shared.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.shared.state.send_replace(LoadState::Loading);
        debug!(view = self.shared.name, generation = *generation, "load started");
        LoadTicket(*generation)
    }

    /// Apply a fetch result. Returns `false` if `ticket` was superseded by a
    /// later `start` or its load already ended, in which case the result is
    /// dropped.
    pub fn finish(&self, ticket: LoadTicket, result: Result<T, FetchFailure>) -> bool {
        let generation = self.shared.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *generation != ticket.0 {
            debug!(
                view = self.shared.name,
                ticket = ticket.0,
                current = *generation,
                "discarding superseded load result"
            );
            return false;
        }
        if !self.shared.state.borrow().is_loading() {
            debug!(view = self.shared.name, ticket = ticket.0, "discarding result for a finished load");
            return false;
        }

        let next = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(failure) => {
                warn!(view = self.shared.name, error = %failure, "load failed; showing fallback");
                LoadState::Failed(failure)
            }
        };
        self.shared.state.send_replace(next);
        true
    }

    /// Run one fetch: `start`, await the fetch, `finish`. Returns the state
    /// after this call, which may belong to a newer load if this one was
    /// superseded.
    pub async fn load(&self) -> LoadState<T> {
        let ticket = self.start();
        let result = (self.shared.fetch)().await;
        self.finish(ticket, result);
        self.state()
    }

    /// Collapse the state for rendering. `Failed` renders the fallback.
    #[must_use]
    pub fn view(&self) -> ViewState<T> {
        match &*self.shared.state.borrow() {
            LoadState::Idle | LoadState::Loading => ViewState::Loading,
            LoadState::Loaded(value) => ViewState::Ready(value.clone()),
            LoadState::Failed(_) => ViewState::Ready(self.shared.fallback.clone()),
        }
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
