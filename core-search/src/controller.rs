//! Async driver for the search pipeline
//!
//! [`SearchController`] owns a [`QueryDebouncer`] and turns its decisions
//! into tokio timers and catalog calls:
//!
//! - every keystroke cancels the armed timer and spawns a new one
//! - a fired timer issues exactly one request, spawned on its own task
//! - responses are gated by sequence number before touching [`SearchState`]
//!
//! State changes are published on a `watch` channel; request lifecycle
//! events go to the [`EventBus`] when one is attached.

use crate::debouncer::{DebouncePoll, IssuedRequest, Phase, QueryDebouncer, Resolution};
use crate::error::SearchError;
use crate::state::SearchState;
use bridge_traits::time::{Clock, SystemClock};
use core_catalog::CatalogClient;
use core_library::MediaItem;
use core_runtime::config::SearchConfig;
use core_runtime::events::{CoreEvent, EventBus, SearchEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::watch;
use tokio::time::sleep_until;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Inner {
    catalog: Arc<dyn CatalogClient>,
    clock: Arc<dyn Clock>,
    debouncer: Mutex<QueryDebouncer>,
    state: watch::Sender<SearchState>,
    events: Option<EventBus>,
    timer: Mutex<Option<CancellationToken>>,
    shutdown: CancellationToken,
}

/// Debounced, sequence-gated search session.
///
/// Methods that schedule work spawn onto the current Tokio runtime and must
/// be called from within one. Dropping the controller cancels armed timers;
/// requests already in flight still resolve but nothing observes them.
pub struct SearchController {
    inner: Arc<Inner>,
}

impl SearchController {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: SearchConfig) -> Self {
        Self::with_parts(catalog, config, None, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new), publishing [`SearchEvent`]s on `events`.
    pub fn with_event_bus(
        catalog: Arc<dyn CatalogClient>,
        config: SearchConfig,
        events: EventBus,
    ) -> Self {
        Self::with_parts(catalog, config, Some(events), Arc::new(SystemClock))
    }

    /// Full constructor.
    ///
    /// `clock` must advance together with Tokio's timers, see [`Clock`].
    pub fn with_parts(
        catalog: Arc<dyn CatalogClient>,
        config: SearchConfig,
        events: Option<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                catalog,
                clock,
                debouncer: Mutex::new(QueryDebouncer::new(
                    config.debounce_window,
                    config.trim_queries,
                )),
                state,
                events,
                timer: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Load the default listing right away, without a debounce.
    pub fn start(&self) {
        info!("Search session started");
        self.issue_now();
    }

    /// Re-send the current query immediately.
    pub fn retry(&self) {
        debug!("Retrying search");
        self.issue_now();
    }

    /// Record new query text and re-arm the debounce timer.
    pub fn on_query_changed(&self, text: impl Into<String>) {
        let text = text.into();
        let deadline = {
            let mut debouncer = lock(&self.inner.debouncer);
            let deadline = debouncer.query_changed(&text, self.inner.clock.instant());
            self.inner.state.send_modify(|state| state.query = text);
            deadline
        };

        let token = self.inner.shutdown.child_token();
        if let Some(previous) = lock(&self.inner.timer).replace(token.clone()) {
            previous.cancel();
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run_timer(token, deadline).await });
    }

    /// Snapshot of the current state
    pub fn current_search_state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn watch(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn phase(&self) -> Phase {
        lock(&self.inner.debouncer).phase()
    }

    fn issue_now(&self) {
        let request = {
            let mut debouncer = lock(&self.inner.debouncer);
            let request = debouncer.issue_now();
            self.inner.mark_issued(&request);
            request
        };

        if let Some(timer) = lock(&self.inner.timer).take() {
            timer.cancel();
        }

        self.inner.dispatch(request);
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

impl Inner {
    /// Sleep until the debouncer agrees the window has elapsed, then fire.
    async fn run_timer(self: Arc<Self>, token: CancellationToken, mut deadline: Instant) {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!("Debounce timer superseded");
                    return;
                }
                _ = sleep_until(deadline.into()) => {}
            }

            let request = {
                let mut debouncer = lock(&self.debouncer);
                match debouncer.poll(self.clock.instant()) {
                    DebouncePoll::Fire(request) => {
                        self.mark_issued(&request);
                        request
                    }
                    DebouncePoll::Wait(next) => {
                        deadline = next;
                        continue;
                    }
                    DebouncePoll::Idle => return,
                }
            };

            self.dispatch(request);
            return;
        }
    }

    /// Publish a newly issued request. Caller holds the debouncer lock.
    fn mark_issued(&self, request: &IssuedRequest) {
        self.state.send_modify(|state| {
            state.seq = request.seq;
            state.loading = true;
            state.error = None;
        });

        info!(seq = request.seq, query = %request.query, "Search request issued");
        self.emit(SearchEvent::RequestIssued {
            seq: request.seq,
            query: request.query.term().map(str::to_string),
        });
    }

    fn dispatch(self: &Arc<Self>, request: IssuedRequest) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.catalog.search(&request.query).await;
            inner.complete(request.seq, result.map_err(SearchError::from));
        });
    }

    fn complete(&self, seq: u64, result: Result<Vec<MediaItem>, SearchError>) {
        let mut debouncer = lock(&self.debouncer);

        if debouncer.resolve(seq) == Resolution::Stale {
            warn!(
                seq,
                latest = debouncer.latest_seq(),
                "Discarding stale search response"
            );
            self.emit(SearchEvent::StaleDiscarded { seq });
            return;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.state.send_modify(|state| {
                    state.results = items;
                    state.error = None;
                    state.loading = false;
                });
                info!(seq, count, "Search results applied");
                self.emit(SearchEvent::ResultsApplied { seq, count });
            }
            Err(e) => {
                warn!(seq, error = %e, "Search request failed");
                self.state.send_modify(|state| {
                    state.results.clear();
                    state.error = Some(e.user_message().to_string());
                    state.loading = false;
                });
                self.emit(SearchEvent::Failed {
                    seq,
                    message: e.user_message().to_string(),
                });
            }
        }
    }

    fn emit(&self, event: SearchEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.emit(CoreEvent::Search(event));
        }
    }
}
