//! Timing and ordering scenarios for the search controller.
//!
//! All tests run on a paused Tokio clock; sleeps advance virtual time only.

use async_trait::async_trait;
use core_catalog::{CatalogClient, CatalogError, EffectiveQuery};
use core_library::MediaItem;
use core_runtime::config::SearchConfig;
use core_runtime::events::{CoreEvent, EventBus, SearchEvent};
use core_search::SearchController;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

type Reply = core_catalog::Result<Vec<MediaItem>>;

/// Records every call; answers gated queries only when the test says so.
#[derive(Default)]
struct GatedCatalog {
    calls: Mutex<Vec<(EffectiveQuery, Instant)>>,
    gates: Mutex<HashMap<EffectiveQuery, oneshot::Receiver<Reply>>>,
}

impl GatedCatalog {
    fn gate(&self, query: EffectiveQuery) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query, rx);
        tx
    }

    fn calls(&self) -> Vec<(EffectiveQuery, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for GatedCatalog {
    async fn search(&self, query: &EffectiveQuery) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((query.clone(), Instant::now()));

        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::Config("gate dropped".to_string()))),
            None => Ok(Vec::new()),
        }
    }
}

fn search(term: &str) -> EffectiveQuery {
    EffectiveQuery::Search(term.to_string())
}

fn titled(title: &str, ids: &[i64]) -> Vec<MediaItem> {
    ids.iter()
        .map(|id| MediaItem::new(*id, format!("{} {}", title, id)))
        .collect()
}

fn drain(events: &mut tokio::sync::broadcast::Receiver<CoreEvent>) -> Vec<SearchEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let CoreEvent::Search(event) = event {
            out.push(event);
        }
    }
    out
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_issues_one_request_after_window() {
    let catalog = Arc::new(GatedCatalog::default());
    let controller = SearchController::new(catalog.clone(), SearchConfig::default());

    let t0 = Instant::now();
    for (i, text) in ["a", "av", "ave", "avengers"].into_iter().enumerate() {
        if i > 0 {
            sleep(Duration::from_millis(100)).await;
        }
        controller.on_query_changed(text);
    }

    sleep(Duration::from_millis(999)).await;
    assert!(catalog.calls().is_empty());

    sleep(Duration::from_secs(3)).await;

    let calls = catalog.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, search("avengers"));
    assert!(calls[0].1.duration_since(t0) >= Duration::from_millis(1300));
    assert_eq!(controller.current_search_state().seq, 1);
}

#[tokio::test(start_paused = true)]
async fn test_late_response_to_older_request_is_discarded() {
    let catalog = Arc::new(GatedCatalog::default());
    let foo = catalog.gate(search("foo"));
    let bar = catalog.gate(search("bar"));

    let bus = EventBus::new(32);
    let mut events = bus.subscribe();
    let controller =
        SearchController::with_event_bus(catalog.clone(), SearchConfig::default(), bus);

    controller.on_query_changed("foo");
    sleep(Duration::from_millis(1100)).await;
    controller.on_query_changed("bar");
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(catalog.calls().len(), 2);

    bar.send(Ok(titled("bar", &[2]))).unwrap();
    sleep(Duration::from_millis(1)).await;
    foo.send(Ok(titled("foo", &[1]))).unwrap();
    sleep(Duration::from_millis(1)).await;

    let state = controller.current_search_state();
    assert_eq!(state.query, "bar");
    assert_eq!(state.seq, 2);
    assert_eq!(state.results, titled("bar", &[2]));
    assert!(!state.loading);

    assert_eq!(
        drain(&mut events),
        vec![
            SearchEvent::RequestIssued {
                seq: 1,
                query: Some("foo".to_string())
            },
            SearchEvent::RequestIssued {
                seq: 2,
                query: Some("bar".to_string())
            },
            SearchEvent::ResultsApplied { seq: 2, count: 1 },
            SearchEvent::StaleDiscarded { seq: 1 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_does_not_set_error() {
    let catalog = Arc::new(GatedCatalog::default());
    let foo = catalog.gate(search("foo"));
    let bar = catalog.gate(search("bar"));
    let controller = SearchController::new(catalog.clone(), SearchConfig::default());

    controller.on_query_changed("foo");
    sleep(Duration::from_millis(1100)).await;
    controller.on_query_changed("bar");
    sleep(Duration::from_millis(1100)).await;

    bar.send(Ok(titled("bar", &[2, 3]))).unwrap();
    sleep(Duration::from_millis(1)).await;
    foo.send(Err(CatalogError::Http {
        status: 500,
        body: String::new(),
    }))
    .unwrap();
    sleep(Duration::from_millis(1)).await;

    let state = controller.current_search_state();
    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_result_applies_while_next_keystroke_is_pending() {
    let catalog = Arc::new(GatedCatalog::default());
    let foo = catalog.gate(search("foo"));
    let controller = SearchController::new(catalog.clone(), SearchConfig::default());

    controller.on_query_changed("foo");
    sleep(Duration::from_millis(1100)).await;

    controller.on_query_changed("foob");
    foo.send(Ok(titled("foo", &[1]))).unwrap();
    sleep(Duration::from_millis(1)).await;

    // No newer request exists yet, so seq 1 is still the latest
    let state = controller.current_search_state();
    assert_eq!(state.results, titled("foo", &[1]));
    assert_eq!(state.query, "foob");

    sleep(Duration::from_secs(2)).await;
    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0, search("foob"));
    assert_eq!(controller.current_search_state().seq, 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_window_and_untrimmed_terms() {
    let catalog = Arc::new(GatedCatalog::default());
    let config = SearchConfig::default()
        .with_debounce_window(Duration::from_millis(250))
        .with_trim_queries(false);
    let controller = SearchController::new(catalog.clone(), config);

    let t0 = Instant::now();
    controller.on_query_changed(" heat ");
    sleep(Duration::from_millis(300)).await;

    let calls = catalog.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, search(" heat "));
    assert_eq!(calls[0].1.duration_since(t0), Duration::from_millis(250));
}
