//! # Event Bus System
//!
//! Provides an event-driven architecture for the core using `tokio::sync::broadcast`.
//! Views subscribe here instead of re-reading storage on their own schedule.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for favorites and search
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   emit    ┌───────────┐
//! │ Favorites Repo   ├──────────>│           │   subscribe   ┌────────────┐
//! └──────────────────┘           │ EventBus  ├──────────────>│ Favorites  │
//!                                │ (broadcast│               │ screen     │
//! ┌──────────────────┐   emit    │  channel) │   subscribe   ┌────────────┐
//! │ Search Controller├──────────>│           ├──────────────>│ Home screen│
//! └──────────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, FavoritesEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Favorites(FavoritesEvent::Removed { item_id: 42 }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Favorites(_)));
//! # }
//! ```
//!
//! ## Event Types
//!
//! ### Favorites Events
//! - `Added`: An item joined the favorites collection
//! - `Removed`: An item left the favorites collection
//!
//! Both are emitted only after the collection was written successfully.
//!
//! ### Search Events
//! - `RequestIssued`: The debounce window elapsed and a catalog request went out
//! - `ResultsApplied`: The latest request resolved and its results are displayed
//! - `StaleDiscarded`: A superseded request resolved and was ignored
//! - `Failed`: The latest request failed; the state now carries an error
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published and received through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Favorites membership changes
    Favorites(FavoritesEvent),
    /// Search pipeline progress
    Search(SearchEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Favorites(e) => e.description(),
            CoreEvent::Search(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Search(SearchEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Search(SearchEvent::StaleDiscarded { .. }) => EventSeverity::Debug,
            CoreEvent::Search(SearchEvent::RequestIssued { .. }) => EventSeverity::Debug,
            _ => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Favorites Events
// ============================================================================

/// Events related to the favorites collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum FavoritesEvent {
    /// Item appended to the collection.
    Added {
        /// Catalog identifier of the item.
        item_id: i64,
        /// Title, for hosts that show a confirmation.
        title: String,
    },
    /// Item removed from the collection.
    Removed {
        /// Catalog identifier of the item.
        item_id: i64,
    },
}

impl FavoritesEvent {
    fn description(&self) -> &str {
        match self {
            FavoritesEvent::Added { .. } => "Added to favorites",
            FavoritesEvent::Removed { .. } => "Removed from favorites",
        }
    }

    /// Identifier of the item whose membership changed.
    pub fn item_id(&self) -> i64 {
        match self {
            FavoritesEvent::Added { item_id, .. } | FavoritesEvent::Removed { item_id } => {
                *item_id
            }
        }
    }
}

// ============================================================================
// Search Events
// ============================================================================

/// Events related to the debounced search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SearchEvent {
    /// A catalog request was issued.
    RequestIssued {
        /// Sequence number of the request.
        seq: u64,
        /// Search term, or `None` for the trending listing.
        query: Option<String>,
    },
    /// The latest request resolved and its results were applied.
    ResultsApplied {
        seq: u64,
        /// Number of items now displayed.
        count: usize,
    },
    /// A superseded request resolved; its outcome was dropped.
    StaleDiscarded { seq: u64 },
    /// The latest request failed.
    Failed {
        seq: u64,
        /// User-facing message now carried by the search state.
        message: String,
    },
}

impl SearchEvent {
    fn description(&self) -> &str {
        match self {
            SearchEvent::RequestIssued { .. } => "Search request issued",
            SearchEvent::ResultsApplied { .. } => "Search results applied",
            SearchEvent::StaleDiscarded { .. } => "Stale search response discarded",
            SearchEvent::Failed { .. } => "Search request failed",
        }
    }

    /// Sequence number the event refers to.
    pub fn seq(&self) -> u64 {
        match self {
            SearchEvent::RequestIssued { seq, .. }
            | SearchEvent::ResultsApplied { seq, .. }
            | SearchEvent::StaleDiscarded { seq }
            | SearchEvent::Failed { seq, .. } => *seq,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for broadcasting events to multiple subscribers.
///
/// Cloning the bus is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let favorites_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Favorites(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
