//! # Search Query Controller
//!
//! Turns a stream of typed query text into catalog requests:
//!
//! - keystrokes are debounced over a quiescence window (1000 ms by default)
//! - each elapsed window issues exactly one request with a new sequence number
//! - only the response for the latest sequence number reaches [`SearchState`]
//!
//! [`QueryDebouncer`] is the clock-free state machine;
//! [`SearchController`] drives it on the Tokio runtime.

pub mod controller;
pub mod debouncer;
pub mod error;
pub mod state;

pub use controller::SearchController;
pub use debouncer::{DebouncePoll, IssuedRequest, Phase, QueryDebouncer, Resolution};
pub use error::{Result, SearchError, SEARCH_FAILED_MESSAGE};
pub use state::SearchState;
