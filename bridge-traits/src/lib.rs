//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host platform implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and
//! platform-specific implementations. Each trait represents a capability that
//! the core requires but that is implemented differently per platform
//! (desktop, iOS, Android, web).
//!
//! ## Traits
//!
//! - [`KeyValueStore`](storage::KeyValueStore) - Durable key-value storage for
//!   favorites and preferences, with typed JSON/string helpers in
//!   [`KeyValueStoreExt`](storage::KeyValueStoreExt)
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport for the catalog
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ In Progress |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Storage
//! implementations report medium failures as `StorageWrite` and undecodable
//! entries as `StorageRead`; they never hand back raw bytes in place of the
//! shape a caller asked for.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{
    KeyValueStore, KeyValueStoreExt, MemoryKeyValueStore, StoredEntry, StoredValue, ValueKind,
};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
