//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `KeyValueStore` using a SQLite-backed table ([`SqliteKeyValueStore`])
//! - `HttpClient` using `reqwest` with retry and backoff ([`ReqwestHttpClient`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteKeyValueStore};
//! use bridge_traits::KeyValueStoreExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SqliteKeyValueStore::new("/tmp/mnc/store.db".into()).await.unwrap();
//!     store.set_string("theme", "dark").await.unwrap();
//!
//!     let http_client = ReqwestHttpClient::new().unwrap();
//!     // Hand both to CoreConfig
//! }
//! ```

mod http;
mod kv_store;

pub use http::ReqwestHttpClient;
pub use kv_store::SqliteKeyValueStore;
