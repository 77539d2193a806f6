//! # Catalog Client
//!
//! The boundary between the search pipeline and the remote media catalog.
//!
//! - [`CatalogClient`] - one async `search` call per effective query
//! - [`EffectiveQuery`] - trending sentinel or literal search term
//! - [`TmdbClient`] - implementation over the host [`HttpClient`](bridge_traits::HttpClient)

pub mod error;
pub mod query;
pub mod tmdb;

pub use error::{CatalogError, Result};
pub use query::EffectiveQuery;
pub use tmdb::TmdbClient;

use async_trait::async_trait;
use core_library::MediaItem;

/// Fetches media items for an effective query.
///
/// Implementations may complete calls out of order; callers gate results
/// themselves.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, query: &EffectiveQuery) -> Result<Vec<MediaItem>>;
}
