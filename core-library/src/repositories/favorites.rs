//! Favorites repository trait and implementation

use crate::error::{FavoritesError, Result};
use crate::models::{FavoritesCollection, MediaItem};
use async_trait::async_trait;
use bridge_traits::storage::{KeyValueStore, KeyValueStoreExt};
use core_runtime::events::{CoreEvent, EventBus, FavoritesEvent};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Well-known key under which the favorites collection is stored.
pub const FAVORITES_KEY: &str = "favoriteMovies";

/// Favorites repository interface
///
/// Every mutation returns the item's membership after the call. A mutation
/// that returns an error has changed nothing.
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Current collection; empty if it was never created
    ///
    /// # Errors
    /// Returns [`FavoritesError::Unavailable`] if the stored collection
    /// cannot be read or decoded.
    async fn list(&self) -> Result<FavoritesCollection>;

    /// Whether an item with `id` is in the collection
    async fn is_favorite(&self, id: i64) -> Result<bool> {
        Ok(self.list().await?.contains(id))
    }

    /// Append `item` if its id is not present yet
    ///
    /// # Returns
    /// Always `Ok(true)`; adding an existing id is a no-op.
    async fn add(&self, item: &MediaItem) -> Result<bool>;

    /// Remove the item with `id` if present
    ///
    /// # Returns
    /// Always `Ok(false)`; removing an absent id is a no-op.
    async fn remove(&self, id: i64) -> Result<bool>;

    /// Flip membership of `item` and return the new state
    async fn toggle(&self, item: &MediaItem) -> Result<bool>;
}

/// [`FavoritesRepository`] backed by a [`KeyValueStore`]
///
/// The whole collection lives under one key as a JSON array. Mutations are
/// read-modify-write cycles over that array and are serialized through a
/// per-repository mutex, so a second toggle always observes the write of the
/// first. Share one instance (behind an `Arc`) across every view.
pub struct KeyValueFavoritesRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    mutation_lock: Mutex<()>,
    events: Option<EventBus>,
}

impl KeyValueFavoritesRepository {
    /// Create a repository over `store` using [`FAVORITES_KEY`]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, FAVORITES_KEY)
    }

    /// Create a repository storing its collection under a custom key
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            mutation_lock: Mutex::new(()),
            events: None,
        }
    }

    /// Publish membership changes on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<FavoritesCollection> {
        let collection = self
            .store
            .get_json::<FavoritesCollection>(&self.key)
            .await
            .map_err(|e| {
                warn!(key = %self.key, error = %e, "Failed to load favorites");
                FavoritesError::Unavailable(e)
            })?;

        Ok(collection.unwrap_or_default())
    }

    async fn persist(&self, collection: &FavoritesCollection) -> Result<()> {
        self.store
            .set_json(&self.key, collection)
            .await
            .map_err(|e| {
                warn!(key = %self.key, error = %e, "Failed to persist favorites");
                FavoritesError::PersistFailed(e)
            })?;

        debug!(key = %self.key, count = collection.len(), "Persisted favorites");
        Ok(())
    }

    fn emit(&self, event: FavoritesEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is not an error
            let _ = bus.emit(CoreEvent::Favorites(event));
        }
    }

    /// Insert under the mutation lock; caller holds the guard.
    async fn insert_locked(&self, mut collection: FavoritesCollection, item: &MediaItem) -> Result<bool> {
        if !collection.insert(item.clone()) {
            debug!(item_id = item.id, "Already a favorite");
            return Ok(true);
        }

        self.persist(&collection).await?;
        info!(item_id = item.id, count = collection.len(), "Added to favorites");
        self.emit(FavoritesEvent::Added {
            item_id: item.id,
            title: item.title.clone(),
        });
        Ok(true)
    }

    /// Remove under the mutation lock; caller holds the guard.
    async fn remove_locked(&self, mut collection: FavoritesCollection, id: i64) -> Result<bool> {
        if !collection.remove(id) {
            debug!(item_id = id, "Not a favorite");
            return Ok(false);
        }

        self.persist(&collection).await?;
        info!(item_id = id, count = collection.len(), "Removed from favorites");
        self.emit(FavoritesEvent::Removed { item_id: id });
        Ok(false)
    }
}

#[async_trait]
impl FavoritesRepository for KeyValueFavoritesRepository {
    async fn list(&self) -> Result<FavoritesCollection> {
        self.load().await
    }

    async fn add(&self, item: &MediaItem) -> Result<bool> {
        let _guard = self.mutation_lock.lock().await;
        let collection = self.load().await?;
        self.insert_locked(collection, item).await
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let _guard = self.mutation_lock.lock().await;
        let collection = self.load().await?;
        self.remove_locked(collection, id).await
    }

    async fn toggle(&self, item: &MediaItem) -> Result<bool> {
        let _guard = self.mutation_lock.lock().await;
        let collection = self.load().await?;

        if collection.contains(item.id) {
            self.remove_locked(collection, item.id).await
        } else {
            self.insert_locked(collection, item).await
        }
    }
}
