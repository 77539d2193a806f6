//! Core service façade.
//!
//! [`CoreService`] is the single entry point view bindings talk to. It wires
//! the configured key-value store and HTTP transport into the favorites
//! repository, the catalog client and the search controller, and shares one
//! event bus between them.
//!
//! ```ignore
//! use core_runtime::config::{CatalogApiConfig, CoreConfig};
//! use core_service::CoreService;
//!
//! let config = CoreConfig::builder()
//!     .database_path("favorites.db")
//!     .catalog(CatalogApiConfig::new("tmdb-read-token"))
//!     .build()?;
//! let core = CoreService::new(config).await?;
//!
//! core.on_query_changed("avengers");
//! let liked = core.toggle_favorite(&item).await?;
//! ```

pub mod error;

pub use error::{
    CoreError, Result, FAVORITES_LOAD_FAILED_MESSAGE, FAVORITES_UPDATE_FAILED_MESSAGE,
};

pub use core_catalog::EffectiveQuery;
pub use core_library::{FavoritesCollection, MediaItem};
pub use core_runtime::events::{CoreEvent, EventStream, FavoritesEvent, SearchEvent};
pub use core_search::SearchState;

use core_catalog::{CatalogClient, TmdbClient};
use core_library::{FavoritesRepository, KeyValueFavoritesRepository};
use core_runtime::config::{CoreConfig, SearchConfig, DEFAULT_IMAGE_BASE_URL};
use core_runtime::events::EventBus;
use core_search::SearchController;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// View-facing API over favorites and search.
pub struct CoreService {
    events: EventBus,
    favorites: Arc<dyn FavoritesRepository>,
    search: SearchController,
    image_base_url: String,
}

impl CoreService {
    /// Build the service from `config` and load the trending listing.
    ///
    /// Must be awaited on the Tokio runtime that will run the service.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let store = config.open_key_value_store().await?;
        let events = EventBus::new(config.event_buffer_size);

        let favorites = KeyValueFavoritesRepository::new(store).with_event_bus(events.clone());
        let catalog = TmdbClient::new(Arc::clone(&config.http_client), config.catalog.clone())?;

        let service = Self::from_parts(
            Arc::new(favorites),
            Arc::new(catalog),
            config.search,
            events,
        )
        .with_image_base_url(config.catalog.image_base_url.clone());

        info!(
            debounce_ms = config.search.debounce_window.as_millis() as u64,
            language = %config.catalog.language,
            "Core service ready"
        );

        service.start();
        Ok(service)
    }

    /// Assemble the service from already-built components.
    ///
    /// Nothing is fetched until [`start`](Self::start) or the first
    /// [`on_query_changed`](Self::on_query_changed).
    pub fn from_parts(
        favorites: Arc<dyn FavoritesRepository>,
        catalog: Arc<dyn CatalogClient>,
        search: SearchConfig,
        events: EventBus,
    ) -> Self {
        let search = SearchController::with_event_bus(catalog, search, events.clone());
        Self {
            events,
            favorites,
            search,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// Issue the default trending request without waiting for input.
    pub fn start(&self) {
        self.search.start();
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub fn on_query_changed(&self, text: impl Into<String>) {
        self.search.on_query_changed(text);
    }

    pub fn current_search_state(&self) -> SearchState {
        self.search.current_search_state()
    }

    /// Receiver notified on every search state change
    pub fn watch_search(&self) -> watch::Receiver<SearchState> {
        self.search.watch()
    }

    /// Re-send the current query, typically after an error
    pub fn retry_search(&self) {
        self.search.retry();
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    pub async fn is_favorite(&self, id: i64) -> Result<bool> {
        Ok(self.favorites.is_favorite(id).await?)
    }

    /// Flip membership of `item` and return the new state.
    ///
    /// An error means nothing was saved; the view must keep showing the old
    /// membership.
    pub async fn toggle_favorite(&self, item: &MediaItem) -> Result<bool> {
        let member = self.favorites.toggle(item).await?;
        debug!(item_id = item.id, member, "Favorite toggled");
        Ok(member)
    }

    pub async fn list_favorites(&self) -> Result<FavoritesCollection> {
        Ok(self.favorites.list().await?)
    }

    // ------------------------------------------------------------------
    // Events and helpers
    // ------------------------------------------------------------------

    /// Stream of every favorites and search event
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Stream of favorites membership changes only
    pub fn subscribe_favorites(&self) -> EventStream {
        self.subscribe()
            .filter(|event| matches!(event, CoreEvent::Favorites(_)))
    }

    /// Full poster URL for `item`, if it has a poster
    pub fn poster_url(&self, item: &MediaItem) -> Option<String> {
        item.poster_url(&self.image_base_url)
    }
}
