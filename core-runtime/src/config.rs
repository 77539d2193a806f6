//! # Core Configuration Module
//!
//! Provides configuration management for the movie night core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary dependencies and settings for the core
//! library. It enforces fail-fast validation so a misconfigured host learns
//! about it at startup rather than on the first search.
//!
//! ## Dependencies
//!
//! - `KeyValueStore` - Required for the favorites collection
//! - `HttpClient` - Required for the catalog client
//!
//! When the `desktop-shims` feature is enabled, `SqliteKeyValueStore` (opened
//! at `database_path`) and `ReqwestHttpClient` are used for whichever of the
//! two was not injected.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CatalogApiConfig, CoreConfig};
//!
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/store.db")
//!     .catalog(CatalogApiConfig::new("tmdb-read-token"))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! Without an explicit `.catalog(...)` the builder falls back to
//! [`CatalogApiConfig::from_env`], which reads `TMDB_API_TOKEN`.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::redact_if_sensitive;
use bridge_traits::{HttpClient, KeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the catalog bearer token.
pub const CATALOG_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Default catalog API root.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default language requested from the catalog.
pub const DEFAULT_CATALOG_LANGUAGE: &str = "it-IT";

/// Default prefix for poster paths.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default quiescence window before a search request is issued.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Longest accepted quiescence window.
pub const MAX_DEBOUNCE_WINDOW: Duration = Duration::from_secs(10);

/// Core configuration.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Path to the SQLite file backing the default key-value store
    pub database_path: PathBuf,

    /// Injected key-value store; `None` means "open the desktop default"
    pub key_value_store: Option<Arc<dyn KeyValueStore>>,

    /// HTTP transport for the catalog client
    pub http_client: Arc<dyn HttpClient>,

    /// Remote catalog settings
    pub catalog: CatalogApiConfig,

    /// Search pipeline tuning
    pub search: SearchConfig,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database_path", &self.database_path)
            .field(
                "key_value_store",
                &self
                    .key_value_store
                    .as_ref()
                    .map(|_| "KeyValueStore { ... }"),
            )
            .field("http_client", &"HttpClient { ... }")
            .field("catalog", &self.catalog)
            .field("search", &self.search)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Remote catalog configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct CatalogApiConfig {
    /// Bearer token sent with every catalog request
    pub api_token: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// `language` query parameter (e.g. `it-IT`)
    pub language: String,
    /// Prefix joined with a poster path to form an image URL
    pub image_base_url: String,
}

impl CatalogApiConfig {
    /// Configuration with the given token and default endpoints.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            language: DEFAULT_CATALOG_LANGUAGE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    /// Reads the token from `TMDB_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the token through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(CATALOG_TOKEN_ENV) {
            Some(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(Error::Config(format!(
                "Catalog API token is required. Use .catalog() or set {}.",
                CATALOG_TOKEN_ENV
            ))),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::Config("Catalog API token cannot be empty".to_string()));
        }

        if !is_http_url(&self.base_url) {
            return Err(Error::Config(format!(
                "Catalog base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if !is_http_url(&self.image_base_url) {
            return Err(Error::Config(format!(
                "Image base URL must start with http:// or https://, got '{}'",
                self.image_base_url
            )));
        }

        if self.language.trim().is_empty() {
            return Err(Error::Config("Catalog language cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("api_token", &redact_if_sensitive("api_token", &self.api_token))
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("image_base_url", &self.image_base_url)
            .finish()
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Search pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Inactivity required after the last keystroke before a request goes out
    pub debounce_window: Duration,
    /// Trim surrounding whitespace before sending a search term
    pub trim_queries: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            trim_queries: true,
        }
    }
}

impl SearchConfig {
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_trim_queries(mut self, trim: bool) -> Self {
        self.trim_queries = trim;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.debounce_window.is_zero() {
            return Err(Error::Config(
                "Debounce window must be greater than 0ms".to_string(),
            ));
        }

        if self.debounce_window > MAX_DEBOUNCE_WINDOW {
            return Err(Error::Config(format!(
                "Debounce window exceeds maximum of {} seconds",
                MAX_DEBOUNCE_WINDOW.as_secs()
            )));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Event buffer holds at least one event
    /// - Catalog and search settings are valid
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        self.catalog.validate()?;
        self.search.validate()?;

        Ok(())
    }

    /// Returns the injected key-value store, or opens the desktop default.
    ///
    /// Opening is deferred to this async call so the SQLite pool lives on the
    /// caller's runtime.
    pub async fn open_key_value_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        match &self.key_value_store {
            Some(store) => Ok(Arc::clone(store)),
            None => open_default_key_value_store(&self.database_path).await,
        }
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn key_value_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "KeyValueStore implementation is required to persist favorites. \
                 Desktop: enable the 'desktop-shims' feature to use the default SqliteKeyValueStore. \
                 Mobile: inject platform-native storage (UserDefaults/DataStore)."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the catalog. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Mobile: inject the platform HTTP stack (URLSession/OkHttp)."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
async fn open_default_key_value_store(
    database_path: &std::path::Path,
) -> Result<Arc<dyn KeyValueStore>> {
    use bridge_desktop::SqliteKeyValueStore;

    let store = SqliteKeyValueStore::new(database_path.to_path_buf()).await?;
    tracing::debug!(
        db = %crate::logging::strip_path(&database_path.to_string_lossy()),
        "Opened default key-value store"
    );
    Ok(Arc::new(store))
}

#[cfg(not(feature = "desktop-shims"))]
async fn open_default_key_value_store(
    _database_path: &std::path::Path,
) -> Result<Arc<dyn KeyValueStore>> {
    Err(key_value_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn ensure_key_value_store(_store: &Option<Arc<dyn KeyValueStore>>) -> Result<()> {
    Ok(())
}

#[cfg(not(feature = "desktop-shims"))]
fn ensure_key_value_store(store: &Option<Arc<dyn KeyValueStore>>) -> Result<()> {
    match store {
        Some(_) => Ok(()),
        None => Err(key_value_store_missing_error()),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    http_client: Option<Arc<dyn HttpClient>>,
    catalog: Option<CatalogApiConfig>,
    search: SearchConfig,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/path/to/store.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Injects a key-value store instead of the desktop default.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Injects an HTTP client instead of the desktop default.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn catalog(mut self, config: CatalogApiConfig) -> Self {
        self.catalog = Some(config);
        self
    }

    pub fn search(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    /// Shorthand for adjusting only the search debounce window.
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.search.debounce_window = window;
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - the database path is missing or empty
    /// - a required bridge is missing and no desktop default is compiled in
    /// - no catalog token was given and `TMDB_API_TOKEN` is unset
    /// - a value fails validation
    pub fn build(self) -> Result<CoreConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config("Database path is required. Use .database_path() to set it.".to_string())
        })?;

        ensure_key_value_store(&self.key_value_store)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => CatalogApiConfig::from_env()?,
        };

        let config = CoreConfig {
            database_path,
            key_value_store: self.key_value_store,
            http_client,
            catalog,
            search: self.search,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpRequest, HttpResponse, MemoryKeyValueStore};

    struct StubHttpClient;

    #[async_trait]
    impl HttpClient for StubHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                headers: Default::default(),
                body: Default::default(),
            })
        }
    }

    fn injected_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .database_path("/db/store.db")
            .key_value_store(Arc::new(MemoryKeyValueStore::new()))
            .http_client(Arc::new(StubHttpClient))
            .catalog(CatalogApiConfig::new("token"))
    }

    #[test]
    fn test_builder_requires_database_path() {
        let result = CoreConfig::builder()
            .key_value_store(Arc::new(MemoryKeyValueStore::new()))
            .http_client(Arc::new(StubHttpClient))
            .catalog(CatalogApiConfig::new("token"))
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Database path is required"));
    }

    #[test]
    fn test_builder_with_injected_bridges() {
        let config = injected_builder().build().unwrap();

        assert_eq!(config.database_path, PathBuf::from("/db/store.db"));
        assert!(config.key_value_store.is_some());
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert_eq!(config.search.debounce_window, Duration::from_millis(1000));
        assert!(config.search.trim_queries);
        assert_eq!(config.catalog.language, "it-IT");
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_key_value_store() {
        let result = CoreConfig::builder()
            .database_path("/db/store.db")
            .http_client(Arc::new(StubHttpClient))
            .catalog(CatalogApiConfig::new("token"))
            .build();

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("KeyValueStore"));
        assert!(err_msg.contains("favorites"));
    }

    #[test]
    fn test_validate_rejects_empty_database_path() {
        let result = injected_builder().database_path("").build();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Database path cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_zero_event_buffer() {
        let result = injected_builder().event_buffer_size(0).build();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be greater than 0"));
    }

    #[test]
    fn test_validate_debounce_window_bounds() {
        let zero = injected_builder().debounce_window(Duration::ZERO).build();
        assert!(zero.unwrap_err().to_string().contains("greater than 0ms"));

        let long = injected_builder()
            .debounce_window(Duration::from_secs(11))
            .build();
        assert!(long.unwrap_err().to_string().contains("exceeds maximum"));

        let custom = injected_builder()
            .search(SearchConfig::default().with_debounce_window(Duration::from_millis(300)))
            .build()
            .unwrap();
        assert_eq!(custom.search.debounce_window, Duration::from_millis(300));
    }

    #[test]
    fn test_catalog_config_validation() {
        assert!(CatalogApiConfig::new("").validate().is_err());
        assert!(CatalogApiConfig::new("token")
            .with_base_url("ftp://example.com")
            .validate()
            .is_err());
        assert!(CatalogApiConfig::new("token")
            .with_language(" ")
            .validate()
            .is_err());

        let config = CatalogApiConfig::new("token").with_base_url("http://localhost:8080/3/");
        assert_eq!(config.base_url, "http://localhost:8080/3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_catalog_config_from_lookup() {
        let config = CatalogApiConfig::from_lookup(|name| {
            (name == CATALOG_TOKEN_ENV).then(|| " abc123 ".to_string())
        })
        .unwrap();
        assert_eq!(config.api_token, "abc123");
        assert_eq!(config.base_url, DEFAULT_CATALOG_BASE_URL);

        let missing = CatalogApiConfig::from_lookup(|_| None);
        assert!(missing.unwrap_err().to_string().contains(CATALOG_TOKEN_ENV));

        let blank = CatalogApiConfig::from_lookup(|_| Some("   ".to_string()));
        assert!(blank.is_err());
    }

    #[test]
    fn test_debug_output_hides_token() {
        let config = injected_builder()
            .catalog(CatalogApiConfig::new("super-secret"))
            .build()
            .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_open_injected_store_returns_same_instance() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let config = injected_builder()
            .key_value_store(Arc::clone(&store))
            .build()
            .unwrap();

        let opened = config.open_key_value_store().await.unwrap();
        assert!(Arc::ptr_eq(&opened, &store));
    }

    #[cfg(feature = "desktop-shims")]
    #[tokio::test]
    async fn test_open_default_store_on_desktop() {
        use bridge_traits::KeyValueStoreExt;

        let base = std::env::temp_dir().join(format!("core-runtime-test-{}", uuid::Uuid::new_v4()));
        let config = CoreConfig::builder()
            .database_path(base.join("store.db"))
            .http_client(Arc::new(StubHttpClient))
            .catalog(CatalogApiConfig::new("token"))
            .build()
            .unwrap();

        let store = config.open_key_value_store().await.unwrap();
        store.set_string("theme", "dark").await.unwrap();
        assert_eq!(
            store.get_string("theme").await.unwrap().as_deref(),
            Some("dark")
        );

        drop(store);
        let _ = tokio::fs::remove_dir_all(&base).await;
    }
}
