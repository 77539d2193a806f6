//! TMDB catalog client
//!
//! ## Endpoints
//!
//! - **Trending**: `{base}/trending/all/week?language={lang}`
//! - **Search**: `{base}/search/movie?query={term}&language={lang}`
//!
//! Every request carries the API token as a bearer token and asks for JSON.
//! Both endpoints answer with a paged object whose `results` array is mapped
//! onto [`MediaItem`]. The trending listing mixes movies, TV shows and people:
//! shows use `name`/`first_air_date` and are mapped onto `title`/`release_date`,
//! people are skipped.

use crate::error::{CatalogError, Result};
use crate::query::EffectiveQuery;
use crate::CatalogClient;
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_library::MediaItem;
use core_runtime::config::CatalogApiConfig;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout for catalog requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback wait when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Paged list response
#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<WireResult>,
}

/// One entry of a `results` array
#[derive(Debug, Deserialize)]
struct WireResult {
    id: i64,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u64>,
}

impl WireResult {
    fn into_media_item(self) -> Option<MediaItem> {
        if self.media_type.as_deref() == Some("person") {
            return None;
        }

        let title = non_empty(self.title).or_else(|| non_empty(self.name))?;

        Some(MediaItem {
            id: self.id,
            title,
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            release_date: non_empty(self.release_date).or_else(|| non_empty(self.first_air_date)),
            vote_average: self.vote_average.unwrap_or(0.0).clamp(0.0, 10.0),
            vote_count: self.vote_count.unwrap_or(0),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Catalog client for The Movie Database API
pub struct TmdbClient {
    http_client: Arc<dyn HttpClient>,
    config: CatalogApiConfig,
}

impl TmdbClient {
    /// Creates a client after validating `config`.
    pub fn new(http_client: Arc<dyn HttpClient>, config: CatalogApiConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &CatalogApiConfig {
        &self.config
    }

    /// URL requested for `query`
    pub fn url_for(&self, query: &EffectiveQuery) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let language = urlencoding::encode(&self.config.language);
        match query {
            EffectiveQuery::Trending => {
                format!("{}/trending/all/week?language={}", base, language)
            }
            EffectiveQuery::Search(term) => format!(
                "{}/search/movie?query={}&language={}",
                base,
                urlencoding::encode(term),
                language
            ),
        }
    }

    fn check_status(response: &HttpResponse) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }

        if response.status == 429 {
            let retry_after = response
                .header("Retry-After")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            return Err(CatalogError::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        Err(CatalogError::Http {
            status: response.status,
            body: response.text_lossy(),
        })
    }

    fn parse_results(body: &[u8]) -> Result<Vec<MediaItem>> {
        let page: PagedResponse = serde_json::from_slice(body)
            .map_err(|e| CatalogError::JsonParse(e.to_string()))?;

        let total = page.results.len();
        let items: Vec<MediaItem> = page
            .results
            .into_iter()
            .filter_map(WireResult::into_media_item)
            .collect();

        if items.len() < total {
            debug!(skipped = total - items.len(), "Skipped non-media catalog entries");
        }

        Ok(items)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search(&self, query: &EffectiveQuery) -> Result<Vec<MediaItem>> {
        let url = self.url_for(query);
        debug!(query = %query, url = %url, "Querying catalog");

        let request = HttpRequest::get(url)
            .bearer_token(&self.config.api_token)
            .accept_json()
            .timeout(REQUEST_TIMEOUT);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(CatalogError::Network)?;

        if let Err(e) = Self::check_status(&response) {
            warn!(query = %query, status = response.status, "Catalog request rejected");
            return Err(e);
        }

        let items = Self::parse_results(&response.body)?;
        info!(query = %query, count = items.len(), "Catalog results received");
        Ok(items)
    }
}
