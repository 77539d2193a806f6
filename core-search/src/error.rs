use core_catalog::CatalogError;
use thiserror::Error;

/// Message shown in place of results when the latest search failed
pub const SEARCH_FAILED_MESSAGE: &str = "Impossibile caricare i film. Riprova più tardi.";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(#[from] CatalogError),
}

impl SearchError {
    /// Localized text for the view
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::RequestFailed(_) => SEARCH_FAILED_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
