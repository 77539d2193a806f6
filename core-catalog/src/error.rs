use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The transport failed before a response arrived.
    #[error("Network error: {0}")]
    Network(#[source] BridgeError),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Failed to parse catalog response: {0}")]
    JsonParse(String),

    #[error("Catalog configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Network(_) | CatalogError::RateLimited { .. } => true,
            CatalogError::Http { status, .. } => *status >= 500,
            CatalogError::JsonParse(_) | CatalogError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
