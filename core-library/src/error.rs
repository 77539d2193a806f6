use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FavoritesError {
    /// The collection could not be read; membership is unknown.
    #[error("Favorites unavailable: {0}")]
    Unavailable(#[source] BridgeError),

    /// The updated collection could not be written; nothing changed.
    #[error("Failed to persist favorites: {0}")]
    PersistFailed(#[source] BridgeError),
}

pub type Result<T> = std::result::Result<T, FavoritesError>;
