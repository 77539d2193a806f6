use core_catalog::CatalogError;
use core_library::FavoritesError;
use core_search::{SearchError, SEARCH_FAILED_MESSAGE};
use thiserror::Error;

/// Shown when the favorites collection cannot be read
pub const FAVORITES_LOAD_FAILED_MESSAGE: &str = "Impossibile caricare i film preferiti.";

/// Shown when a favorite toggle could not be saved
pub const FAVORITES_UPDATE_FAILED_MESSAGE: &str = "Impossibile aggiornare lo stato dei preferiti.";

const GENERIC_FAILURE_MESSAGE: &str = "Si è verificato un errore. Riprova più tardi.";

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}

impl CoreError {
    /// Localized text a view shows for this error
    pub fn user_message(&self) -> &'static str {
        match self {
            CoreError::Favorites(FavoritesError::Unavailable(_)) => FAVORITES_LOAD_FAILED_MESSAGE,
            CoreError::Favorites(FavoritesError::PersistFailed(_)) => {
                FAVORITES_UPDATE_FAILED_MESSAGE
            }
            CoreError::Catalog(_) | CoreError::Search(_) => SEARCH_FAILED_MESSAGE,
            CoreError::InitializationFailed(_) | CoreError::Runtime(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::BridgeError;

    #[test]
    fn test_user_messages() {
        let load = CoreError::from(FavoritesError::Unavailable(BridgeError::storage_read(
            "favoriteMovies",
            "not an array",
        )));
        assert_eq!(load.user_message(), "Impossibile caricare i film preferiti.");

        let save = CoreError::from(FavoritesError::PersistFailed(BridgeError::storage_write(
            "favoriteMovies",
            "disk full",
        )));
        assert_eq!(
            save.user_message(),
            "Impossibile aggiornare lo stato dei preferiti."
        );

        let search = CoreError::from(CatalogError::RateLimited {
            retry_after_seconds: 5,
        });
        assert_eq!(
            search.user_message(),
            "Impossibile caricare i film. Riprova più tardi."
        );
    }
}
