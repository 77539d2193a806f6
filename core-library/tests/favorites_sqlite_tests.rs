//! Favorites persisted through the SQLite key-value store

use bridge_desktop::SqliteKeyValueStore;
use bridge_traits::{KeyValueStore, KeyValueStoreExt, ValueKind};
use core_library::{
    FavoritesCollection, FavoritesError, FavoritesRepository, KeyValueFavoritesRepository,
    MediaItem, FAVORITES_KEY,
};
use std::sync::Arc;

fn matrix() -> MediaItem {
    MediaItem {
        id: 603,
        title: "Matrix".to_string(),
        overview: "Un hacker scopre la verità sulla realtà.".to_string(),
        poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_string()),
        release_date: Some("1999-03-31".to_string()),
        vote_average: 8.25,
        vote_count: 26000,
    }
}

#[tokio::test]
async fn test_toggle_scenario_on_sqlite() {
    let store = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    let repo = KeyValueFavoritesRepository::new(store.clone());

    let mut item = MediaItem::new(42, "Guida galattica per autostoppisti");
    item.vote_average = 6.75;

    assert!(repo.list().await.unwrap().is_empty());

    assert!(repo.toggle(&item).await.unwrap());
    assert!(repo.is_favorite(42).await.unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 1);

    assert!(!repo.toggle(&item).await.unwrap());
    assert!(!repo.is_favorite(42).await.unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 0);

    // The entry stays, as an empty JSON array
    let raw = store.get_raw(FAVORITES_KEY).await.unwrap().unwrap();
    assert_eq!(raw.kind, ValueKind::Json);
    assert_eq!(raw.raw, "[]");
}

#[tokio::test]
async fn test_collection_round_trips_through_store() {
    let store = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    let repo = KeyValueFavoritesRepository::new(store.clone());

    repo.add(&matrix()).await.unwrap();
    repo.add(&MediaItem::new(11, "Guerre stellari")).await.unwrap();

    let stored: FavoritesCollection = store.get_json(FAVORITES_KEY).await.unwrap().unwrap();
    assert_eq!(stored, repo.list().await.unwrap());
    assert_eq!(stored.get(603), Some(&matrix()));
    assert_eq!(stored.ids(), vec![603, 11]);
}

#[tokio::test]
async fn test_plain_string_under_favorites_key_is_rejected() {
    let store = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    store
        .set_string(FAVORITES_KEY, r#"[{"id": 1}]"#)
        .await
        .unwrap();

    let repo = KeyValueFavoritesRepository::new(store);
    assert!(matches!(
        repo.list().await,
        Err(FavoritesError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_two_repositories_share_the_store() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    let home = KeyValueFavoritesRepository::new(Arc::clone(&store));
    let favorites_screen = KeyValueFavoritesRepository::new(Arc::clone(&store));

    home.add(&matrix()).await.unwrap();
    assert!(favorites_screen.is_favorite(603).await.unwrap());

    favorites_screen.remove(603).await.unwrap();
    assert!(!home.is_favorite(603).await.unwrap());
}
