//! Domain models for media items and the favorites collection

use serde::{Deserialize, Serialize};

/// A catalog entry (movie or show) as displayed and persisted.
///
/// Field names match the persisted JSON layout exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Catalog identifier, unique within the catalog
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Relative poster path (e.g. `/abc.jpg`)
    pub poster_path: Option<String>,
    /// Release date as sent by the catalog (`YYYY-MM-DD`)
    pub release_date: Option<String>,
    /// Average rating, 0.0 to 10.0
    pub vote_average: f64,
    pub vote_count: u64,
}

impl MediaItem {
    /// Create an item with only an id and title set
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
        }
    }

    /// Full poster URL under `image_base`, if the item has a poster
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path.as_deref().map(|path| {
            format!(
                "{}/{}",
                image_base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }

    /// Release year, when the release date starts with one
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

/// Ordered favorites, unique by item id.
///
/// Insertion order is display order: the most recently added item is last.
/// Deserializing drops later duplicates of an id, so a hand-edited or legacy
/// entry can never break the uniqueness invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MediaItem>", into = "Vec<MediaItem>")]
pub struct FavoritesCollection {
    items: Vec<MediaItem>,
}

impl FavoritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append `item` unless an item with the same id is already present.
    ///
    /// Returns `true` if the collection changed.
    pub fn insert(&mut self, item: MediaItem) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item with `id`. Returns `true` if the collection changed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaItem> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn as_slice(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<MediaItem> {
        self.items
    }
}

impl From<Vec<MediaItem>> for FavoritesCollection {
    fn from(items: Vec<MediaItem>) -> Self {
        let mut collection = Self::new();
        for item in items {
            collection.insert(item);
        }
        collection
    }
}

impl From<FavoritesCollection> for Vec<MediaItem> {
    fn from(collection: FavoritesCollection) -> Self {
        collection.items
    }
}

impl<'a> IntoIterator for &'a FavoritesCollection {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inception() -> MediaItem {
        MediaItem {
            id: 27205,
            title: "Inception".to_string(),
            overview: "A thief who steals corporate secrets.".to_string(),
            poster_path: Some("/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg".to_string()),
            release_date: Some("2010-07-15".to_string()),
            vote_average: 8.5,
            vote_count: 35000,
        }
    }

    #[test]
    fn test_media_item_json_layout() {
        let value = serde_json::to_value(inception()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 27205,
                "title": "Inception",
                "overview": "A thief who steals corporate secrets.",
                "poster_path": "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg",
                "release_date": "2010-07-15",
                "vote_average": 8.5,
                "vote_count": 35000
            })
        );

        let mut bare = MediaItem::new(1, "Untitled");
        bare.poster_path = None;
        let value = serde_json::to_value(&bare).unwrap();
        assert!(value["poster_path"].is_null());
        assert!(value["release_date"].is_null());
    }

    #[test]
    fn test_media_item_tolerates_missing_optionals() {
        let item: MediaItem = serde_json::from_value(json!({
            "id": 5,
            "title": "Four Rooms",
            "overview": "",
            "vote_average": 6.0,
            "vote_count": 2000
        }))
        .unwrap();

        assert_eq!(item.poster_path, None);
        assert_eq!(item.release_date, None);
    }

    #[test]
    fn test_poster_url() {
        let item = inception();
        assert_eq!(
            item.poster_url("https://image.tmdb.org/t/p/w500").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg")
        );
        assert_eq!(
            item.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg")
        );
        assert_eq!(MediaItem::new(1, "x").poster_url("https://img"), None);
    }

    #[test]
    fn test_release_year() {
        assert_eq!(inception().release_year(), Some(2010));

        let mut item = MediaItem::new(1, "x");
        assert_eq!(item.release_year(), None);
        item.release_date = Some("".to_string());
        assert_eq!(item.release_year(), None);
    }

    #[test]
    fn test_collection_insert_is_idempotent() {
        let mut favorites = FavoritesCollection::new();

        assert!(favorites.insert(inception()));
        assert!(!favorites.insert(inception()));

        assert_eq!(favorites.len(), 1);
        assert!(favorites.contains(27205));
    }

    #[test]
    fn test_collection_keeps_insertion_order() {
        let mut favorites = FavoritesCollection::new();
        favorites.insert(MediaItem::new(3, "c"));
        favorites.insert(MediaItem::new(1, "a"));
        favorites.insert(MediaItem::new(2, "b"));

        assert_eq!(favorites.ids(), vec![3, 1, 2]);

        assert!(favorites.remove(1));
        assert!(!favorites.remove(1));
        assert_eq!(favorites.ids(), vec![3, 2]);
    }

    #[test]
    fn test_collection_uniqueness_over_mixed_operations() {
        let mut favorites = FavoritesCollection::new();

        for step in 0..50i64 {
            let id = step % 7;
            if step % 3 == 0 {
                favorites.remove(id);
            } else {
                favorites.insert(MediaItem::new(id, format!("Movie {}", id)));
            }

            let mut ids = favorites.ids();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), favorites.len());
        }
    }

    #[test]
    fn test_collection_deserialization_drops_duplicates() {
        let favorites: FavoritesCollection = serde_json::from_value(json!([
            {"id": 1, "title": "first", "overview": "", "poster_path": null,
             "release_date": null, "vote_average": 7.0, "vote_count": 1},
            {"id": 1, "title": "copy", "overview": "", "poster_path": null,
             "release_date": null, "vote_average": 7.0, "vote_count": 1}
        ]))
        .unwrap();

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.get(1).unwrap().title, "first");
    }

    #[test]
    fn test_collection_serializes_as_array() {
        let mut favorites = FavoritesCollection::new();
        favorites.insert(MediaItem::new(42, "Answer"));

        let value = serde_json::to_value(&favorites).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], 42);
    }
}
