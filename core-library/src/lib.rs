//! # Library Management Module
//!
//! Owns the media item model and the user's favorites collection.
//!
//! ## Overview
//!
//! This module manages:
//! - The [`MediaItem`](models::MediaItem) value type shared by search and favorites
//! - The ordered, id-unique [`FavoritesCollection`](models::FavoritesCollection)
//! - The [`FavoritesRepository`](repositories::FavoritesRepository) that persists
//!   the collection under a single key and serializes every mutation

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{FavoritesError, Result};
pub use models::{FavoritesCollection, MediaItem};
pub use repositories::{FavoritesRepository, KeyValueFavoritesRepository, FAVORITES_KEY};
