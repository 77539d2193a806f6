//! # Repository Pattern Implementation
//!
//! Repository traits and their storage-backed implementations.
//!
//! ## Available Repositories
//!
//! - `FavoritesRepository` - The user's favorites collection, persisted as a
//!   single JSON array in the host key-value store

pub mod favorites;

pub use favorites::{FavoritesRepository, KeyValueFavoritesRepository, FAVORITES_KEY};
