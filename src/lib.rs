//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (currently only `core-service`). Host applications can
//! depend on `mnc-workspace` and enable `desktop-shims` to get the SQLite
//! key-value store and the reqwest HTTP client wired in automatically.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
