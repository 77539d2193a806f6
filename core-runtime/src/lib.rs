//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the movie night core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the domain crates depend on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder, and the event broadcasting used to tell views that favorites or
//! search results changed.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
