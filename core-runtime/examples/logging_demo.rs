//! Logging system demonstration
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-runtime --example logging_demo
//!
//! # JSON format
//! cargo run -p core-runtime --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run -p core-runtime --example logging_demo -- compact "core_search=trace"
//! ```

use bridge_traits::time::{ConsoleLogger, LogLevel};
use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LoggingConfig,
};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, instrument, span, warn, Level};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(e) = init_logging(config) {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    info!(format = ?format, "Logging initialized");

    demo_favorites();
    demo_search().await;
    demo_redaction();
}

fn demo_favorites() {
    let span = span!(Level::INFO, "favorites", key = "favoriteMovies");
    let _enter = span.enter();

    debug!(count = 3, "Loaded favorites collection");
    info!(item_id = 42, title = "Inception", "Added to favorites");
    warn!(item_id = 7, "Favorites write failed, membership unchanged");
}

#[instrument]
async fn demo_search() {
    for (seq, query) in [(1u64, "trending"), (2, "avengers")] {
        debug!(seq = seq, query = query, "Search request issued");
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    warn!(seq = 1, "Discarding stale search response");
    info!(seq = 2, count = 20, "Search results applied");
}

fn demo_redaction() {
    let token = "eyJhbGciOiJIUzI1NiJ9.secret";
    let path = "/home/ada/.local/share/mnc/store.db";

    info!(
        api_token = %redact_if_sensitive("api_token", token),
        db = %strip_path(path),
        "Catalog client configured"
    );
}
