use core_library::MediaItem;
use serde::Serialize;

/// What the search screen renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Text as last typed by the user
    pub query: String,
    /// Results of the latest applied request
    pub results: Vec<MediaItem>,
    /// Sequence number of the latest issued request, 0 before the first one
    pub seq: u64,
    /// A request for `seq` is outstanding
    pub loading: bool,
    /// User-facing message when the latest request failed
    pub error: Option<String>,
}

impl SearchState {
    /// True when nothing is loading, no error is shown and there are no results
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.results.is_empty()
    }
}
