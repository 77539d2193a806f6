//! Resolution of raw user input into the query actually sent to the catalog

use std::fmt;

/// What the catalog is asked for.
///
/// Empty input never produces a search call; it falls back to the trending
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectiveQuery {
    Trending,
    Search(String),
}

impl EffectiveQuery {
    /// Resolve user input.
    ///
    /// Input that is empty after trimming whitespace is `Trending`. Otherwise
    /// the term is kept as typed, or trimmed when `trim` is set.
    pub fn from_input(text: &str, trim: bool) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            EffectiveQuery::Trending
        } else if trim {
            EffectiveQuery::Search(trimmed.to_string())
        } else {
            EffectiveQuery::Search(text.to_string())
        }
    }

    pub fn is_trending(&self) -> bool {
        matches!(self, EffectiveQuery::Trending)
    }

    /// The search term, or `None` for the trending listing
    pub fn term(&self) -> Option<&str> {
        match self {
            EffectiveQuery::Trending => None,
            EffectiveQuery::Search(term) => Some(term),
        }
    }
}

impl fmt::Display for EffectiveQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveQuery::Trending => write!(f, "<trending>"),
            EffectiveQuery::Search(term) => write!(f, "{}", term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_trending() {
        assert_eq!(EffectiveQuery::from_input("", true), EffectiveQuery::Trending);
        assert_eq!(EffectiveQuery::from_input("   \t", true), EffectiveQuery::Trending);
        assert_eq!(EffectiveQuery::from_input("  ", false), EffectiveQuery::Trending);
    }

    #[test]
    fn test_search_term_trimming() {
        assert_eq!(
            EffectiveQuery::from_input("  matrix ", true),
            EffectiveQuery::Search("matrix".to_string())
        );
        assert_eq!(
            EffectiveQuery::from_input("  matrix ", false),
            EffectiveQuery::Search("  matrix ".to_string())
        );
    }

    #[test]
    fn test_term_accessor() {
        assert_eq!(EffectiveQuery::Trending.term(), None);
        assert!(EffectiveQuery::Trending.is_trending());
        let query = EffectiveQuery::Search("dune".to_string());
        assert_eq!(query.term(), Some("dune"));
        assert_eq!(query.to_string(), "dune");
    }
}
