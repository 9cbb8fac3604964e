//! Query routing
//!
//! Classifies a query as weather, document, or unknown. Keyword matching
//! is deliberately crude: a query mentioning both weather words and
//! document content always routes to weather.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query classification, decided exactly once per pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Weather,
    Document,
    Unknown,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weather => write!(f, "weather"),
            Self::Document => write!(f, "document"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Keywords that force the weather branch
pub const WEATHER_KEYWORDS: [&str; 7] = [
    "weather",
    "temperature",
    "forecast",
    "climate",
    "rain",
    "sunny",
    "cloudy",
];

/// Classify a query. Infallible; always yields exactly one kind.
pub fn route(query: &str, has_documents: bool) -> QueryKind {
    let query = query.to_lowercase();

    if WEATHER_KEYWORDS.iter().any(|k| query.contains(k)) {
        QueryKind::Weather
    } else if has_documents {
        QueryKind::Document
    } else {
        QueryKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_keyword_routes_to_weather() {
        for keyword in WEATHER_KEYWORDS {
            let query = format!("tell me about the {} today", keyword);
            assert_eq!(route(&query, false), QueryKind::Weather);
            assert_eq!(route(&query, true), QueryKind::Weather);
        }
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert_eq!(route("What's the WEATHER in Paris?", false), QueryKind::Weather);
    }

    #[test]
    fn test_document_when_index_present() {
        assert_eq!(route("what does chapter 3 say?", true), QueryKind::Document);
    }

    #[test]
    fn test_unknown_when_no_index() {
        assert_eq!(route("what does chapter 3 say?", false), QueryKind::Unknown);
    }

    #[test]
    fn test_weather_wins_tie_break() {
        // Document loaded, but the query mentions rain
        assert_eq!(
            route("does the report mention rain damage?", true),
            QueryKind::Weather
        );
    }
}
