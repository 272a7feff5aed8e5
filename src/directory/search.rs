//! Free-text search over cached records

use crate::directory::fields::{normalize_text, search_text, short_description};
use crate::i18n::t;
use crate::models::Employee;

/// Most results returned by one search
pub const MAX_SEARCH_RESULTS: usize = 15;

/// Result of matching a query against the cache
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Query normalized to nothing
    EmptyQuery,
    /// Matching records in cache order, possibly empty
    Matches(Vec<&'a Employee>),
}

/// Whether a query still has content after normalization
pub fn is_blank_query(query: &str) -> bool {
    normalize_text(query).is_empty()
}

/// Literal substring search over each record's flattened text
///
/// Scanning stops as soon as `limit` matches are collected.
pub fn search<'a>(items: &'a [Employee], query: &str, limit: usize) -> SearchOutcome<'a> {
    let needle = normalize_text(query);
    if needle.is_empty() {
        return SearchOutcome::EmptyQuery;
    }

    let mut found = Vec::new();
    for employee in items {
        if found.len() >= limit {
            break;
        }
        if search_text(employee).contains(&needle) {
            found.push(employee);
        }
    }

    tracing::debug!(query = %needle, matches = found.len(), "Search completed");
    SearchOutcome::Matches(found)
}

/// Chat reply for a search outcome
pub fn render(outcome: &SearchOutcome<'_>) -> String {
    match outcome {
        SearchOutcome::EmptyQuery => t!("search.usage").to_string(),
        SearchOutcome::Matches(found) if found.is_empty() => t!("search.not_found").to_string(),
        SearchOutcome::Matches(found) => {
            let lines = found
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}) {}", i + 1, short_description(e)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n\n{}", t!("search.found"), lines)
        }
    }
}
