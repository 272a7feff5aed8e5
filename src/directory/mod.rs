//! Read-side queries over the cached employee directory
//!
//! - [`fields`] - candidate-key field access and record rendering
//! - [`listing`] - paged per-type listings
//! - [`search`] - normalized substring search
//! - [`birthday`] - birth-date parsing and daily matching
//!
//! [`Directory`] ties them to a [`CacheStore`]: every query first makes sure
//! the snapshot is fresh, except when the input is rejected up front.

pub mod birthday;
pub mod fields;
pub mod listing;
pub mod search;

use std::sync::Arc;

use crate::models::EmployeeKinds;
use crate::storage::CacheStore;
use crate::upstream::UpstreamError;

/// Query facade used by the bot and the CLI
pub struct Directory {
    cache: Arc<CacheStore>,
    kinds: EmployeeKinds,
    page_size: usize,
}

impl Directory {
    pub fn new(cache: Arc<CacheStore>, kinds: EmployeeKinds, page_size: usize) -> Self {
        Self {
            cache,
            kinds,
            page_size: listing::clamp_page_size(page_size),
        }
    }

    pub fn kinds(&self) -> &EmployeeKinds {
        &self.kinds
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// One page of a per-type listing
    ///
    /// An unresolvable type yields the usage text without touching the cache.
    pub async fn list(&self, raw_kind: &str, raw_page: Option<&str>) -> Result<String, UpstreamError> {
        let Some(kind) = self.kinds.resolve(raw_kind) else {
            return Ok(listing::usage(&self.kinds));
        };
        let page = listing::parse_positive_int(raw_page, 1);

        let snapshot = self.cache.refresh(false).await?;
        let people = snapshot.employees_of(&kind, &self.kinds);
        let api_count = snapshot.counts.get(&kind).copied();

        tracing::debug!(kind = %kind, page, matched = people.len(), "Listing employees");
        Ok(listing::render_page(&kind, &people, page, self.page_size, api_count))
    }

    /// Up to 15 records whose flattened text contains `query`
    ///
    /// A blank query yields the usage text without touching the cache.
    pub async fn search(&self, query: &str) -> Result<String, UpstreamError> {
        if search::is_blank_query(query) {
            return Ok(search::render(&search::SearchOutcome::EmptyQuery));
        }

        let snapshot = self.cache.refresh(false).await?;
        let outcome = search::search(&snapshot.items, query, search::MAX_SEARCH_RESULTS);
        Ok(search::render(&outcome))
    }

    /// First records of the whole directory
    pub async fn sample(&self) -> Result<String, UpstreamError> {
        let snapshot = self.cache.refresh(false).await?;
        Ok(listing::render_sample(&snapshot.items, &self.kinds))
    }
}
