//! Merge every page of every configured type into one directory

use std::collections::{BTreeMap, HashSet};

use super::{EmployeeSource, UpstreamError};
use crate::directory::fields::identity_key;
use crate::models::Employee;

/// Rows requested per upstream page
pub const DEFAULT_PAGE_LIMIT: u32 = 200;

/// Output of one full aggregation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    /// Globally deduplicated records, first type wins
    pub merged: Vec<Employee>,
    /// Raw rows seen per type, duplicates and non-object rows included
    pub counts: BTreeMap<String, usize>,
    /// Per-type deduplicated records
    pub by_type: BTreeMap<String, Vec<Employee>>,
}

/// Drives an [`EmployeeSource`] across types and pages
pub struct Aggregator<'a, S: EmployeeSource + ?Sized> {
    source: &'a S,
    page_limit: u32,
}

impl<'a, S: EmployeeSource + ?Sized> Aggregator<'a, S> {
    pub fn new(source: &'a S, page_limit: u32) -> Self {
        Self {
            source,
            page_limit: page_limit.max(1),
        }
    }

    /// Fetch and merge all types
    ///
    /// Pages are visited from 1 while below the reported page count; an
    /// absent or zero count means a single page. Any upstream error aborts
    /// the whole run.
    pub async fn collect(&self, kinds: &[String]) -> Result<AggregateResult, UpstreamError> {
        let mut result = AggregateResult::default();
        let mut seen: HashSet<String> = HashSet::new();

        for kind in kinds {
            let mut seen_in_kind: HashSet<String> = HashSet::new();
            let mut list_for_kind = Vec::new();
            let mut raw_rows = 0usize;
            let mut page = 1u32;

            loop {
                let fetched = self.source.fetch_page(kind, page, self.page_limit).await?;
                if fetched.malformed {
                    tracing::warn!(kind = %kind, page, "Unexpected employee list format, stopping type");
                    break;
                }
                if fetched.items_missing {
                    tracing::warn!(kind = %kind, page, "Employee list missing from page, treating as empty");
                }

                for row in fetched.items {
                    raw_rows += 1;
                    let Some(employee) = Employee::from_value(row) else {
                        tracing::warn!(kind = %kind, page, "Skipping non-object employee row");
                        continue;
                    };
                    let employee = employee.with_kind(kind);
                    let key = identity_key(&employee);

                    if seen_in_kind.insert(key.clone()) {
                        list_for_kind.push(employee.clone());
                    }
                    if seen.insert(key) {
                        result.merged.push(employee);
                    }
                }

                match fetched.page_count {
                    Some(count) if count > 0 && u64::from(page) < count => page += 1,
                    _ => break,
                }
            }

            tracing::info!(
                kind = %kind,
                pages = page,
                rows = raw_rows,
                unique = list_for_kind.len(),
                "Aggregated employee type"
            );
            result.counts.insert(kind.clone(), raw_rows);
            result.by_type.insert(kind.clone(), list_for_kind);
        }

        Ok(result)
    }
}
