//! Paged per-type listings

use crate::directory::fields::short_description;
use crate::i18n::t;
use crate::models::{Employee, EmployeeKinds};

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: usize = 5;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: usize = 25;

/// Page size when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Records shown by `/employees`
pub const SAMPLE_SIZE: usize = 10;

/// Keep a configured page size inside the supported range
pub fn clamp_page_size(size: usize) -> usize {
    size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Leading-digit integer parse; anything that is not a positive integer
/// becomes `fallback`
///
/// `"3"`, `" 3abc"` and `"+3"` all give 3. Digit runs too long for `usize`
/// saturate, so a huge page number still lands on the last page.
pub fn parse_positive_int(raw: Option<&str>, fallback: usize) -> usize {
    let Some(raw) = raw else {
        return fallback;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let value = unsigned
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(10).saturating_add(digit as usize)
        });

    if value > 0 {
        value
    } else {
        fallback
    }
}

/// Position of one page within a list of `total` records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page actually shown after clamping
    pub page: usize,
    pub page_count: usize,
    /// Index of the first record on the page
    pub start: usize,
    /// One past the last record on the page
    pub end: usize,
}

impl PageWindow {
    /// Clamp `requested` into `[1, max(1, ceil(total / page_size))]`
    pub fn new(total: usize, requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page_count = total.div_ceil(page_size).max(1);
        let page = requested.clamp(1, page_count);
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total);

        Self {
            page,
            page_count,
            start,
            end,
        }
    }

    /// Page suggested in the footer, never past the last one
    pub fn next_page(&self) -> usize {
        if self.page < self.page_count {
            self.page + 1
        } else {
            self.page_count
        }
    }
}

/// Reply for an unresolvable `/list` type
pub fn usage(kinds: &EmployeeKinds) -> String {
    t!("list.usage", types = kinds.joined()).to_string()
}

/// Render one page of a per-type listing
///
/// `api_count` is the raw upstream row count; it is shown only when it
/// differs from the deduplicated list length.
pub fn render_page(
    kind: &str,
    people: &[&Employee],
    requested_page: usize,
    page_size: usize,
    api_count: Option<usize>,
) -> String {
    if people.is_empty() {
        return t!("list.empty", kind = kind).to_string();
    }

    let window = PageWindow::new(people.len(), requested_page, page_size);
    let lines = people[window.start..window.end]
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}) {}", window.start + i + 1, short_description(e)))
        .collect::<Vec<_>>()
        .join("\n");

    let (from, to, total) = (window.start + 1, window.end, people.len());
    let mut count_line = t!("list.shown", from = from, to = to, total = total).to_string();
    if let Some(count) = api_count.filter(|c| *c != people.len()) {
        count_line.push_str(&t!("list.api_count", count = count));
    }

    let next_page = window.next_page();
    format!(
        "{}\n\n{}\n\n{}\n{}",
        t!("list.header", kind = kind, page = window.page, page_count = window.page_count),
        lines,
        count_line,
        t!("list.next", kind = kind, next = next_page),
    )
}

/// First records of the whole cache, for `/employees`
pub fn render_sample(items: &[Employee], kinds: &EmployeeKinds) -> String {
    if items.is_empty() {
        return t!("bot.employees.empty").to_string();
    }

    let lines = items
        .iter()
        .take(SAMPLE_SIZE)
        .enumerate()
        .map(|(i, e)| format!("{}) {}", i + 1, short_description(e)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\n{}\n\n{}",
        t!("bot.employees.header"),
        lines,
        t!("bot.employees.footer", count = items.len(), types = kinds.joined()),
    )
}
