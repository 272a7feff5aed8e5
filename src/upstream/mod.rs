//! HEMIS upstream access
//!
//! - [`client`] - one-page HTTP fetches against the employee-list endpoint
//! - [`aggregate`] - all pages of all configured types, deduplicated

pub mod aggregate;
pub mod client;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use aggregate::{AggregateResult, Aggregator};
pub use client::HemisClient;

/// Errors raised while talking to the upstream API
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx response
    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not JSON
    #[error("Malformed upstream payload: {0}")]
    Decode(String),

    /// Client could not be built from configuration
    #[error("Invalid upstream configuration: {0}")]
    InvalidConfig(String),
}

impl UpstreamError {
    /// HTTP status, when the upstream answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// One page of upstream employee rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePage {
    /// Raw rows; objects in practice, but not guaranteed
    pub items: Vec<Value>,
    /// Reported number of pages, when present
    pub page_count: Option<u64>,
    /// `items` was present but not an array
    pub malformed: bool,
    /// `items` was absent or null; read as an empty page
    pub items_missing: bool,
}

impl EmployeePage {
    /// Pick `items` and `pagination.pageCount` out of a decoded response body
    pub fn from_body(body: &Value) -> Self {
        let data = body.get("data");

        let (items, malformed, items_missing) = match data.and_then(|d| d.get("items")) {
            Some(Value::Array(items)) => (items.clone(), false, false),
            None | Some(Value::Null) => (Vec::new(), false, true),
            Some(_) => (Vec::new(), true, false),
        };

        let page_count = data
            .and_then(|d| d.get("pagination"))
            .and_then(|p| p.get("pageCount"))
            .and_then(|c| match c {
                Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            });

        Self {
            items,
            page_count,
            malformed,
            items_missing,
        }
    }
}

/// Anything that can serve employee-list pages
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    /// Fetch one page (1-based) of one type
    async fn fetch_page(
        &self,
        kind: &str,
        page: u32,
        limit: u32,
    ) -> Result<EmployeePage, UpstreamError>;
}
