//! HTTP client for the HEMIS employee-list endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{EmployeePage, EmployeeSource, UpstreamError};
use crate::config::HemisConfig;

/// Path appended to the configured REST base
const EMPLOYEE_LIST_PATH: &str = "/v1/data/employee-list";

/// Longest response body kept in error values and logs
const MAX_ERROR_BODY: usize = 512;

/// Bearer-authenticated HEMIS client
///
/// One request per call, no retries: a failed page aborts the whole
/// aggregation so a partial directory is never cached.
pub struct HemisClient {
    client: Client,
    base_url: String,
    token: String,
    language: String,
}

impl HemisClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Http` if the HTTP client cannot be created
    pub fn new(config: &HemisConfig) -> Result<Self, UpstreamError> {
        Self::with_settings(
            &config.base_url,
            &config.token,
            &config.language,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a client against a custom base URL for testing
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, UpstreamError> {
        Self::with_settings(base_url, token, "uz-UZ", Duration::from_secs(25))
    }

    /// Create a client with every setting explicit
    pub fn with_settings(
        base_url: &str,
        token: &str,
        language: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        if base_url.trim().is_empty() {
            return Err(UpstreamError::InvalidConfig("base URL is empty".to_string()));
        }

        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            language: language.to_string(),
        })
    }

    /// Full employee-list URL
    pub fn endpoint(&self) -> String {
        format!("{}{EMPLOYEE_LIST_PATH}", self.base_url)
    }
}

#[async_trait]
impl EmployeeSource for HemisClient {
    async fn fetch_page(
        &self,
        kind: &str,
        page: u32,
        limit: u32,
    ) -> Result<EmployeePage, UpstreamError> {
        let page_param = page.to_string();
        let limit_param = limit.to_string();

        let response = self
            .client
            .get(self.endpoint())
            .bearer_auth(&self.token)
            .query(&[
                ("type", kind),
                ("page", page_param.as_str()),
                ("limit", limit_param.as_str()),
                ("l", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::Http(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Http(e)
            }
        })?;

        if !status.is_success() {
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            tracing::warn!(
                kind = %kind,
                page,
                status = status.as_u16(),
                body = %body,
                "Employee list request failed"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: Value = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Decode(format!("{kind} page {page}: {e}")))?;

        let employee_page = EmployeePage::from_body(&decoded);
        tracing::debug!(
            kind = %kind,
            page,
            items = employee_page.items.len(),
            page_count = ?employee_page.page_count,
            "Fetched employee page"
        );

        Ok(employee_page)
    }
}
