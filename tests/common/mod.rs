//! Common test utilities

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hodimbot::config::Config;
use hodimbot::models::EmployeeKinds;
use hodimbot::notifications::channels::{Channel, ChannelError, ChannelResult, Delivered};
use hodimbot::storage::{CacheStore, StateStore};
use hodimbot::upstream::{EmployeePage, EmployeeSource, UpstreamError};

/// HEMIS response body for one page
#[allow(dead_code)]
pub fn page_body(items: Value, page_count: u64) -> Value {
    json!({
        "success": true,
        "data": {
            "items": items,
            "pagination": {"pageCount": page_count}
        }
    })
}

/// A plain employee record
#[allow(dead_code)]
pub fn employee(id: u64, name: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "login": name.to_lowercase().replace(' ', "."),
        "type": kind,
    })
}

/// Valid configuration rooted at `data_dir`
#[allow(dead_code)]
pub fn test_config(data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.hemis.token = "test-token".to_string();
    config.hemis.employee_types = vec!["teacher".to_string()];
    config.cache.data_dir = data_dir.to_path_buf();
    config
}

/// In-memory employee source serving fixed pages per type
#[allow(dead_code)]
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<String, Vec<Value>>,
    calls: AtomicUsize,
    failing: bool,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl StaticSource {
    /// Every type gets one page containing `items`
    pub fn single_page(kind: &str, items: Vec<Value>) -> Self {
        let mut pages = HashMap::new();
        pages.insert(kind.to_string(), vec![Value::Array(items)]);
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Every request fails with a 500
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// Wait `delay` before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmployeeSource for StaticSource {
    async fn fetch_page(
        &self,
        kind: &str,
        page: u32,
        _limit: u32,
    ) -> Result<EmployeePage, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(UpstreamError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let pages = self.pages.get(kind).cloned().unwrap_or_default();
        let page_count = pages.len() as u64;
        let items = pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| json!([]));
        Ok(EmployeePage::from_body(&page_body(items, page_count)))
    }
}

/// Cache and state stores over `source` in `data_dir`
#[allow(dead_code)]
pub fn stores(
    data_dir: &Path,
    source: Arc<dyn EmployeeSource>,
    kinds: &[&str],
    target: &str,
) -> (Arc<CacheStore>, Arc<StateStore>) {
    let kinds = EmployeeKinds::new(kinds);
    let cache = Arc::new(CacheStore::new(
        data_dir.join("employees_cache.json"),
        source,
        &kinds,
        200,
        Duration::from_secs(6 * 60 * 60),
    ));
    let state = Arc::new(StateStore::new(data_dir.join("state.json"), target));
    (cache, state)
}

/// Channel that records messages instead of delivering them
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(String, String)>>,
    failing: bool,
}

#[allow(dead_code)]
impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// `(chat_id, text)` pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, chat_id: &str, text: &str) -> ChannelResult<Delivered> {
        if self.failing {
            return Err(ChannelError::Unavailable("chat is down".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id.to_string(), text.to_string()));
        Ok(Delivered {
            chat_id: chat_id.to_string(),
            message_id: sent.len() as i64,
        })
    }
}
