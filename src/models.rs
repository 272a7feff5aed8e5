//! Core data structures shared across the bot
//!
//! Employee records come from HEMIS with no fixed schema, so they are kept as
//! ordered JSON maps and read through candidate key lists
//! (see [`crate::directory::fields`]).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::directory::fields::normalize_text;

// ============================================================================
// Employee Record
// ============================================================================

/// One employee row as returned by the upstream API
///
/// Field order is preserved on the way in and out so the persisted cache
/// mirrors upstream payloads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Employee(Map<String, Value>);

impl Employee {
    /// Wrap a raw upstream value; non-object rows are rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Tag the record with a classification, overwriting any upstream value
    #[must_use]
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.0
            .insert("type".to_string(), Value::String(kind.to_string()));
        self
    }

    /// Look up a single raw field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields in upstream order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Employee {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Built-in aliases, keyed by the space-stripped normalized form
const KIND_ALIASES: &[(&str, &str)] = &[
    ("staff", "staff"),
    ("staffs", "staff"),
    ("teacher", "teacher"),
    ("teachers", "teacher"),
    ("employee", "employee"),
    ("employees", "employee"),
];

/// The configured set of employee classifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeKinds {
    configured: Vec<String>,
}

impl EmployeeKinds {
    /// Create from the configured type names, dropping blanks
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let configured = kinds
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self { configured }
    }

    /// Configured type names in configuration order
    pub fn as_slice(&self) -> &[String] {
        &self.configured
    }

    /// Comma-separated list for replies
    pub fn joined(&self) -> String {
        self.configured.join(", ")
    }

    /// Resolve free-form user or upstream input to a canonical type
    ///
    /// Known aliases always resolve, even when the result is not configured;
    /// anything else must match a configured type after normalization.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let compact: String = normalize_text(raw)
            .chars()
            .filter(|c| *c != ' ')
            .collect();
        if compact.is_empty() {
            return None;
        }

        if let Some((_, canonical)) = KIND_ALIASES.iter().find(|(alias, _)| *alias == compact) {
            return Some((*canonical).to_string());
        }

        self.configured.iter().find(|k| **k == compact).cloned()
    }
}

// ============================================================================
// Cache Snapshot
// ============================================================================

/// Result of one full aggregation, persisted as `employees_cache.json`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSnapshot {
    /// Epoch milliseconds of the refresh; 0 means never refreshed
    pub updated_at: i64,
    pub types: Vec<String>,
    /// Raw upstream rows per type, before deduplication
    pub counts: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, Vec<Employee>>,
    /// Union of all `by_type` lists, deduplicated, first type wins
    pub items: Vec<Employee>,
}

impl CacheSnapshot {
    /// Refresh time, if the snapshot was ever refreshed
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.updated_at == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.updated_at).single()
    }

    /// Records of one type
    ///
    /// Uses the per-type list when present and otherwise filters `items` by
    /// their resolved `type` field.
    pub fn employees_of(&self, kind: &str, kinds: &EmployeeKinds) -> Vec<&Employee> {
        if let Some(list) = self.by_type.get(kind) {
            return list.iter().collect();
        }

        self.items
            .iter()
            .filter(|e| {
                e.get("type")
                    .and_then(Value::as_str)
                    .and_then(|t| kinds.resolve(t))
                    .is_some_and(|t| t == kind)
            })
            .collect()
    }

    /// `k=v, ...` rendering of the raw counts
    pub fn counts_summary(&self) -> String {
        self.counts
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Notification State
// ============================================================================

/// Persisted birthday-notification state, `state.json`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationState {
    /// Chat that receives the daily summary; empty when unset
    pub target_chat_id: String,
    /// `YYYY-MM-DD` in the configured time zone of the last completed run
    pub last_sent_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee(value: Value) -> Employee {
        Employee::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Employee::from_value(json!("text")).is_none());
        assert!(Employee::from_value(json!([1, 2])).is_none());
        assert!(Employee::from_value(json!({"id": 1})).is_some());
    }

    #[test]
    fn test_with_kind_overwrites_in_place() {
        let e = employee(json!({"type": "old", "id": 1})).with_kind("teacher");
        let keys: Vec<_> = e.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["type", "id"]);
        assert_eq!(e.get("type"), Some(&json!("teacher")));

        let appended = employee(json!({"id": 2})).with_kind("staff");
        let keys: Vec<_> = appended.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "type"]);
    }

    #[test]
    fn test_resolve_aliases() {
        let kinds = EmployeeKinds::new(["staff"]);
        assert_eq!(kinds.resolve("Teachers"), Some("teacher".to_string()));
        assert_eq!(kinds.resolve(" STAFFS "), Some("staff".to_string()));
        assert_eq!(kinds.resolve("employee"), Some("employee".to_string()));
    }

    #[test]
    fn test_resolve_configured_only() {
        let kinds = EmployeeKinds::new(["staff", "head_teacher"]);
        assert_eq!(kinds.resolve("head teacher"), None);
        assert_eq!(kinds.resolve("dean"), None);
        assert_eq!(kinds.resolve(""), None);

        let kinds = EmployeeKinds::new(["dean", ""]);
        assert_eq!(kinds.as_slice(), &["dean".to_string()]);
        assert_eq!(kinds.resolve("De-An"), Some("dean".to_string()));
    }

    #[test]
    fn test_employees_of_prefers_by_type() {
        let kinds = EmployeeKinds::new(["teacher", "staff"]);
        let mut snapshot = CacheSnapshot::default();
        snapshot.items = vec![
            employee(json!({"id": 1, "type": "teacher"})),
            employee(json!({"id": 2, "type": "Teachers"})),
            employee(json!({"id": 3, "type": "staff"})),
        ];

        let fallback = snapshot.employees_of("teacher", &kinds);
        assert_eq!(fallback.len(), 2);

        snapshot
            .by_type
            .insert("teacher".to_string(), vec![employee(json!({"id": 9}))]);
        let listed = snapshot.employees_of("teacher", &kinds);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].get("id"), Some(&json!(9)));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut snapshot = CacheSnapshot {
            updated_at: 1_700_000_000_000,
            types: vec!["staff".to_string()],
            ..Default::default()
        };
        snapshot.counts.insert("staff".to_string(), 2);
        snapshot.by_type.insert("staff".to_string(), Vec::new());

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["updatedAt"], json!(1_700_000_000_000_i64));
        assert_eq!(value["byType"]["staff"], json!([]));
        assert_eq!(value["counts"]["staff"], json!(2));
    }

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snapshot: CacheSnapshot = serde_json::from_str(r#"{"updatedAt": 5}"#).unwrap();
        assert_eq!(snapshot.updated_at, 5);
        assert!(snapshot.items.is_empty());
        assert!(CacheSnapshot::default().updated_at_utc().is_none());
    }

    #[test]
    fn test_state_round_trip_names() {
        let state: NotificationState =
            serde_json::from_str(r#"{"targetChatId": "-100", "lastSentDate": "2024-03-01"}"#)
                .unwrap();
        assert_eq!(state.target_chat_id, "-100");
        assert_eq!(state.last_sent_date, "2024-03-01");
    }
}
