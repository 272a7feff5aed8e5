//! Reply texts for the admin commands

use chrono_tz::Tz;

use crate::i18n::t;
use crate::models::{CacheSnapshot, EmployeeKinds, NotificationState};

fn or_missing(value: &str) -> String {
    if value.is_empty() {
        t!("bot.missing").to_string()
    } else {
        value.to_string()
    }
}

/// `type=n, ...` over the configured types, using cached per-type lists
pub fn by_type_summary(snapshot: &CacheSnapshot, kinds: &EmployeeKinds) -> String {
    kinds
        .as_slice()
        .iter()
        .map(|k| format!("{k}={}", snapshot.employees_of(k, kinds).len()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Refresh time in the schedule time zone
pub fn updated_label(snapshot: &CacheSnapshot, tz: Tz) -> String {
    snapshot
        .updated_at_utc()
        .map(|at| at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| t!("bot.missing").to_string())
}

/// `/sync` summary
pub fn sync_done(snapshot: &CacheSnapshot) -> String {
    t!(
        "bot.sync.done",
        count = snapshot.items.len(),
        types = snapshot.types.join(", "),
        counts = snapshot.counts_summary()
    )
    .to_string()
}

/// `/types` summary
pub fn types(snapshot: &CacheSnapshot, kinds: &EmployeeKinds) -> String {
    t!(
        "bot.types",
        types = kinds.joined(),
        counts = snapshot.counts_summary(),
        by_type = by_type_summary(snapshot, kinds),
        total = snapshot.items.len()
    )
    .to_string()
}

/// `/status` summary
pub fn status(
    snapshot: &CacheSnapshot,
    state: &NotificationState,
    kinds: &EmployeeKinds,
    tz: Tz,
    cron: &str,
) -> String {
    t!(
        "bot.status",
        types = kinds.joined(),
        timezone = tz.name(),
        cron = cron,
        target = or_missing(&state.target_chat_id),
        last_sent = or_missing(&state.last_sent_date),
        updated = updated_label(snapshot, tz),
        by_type = by_type_summary(snapshot, kinds),
        total = snapshot.items.len()
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn snapshot() -> CacheSnapshot {
        let teacher = Employee::from_value(json!({"id": 1, "full_name": "A", "type": "teacher"})).unwrap();
        CacheSnapshot {
            // 2024-03-10T04:00:00Z
            updated_at: 1_710_043_200_000,
            types: vec!["teacher".to_string()],
            counts: BTreeMap::from([("teacher".to_string(), 2)]),
            by_type: BTreeMap::from([("teacher".to_string(), vec![teacher.clone()])]),
            items: vec![teacher],
        }
    }

    #[test]
    fn test_status_marks_unset_values() {
        let kinds = EmployeeKinds::new(["teacher"]);
        let text = status(
            &CacheSnapshot::default(),
            &NotificationState::default(),
            &kinds,
            chrono_tz::Asia::Tashkent,
            "0 9 * * *",
        );

        assert!(text.contains("TARGET_CHAT_ID = (yo‘q)"));
        assert!(text.contains("lastSentDate = (yo‘q)"));
        assert!(text.contains("cacheUpdated = (yo‘q)"));
        assert!(text.contains("TZ = Asia/Tashkent"));
        assert!(text.contains("cacheCount = 0"));
    }

    #[test]
    fn test_status_formats_local_time() {
        let kinds = EmployeeKinds::new(["teacher"]);
        let state = NotificationState {
            target_chat_id: "-100".to_string(),
            last_sent_date: "2024-03-10".to_string(),
        };
        let text = status(&snapshot(), &state, &kinds, chrono_tz::Asia::Tashkent, "0 9 * * *");

        assert!(text.contains("cacheUpdated = 2024-03-10 09:00:00"));
        assert!(text.contains("cacheByType = teacher=1"));
        assert!(text.contains("TARGET_CHAT_ID = -100"));
    }

    #[test]
    fn test_types_and_sync_summaries() {
        let kinds = EmployeeKinds::new(["teacher"]);
        let snap = snapshot();

        let text = types(&snap, &kinds);
        assert!(text.contains("Counts: teacher=2"));
        assert!(text.contains("Cache total: 1"));

        let text = sync_done(&snap);
        assert!(text.contains("Hodimlar: 1"));
        assert!(text.contains("Counts: teacher=2"));
    }
}
