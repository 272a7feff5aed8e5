//! Birthday matching in the configured time zone
//!
//! HEMIS sends birth dates as Unix timestamps, sometimes in seconds and
//! sometimes in milliseconds. Values below 1e12 are treated as seconds.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::directory::fields::{pick, short_description, BIRTH_KEYS};
use crate::i18n::t;
use crate::models::Employee;

/// Greetings listed in one daily message
pub const MAX_GREETINGS: usize = 30;

/// Boundary between second and millisecond timestamps
const MILLIS_THRESHOLD: f64 = 1e12;

/// Parse a numeric or numeric-string timestamp
pub fn parse_birth_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if !raw.is_finite() {
        return None;
    }

    let millis = if raw < MILLIS_THRESHOLD { raw * 1000.0 } else { raw };
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Birth instant of a record, if any candidate field parses
pub fn birth_date(employee: &Employee) -> Option<DateTime<Utc>> {
    pick(employee.fields(), BIRTH_KEYS).and_then(parse_birth_timestamp)
}

/// `MM-DD` of an instant in `tz`
pub fn month_day(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%m-%d").to_string()
}

/// `YYYY-MM-DD` of an instant in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Today's birthday matches over the cached records
#[derive(Debug, Clone, PartialEq)]
pub struct BirthdayReport<'a> {
    /// Local date the report was computed for
    pub today: String,
    /// Matching records in cache order
    pub celebrants: Vec<&'a Employee>,
    /// Whether any record carried a parseable birth date at all
    pub any_birth_date: bool,
}

impl BirthdayReport<'_> {
    /// The single message the daily job sends for this report
    pub fn message(&self) -> String {
        let today = self.today.as_str();

        if !self.any_birth_date {
            return t!("birthday.field_missing", today = today).to_string();
        }

        if self.celebrants.is_empty() {
            return t!("birthday.nobody", today = today).to_string();
        }

        let lines = self
            .celebrants
            .iter()
            .take(MAX_GREETINGS)
            .map(|e| {
                let employee = short_description(e);
                t!("birthday.line", employee = employee).to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut text = format!("{}\n\n{}", t!("birthday.header", today = today), lines);
        if self.celebrants.len() > MAX_GREETINGS {
            let remaining = self.celebrants.len() - MAX_GREETINGS;
            text.push_str(&format!("\n\n{}", t!("birthday.more", count = remaining)));
        }
        text
    }
}

/// Match every record's birth month-day against `now` in `tz`
pub fn todays_birthdays(items: &[Employee], now: DateTime<Utc>, tz: Tz) -> BirthdayReport<'_> {
    let today_md = month_day(now, tz);
    let mut any_birth_date = false;
    let mut celebrants = Vec::new();

    for employee in items {
        let Some(born) = birth_date(employee) else {
            continue;
        };
        any_birth_date = true;
        if month_day(born, tz) == today_md {
            celebrants.push(employee);
        }
    }

    BirthdayReport {
        today: local_date(now, tz),
        celebrants,
        any_birth_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn with_birth(value: Value) -> Employee {
        Employee::from_value(json!({"full_name": "Test Xodim", "birth_date": value})).unwrap()
    }

    #[test]
    fn test_seconds_and_millis_agree() {
        let secs = parse_birth_timestamp(&json!(86400)).unwrap();
        let millis = parse_birth_timestamp(&json!(86_400_000_i64)).unwrap();
        assert_eq!(secs, millis);
        assert_eq!(month_day(secs, chrono_tz::UTC), "01-02");
    }

    #[test]
    fn test_numeric_strings_and_negatives() {
        let parsed = parse_birth_timestamp(&json!(" 86400 ")).unwrap();
        assert_eq!(month_day(parsed, chrono_tz::UTC), "01-02");

        // 1969-12-31T00:00:00Z
        let before_epoch = parse_birth_timestamp(&json!(-86400)).unwrap();
        assert_eq!(month_day(before_epoch, chrono_tz::UTC), "12-31");
    }

    #[test]
    fn test_unparseable_values() {
        assert!(parse_birth_timestamp(&json!("1990-05-01")).is_none());
        assert!(parse_birth_timestamp(&json!("")).is_none());
        assert!(parse_birth_timestamp(&json!(null)).is_none());
        assert!(parse_birth_timestamp(&json!(true)).is_none());
        assert!(parse_birth_timestamp(&json!({"ts": 1})).is_none());
    }

    #[test]
    fn test_month_day_uses_time_zone() {
        // 1990-03-14T20:00:00Z is already March 15 in Tashkent (UTC+5)
        let instant = Utc.with_ymd_and_hms(1990, 3, 14, 20, 0, 0).unwrap();
        assert_eq!(month_day(instant, chrono_tz::UTC), "03-14");
        assert_eq!(month_day(instant, chrono_tz::Asia::Tashkent), "03-15");
    }

    #[test]
    fn test_report_matches_today() {
        let born = Utc.with_ymd_and_hms(1985, 6, 1, 3, 0, 0).unwrap().timestamp();
        let items = vec![
            with_birth(json!(born)),
            with_birth(json!(0)),
            Employee::from_value(json!({"full_name": "No Date"})).unwrap(),
        ];
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap();

        let report = todays_birthdays(&items, now, chrono_tz::Asia::Tashkent);
        assert!(report.any_birth_date);
        assert_eq!(report.today, "2024-06-01");
        assert_eq!(report.celebrants.len(), 1);
        assert_eq!(
            report.message(),
            "🎂 Bugungi tug‘ilgan kunlar (2024-06-01):\n\n🎉 Test Xodim — Tug‘ilgan kun muborak!"
        );
    }

    #[test]
    fn test_report_field_missing_and_nobody() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap();
        let no_dates = vec![Employee::from_value(json!({"full_name": "A"})).unwrap()];
        let report = todays_birthdays(&no_dates, now, chrono_tz::UTC);
        assert!(!report.any_birth_date);
        assert!(report.message().starts_with("⚠️ API hodimlarda"));
        assert!(report.message().ends_with("(2024-06-01)"));

        let other_day = vec![with_birth(json!(86400))];
        let report = todays_birthdays(&other_day, now, chrono_tz::UTC);
        assert_eq!(report.message(), "Bugun tug‘ilgan hodim topilmadi. 📅 (2024-06-01)");
    }

    #[test]
    fn test_report_truncates_after_thirty() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let items: Vec<Employee> = (0..33).map(|_| with_birth(json!(86400))).collect();
        let report = todays_birthdays(&items, now, chrono_tz::UTC);
        let message = report.message();

        assert_eq!(message.matches("🎉").count(), 30);
        assert!(message.ends_with("\n\n(+3 ta yana bor)"));
    }
}
