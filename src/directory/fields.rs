//! Defensive field access over schemaless employee records
//!
//! HEMIS installations disagree on field names, so every logical attribute
//! is read through an ordered list of candidate keys.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::i18n::t;
use crate::models::Employee;

// ============================================================================
// Candidate Keys
// ============================================================================

pub const ID_KEYS: &[&str] = &["id", "employee_id", "uuid"];
pub const LOGIN_KEYS: &[&str] = &["login", "username", "user_login"];
pub const DISPLAY_LOGIN_KEYS: &[&str] = &["login", "username", "user_login", "employee_login"];
pub const FULL_NAME_KEYS: &[&str] = &["full_name", "fio"];
pub const LAST_NAME_KEYS: &[&str] = &["last_name", "surname", "family_name"];
pub const FIRST_NAME_KEYS: &[&str] = &["first_name", "name", "given_name"];
pub const MIDDLE_NAME_KEYS: &[&str] = &["middle_name", "patronymic"];
pub const POSITION_KEYS: &[&str] = &["position", "job_title", "staff_position", "post", "staffPosition"];
pub const DEPARTMENT_KEYS: &[&str] = &[
    "department",
    "department_name",
    "department_title",
    "faculty",
    "faculty_name",
];
pub const TYPE_KEYS: &[&str] = &["type", "employee_type", "employeeType"];
pub const BIRTH_KEYS: &[&str] = &[
    "birth_date",
    "birthDate",
    "birthday",
    "birth_day",
    "date_of_birth",
    "dob",
    "birthdate",
];

/// Keys tried when a position or department arrives as a nested object
const NESTED_NAME_KEYS: &[&str] = &["name", "title", "full_name", "short_name"];

/// Length of the serialized-record fallback identity
const FINGERPRINT_CHARS: usize = 80;

static SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-]+").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// Lookup Helpers
// ============================================================================

/// First value among `keys` that is neither null nor an empty string
pub fn pick<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
}

/// Whether a value counts as set when used in a condition
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain-text rendering of a scalar; containers render empty
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Scalars as trimmed text, objects via their display-name field
pub fn text_or_name(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Array(_)) => String::new(),
        Some(Value::Object(nested)) => pick(nested, NESTED_NAME_KEYS)
            .map(scalar_text)
            .unwrap_or_default(),
        Some(scalar) => scalar_text(scalar).trim().to_string(),
    }
}

fn truthy_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    pick(fields, keys)
        .filter(|v| is_truthy(v))
        .map(scalar_text)
}

/// Lowercase, `_`/`-` runs to spaces, whitespace collapsed and trimmed
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let spaced = SEPARATOR_REGEX.replace_all(&lowered, " ");
    WHITESPACE_REGEX.replace_all(&spaced, " ").trim().to_string()
}

// ============================================================================
// Derived Attributes
// ============================================================================

/// Deduplication key: id-like field, then login-like field, then the first
/// 80 characters of the compact serialized record
///
/// Keys are JSON literals so `5` and `"5"` stay distinct. The last fallback
/// is not unique: records without id or login dedupe only when their
/// serialized prefixes agree.
pub fn identity_key(employee: &Employee) -> String {
    let fields = employee.fields();
    let chosen = pick(fields, ID_KEYS)
        .filter(|v| is_truthy(v))
        .or_else(|| pick(fields, LOGIN_KEYS).filter(|v| is_truthy(v)));

    match chosen {
        Some(value) => value.to_string(),
        None => Value::Object(fields.clone())
            .to_string()
            .chars()
            .take(FINGERPRINT_CHARS)
            .collect(),
    }
}

/// Display name: full name field, else the assembled name parts
pub fn full_name(employee: &Employee) -> Option<String> {
    let fields = employee.fields();
    if let Some(name) = truthy_text(fields, FULL_NAME_KEYS) {
        return Some(name);
    }

    let assembled = [LAST_NAME_KEYS, FIRST_NAME_KEYS, MIDDLE_NAME_KEYS]
        .iter()
        .filter_map(|keys| truthy_text(fields, keys))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    (!assembled.is_empty()).then_some(assembled)
}

/// One-line description used in every listing:
/// `fio (login) — position | department | type=kind`
pub fn short_description(employee: &Employee) -> String {
    let fields = employee.fields();

    let mut line = full_name(employee).unwrap_or_else(|| t!("employee.unknown").to_string());

    if let Some(login) = truthy_text(fields, DISPLAY_LOGIN_KEYS) {
        line.push_str(&format!(" ({login})"));
    }

    let position = text_or_name(pick(fields, POSITION_KEYS));
    if !position.is_empty() {
        line.push_str(&format!(" — {position}"));
    }

    let department = text_or_name(pick(fields, DEPARTMENT_KEYS));
    if !department.is_empty() {
        line.push_str(&format!(" | {department}"));
    }

    let kind = text_or_name(pick(fields, TYPE_KEYS));
    if !kind.is_empty() {
        line.push_str(&format!(" | type={kind}"));
    }

    line
}

/// Every scalar leaf of the record, space-joined and normalized
pub fn search_text(employee: &Employee) -> String {
    fn walk(value: &Value, parts: &mut Vec<String>) {
        match value {
            Value::Null => {}
            Value::Array(values) => values.iter().for_each(|v| walk(v, parts)),
            Value::Object(map) => map.values().for_each(|v| walk(v, parts)),
            scalar => parts.push(scalar_text(scalar)),
        }
    }

    let mut parts = Vec::new();
    for value in employee.fields().values() {
        walk(value, &mut parts);
    }
    normalize_text(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee(value: Value) -> Employee {
        Employee::from_value(value).unwrap()
    }

    #[test]
    fn test_pick_skips_null_and_empty() {
        let e = employee(json!({"id": null, "employee_id": "", "uuid": "u-1"}));
        assert_eq!(pick(e.fields(), ID_KEYS), Some(&json!("u-1")));
        assert_eq!(pick(e.fields(), LOGIN_KEYS), None);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Head__Teacher -- Of\tMath "), "head teacher of math");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_identity_key_order() {
        let by_id = employee(json!({"login": "ali", "id": 7}));
        assert_eq!(identity_key(&by_id), "7");

        let by_login = employee(json!({"id": 0, "username": "vali"}));
        assert_eq!(identity_key(&by_login), "\"vali\"");

        let numeric = employee(json!({"id": 5}));
        let textual = employee(json!({"id": "5"}));
        assert_ne!(identity_key(&numeric), identity_key(&textual));
    }

    /// Known weakness: the fingerprint fallback only sees the first 80
    /// characters, so distinct records with a long shared prefix collide.
    #[test]
    fn test_identity_key_fingerprint_collides_on_shared_prefix() {
        let padding = "x".repeat(100);
        let a = employee(json!({"note": padding.clone(), "first_name": "Ali"}));
        let b = employee(json!({"note": padding, "first_name": "Vali"}));
        assert_eq!(identity_key(&a).chars().count(), 80);
        assert_eq!(identity_key(&a), identity_key(&b));

        let c = employee(json!({"first_name": "Ali"}));
        let d = employee(json!({"first_name": "Ali", "extra": 1}));
        assert_ne!(identity_key(&c), identity_key(&d));
    }

    #[test]
    fn test_short_description_full() {
        let e = employee(json!({
            "full_name": "Aliyev Vali",
            "login": "vali01",
            "position": {"name": "Dotsent"},
            "department": "Matematika",
            "type": "teacher"
        }));
        assert_eq!(
            short_description(&e),
            "Aliyev Vali (vali01) — Dotsent | Matematika | type=teacher"
        );
    }

    #[test]
    fn test_short_description_name_parts() {
        let e = employee(json!({
            "surname": "Karimova",
            "first_name": "Dilnoza",
            "patronymic": "",
            "staff_position": 12
        }));
        assert_eq!(short_description(&e), "Karimova Dilnoza — 12");
    }

    #[test]
    fn test_short_description_unknown() {
        let e = employee(json!({"faculty": {"title": "Fizika"}}));
        assert_eq!(short_description(&e), "Noma'lum | Fizika");
    }

    #[test]
    fn test_text_or_name() {
        assert_eq!(text_or_name(Some(&json!("  Kafedra  "))), "Kafedra");
        assert_eq!(text_or_name(Some(&json!({"short_name": "KIF"}))), "KIF");
        assert_eq!(text_or_name(Some(&json!({"code": 1}))), "");
        assert_eq!(text_or_name(Some(&json!(true))), "true");
        assert_eq!(text_or_name(None), "");
    }

    #[test]
    fn test_search_text_flattens_leaves() {
        let e = employee(json!({
            "full_name": "ALIYEV Vali",
            "department": {"name": "Oliy_Matematika", "code": 42},
            "tags": ["a", null, false],
            "birth_date": 1.5
        }));
        assert_eq!(search_text(&e), "aliyev vali oliy matematika 42 a false 1.5");
    }
}
