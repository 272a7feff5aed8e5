//! Tests for config loading

mod common;

use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

use common::{test_config, StaticSource};
use hodimbot::app::App;
use hodimbot::config::Config;
use hodimbot::error::{Error, ErrorCategory, SchedulerError};

const VARS: &[&str] = &[
    "BOT_TOKEN",
    "ADMIN_IDS",
    "TARGET_CHAT_ID",
    "HEMIS_BASE",
    "HEMIS_TOKEN",
    "EMPLOYEE_TYPES",
    "HEMIS_PAGE_LIMIT",
    "DATA_DIR",
    "TYPE_LIST_PAGE_SIZE",
    "CRON_TIME",
    "TZ",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    std::env::set_var("HEMIS_TOKEN", "secret");

    let config = Config::from_env().unwrap();
    assert_eq!(config.hemis.base_url, "https://student.sies.uz/rest");
    assert_eq!(config.hemis.employee_types, vec!["staff"]);
    assert_eq!(config.hemis.page_limit, 200);
    assert_eq!(config.hemis.language, "uz-UZ");
    assert_eq!(config.schedule.cron_time, "0 9 * * *");
    assert_eq!(config.schedule.timezone, "Asia/Tashkent");
    assert_eq!(config.cache.data_dir, PathBuf::from("data"));
    assert!(config.telegram.admin_ids.is_empty());
    assert!(config.validate().is_ok());
    assert!(config.validate_bot().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("BOT_TOKEN", "123:abc");
    std::env::set_var("HEMIS_TOKEN", "secret");
    std::env::set_var("ADMIN_IDS", "11, 22");
    std::env::set_var("EMPLOYEE_TYPES", "teacher,staff");
    std::env::set_var("TYPE_LIST_PAGE_SIZE", "40");
    std::env::set_var("HEMIS_PAGE_LIMIT", "not-a-number");
    std::env::set_var("TZ", "UTC");
    std::env::set_var("DATA_DIR", "/var/lib/hodimbot");

    let config = Config::from_env().unwrap();
    assert_eq!(config.telegram.admin_ids, vec!["11", "22"]);
    assert_eq!(config.hemis.employee_types, vec!["teacher", "staff"]);
    assert_eq!(config.list_page_size(), 25);
    assert_eq!(config.hemis.page_limit, 200);
    assert_eq!(
        config.cache_path(),
        PathBuf::from("/var/lib/hodimbot/employees_cache.json")
    );
    assert!(config.validate_bot().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_rejected() {
    clear_env();
    std::env::set_var("HEMIS_TOKEN", "secret");
    std::env::set_var("TZ", "Nowhere/City");
    assert!(Config::from_env().unwrap().validate().is_err());

    std::env::set_var("TZ", "Asia/Tashkent");
    std::env::set_var("CRON_TIME", "0 9 * * 1-5");
    assert!(Config::from_env().unwrap().validate().is_err());

    clear_env();
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[telegram]
bot_token = "123:abc"
admin_ids = ["7"]

[hemis]
token = "secret"
employee_types = ["teacher", "employee"]

[schedule]
cron_time = "30 8 * * *"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.telegram.admin_ids, vec!["7"]);
    assert_eq!(config.hemis.employee_types, vec!["teacher", "employee"]);
    assert_eq!(config.hemis.page_limit, 200);
    assert_eq!(config.schedule.timezone, "Asia/Tashkent");
    assert_eq!(config.daily_schedule().unwrap().hour(), 8);
    assert!(config.validate_bot().is_ok());
}

#[test]
fn test_from_file_rejects_bad_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[hemis\ntoken = ").unwrap();
    assert!(Config::from_file(file.path()).is_err());
}

/// Test schedule problems reach the app as scheduler errors
#[test]
fn test_app_rejects_bad_schedule() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = Arc::new(StaticSource::default());

    let mut config = test_config(dir.path());
    config.schedule.timezone = "Nowhere/City".to_string();
    let err = App::with_source(config, source.clone()).err().unwrap();
    assert_eq!(err.category(), ErrorCategory::Scheduler);
    assert!(matches!(
        err,
        Error::Scheduler(SchedulerError::InvalidTimezone { ref tz }) if tz == "Nowhere/City"
    ));

    let mut config = test_config(dir.path());
    config.schedule.cron_time = "0 9 * * 1-5".to_string();
    let err = App::with_source(config, source).err().unwrap();
    assert!(matches!(err, Error::Scheduler(SchedulerError::InvalidCron { .. })));
}
