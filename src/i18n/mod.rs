//! Localized chat replies
//!
//! Every user-facing string the bot sends lives in `locales/*.yml` and is
//! rendered through [`t!`]. Uzbek (`uz`) is both the shipped and the fallback
//! locale; the HEMIS `l=` request parameter (e.g. `uz-UZ`) maps onto it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hodimbot::i18n::{t, set_locale};
//!
//! set_locale("uz-UZ");
//! let msg = t!("list.empty", kind = "teacher");
//! ```

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

/// Locales with a translation file under `locales/`
pub const SUPPORTED_LOCALES: &[&str] = &["uz"];

/// Locale used when the requested one has no translation file
pub const FALLBACK_LOCALE: &str = "uz";

/// Set the current locale for translations
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(&normalized);
}

/// Initialize from `HODIMBOT_LANG`, falling back to Uzbek
pub fn init_from_env() {
    let locale = std::env::var("HODIMBOT_LANG").unwrap_or_else(|_| FALLBACK_LOCALE.to_string());
    set_locale(&locale);
}

/// Reduce `uz-UZ`, `uz_Latn`, `UZ` and friends to a supported locale code
fn normalize_locale(locale: &str) -> String {
    let lower = locale.trim().to_lowercase();
    let primary = lower.split(['-', '_']).next().unwrap_or_default();

    if SUPPORTED_LOCALES.contains(&primary) {
        primary.to_string()
    } else {
        FALLBACK_LOCALE.to_string()
    }
}

#[doc(inline)]
pub use rust_i18n::t;
