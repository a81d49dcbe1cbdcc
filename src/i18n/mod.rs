//! Internationalization: localized strings for everything the bot says.
//!
//! Uses a simple `t(key, lang)` function for static strings and format
//! helpers for strings with interpolation. Languages are ISO 639-1 codes:
//! English (fallback), Spanish, German.

mod format;
mod labels;

#[cfg(test)]
mod tests;

pub use format::*;

/// Language of sessions that have not picked one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported languages as `(code, native name)`.
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("es", "Español"), ("de", "Deutsch")];

pub fn is_supported(lang: &str) -> bool {
    LANGUAGES.iter().any(|(code, _)| *code == lang)
}

/// Return a localized static string for `key` in the given `lang`.
/// Falls back to English for unknown keys or unsupported languages.
pub fn t(key: &str, lang: &str) -> &'static str {
    labels::lookup(key, lang).unwrap_or("???")
}
