//! Locale configuration errors

use thiserror::Error;

/// Errors raised while building the locale routing configuration.
///
/// All of these are startup failures; a running server never produces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one locale must be configured")]
    NoLocales,

    #[error("invalid locale code: '{0}'")]
    InvalidLocaleCode(String),

    #[error("locale '{0}' is listed more than once")]
    DuplicateLocale(String),

    #[error("default locale '{0}' is not one of the configured locales")]
    UnknownDefaultLocale(String),

    #[error("malformed locale prefix entry '{0}', expected locale=/prefix")]
    MalformedPrefixEntry(String),

    #[error("custom prefix given for unknown locale '{0}'")]
    PrefixForUnknownLocale(String),

    #[error("invalid prefix '{prefix}' for locale '{locale}'")]
    InvalidPrefix { locale: String, prefix: String },

    #[error("locales '{first}' and '{second}' have overlapping prefixes")]
    OverlappingPrefixes { first: String, second: String },
}
