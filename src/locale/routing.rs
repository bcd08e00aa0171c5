//! Locale prefix computation and path-to-locale resolution

use std::{borrow::Cow, collections::BTreeMap, fmt};

use clap::ValueEnum;
use serde::Serialize;

use super::ConfigError;

/// How locales are reflected in the URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixMode {
    /// Every locale, the default included, lives under `/<locale>`
    Always,
    /// The default locale is served from the root, every other locale under `/<locale>`
    AsNeeded,
    /// Locales with a configured custom prefix use it, the rest behave as `as-needed`
    Custom,
}

impl fmt::Display for PrefixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefixMode::Always => "always",
            PrefixMode::AsNeeded => "as-needed",
            PrefixMode::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Immutable locale routing configuration.
///
/// Prefixes are derived once at construction and kept in a table parallel to
/// `locales`; every query reads that table.
#[derive(Debug, Clone)]
pub struct LocaleRouting {
    locales: Vec<String>,
    default_locale: String,
    prefix_mode: PrefixMode,
    prefixes: Vec<String>,
}

impl LocaleRouting {
    /// Validate the configuration and precompute the prefix table.
    pub fn new(
        locales: Vec<String>,
        default_locale: impl Into<String>,
        prefix_mode: PrefixMode,
        custom_prefixes: BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let default_locale = default_locale.into();

        if locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        for (index, locale) in locales.iter().enumerate() {
            if !is_valid_locale_code(locale) {
                return Err(ConfigError::InvalidLocaleCode(locale.clone()));
            }
            if locales[..index].contains(locale) {
                return Err(ConfigError::DuplicateLocale(locale.clone()));
            }
        }
        if !locales.contains(&default_locale) {
            return Err(ConfigError::UnknownDefaultLocale(default_locale));
        }
        for (locale, prefix) in &custom_prefixes {
            if !locales.contains(locale) {
                return Err(ConfigError::PrefixForUnknownLocale(locale.clone()));
            }
            if !is_valid_custom_prefix(prefix) {
                return Err(ConfigError::InvalidPrefix {
                    locale: locale.clone(),
                    prefix: prefix.clone(),
                });
            }
        }

        let prefixes: Vec<String> = locales
            .iter()
            .map(|locale| compute_prefix(prefix_mode, locale, &default_locale, &custom_prefixes))
            .collect();

        for i in 0..prefixes.len() {
            for j in (i + 1)..prefixes.len() {
                let (a, b) = (&prefixes[i], &prefixes[j]);
                if a.is_empty() || b.is_empty() {
                    continue;
                }
                if a == b || is_segment_parent(a, b) || is_segment_parent(b, a) {
                    return Err(ConfigError::OverlappingPrefixes {
                        first: locales[i].clone(),
                        second: locales[j].clone(),
                    });
                }
            }
        }

        Ok(Self {
            locales,
            default_locale,
            prefix_mode,
            prefixes,
        })
    }

    /// Shorthand for an `as-needed` configuration without custom prefixes
    pub fn as_needed(locales: &[&str], default_locale: &str) -> Result<Self, ConfigError> {
        Self::new(
            locales.iter().map(|l| l.to_string()).collect(),
            default_locale,
            PrefixMode::AsNeeded,
            BTreeMap::new(),
        )
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn prefix_mode(&self) -> PrefixMode {
        self.prefix_mode
    }

    /// URL prefix for a locale: empty, `/<locale>`, or a custom prefix
    pub fn prefix_for<'a>(&'a self, locale: &'a str) -> Cow<'a, str> {
        match self.locales.iter().position(|l| l == locale) {
            Some(index) => Cow::Borrowed(self.prefixes[index].as_str()),
            // Not configured, so no custom entry and never the default
            None => Cow::Owned(format!("/{}", locale)),
        }
    }

    /// Locale a request path belongs to.
    ///
    /// Returns `None` when the path starts with a configured locale code that
    /// is not that locale's active prefix (e.g. `/en/...` when `en` is served
    /// from the root).
    pub fn resolve_locale(&self, path: &str) -> Option<&str> {
        let matched = self
            .locales
            .iter()
            .zip(&self.prefixes)
            .find(|(_, prefix)| !prefix.is_empty() && path_has_prefix(path, prefix));
        if let Some((locale, _)) = matched {
            return Some(locale.as_str());
        }

        if path == "/" || !self.is_reserved_segment(first_segment(path)) {
            Some(self.default_locale.as_str())
        } else {
            None
        }
    }

    /// True for `/` and for a bare non-empty locale prefix
    pub fn is_locale_root(&self, path: &str) -> bool {
        path == "/" || self.prefixes.iter().any(|p| !p.is_empty() && p == path)
    }

    /// Path under a locale's prefix; `/` maps to the bare prefix
    pub fn localize(&self, locale: &str, path: &str) -> String {
        let prefix = self.prefix_for(locale);
        if prefix.is_empty() {
            path.to_string()
        } else if path == "/" || path.is_empty() {
            prefix.into_owned()
        } else {
            format!("{}{}", prefix, path)
        }
    }

    /// Remove a locale's prefix from a request path
    pub fn strip_prefix<'a>(&self, locale: &str, path: &'a str) -> &'a str {
        let prefix = self.prefix_for(locale);
        if prefix.is_empty() || !path_has_prefix(path, &prefix) {
            return path;
        }
        match &path[prefix.len()..] {
            "" => "/",
            rest => rest,
        }
    }

    fn is_reserved_segment(&self, segment: &str) -> bool {
        !segment.is_empty() && self.locales.iter().any(|l| l == segment)
    }
}

fn compute_prefix(
    mode: PrefixMode,
    locale: &str,
    default_locale: &str,
    custom_prefixes: &BTreeMap<String, String>,
) -> String {
    if mode == PrefixMode::Always {
        return format!("/{}", locale);
    }
    if mode == PrefixMode::Custom {
        if let Some(prefix) = custom_prefixes.get(locale) {
            return prefix.clone();
        }
    }
    if locale == default_locale {
        return String::new();
    }
    format!("/{}", locale)
}

/// `path` is exactly `prefix` or lives below it
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix || is_segment_parent(prefix, path)
}

fn is_segment_parent(parent: &str, path: &str) -> bool {
    path.len() > parent.len() && path.starts_with(parent) && path[parent.len()..].starts_with('/')
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

/// Locale codes are letter-led subtags of ASCII alphanumerics joined by `-`
fn is_valid_locale_code(code: &str) -> bool {
    if !code.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return false;
    }
    code.split('-')
        .all(|tag| !tag.is_empty() && tag.len() <= 8 && tag.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Custom prefixes are a single `/`-led path segment
fn is_valid_custom_prefix(prefix: &str) -> bool {
    match prefix.strip_prefix('/') {
        Some(segment) => {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_needed() -> LocaleRouting {
        LocaleRouting::as_needed(&["en", "pt", "es"], "en").unwrap()
    }

    fn custom(entries: &[(&str, &str)]) -> Result<LocaleRouting, ConfigError> {
        LocaleRouting::new(
            vec!["en".into(), "pt".into(), "es".into()],
            "en",
            PrefixMode::Custom,
            entries
                .iter()
                .map(|(l, p)| (l.to_string(), p.to_string()))
                .collect(),
        )
    }

    // ==================== prefix_for ====================

    #[test]
    fn test_as_needed_prefixes() {
        let routing = as_needed();
        assert_eq!(routing.prefix_for("en"), "");
        assert_eq!(routing.prefix_for("pt"), "/pt");
        assert_eq!(routing.prefix_for("es"), "/es");
    }

    #[test]
    fn test_always_prefixes_default_too() {
        let routing = LocaleRouting::new(
            vec!["en".into(), "pt".into()],
            "en",
            PrefixMode::Always,
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(routing.prefix_for("en"), "/en");
        assert_eq!(routing.prefix_for("pt"), "/pt");
    }

    #[test]
    fn test_custom_prefix_falls_back_to_as_needed() {
        let routing = custom(&[("pt", "/br")]).unwrap();
        assert_eq!(routing.prefix_for("pt"), "/br");
        assert_eq!(routing.prefix_for("en"), "");
        assert_eq!(routing.prefix_for("es"), "/es");
    }

    #[test]
    fn test_custom_prefix_can_move_default_locale() {
        let routing = custom(&[("en", "/us")]).unwrap();
        assert_eq!(routing.prefix_for("en"), "/us");
        assert_eq!(routing.resolve_locale("/us/home"), Some("en"));
    }

    #[test]
    fn test_unknown_locale_gets_plain_prefix() {
        assert_eq!(as_needed().prefix_for("fr"), "/fr");
    }

    // ==================== resolve_locale ====================

    #[test]
    fn test_resolve_prefixed_and_default_paths() {
        let routing = as_needed();
        assert_eq!(routing.resolve_locale("/pt/home"), Some("pt"));
        assert_eq!(routing.resolve_locale("/pt"), Some("pt"));
        assert_eq!(routing.resolve_locale("/es/templates/42"), Some("es"));
        assert_eq!(routing.resolve_locale("/home"), Some("en"));
        assert_eq!(routing.resolve_locale("/"), Some("en"));
    }

    #[test]
    fn test_resolve_requires_whole_segment() {
        let routing = as_needed();
        // "/ptx" is not under "/pt"
        assert_eq!(routing.resolve_locale("/ptx/home"), Some("en"));
        assert_eq!(routing.resolve_locale("/esperanto"), Some("en"));
    }

    #[test]
    fn test_resolve_reserved_segment_without_prefix() {
        let routing = as_needed();
        assert_eq!(routing.resolve_locale("/en/home"), None);

        let routing = custom(&[("pt", "/br")]).unwrap();
        assert_eq!(routing.resolve_locale("/br/home"), Some("pt"));
        assert_eq!(routing.resolve_locale("/pt/home"), None);
    }

    #[test]
    fn test_resolve_first_configured_locale_wins() {
        let routing = LocaleRouting::new(
            vec!["pt-br".into(), "pt".into(), "en".into()],
            "en",
            PrefixMode::AsNeeded,
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(routing.resolve_locale("/pt-br/home"), Some("pt-br"));
        assert_eq!(routing.resolve_locale("/pt/home"), Some("pt"));
    }

    // ==================== is_locale_root ====================

    #[test]
    fn test_locale_roots() {
        let routing = as_needed();
        assert!(routing.is_locale_root("/"));
        assert!(routing.is_locale_root("/pt"));
        assert!(routing.is_locale_root("/es"));
        assert!(!routing.is_locale_root("/pt/home"));
        assert!(!routing.is_locale_root("/home"));
        assert!(!routing.is_locale_root("/en"));
    }

    // ==================== localize / strip_prefix ====================

    #[test]
    fn test_localize() {
        let routing = as_needed();
        assert_eq!(routing.localize("en", "/home"), "/home");
        assert_eq!(routing.localize("en", "/"), "/");
        assert_eq!(routing.localize("pt", "/home"), "/pt/home");
        assert_eq!(routing.localize("pt", "/"), "/pt");
    }

    #[test]
    fn test_strip_prefix() {
        let routing = as_needed();
        assert_eq!(routing.strip_prefix("pt", "/pt/home"), "/home");
        assert_eq!(routing.strip_prefix("pt", "/pt"), "/");
        assert_eq!(routing.strip_prefix("en", "/home"), "/home");
        assert_eq!(routing.strip_prefix("pt", "/ptx"), "/ptx");
    }

    // ==================== validation ====================

    #[test]
    fn test_rejects_empty_locales() {
        let err = LocaleRouting::as_needed(&[], "en").unwrap_err();
        assert_eq!(err, ConfigError::NoLocales);
    }

    #[test]
    fn test_rejects_unknown_default() {
        let err = LocaleRouting::as_needed(&["en", "pt"], "fr").unwrap_err();
        assert_eq!(err, ConfigError::UnknownDefaultLocale("fr".into()));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_codes() {
        assert_eq!(
            LocaleRouting::as_needed(&["en", "en"], "en").unwrap_err(),
            ConfigError::DuplicateLocale("en".into())
        );
        for bad in ["", "1en", "en/us", "en--us", "en_US"] {
            assert_eq!(
                LocaleRouting::as_needed(&[bad, "en"], "en").unwrap_err(),
                ConfigError::InvalidLocaleCode(bad.into()),
                "code {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_bad_custom_prefixes() {
        assert!(matches!(
            custom(&[("pt", "br")]),
            Err(ConfigError::InvalidPrefix { .. })
        ));
        assert!(matches!(
            custom(&[("pt", "/br/x")]),
            Err(ConfigError::InvalidPrefix { .. })
        ));
        assert_eq!(
            custom(&[("fr", "/fr")]).unwrap_err(),
            ConfigError::PrefixForUnknownLocale("fr".into())
        );
    }

    #[test]
    fn test_rejects_colliding_prefixes() {
        let err = custom(&[("pt", "/es")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OverlappingPrefixes {
                first: "pt".into(),
                second: "es".into(),
            }
        );
    }
}
