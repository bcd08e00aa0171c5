//! Configuration and CLI argument handling

use std::{collections::BTreeMap, time::Duration};

use clap::Parser;

use crate::locale::{ConfigError, LocaleRouting, PrefixMode};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "shadowing-gateway")]
#[command(about = "Locale-aware gateway and playback timer service for Language Shadowing")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "3100")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Supported locales, in resolution order
    #[arg(long, value_delimiter = ',', default_value = "en,pt,es")]
    pub locales: Vec<String>,

    /// Locale served when a path carries no prefix
    #[arg(long, default_value = "en")]
    pub default_locale: String,

    /// How locales show up in URL paths
    #[arg(long, value_enum, default_value_t = PrefixMode::AsNeeded)]
    pub prefix_mode: PrefixMode,

    /// Custom prefix for a locale as locale=/prefix (custom mode, repeatable)
    #[arg(long = "locale-prefix")]
    pub locale_prefixes: Vec<String>,

    /// Public origin used when rendering the sitemap
    #[arg(long, default_value = "http://localhost:3100")]
    pub base_url: String,

    /// Drop playback sessions untouched for this many seconds
    #[arg(long, default_value = "900", value_parser = clap::value_parser!(u64).range(1..))]
    pub session_ttl_secs: u64,

    /// Most playback sessions kept at once
    #[arg(long, default_value = "10000", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_sessions: u64,

    /// How often to look for idle playback sessions, in seconds
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn max_sessions(&self) -> usize {
        usize::try_from(self.max_sessions).unwrap_or(usize::MAX)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate the locale arguments and build the routing configuration
    pub fn locale_routing(&self) -> Result<LocaleRouting, ConfigError> {
        let mut custom_prefixes = BTreeMap::new();
        for entry in &self.locale_prefixes {
            let (locale, prefix) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPrefixEntry(entry.clone()))?;
            let locale = locale.trim();
            if locale.is_empty() {
                return Err(ConfigError::MalformedPrefixEntry(entry.clone()));
            }
            custom_prefixes.insert(locale.to_string(), prefix.trim().to_string());
        }

        let locales = self
            .locales
            .iter()
            .map(|locale| locale.trim().to_string())
            .filter(|locale| !locale.is_empty())
            .collect();

        LocaleRouting::new(
            locales,
            self.default_locale.trim(),
            self.prefix_mode,
            custom_prefixes,
        )
    }
}
