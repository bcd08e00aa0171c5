//! Locale routing module
//!
//! This module holds the locale routing configuration, the prefix and
//! resolution rules built on it, and the errors raised while validating it.

pub mod error;
pub mod routing;

// Re-export main types
pub use error::ConfigError;
pub use routing::{LocaleRouting, PrefixMode};
