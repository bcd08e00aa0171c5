//! Shadowing Gateway - locale-aware edge service for Language Shadowing
//! 
//! This library resolves request locales from URL prefixes, runs the
//! checkout-success redirect rule, serves page descriptors from an explicit
//! route table and hosts the virtual delay timers that drive playback progress.

pub mod config;
pub mod locale;
pub mod checkout;
pub mod routes;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use locale::{ConfigError, LocaleRouting, PrefixMode};
pub use state::{AppState, VirtualDelay};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
