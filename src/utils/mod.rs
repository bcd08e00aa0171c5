//! Process-level helpers
//!
//! Currently only shutdown signal handling for the HTTP server.

pub mod signals;

pub use signals::shutdown_signal;
