//! API response structures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{locale::PrefixMode, routes::Page, state::DelaySnapshot};

/// Page descriptor returned for every routed page request
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub locale: String,
    pub page: Page,
    pub pattern: String,
    pub params: BTreeMap<String, String>,
    pub path: String,
}

/// Timer state of one playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub delay: DelaySnapshot,
    pub timestamp: DateTime<Utc>,
}

impl DelayResponse {
    pub fn new(session_id: String, delay: DelaySnapshot) -> Self {
        Self {
            session_id,
            delay,
            timestamp: Utc::now(),
        }
    }
}

/// Service status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub locales: Vec<String>,
    pub default_locale: String,
    pub prefix_mode: PrefixMode,
    pub routes: usize,
    pub active_sessions: usize,
    pub uptime: String,
}

/// Error body for 4xx and 503 responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    fn new(status: &str, message: String) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn not_found(message: String) -> Self {
        Self::new("not_found", message)
    }

    pub fn bad_request(message: String) -> Self {
        Self::new("bad_request", message)
    }

    pub fn unavailable(message: String) -> Self {
        Self::new("unavailable", message)
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
