//! Playback session: one virtual delay per client session

use thiserror::Error;

use super::{DelaySnapshot, VirtualDelay};

/// Longest accepted session id
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Reasons a session could not be started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid session id '{0}'")]
    InvalidSessionId(String),

    #[error("session limit of {0} reached")]
    TooManySessions(usize),

    #[error("failed to lock sessions: {0}")]
    Lock(String),
}

/// Session ids are 1 to 128 ASCII alphanumerics, `-` or `_`
pub fn validate_session_id(session_id: &str) -> Result<(), SessionError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        let shown: String = session_id.chars().take(32).collect();
        Err(SessionError::InvalidSessionId(shown))
    }
}

/// A client's timer plus the last time the client touched it
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub delay: VirtualDelay,
    /// Clock reading (ms) of the last start/poll/clear
    pub touched_ms: u64,
}

impl PlaybackSession {
    pub fn new(delay: VirtualDelay, now_ms: u64) -> Self {
        Self {
            delay,
            touched_ms: now_ms,
        }
    }

    pub fn touch(&mut self, now_ms: u64) {
        self.touched_ms = self.touched_ms.max(now_ms);
    }

    /// Untouched for at least `ttl_ms`
    pub fn is_idle(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.touched_ms) >= ttl_ms
    }

    pub fn snapshot(&self) -> DelaySnapshot {
        self.delay.snapshot()
    }
}
