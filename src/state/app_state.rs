//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::{debug, info};

use super::{
    playback::{validate_session_id, SessionError},
    Clock, DelaySnapshot, PlaybackSession, SystemClock, VirtualDelay,
};
use crate::{
    locale::LocaleRouting,
    routes::{default_routes, RouteTable},
};

/// Sessions allowed at once unless configured otherwise
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Application state shared by every handler and background task.
///
/// Built once at startup and passed around behind an `Arc`.
#[derive(Debug)]
pub struct AppState {
    /// Locale routing configuration
    pub routing: LocaleRouting,
    /// Page routes behind the locale proxy
    pub routes: RouteTable,
    /// Public origin used in the sitemap
    pub base_url: String,
    /// Playback sessions untouched for this long are dropped
    pub session_ttl: Duration,
    /// Upper bound on live playback sessions
    pub max_sessions: usize,
    /// Time source for every virtual delay
    pub clock: Arc<dyn Clock>,
    /// Playback sessions keyed by client session id
    pub sessions: Arc<Mutex<HashMap<String, PlaybackSession>>>,
    /// Server metadata
    pub start_time: Instant,
}

impl AppState {
    /// Create an AppState on the system clock with the default page routes
    pub fn new(routing: LocaleRouting, base_url: String, session_ttl: Duration) -> Self {
        Self::with_clock(routing, base_url, session_ttl, Arc::new(SystemClock::new()))
    }

    /// Create an AppState reading time from `clock`
    pub fn with_clock(
        routing: LocaleRouting,
        base_url: String,
        session_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            routing,
            routes: default_routes(),
            base_url,
            session_ttl,
            max_sessions: DEFAULT_MAX_SESSIONS,
            clock,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            start_time: Instant::now(),
        }
    }

    /// Cap the number of live playback sessions
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// Start (or restart) the timer of a session, creating the session if needed.
    ///
    /// New sessions are refused once `max_sessions` are live; restarting an
    /// existing one always succeeds.
    pub fn start_delay(&self, session_id: &str, total_ms: i64) -> Result<DelaySnapshot, SessionError> {
        validate_session_id(session_id)?;

        let now = self.clock.now_ms();
        let mut sessions = self.sessions.lock()
            .map_err(|e| SessionError::Lock(e.to_string()))?;

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            return Err(SessionError::TooManySessions(self.max_sessions));
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| PlaybackSession::new(VirtualDelay::new(Arc::clone(&self.clock)), now));
        session.delay.start(total_ms);
        session.touch(now);

        info!("Started delay for session {}: {}ms", session_id, total_ms.max(0));
        Ok(session.snapshot())
    }

    /// Poll a session's timer; `None` if the session does not exist
    pub fn poll_delay(&self, session_id: &str) -> Result<Option<DelaySnapshot>, String> {
        let now = self.clock.now_ms();
        let mut sessions = self.sessions.lock()
            .map_err(|e| format!("Failed to lock sessions: {}", e))?;

        Ok(sessions.get_mut(session_id).map(|session| {
            session.touch(now);
            session.snapshot()
        }))
    }

    /// Clear a session's timer; `None` if the session does not exist
    pub fn clear_delay(&self, session_id: &str) -> Result<Option<DelaySnapshot>, String> {
        let now = self.clock.now_ms();
        let mut sessions = self.sessions.lock()
            .map_err(|e| format!("Failed to lock sessions: {}", e))?;

        Ok(sessions.get_mut(session_id).map(|session| {
            session.delay.clear();
            session.touch(now);
            debug!("Cleared delay for session {}", session_id);
            session.snapshot()
        }))
    }

    /// Drop sessions idle for longer than the TTL, returning how many went
    pub fn sweep_idle_sessions(&self) -> Result<usize, String> {
        let now = self.clock.now_ms();
        let ttl_ms = u64::try_from(self.session_ttl.as_millis()).unwrap_or(u64::MAX);
        let mut sessions = self.sessions.lock()
            .map_err(|e| format!("Failed to lock sessions: {}", e))?;

        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, ttl_ms));
        Ok(before - sessions.len())
    }

    /// Number of live playback sessions
    pub fn session_count(&self) -> Result<usize, String> {
        self.sessions.lock()
            .map(|sessions| sessions.len())
            .map_err(|e| format!("Failed to lock sessions: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManualClock;

    fn state() -> (AppState, ManualClock) {
        let clock = ManualClock::new();
        let routing = LocaleRouting::as_needed(&["en", "pt"], "en").unwrap();
        let state = AppState::with_clock(
            routing,
            "http://localhost".to_string(),
            Duration::from_secs(60),
            Arc::new(clock.clone()),
        );
        (state, clock)
    }

    #[test]
    fn test_sessions_are_independent() {
        let (state, clock) = state();
        state.start_delay("a", 1000).unwrap();
        clock.advance(300);
        state.start_delay("b", 1000).unwrap();

        assert_eq!(state.poll_delay("a").unwrap().unwrap().remaining_ms, 700);
        assert_eq!(state.poll_delay("b").unwrap().unwrap().remaining_ms, 1000);
        assert!(state.poll_delay("c").unwrap().is_none());
    }

    #[test]
    fn test_clear_keeps_session_but_stops_timer() {
        let (state, _) = state();
        state.start_delay("a", 1000).unwrap();
        let cleared = state.clear_delay("a").unwrap().unwrap();
        assert!(!cleared.active);
        assert_eq!(cleared.remaining_ms, 0);
        assert_eq!(state.session_count().unwrap(), 1);
        assert!(state.clear_delay("missing").unwrap().is_none());
    }

    #[test]
    fn test_sweep_drops_only_idle_sessions() {
        let (state, clock) = state();
        state.start_delay("old", 1000).unwrap();
        clock.advance(45_000);
        state.start_delay("fresh", 1000).unwrap();
        clock.advance(20_000);

        assert_eq!(state.sweep_idle_sessions().unwrap(), 1);
        assert!(state.poll_delay("old").unwrap().is_none());
        assert!(state.poll_delay("fresh").unwrap().is_some());
    }

    #[test]
    fn test_session_cap_refuses_new_ids_only() {
        let (state, _) = state();
        let state = state.with_max_sessions(2);
        state.start_delay("a", 1000).unwrap();
        state.start_delay("b", 1000).unwrap();

        assert_eq!(
            state.start_delay("c", 1000).unwrap_err(),
            SessionError::TooManySessions(2)
        );
        // Existing sessions can still restart
        assert!(state.start_delay("a", 500).is_ok());
        assert_eq!(state.session_count().unwrap(), 2);
    }

    #[test]
    fn test_session_cap_frees_up_after_sweep() {
        let (state, clock) = state();
        let state = state.with_max_sessions(1);
        state.start_delay("a", 1000).unwrap();
        clock.advance(61_000);
        state.sweep_idle_sessions().unwrap();
        assert!(state.start_delay("b", 1000).is_ok());
    }

    #[test]
    fn test_bad_session_ids_are_rejected() {
        let (state, _) = state();
        let long = "x".repeat(200);
        for id in ["", "a b", "../etc", long.as_str()] {
            assert!(
                matches!(state.start_delay(id, 1000), Err(SessionError::InvalidSessionId(_))),
                "id {:?} should be rejected",
                id
            );
        }
        assert_eq!(state.session_count().unwrap(), 0);
    }

    #[test]
    fn test_polling_keeps_session_alive() {
        let (state, clock) = state();
        state.start_delay("a", 1000).unwrap();
        clock.advance(50_000);
        state.poll_delay("a").unwrap();
        clock.advance(50_000);
        assert_eq!(state.sweep_idle_sessions().unwrap(), 0);
    }
}
