//! Idle playback session sweeper

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that periodically drops abandoned playback sessions.
///
/// Timers themselves are never cleared here; only sessions no client has
/// touched within the TTL are removed.
pub async fn session_sweeper_task(state: Arc<AppState>, every: Duration) {
    info!(
        "Starting session sweeper task (every {}s, ttl {}s)",
        every.as_secs(),
        state.session_ttl.as_secs()
    );

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match state.sweep_idle_sessions() {
            Ok(0) => debug!("No idle playback sessions"),
            Ok(removed) => info!("Dropped {} idle playback sessions", removed),
            Err(e) => warn!("Failed to sweep playback sessions: {}", e),
        }
    }
}
