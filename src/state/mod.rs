//! State management module
//!
//! This module contains the shared application state, the virtual delay timer
//! and the clocks it reads.

pub mod app_state;
pub mod clock;
pub mod playback;
pub mod virtual_delay;

// Re-export main types
pub use app_state::{AppState, DEFAULT_MAX_SESSIONS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use playback::{PlaybackSession, SessionError};
pub use virtual_delay::{clamp_duration_ms, DelaySnapshot, VirtualDelay};
