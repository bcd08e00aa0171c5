//! Virtual delay timer: elapsed/remaining time against a caller-supplied
//! duration, independent of any media clock.
//!
//! The timer never fires on its own. Callers poll it and decide when to
//! `clear()` or `start()` again.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Clock, SystemClock};

/// Countdown driven purely by polling
#[derive(Debug, Clone)]
pub struct VirtualDelay {
    clock: Arc<dyn Clock>,
    total_duration_ms: u64,
    started_at_ms: Option<u64>,
}

impl VirtualDelay {
    /// Create an idle timer reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            total_duration_ms: 0,
            started_at_ms: None,
        }
    }

    /// Begin a new run, discarding any previous one. Negative totals clamp to 0.
    pub fn start(&mut self, total_ms: i64) {
        let total = u64::try_from(total_ms).unwrap_or(0);
        let now = self.clock.now_ms();
        self.total_duration_ms = total;
        self.started_at_ms = Some(now);
    }

    /// Back to the idle state
    pub fn clear(&mut self) {
        self.total_duration_ms = 0;
        self.started_at_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.started_at_ms.is_some() && self.total_duration_ms > 0
    }

    fn elapsed_ms(&self) -> u64 {
        match self.started_at_ms {
            Some(start) => self.clock.now_ms().saturating_sub(start),
            None => 0,
        }
    }

    /// Elapsed time capped at the total
    pub fn position_seconds(&self) -> f64 {
        self.total_duration_ms.min(self.elapsed_ms()) as f64 / 1000.0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.total_duration_ms as f64 / 1000.0
    }

    pub fn remaining_ms(&self) -> u64 {
        self.total_duration_ms.saturating_sub(self.elapsed_ms())
    }

    /// Read all derived values against a single clock reading
    pub fn snapshot(&self) -> DelaySnapshot {
        let elapsed = self.elapsed_ms();
        DelaySnapshot {
            active: self.is_active(),
            position_seconds: self.total_duration_ms.min(elapsed) as f64 / 1000.0,
            duration_seconds: self.duration_seconds(),
            remaining_ms: self.total_duration_ms.saturating_sub(elapsed),
        }
    }
}

impl Default for VirtualDelay {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

/// Point-in-time view of a timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySnapshot {
    pub active: bool,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub remaining_ms: u64,
}

/// Coerce an arbitrary numeric duration to whole milliseconds.
///
/// Negative and non-finite values become 0, fractions truncate, and values
/// beyond `i64::MAX` saturate.
pub fn clamp_duration_ms(value: f64) -> i64 {
    if !value.is_finite() || value <= 0.0 {
        0
    } else {
        // `as` saturates for out-of-range floats
        value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManualClock;

    fn timer() -> (VirtualDelay, ManualClock) {
        let clock = ManualClock::new();
        (VirtualDelay::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_fresh_timer_is_idle() {
        let (delay, _) = timer();
        assert!(!delay.is_active());
        assert_eq!(delay.position_seconds(), 0.0);
        assert_eq!(delay.duration_seconds(), 0.0);
        assert_eq!(delay.remaining_ms(), 0);
    }

    #[test]
    fn test_start_reports_full_remaining() {
        let (mut delay, _) = timer();
        delay.start(1000);
        assert!(delay.is_active());
        assert_eq!(delay.position_seconds(), 0.0);
        assert_eq!(delay.remaining_ms(), 1000);
        assert_eq!(delay.duration_seconds(), 1.0);
    }

    #[test]
    fn test_progress_after_advance() {
        let (mut delay, clock) = timer();
        delay.start(1000);
        clock.advance(400);

        assert!((delay.position_seconds() - 0.4).abs() < 1e-9);
        assert_eq!(delay.remaining_ms(), 600);

        // Repeated polls without time passing agree
        assert!((delay.position_seconds() - 0.4).abs() < 1e-9);
        assert_eq!(delay.remaining_ms(), 600);
    }

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let (mut delay, clock) = timer();
        delay.start(1000);

        let mut last_position = delay.position_seconds();
        let mut last_remaining = delay.remaining_ms();
        for _ in 0..15 {
            clock.advance(100);
            let position = delay.position_seconds();
            let remaining = delay.remaining_ms();
            assert!(position >= last_position);
            assert!(remaining <= last_remaining);
            last_position = position;
            last_remaining = remaining;
        }

        assert_eq!(delay.position_seconds(), 1.0);
        assert_eq!(delay.remaining_ms(), 0);
        // Running out does not clear the timer
        assert!(delay.is_active());
    }

    #[test]
    fn test_zero_duration_is_never_active() {
        let (mut delay, _) = timer();
        delay.start(0);
        assert!(!delay.is_active());
        assert_eq!(delay.remaining_ms(), 0);
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let (mut delay, clock) = timer();
        delay.start(-500);
        clock.advance(10);
        assert!(!delay.is_active());
        assert_eq!(delay.duration_seconds(), 0.0);
        assert_eq!(delay.position_seconds(), 0.0);
        assert_eq!(delay.remaining_ms(), 0);
    }

    #[test]
    fn test_restart_replaces_previous_run() {
        let (mut delay, clock) = timer();
        delay.start(1000);
        clock.advance(700);
        delay.start(2000);
        assert_eq!(delay.remaining_ms(), 2000);
        assert_eq!(delay.position_seconds(), 0.0);
    }

    #[test]
    fn test_clear_resets_and_is_idempotent() {
        let (mut delay, clock) = timer();
        delay.start(1000);
        clock.advance(300);

        delay.clear();
        let once = delay.snapshot();
        assert!(!delay.is_active());
        assert_eq!(delay.position_seconds(), 0.0);
        assert_eq!(delay.remaining_ms(), 0);

        delay.clear();
        assert_eq!(delay.snapshot(), once);
    }

    #[test]
    fn test_snapshot_matches_accessors() {
        let (mut delay, clock) = timer();
        delay.start(1500);
        clock.advance(500);
        let snapshot = delay.snapshot();
        assert!(snapshot.active);
        assert!((snapshot.position_seconds - 0.5).abs() < 1e-9);
        assert_eq!(snapshot.duration_seconds, 1.5);
        assert_eq!(snapshot.remaining_ms, 1000);
    }

    #[test]
    fn test_clamp_duration() {
        assert_eq!(clamp_duration_ms(1200.9), 1200);
        assert_eq!(clamp_duration_ms(-3.0), 0);
        assert_eq!(clamp_duration_ms(f64::NAN), 0);
        assert_eq!(clamp_duration_ms(f64::INFINITY), 0);
        assert_eq!(clamp_duration_ms(1e30), i64::MAX);
    }
}
