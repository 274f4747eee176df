//! Cancellable hover debounce timer.
//!
//! Per-pixel hit-testing during fast mouse movement is bounded by
//! collapsing pointer-move bursts: each new move replaces the pending
//! point, so at most one hover computation is ever outstanding. The timer
//! is pure data; the host drives it by calling
//! [`crate::AnnotationsOverlay::poll_hover`] on its own cadence.

use kurbo::Point;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Delay before a scheduled hover computation fires.
pub const HOVER_DEBOUNCE_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    position: Point,
}

/// At most one pending hover computation per overlay instance.
#[derive(Debug, Clone)]
pub struct HoverDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl HoverDebouncer {
    /// Create a debouncer with a custom delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a hover computation for `position`, replacing any pending
    /// one.
    pub fn schedule(&mut self, position: Point, now: Instant) {
        self.pending = Some(Pending {
            due: now + self.delay,
            position,
        });
    }

    /// Cancel the pending computation, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a computation is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fire the pending computation if its deadline has passed, returning
    /// the most recent scheduled position. Fires at most once per schedule.
    pub fn poll(&mut self, now: Instant) -> Option<Point> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.position)
            }
            _ => None,
        }
    }
}

impl Default for HoverDebouncer {
    fn default() -> Self {
        Self::new(HOVER_DEBOUNCE_DELAY)
    }
}
