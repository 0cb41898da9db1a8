//! One-slot move gate.
//!
//! Pointer-move events can arrive faster than the chart paints. The gate lets
//! at most one move through at a time; a move that arrives while the gate is
//! closed is dropped, not queued, since a newer position supersedes it.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use serde::{Deserialize, Serialize};

/// When a closed gate reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleMode {
    /// Reopen as soon as the move that closed it has been published.
    #[default]
    InFlight,
    /// Stay closed until the host signals the next animation frame.
    PerFrame,
}

/// The gate itself.
#[derive(Debug, Clone, Default)]
pub struct FrameThrottle {
    mode: ThrottleMode,
    closed: bool,
}

impl FrameThrottle {
    #[must_use]
    pub fn new(mode: ThrottleMode) -> Self {
        Self { mode, closed: false }
    }

    #[must_use]
    pub fn mode(&self) -> ThrottleMode {
        self.mode
    }

    /// Whether a move is in flight (or, per-frame, already handled this frame).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the gate. Returns `false`, leaving state untouched, if it was
    /// already closed.
    pub fn try_acquire(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        true
    }

    /// The move that acquired the gate has finished.
    pub fn release(&mut self) {
        if self.mode == ThrottleMode::InFlight {
            self.closed = false;
        }
    }

    /// A new animation frame started. Reopens the gate in every mode.
    pub fn next_frame(&mut self) {
        self.closed = false;
    }
}
