//! One-shot, re-armable readiness latch.
//!
//! Level-triggered: once signaled, every waiter sees the same outcome until
//! the gate is re-armed.

use crate::Readiness;

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Armed,
    Signaled(bool),
}

/// Synchronization point between the owner thread and its callers.
#[derive(Debug)]
pub struct ReadinessGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl ReadinessGate {
    /// Create an armed (unsignaled) gate.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Armed),
            cond: Condvar::new(),
        }
    }

    /// Reset to the unsignaled state.
    ///
    /// Only meaningful before the owner thread starts. Returns `false` if
    /// the gate had already been signaled.
    pub fn arm(&self) -> bool {
        let mut state = self.state.lock();
        let was_armed = *state == GateState::Armed;
        *state = GateState::Armed;
        was_armed
    }

    /// Record the initialization outcome and release all waiters.
    ///
    /// Only the first signal per armed period counts.
    pub fn signal(&self, success: bool) {
        let mut state = self.state.lock();
        match *state {
            GateState::Armed => {
                *state = GateState::Signaled(success);
                self.cond.notify_all();
            }
            GateState::Signaled(previous) => {
                debug!(previous, ignored = success, "Readiness gate already signaled");
            }
        }
    }

    /// Block until signaled or until `timeout` elapses.
    ///
    /// A timeout too large to represent as a deadline waits indefinitely.
    pub fn wait_until_ready(&self, timeout: Duration) -> Readiness {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();

        loop {
            if let GateState::Signaled(success) = *state {
                return Self::readiness(success);
            }
            let Some(deadline) = deadline else {
                self.cond.wait(&mut state);
                continue;
            };
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                return match *state {
                    GateState::Signaled(success) => Self::readiness(success),
                    GateState::Armed => Readiness::TimedOut,
                };
            }
        }
    }

    /// Current outcome without blocking; `None` while still armed.
    pub fn peek(&self) -> Option<Readiness> {
        match *self.state.lock() {
            GateState::Armed => None,
            GateState::Signaled(success) => Some(Self::readiness(success)),
        }
    }

    fn readiness(success: bool) -> Readiness {
        if success {
            Readiness::Ready
        } else {
            Readiness::Failed
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
