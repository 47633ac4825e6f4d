//! The foreign event loop the owner thread runs inside.
//!
//! A [`Runtime`] is a `Send + Sync` factory. Its [`Runtime::initialize`] is
//! called on the owner thread and produces the `!Send` [`ForeignLoop`],
//! which stays on that thread for its whole life. Other threads only ever
//! see the loop through its [`LoopWaker`].

use std::sync::Arc;

use thiserror::Error;

/// Error returned by a runtime that could not be constructed.
pub type RuntimeError = Box<dyn std::error::Error + Send + Sync>;

/// Factory for the foreign runtime driven by the owner thread.
pub trait Runtime: Send + Sync + 'static {
    /// The loop produced on the owner thread.
    type Loop: ForeignLoop;

    /// Construct the foreign runtime. Runs on the owner thread.
    fn initialize(&self, generation: u32) -> Result<Self::Loop, RuntimeError>;
}

/// A blocking, run-to-completion event loop pinned to the owner thread.
pub trait ForeignLoop {
    /// Cross-thread handle used to wake or quit this loop.
    fn waker(&self) -> Arc<dyn LoopWaker>;

    /// Block inside the loop until quit is requested.
    ///
    /// Implementations must call `pump` once on entry and again every time
    /// [`LoopWaker::wake`] is delivered. `pump` drains the work queue.
    fn run_until_stopped(&mut self, pump: &mut dyn FnMut());

    /// Release runtime-owned state. Runs on the owner thread after the loop
    /// has returned and before the thread exits.
    fn teardown(&mut self) {}
}

/// Cross-thread control of a [`ForeignLoop`].
pub trait LoopWaker: Send + Sync {
    /// Ask the loop to call its pump.
    fn wake(&self) -> Result<(), WakeError>;

    /// Ask the loop to return from [`ForeignLoop::run_until_stopped`].
    fn request_quit(&self) -> Result<(), WakeError>;
}

/// Posting into the foreign loop failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeError {
    /// The loop has already exited and no longer accepts events.
    #[error("event loop is gone")]
    LoopGone,
}
