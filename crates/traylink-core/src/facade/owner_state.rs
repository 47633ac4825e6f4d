use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one owner thread. Strictly monotonic per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OwnerState {
    /// Constructed, thread not spawned yet.
    NotStarted = 0,
    /// Thread spawned, runtime under construction.
    Initializing = 1,
    /// Runtime ready, thread blocked in the foreign loop.
    Running = 2,
    /// Quit posted, waiting for the loop to return.
    StoppingRequested = 3,
    /// Thread finished.
    Stopped = 4,
}

impl OwnerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => OwnerState::NotStarted,
            1 => OwnerState::Initializing,
            2 => OwnerState::Running,
            3 => OwnerState::StoppingRequested,
            _ => OwnerState::Stopped,
        }
    }
}

/// Atomic cell holding an [`OwnerState`] that only moves forward.
#[derive(Debug)]
pub(crate) struct AtomicOwnerState(AtomicU8);

impl AtomicOwnerState {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(OwnerState::NotStarted as u8))
    }

    pub(crate) fn load(&self) -> OwnerState {
        OwnerState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from exactly `from` to `to`. Fails if the state is anything else.
    pub(crate) fn transition(&self, from: OwnerState, to: OwnerState) -> bool {
        from < to
            && self
                .0
                .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    /// Move forward to `to` unless already at or past it.
    ///
    /// Returns the state observed before the call.
    pub(crate) fn advance(&self, to: OwnerState) -> OwnerState {
        OwnerState::from_u8(self.0.fetch_max(to as u8, Ordering::AcqRel))
    }
}
