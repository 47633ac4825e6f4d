/// Outcome of waiting on a [`ReadinessGate`](crate::ReadinessGate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The owner signaled successful initialization.
    Ready,
    /// The owner signaled that initialization failed.
    Failed,
    /// No signal arrived before the timeout elapsed.
    TimedOut,
}
