/// How a stop request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing to stop: no owner, or it had already finished.
    AlreadyStopped,
    /// The owner thread exited within the bound and was joined.
    Joined,
    /// Requested from the owner thread itself; quit was posted and the loop
    /// returns once the current work item finishes.
    Deferred,
    /// The owner thread outlived the bound and was detached.
    Abandoned,
    /// The owner thread outlived the bound and was forcibly cancelled.
    Terminated,
}
