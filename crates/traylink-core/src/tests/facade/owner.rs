use crate::{
    EventLoopOwner, FacadeConfig, FacadeError, OwnerState, Readiness, StopOutcome,
    tests::support::{MockBehavior, MockRuntime, MockStats, fast_config},
};

use std::{
    sync::{Arc, atomic::Ordering},
    thread,
    time::{Duration, Instant},
};

fn owner_with(
    behavior: MockBehavior,
    config: FacadeConfig,
) -> (EventLoopOwner<MockRuntime>, Arc<MockStats>) {
    let (runtime, stats) = MockRuntime::new(behavior);
    (EventLoopOwner::new(1, Arc::new(runtime), config), stats)
}

/// WHAT: A started owner becomes ready on its own thread
/// WHY: The foreign loop must never run on the caller's thread
#[test]
#[allow(clippy::unwrap_used)]
fn given_new_owner_when_started_then_running_on_dedicated_thread() {
    // Given: A fresh owner
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());
    assert_eq!(owner.state(), OwnerState::NotStarted);

    // When: Starting it and waiting for readiness
    owner.start().unwrap();
    let readiness = owner.wait_until_ready(Duration::from_secs(2));

    // Then: It runs on a thread other than ours
    assert_eq!(readiness, Readiness::Ready);
    assert_eq!(owner.state(), OwnerState::Running);
    assert!(owner.is_ready());
    assert_ne!(owner.thread_id(), Some(thread::current().id()));
    assert_eq!(stats.threads.lock().first().copied(), owner.thread_id());

    owner.request_stop();
}

/// WHAT: Starting twice spawns one thread
/// WHY: One owner is one generation with exactly one thread
#[test]
#[allow(clippy::unwrap_used)]
fn given_started_owner_when_started_again_then_no_second_thread() {
    // Given: A started owner
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));

    // When: Starting it again
    owner.start().unwrap();

    // Then: The runtime was initialized once
    assert_eq!(stats.initializations(), 1);

    owner.request_stop();
}

/// WHAT: Stop joins the thread and tears the runtime down once
/// WHY: Shutdown must release foreign handles on the owning thread
#[test]
#[allow(clippy::unwrap_used)]
fn given_running_owner_when_stop_requested_then_joined_and_torn_down() {
    // Given: A running owner
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));

    // When: Requesting stop
    let outcome = owner.request_stop();

    // Then: The thread was joined and teardown ran exactly once
    assert_eq!(outcome, StopOutcome::Joined);
    assert_eq!(owner.state(), OwnerState::Stopped);
    assert!(owner.is_terminated());
    assert!(!owner.is_ready());
    assert_eq!(stats.teardowns(), 1);
}

/// WHAT: A second stop is a no-op
/// WHY: Shutdown must be idempotent
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_owner_when_stop_requested_again_then_already_stopped() {
    // Given: An owner that was stopped
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));
    owner.request_stop();

    // When: Stopping again
    let outcome = owner.request_stop();

    // Then: Nothing else happens
    assert_eq!(outcome, StopOutcome::AlreadyStopped);
    assert_eq!(owner.state(), OwnerState::Stopped);
    assert_eq!(stats.teardowns(), 1);
}

/// WHAT: Stopping an owner that never started settles it
/// WHY: No thread exists to join, and a later start must not spawn one
#[test]
#[allow(clippy::unwrap_used)]
fn given_unstarted_owner_when_stop_requested_then_stopped_without_thread() {
    // Given: An owner never started
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());

    // When: Stopping it, then trying to start it
    let outcome = owner.request_stop();
    owner.start().unwrap();

    // Then: It is stopped and the runtime was never touched
    assert_eq!(outcome, StopOutcome::AlreadyStopped);
    assert_eq!(owner.state(), OwnerState::Stopped);
    assert_eq!(owner.wait_until_ready(Duration::ZERO), Readiness::Failed);
    assert_eq!(stats.initializations(), 0);
}

/// WHAT: A runtime error reaches waiters as a failed readiness
/// WHY: Callers must not wait for a loop that will never run
#[test]
#[allow(clippy::unwrap_used)]
fn given_failing_runtime_when_started_then_readiness_failed_with_reason() {
    // Given: A runtime that fails to initialize
    let behavior = MockBehavior {
        failures_before_success: 1,
        ..MockBehavior::default()
    };
    let (owner, _stats) = owner_with(behavior, fast_config());

    // When: Starting the owner
    owner.start().unwrap();
    let readiness = owner.wait_until_ready(Duration::from_secs(2));

    // Then: Readiness fails, the reason is kept and the owner is stopped
    assert_eq!(readiness, Readiness::Failed);
    assert_eq!(owner.state(), OwnerState::Stopped);
    assert!(owner.failure_reason().unwrap().contains("unavailable"));
    assert!(matches!(
        owner.run_blocking(|| ()),
        Err(FacadeError::NoActiveOwner { .. })
    ));
}

/// WHAT: A panicking runtime is reported like a failing one
/// WHY: A panic on the owner thread must not leave waiters hanging
#[test]
#[allow(clippy::unwrap_used)]
fn given_panicking_runtime_when_started_then_readiness_failed() {
    // Given: A runtime that panics during initialization
    let behavior = MockBehavior {
        failures_before_success: 1,
        panic_on_failure: true,
        ..MockBehavior::default()
    };
    let (owner, _stats) = owner_with(behavior, fast_config());

    // When: Starting the owner
    owner.start().unwrap();

    // Then: Readiness fails with the panic message
    assert_eq!(owner.wait_until_ready(Duration::from_secs(2)), Readiness::Failed);
    assert!(owner.failure_reason().unwrap().contains("exploded"));
    assert!(owner.wait_for_exit(Some(Duration::from_secs(2))));
}

/// WHAT: A blocking call made during initialization fails once it fails
/// WHY: Waiters must see the initialization failure, not a timeout
#[test]
#[allow(clippy::unwrap_used)]
fn given_slow_failing_runtime_when_run_blocking_during_init_then_initialization_failure() {
    // Given: A runtime that fails after a delay
    let behavior = MockBehavior {
        failures_before_success: 1,
        init_delay: Duration::from_millis(100),
        ..MockBehavior::default()
    };
    let (owner, _stats) = owner_with(behavior, fast_config());
    owner.start().unwrap();

    // When: Submitting blocking work while it initializes
    let result = owner.run_blocking(|| ());

    // Then: The caller gets the failure
    assert!(matches!(
        result,
        Err(FacadeError::InitializationFailure { .. })
    ));
}

/// WHAT: Stop requested during initialization skips the loop
/// WHY: A quit posted before the loop exists must not be lost
#[test]
#[allow(clippy::unwrap_used)]
fn given_initializing_owner_when_stop_requested_then_loop_never_runs() {
    // Given: An owner whose runtime takes a while to build
    let behavior = MockBehavior {
        init_delay: Duration::from_millis(150),
        ..MockBehavior::default()
    };
    let (owner, stats) = owner_with(behavior, fast_config());
    owner.start().unwrap();

    // When: Stopping before it is ready
    let outcome = owner.request_stop();

    // Then: The thread exits without pumping and still tears down
    assert_eq!(outcome, StopOutcome::Joined);
    assert_eq!(owner.state(), OwnerState::Stopped);
    assert_eq!(stats.pumps.load(Ordering::SeqCst), 0);
    assert_eq!(stats.teardowns(), 1);
}

/// WHAT: A loop that ignores quit is abandoned after the stop timeout
/// WHY: Shutdown must be bounded even when the runtime misbehaves
#[test]
#[allow(clippy::unwrap_used)]
fn given_stuck_loop_when_stop_requested_then_abandoned_within_bound() {
    // Given: A running owner whose loop ignores quit
    let behavior = MockBehavior {
        ignore_quit: true,
        ..MockBehavior::default()
    };
    let config = FacadeConfig {
        stop_timeout_ms: 100,
        ..fast_config()
    };
    let (owner, _stats) = owner_with(behavior, config);
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));

    // When: Requesting stop
    let started = Instant::now();
    let outcome = owner.request_stop();

    // Then: It is abandoned shortly after the timeout and rejects work
    assert_eq!(outcome, StopOutcome::Abandoned);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(owner.is_abandoned());
    assert!(owner.is_terminated());
    assert!(!owner.is_live());
    assert!(owner.wait_for_exit(Some(Duration::ZERO)));
    assert!(matches!(
        owner.run_blocking(|| ()),
        Err(FacadeError::NoActiveOwner { .. })
    ));
    assert!(!owner.invoker().run_async(|| ()));
}

/// WHAT: Stop requested from the owner thread is deferred
/// WHY: The owner thread cannot join itself
#[test]
#[allow(clippy::unwrap_used)]
fn given_owner_thread_when_it_requests_stop_then_deferred_and_exits_later() {
    // Given: A running owner shared with its own work
    let (owner, _stats) = owner_with(MockBehavior::default(), fast_config());
    let owner = Arc::new(owner);
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));

    // When: Work on the owner thread requests stop
    let inner = Arc::clone(&owner);
    let outcome = owner.run_blocking(move || inner.request_stop()).unwrap();

    // Then: The call returns at once and the thread exits afterwards
    assert_eq!(outcome, StopOutcome::Deferred);
    assert!(owner.wait_for_exit(Some(Duration::from_secs(2))));
    assert_eq!(owner.state(), OwnerState::Stopped);
}

/// WHAT: Blocking calls after stop fail fast
/// WHY: Nobody may hang on an owner that is gone
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_owner_when_run_blocking_then_no_active_owner_promptly() {
    // Given: A stopped owner
    let (owner, _stats) = owner_with(MockBehavior::default(), fast_config());
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));
    owner.request_stop();

    // When: Submitting blocking work directly to its invoker
    let started = Instant::now();
    let result = owner.invoker().run_blocking(|| 1);

    // Then: It fails without waiting for the marshal timeout
    assert!(matches!(result, Err(FacadeError::NoActiveOwner { .. })));
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!owner.run_async(|| ()));
}

/// WHAT: Dropping a live owner shuts its thread down
/// WHY: The thread must not keep the foreign loop alive forever
#[test]
#[allow(clippy::unwrap_used)]
fn given_running_owner_when_dropped_then_thread_tears_down() {
    // Given: A running owner
    let (owner, stats) = owner_with(MockBehavior::default(), fast_config());
    owner.start().unwrap();
    owner.wait_until_ready(Duration::from_secs(2));

    // When: Dropping it
    drop(owner);

    // Then: The runtime is torn down shortly after
    let deadline = Instant::now() + Duration::from_secs(2);
    while stats.teardowns() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(stats.teardowns(), 1);
}
