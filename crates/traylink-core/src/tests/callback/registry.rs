use crate::{
    Callback, CallbackPolicies, CallbackRegistry, DispatchOutcome, DispatchPolicy, EventKind,
    ResourceId, ScrollOrientation, TrayEvent,
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

#[allow(clippy::unwrap_used)]
fn id(index: u32) -> ResourceId {
    ResourceId::new(1, index).unwrap()
}

fn recording() -> (Callback, Arc<Mutex<Vec<TrayEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: Callback = Arc::new(move |event: &TrayEvent| sink.lock().push(*event));
    (callback, seen)
}

fn signaling() -> (Callback, Receiver<thread::ThreadId>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let callback: Callback = Arc::new(move |_: &TrayEvent| {
        let _ = tx.send(thread::current().id());
    });
    (callback, rx)
}

/// WHAT: Pointer events run inline on the dispatching thread
/// WHY: Inline handlers can re-enter the facade through the fast path
#[test]
fn given_default_policies_when_activate_dispatched_then_runs_inline_with_arguments() {
    // Given: A registry with an activate callback
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (callback, seen) = recording();
    registry.register(id(1), EventKind::Activate, callback);

    // When: Dispatching a click
    let outcome = registry.dispatch(id(1), TrayEvent::Activate { x: 10, y: 20 });

    // Then: It ran here with the click position
    assert_eq!(outcome, DispatchOutcome::Inline);
    assert_eq!(*seen.lock(), vec![TrayEvent::Activate { x: 10, y: 20 }]);
}

/// WHAT: Menu triggers run on a worker thread
/// WHY: Application logic must not stall the event loop
#[test]
#[allow(clippy::unwrap_used)]
fn given_default_policies_when_menu_triggered_then_runs_on_worker() {
    // Given: A registry with a menu callback
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (callback, ran_on) = signaling();
    registry.register(id(2), EventKind::MenuTriggered, callback);

    // When: Dispatching a menu trigger
    let outcome = registry.dispatch(id(2), TrayEvent::MenuTriggered);

    // Then: It ran on another thread
    assert_eq!(outcome, DispatchOutcome::Worker);
    let worker = ran_on.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_ne!(worker, thread::current().id());
}

/// WHAT: Events without a callback are ignored
/// WHY: Most resources never register every event kind
#[test]
fn given_no_callback_when_dispatching_then_no_callback_outcome() {
    // Given: A registry with a callback for another kind
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (callback, seen) = recording();
    registry.register(id(1), EventKind::Activate, callback);

    // When: Dispatching a scroll
    let outcome = registry.dispatch(
        id(1),
        TrayEvent::Scroll {
            delta: 1,
            orientation: ScrollOrientation::Vertical,
        },
    );

    // Then: Nothing ran
    assert_eq!(outcome, DispatchOutcome::NoCallback);
    assert!(seen.lock().is_empty());
}

/// WHAT: Registering again replaces the previous callback
/// WHY: One callback per resource and event kind
#[test]
fn given_registered_callback_when_registering_again_then_replaced() {
    // Given: A registered callback
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (first, first_seen) = recording();
    let (second, second_seen) = recording();
    registry.register(id(1), EventKind::SecondaryActivate, first);

    // When: Registering a replacement and dispatching
    registry.register(id(1), EventKind::SecondaryActivate, second);
    registry.dispatch(id(1), TrayEvent::SecondaryActivate { x: 0, y: 0 });

    // Then: Only the replacement ran
    assert!(first_seen.lock().is_empty());
    assert_eq!(second_seen.lock().len(), 1);
}

/// WHAT: A revoked worker callback is not dispatched
/// WHY: Callbacks must not outlive the resource they belong to
#[test]
fn given_revoked_resource_when_menu_triggered_then_callback_never_runs() {
    // Given: A worker callback on a resource that was then revoked
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let runs = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&runs);
    registry.register(
        id(3),
        EventKind::MenuTriggered,
        Arc::new(move |_: &TrayEvent| {
            counted.fetch_add(1, Ordering::SeqCst);
        }),
    );
    registry.revoke_resource(id(3));

    // When: The menu item fires anyway
    let outcome = registry.dispatch(id(3), TrayEvent::MenuTriggered);

    // Then: Nothing was dispatched
    assert_eq!(outcome, DispatchOutcome::NoCallback);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

/// WHAT: Menu triggers can be configured to run inline
/// WHY: Hosts that need ordering with the loop may opt out of workers
#[test]
fn given_inline_menu_policy_when_menu_triggered_then_runs_inline() {
    // Given: A registry with menu triggers set to inline
    let policies = CallbackPolicies {
        menu_triggered: DispatchPolicy::Inline,
        ..CallbackPolicies::default()
    };
    let registry = CallbackRegistry::new(policies);
    let (callback, seen) = recording();
    registry.register(id(4), EventKind::MenuTriggered, callback);

    // When: Dispatching a menu trigger
    let outcome = registry.dispatch(id(4), TrayEvent::MenuTriggered);

    // Then: It ran before dispatch returned
    assert_eq!(outcome, DispatchOutcome::Inline);
    assert_eq!(*seen.lock(), vec![TrayEvent::MenuTriggered]);
}

/// WHAT: Revoking a resource removes all of its callbacks only
/// WHY: Destroying one resource must not silence another
#[test]
fn given_two_resources_when_one_revoked_then_other_still_registered() {
    // Given: Callbacks on two resources
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (a, _) = recording();
    let (b, _) = recording();
    let (c, _) = recording();
    registry.register(id(1), EventKind::Activate, a);
    registry.register(id(1), EventKind::Scroll, b);
    registry.register(id(2), EventKind::Activate, c);

    // When: Revoking the first resource
    let removed = registry.revoke_resource(id(1));

    // Then: Only its callbacks are gone
    assert_eq!(removed, 2);
    assert!(!registry.is_registered(id(1), EventKind::Activate));
    assert!(!registry.is_registered(id(1), EventKind::Scroll));
    assert!(registry.is_registered(id(2), EventKind::Activate));
    assert!(!registry.unregister(id(1), EventKind::Activate));
    assert!(registry.unregister(id(2), EventKind::Activate));
    assert_eq!(registry.clear(), 0);
}

/// WHAT: A panicking inline callback is contained
/// WHY: One faulty handler must not unwind through the event loop
#[test]
#[allow(clippy::panic)]
fn given_panicking_callback_when_dispatched_inline_then_contained() {
    // Given: A callback that panics
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    registry.register(
        id(1),
        EventKind::Activate,
        Arc::new(|_: &TrayEvent| panic!("handler failed")),
    );

    // When: Dispatching to it
    let outcome = registry.dispatch(id(1), TrayEvent::Activate { x: 1, y: 1 });

    // Then: Dispatch returns normally and the callback stays registered
    assert_eq!(outcome, DispatchOutcome::Inline);
    assert!(registry.is_registered(id(1), EventKind::Activate));
}

/// WHAT: An inline callback may register callbacks while being dispatched
/// WHY: The registry lock must not be held while user code runs
#[test]
fn given_inline_callback_when_it_registers_then_no_deadlock() {
    // Given: A callback that registers another one
    let registry = Arc::new(CallbackRegistry::new(CallbackPolicies::default()));
    let inner = Arc::clone(&registry);
    registry.register(
        id(1),
        EventKind::Activate,
        Arc::new(move |_: &TrayEvent| {
            let (callback, _) = recording();
            inner.register(id(1), EventKind::Scroll, callback);
        }),
    );

    // When: Dispatching to it
    registry.dispatch(id(1), TrayEvent::Activate { x: 0, y: 0 });

    // Then: The new registration exists
    assert!(registry.is_registered(id(1), EventKind::Scroll));
}

/// WHAT: A worker callback already running when its resource is revoked finishes
/// WHY: Revocation stops callbacks from starting; it does not interrupt one
#[test]
#[allow(clippy::unwrap_used)]
fn given_worker_callback_running_when_resource_revoked_then_it_completes_once() {
    // Given: A worker callback that signals on entry and then waits
    let registry = CallbackRegistry::new(CallbackPolicies::default());
    let (started_tx, started_rx) = crossbeam_channel::bounded(1);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(1);
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let runs = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&runs);
    registry.register(
        id(6),
        EventKind::MenuTriggered,
        Arc::new(move |_: &TrayEvent| {
            let _ = started_tx.send(());
            let _ = release_rx.recv_timeout(Duration::from_secs(2));
            counted.fetch_add(1, Ordering::SeqCst);
            let _ = done_tx.send(());
        }),
    );
    assert_eq!(
        registry.dispatch(id(6), TrayEvent::MenuTriggered),
        DispatchOutcome::Worker
    );
    started_rx.recv_timeout(Duration::from_secs(2)).unwrap();

    // When: The resource is revoked mid-callback
    registry.revoke_resource(id(6));
    release_tx.send(()).unwrap();

    // Then: The running callback completes once and no further one starts
    done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(
        registry.dispatch(id(6), TrayEvent::MenuTriggered),
        DispatchOutcome::NoCallback
    );
}
