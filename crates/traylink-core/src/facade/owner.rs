//! Lifecycle of the single thread that drives the foreign event loop.
//!
//! One [`EventLoopOwner`] is one generation: it is started at most once,
//! moves strictly forward through [`OwnerState`], and is never revived.
//! Restarting means building a new owner.

use crate::{
    FacadeConfig, FacadeError, FacadeResult, ForeignLoop, Invoker, OwnerState, Readiness,
    ReadinessGate, Runtime, StopOutcome, StopTimeoutPolicy,
    error::panic_message,
    facade::owner_state::AtomicOwnerState,
};

use std::{
    panic::{AssertUnwindSafe, Location, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle, ThreadId},
    time::Duration,
};

use error_location::ErrorLocation;
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// State shared between an owner and its thread.
struct OwnerShared {
    state: AtomicOwnerState,
    invoker: Invoker,
    /// Runtime initialized (or failed to).
    ready: ReadinessGate,
    /// The thread has returned.
    exited: ReadinessGate,
    /// Nobody needs to wait on this owner any more: exited, abandoned or
    /// terminated.
    finished: ReadinessGate,
    failure: Mutex<Option<String>>,
}

/// Owns one generation of the event-loop thread.
pub struct EventLoopOwner<R: Runtime> {
    generation: u32,
    config: FacadeConfig,
    runtime: Arc<R>,
    shared: Arc<OwnerShared>,
    thread: Mutex<Option<JoinHandle<()>>>,
    abandoned: AtomicBool,
}

impl<R: Runtime> EventLoopOwner<R> {
    /// Create an owner in [`OwnerState::NotStarted`].
    pub fn new(generation: u32, runtime: Arc<R>, config: FacadeConfig) -> Self {
        Self {
            generation,
            shared: Arc::new(OwnerShared {
                state: AtomicOwnerState::new(),
                invoker: Invoker::new(generation, config.marshal_timeout()),
                ready: ReadinessGate::new(),
                exited: ReadinessGate::new(),
                finished: ReadinessGate::new(),
                failure: Mutex::new(None),
            }),
            config,
            runtime,
            thread: Mutex::new(None),
            abandoned: AtomicBool::new(false),
        }
    }

    /// Spawn the owner thread. Idempotent.
    #[track_caller]
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn start(&self) -> FacadeResult<()> {
        let mut thread_slot = self.thread.lock();

        if !self
            .shared
            .state
            .transition(OwnerState::NotStarted, OwnerState::Initializing)
        {
            debug!(state = ?self.state(), "Owner already started");
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let runtime = Arc::clone(&self.runtime);
        let generation = self.generation;

        let spawned = thread::Builder::new()
            .name(format!("traylink-owner-{generation}"))
            .spawn(move || run_owner_thread(generation, &*runtime, &shared));

        match spawned {
            Ok(handle) => {
                *thread_slot = Some(handle);
                Ok(())
            }
            Err(source) => {
                error!(error = %source, "Failed to spawn owner thread");
                self.shared.settle_without_thread();
                Err(FacadeError::ThreadSpawnFailed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    /// Post quit, then wait up to the stop timeout for the thread to exit.
    ///
    /// Safe to call repeatedly and concurrently. From the owner thread itself
    /// the join is skipped and [`StopOutcome::Deferred`] is returned.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn request_stop(&self) -> StopOutcome {
        let previous = self.shared.state.advance(OwnerState::StoppingRequested);

        match previous {
            OwnerState::NotStarted => {
                // Holding the thread lock orders us after any start() in flight.
                let _thread_slot = self.thread.lock();
                self.shared.settle_without_thread();
                return StopOutcome::AlreadyStopped;
            }
            OwnerState::Stopped => return StopOutcome::AlreadyStopped,
            OwnerState::Initializing | OwnerState::Running => info!("Stop requested"),
            OwnerState::StoppingRequested => debug!("Stop already requested"),
        }

        // Without a waker the thread is still initializing and will see
        // StoppingRequested before it enters the loop.
        self.shared.invoker.request_quit();

        if self.shared.invoker.is_owner_thread() {
            info!("Stop requested from owner thread; loop exits after current work");
            return StopOutcome::Deferred;
        }

        match self.shared.exited.wait_until_ready(self.config.stop_timeout()) {
            Readiness::TimedOut => self.on_stop_timeout(),
            Readiness::Ready | Readiness::Failed => {
                self.join();
                StopOutcome::Joined
            }
        }
    }

    /// Run `work` on the owner thread and wait for its result.
    ///
    /// Waits for readiness first if the owner is still initializing. Fails
    /// fast with [`FacadeError::NoActiveOwner`] once stop has been requested.
    #[track_caller]
    pub fn run_blocking<T, F>(&self, work: F) -> FacadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if !self.shared.invoker.is_owner_thread() {
            self.await_running()?;
        }
        self.shared.invoker.run_blocking(work)
    }

    /// Queue `work` for the owner thread without waiting.
    ///
    /// Returns `false` and drops `work` if the owner is stopping or stopped.
    pub fn run_async<F>(&self, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.state() {
            OwnerState::Initializing | OwnerState::Running => self.shared.invoker.run_async(work),
            state => {
                debug!(generation = self.generation, ?state, "Async work dropped: owner not active");
                false
            }
        }
    }

    /// Process pending work without blocking. See [`Invoker::pump_pending`].
    pub fn pump_pending(&self) -> usize {
        self.shared.invoker.pump_pending()
    }

    /// Block until the owner thread is initialized or `timeout` elapses.
    pub fn wait_until_ready(&self, timeout: Duration) -> Readiness {
        self.shared.ready.wait_until_ready(timeout)
    }

    /// Block until the owner has finished: its thread exited, or it was
    /// abandoned or terminated after a stop timeout.
    ///
    /// `None` waits indefinitely. Returns `false` on timeout.
    pub fn wait_for_exit(&self, timeout: Option<Duration>) -> bool {
        let timeout = timeout.unwrap_or(Duration::MAX);
        self.shared.finished.wait_until_ready(timeout) != Readiness::TimedOut
    }

    /// Generation number assigned by the facade.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OwnerState {
        self.shared.state.load()
    }

    /// `Running` with a live runtime handle. Never blocks.
    pub fn is_ready(&self) -> bool {
        self.state() == OwnerState::Running && self.shared.invoker.has_waker()
    }

    /// Still initializing or running, and not abandoned.
    pub fn is_live(&self) -> bool {
        self.state() <= OwnerState::Running && !self.is_abandoned()
    }

    /// Finished, or detached after a stop timeout.
    pub fn is_terminated(&self) -> bool {
        self.state() == OwnerState::Stopped || self.is_abandoned()
    }

    /// Detached after a stop timeout.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Acquire)
    }

    /// Identity of the owner thread, once it has started.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.shared.invoker.owner_thread()
    }

    /// Reason reported by a failed runtime initialization.
    pub fn failure_reason(&self) -> Option<String> {
        self.shared.failure.lock().clone()
    }

    /// The invoker that marshals onto this owner's thread.
    pub fn invoker(&self) -> &Invoker {
        &self.shared.invoker
    }

    #[track_caller]
    fn await_running(&self) -> FacadeResult<()> {
        if self.state() == OwnerState::Initializing {
            let timeout = self.config.readiness_timeout();
            match self.shared.ready.wait_until_ready(timeout) {
                Readiness::Ready => {}
                Readiness::Failed => {
                    let reason = self
                        .failure_reason()
                        .unwrap_or_else(|| "runtime reported failure".to_string());
                    return Err(FacadeError::initialization_failure(reason));
                }
                Readiness::TimedOut => {
                    return Err(FacadeError::initialization_timeout(
                        self.config.readiness_timeout_ms,
                    ));
                }
            }
        }

        match self.state() {
            OwnerState::Running => Ok(()),
            _ => Err(FacadeError::no_active_owner()),
        }
    }

    fn join(&self) {
        let Some(handle) = self.thread.lock().take() else {
            return;
        };
        if handle.join().is_err() {
            warn!(generation = self.generation, "Owner thread panicked");
        }
    }

    fn on_stop_timeout(&self) -> StopOutcome {
        // Nothing new may be queued on a thread we are about to give up on.
        self.shared.invoker.close();
        self.abandoned.store(true, Ordering::Release);
        let handle = self.thread.lock().take();

        let outcome = match self.config.on_stop_timeout {
            StopTimeoutPolicy::Abandon => {
                warn!(
                    generation = self.generation,
                    stop_timeout_ms = self.config.stop_timeout_ms,
                    "Owner thread did not exit in time; abandoning it"
                );
                drop(handle);
                StopOutcome::Abandoned
            }
            StopTimeoutPolicy::Terminate => terminate_thread(self.generation, handle),
        };

        self.shared.finished.signal(true);
        outcome
    }
}

impl<R: Runtime> Drop for EventLoopOwner<R> {
    fn drop(&mut self) {
        // The thread holds only the shared state, so without this it would
        // sit in the foreign loop forever.
        if self.is_live() && self.state() != OwnerState::NotStarted {
            debug!(generation = self.generation, "Owner dropped while live; posting quit");
            self.shared.state.advance(OwnerState::StoppingRequested);
            self.shared.invoker.request_quit();
        }
    }
}

impl OwnerShared {
    /// Finish an owner whose thread never ran.
    fn settle_without_thread(&self) {
        self.state.advance(OwnerState::Stopped);
        self.invoker.close();
        self.invoker.abandon_pending();
        self.ready.signal(false);
        self.exited.signal(true);
        self.finished.signal(true);
    }

    fn fail_initialization(&self, generation: u32, reason: String) {
        error!(generation, reason = %reason, "Runtime initialization failed");
        *self.failure.lock() = Some(reason);
        self.state.advance(OwnerState::Stopped);
        self.invoker.close();
        self.invoker.abandon_pending();
        self.ready.signal(false);
        self.exited.signal(true);
        self.finished.signal(true);
    }
}

fn run_owner_thread<R: Runtime>(generation: u32, runtime: &R, shared: &OwnerShared) {
    shared.invoker.bind_owner_thread(thread::current().id());
    debug!(generation, "Owner thread started");

    let mut foreign = match catch_unwind(AssertUnwindSafe(|| runtime.initialize(generation))) {
        Ok(Ok(foreign)) => foreign,
        Ok(Err(e)) => {
            shared.fail_initialization(generation, e.to_string());
            return;
        }
        Err(payload) => {
            let reason = format!("runtime initialization panicked: {}", panic_message(&*payload));
            shared.fail_initialization(generation, reason);
            return;
        }
    };

    // Installed before the Running transition so a concurrent stop either
    // sees the waker or makes that transition fail.
    shared.invoker.install_waker(foreign.waker());

    if shared
        .state
        .transition(OwnerState::Initializing, OwnerState::Running)
    {
        shared.ready.signal(true);
        info!(generation, "Event loop owner running");

        let invoker = &shared.invoker;
        let looped = catch_unwind(AssertUnwindSafe(|| {
            foreign.run_until_stopped(&mut || {
                invoker.drain();
            })
        }));
        if let Err(payload) = looped {
            error!(generation, panic = %panic_message(&*payload), "Event loop panicked");
        }
    } else {
        shared.ready.signal(true);
        debug!(generation, "Stop requested during initialization; skipping event loop");
    }

    shared.state.advance(OwnerState::StoppingRequested);
    shared.invoker.close();
    let abandoned = shared.invoker.abandon_pending();
    if abandoned > 0 {
        warn!(generation, abandoned, "Dropped queued work at shutdown");
    }

    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| {
        foreign.teardown();
        drop(foreign);
    })) {
        error!(generation, panic = %panic_message(&*payload), "Runtime teardown panicked");
    }

    shared.state.advance(OwnerState::Stopped);
    shared.exited.signal(true);
    shared.finished.signal(true);
    info!(generation, "Event loop owner stopped");
}

#[cfg(unix)]
fn terminate_thread(generation: u32, handle: Option<JoinHandle<()>>) -> StopOutcome {
    use std::os::unix::thread::JoinHandleExt;

    let Some(handle) = handle else {
        return StopOutcome::Abandoned;
    };

    error!(
        generation,
        "Forcibly cancelling owner thread; its resources are leaked and the runtime may be corrupted"
    );

    let pthread = handle.into_pthread_t() as libc::pthread_t;
    // SAFETY: `pthread` is a live thread we own and have not joined or
    // detached. Cancelling a thread that runs Rust frames with destructors
    // is not sound in general; this path is an explicit opt-in for hosts
    // that prefer that risk over a stuck thread.
    let rc = unsafe { libc::pthread_cancel(pthread) };
    // SAFETY: ownership of `pthread` was transferred to us by
    // `into_pthread_t`; detaching releases it once the thread ends.
    unsafe { libc::pthread_detach(pthread) };

    if rc == 0 {
        StopOutcome::Terminated
    } else {
        error!(generation, rc, "pthread_cancel failed; owner thread abandoned");
        StopOutcome::Abandoned
    }
}

#[cfg(not(unix))]
fn terminate_thread(generation: u32, handle: Option<JoinHandle<()>>) -> StopOutcome {
    error!(
        generation,
        "Forced termination is unsupported on this platform; owner thread abandoned"
    );
    drop(handle);
    StopOutcome::Abandoned
}
