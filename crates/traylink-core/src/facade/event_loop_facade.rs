//! Process-wide entry point to the event-loop owner.
//!
//! The facade holds at most one current owner. It starts one lazily on
//! [`Facade::instance`], replaces it once it has terminated, and retires it
//! on [`Facade::shutdown`]. Start and shutdown are serialized by a lifecycle
//! lock; readiness and submission never take it. Neither does work running
//! on a retiring owner's thread: it may hold up the very shutdown that owns
//! the lock.

use crate::{
    EventLoopOwner, FacadeConfig, FacadeError, FacadeResult, Readiness, Runtime, StopOutcome,
};

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

/// Singleton-style access to the current [`EventLoopOwner`].
pub struct Facade<R: Runtime> {
    runtime: Arc<R>,
    config: FacadeConfig,
    lifecycle: Mutex<()>,
    slot: Mutex<Option<Arc<EventLoopOwner<R>>>>,
    /// The owner most recently taken out of the slot by a shutdown.
    retiring: Mutex<Option<Arc<EventLoopOwner<R>>>>,
    generations: AtomicU32,
}

impl<R: Runtime> Facade<R> {
    /// Create a facade with no owner. Nothing is spawned until first use.
    pub fn new(runtime: R, config: FacadeConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            config,
            lifecycle: Mutex::new(()),
            slot: Mutex::new(None),
            retiring: Mutex::new(None),
            generations: AtomicU32::new(0),
        }
    }

    /// Current owner, starting one if there is none or the last one has
    /// terminated, then waiting up to the readiness timeout.
    ///
    /// On a readiness timeout the owner is returned anyway and the facade
    /// runs degraded: blocking calls keep waiting for readiness themselves.
    #[track_caller]
    pub fn instance(&self) -> FacadeResult<Arc<EventLoopOwner<R>>> {
        let owner = self.start_or_reuse()?;
        match self.await_owner(&owner) {
            Readiness::Ready => Ok(owner),
            Readiness::Failed => Err(initialization_failure(&owner)),
            Readiness::TimedOut => {
                warn!(
                    generation = owner.generation(),
                    readiness_timeout_ms = self.config.readiness_timeout_ms,
                    "Owner not ready in time; continuing degraded"
                );
                Ok(owner)
            }
        }
    }

    /// Like [`Facade::instance`], but a readiness timeout is an error.
    #[track_caller]
    pub fn ensure_running(&self) -> FacadeResult<Arc<EventLoopOwner<R>>> {
        let owner = self.start_or_reuse()?;
        match self.await_owner(&owner) {
            Readiness::Ready => Ok(owner),
            Readiness::Failed => Err(initialization_failure(&owner)),
            Readiness::TimedOut => Err(FacadeError::initialization_timeout(
                self.config.readiness_timeout_ms,
            )),
        }
    }

    /// Whether an owner is running with a live runtime. Never blocks on
    /// initialization and never starts anything.
    pub fn is_ready(&self) -> bool {
        self.current().is_some_and(|owner| owner.is_ready())
    }

    /// The current owner, if any, without starting one.
    pub fn current(&self) -> Option<Arc<EventLoopOwner<R>>> {
        self.slot.lock().clone()
    }

    /// Run `work` on the current owner thread and wait for its result.
    ///
    /// Does not start an owner: without one this is
    /// [`FacadeError::NoActiveOwner`].
    #[track_caller]
    pub fn run_blocking<T, F>(&self, work: F) -> FacadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        match self.current() {
            Some(owner) => owner.run_blocking(work),
            None => Err(FacadeError::no_active_owner()),
        }
    }

    /// Queue `work` for the current owner thread. Returns `false` and drops
    /// `work` if there is no active owner.
    pub fn run_async<F>(&self, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.current() {
            Some(owner) => owner.run_async(work),
            None => {
                debug!("Async work dropped: no owner");
                false
            }
        }
    }

    /// Process pending work without blocking. See
    /// [`crate::Invoker::pump_pending`].
    pub fn pump_pending(&self) -> usize {
        self.current().map_or(0, |owner| owner.pump_pending())
    }

    /// Retire the current owner: post quit and wait up to the stop timeout.
    ///
    /// Idempotent. A later [`Facade::instance`] starts a fresh generation.
    #[instrument(skip(self))]
    pub fn shutdown(&self) -> StopOutcome {
        if let Some(owner) = self.current()
            && owner.invoker().is_owner_thread()
        {
            // A concurrent shutdown may hold the lifecycle lock while it
            // waits for this very thread to exit.
            let mut slot = self.slot.lock();
            if slot.take_if(|current| Arc::ptr_eq(current, &owner)).is_some() {
                *self.retiring.lock() = Some(Arc::clone(&owner));
            }
            drop(slot);
            return owner.request_stop();
        }

        let _lifecycle = self.lifecycle.lock();
        let owner = {
            let mut slot = self.slot.lock();
            let Some(owner) = slot.take() else {
                debug!("Shutdown with no owner");
                return StopOutcome::AlreadyStopped;
            };
            // Published before the slot lock is released, so work on the
            // owner thread always finds the owner in one of the two.
            *self.retiring.lock() = Some(Arc::clone(&owner));
            owner
        };

        let outcome = owner.request_stop();
        self.retiring
            .lock()
            .take_if(|retiring| Arc::ptr_eq(retiring, &owner));
        info!(generation = owner.generation(), ?outcome, "Facade shut down");
        outcome
    }

    /// Generation number of the most recently created owner. Zero before
    /// the first start.
    pub fn generation(&self) -> u32 {
        self.generations.load(Ordering::Acquire)
    }

    /// Timeouts and policies in effect.
    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    #[track_caller]
    fn start_or_reuse(&self) -> FacadeResult<Arc<EventLoopOwner<R>>> {
        if let Some(owner) = self.current()
            && owner.is_live()
        {
            return Ok(owner);
        }

        if self.on_retiring_owner_thread() {
            debug!("Start refused on a retiring owner's thread");
            return Err(FacadeError::no_active_owner());
        }

        let _lifecycle = self.lifecycle.lock();
        self.retiring
            .lock()
            .take_if(|retiring| retiring.is_terminated());
        let mut slot = self.slot.lock();

        if let Some(owner) = slot.as_ref()
            && owner.is_live()
        {
            return Ok(Arc::clone(owner));
        }

        if let Some(previous) = slot.take()
            && !previous.is_terminated()
        {
            // Stopping on its own; let it finish before a successor starts.
            drop(slot);
            let outcome = previous.request_stop();
            debug!(generation = previous.generation(), ?outcome, "Previous owner retired");
            slot = self.slot.lock();
        }

        let generation = self.generations.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        let owner = Arc::new(EventLoopOwner::new(
            generation,
            Arc::clone(&self.runtime),
            self.config.clone(),
        ));
        *slot = Some(Arc::clone(&owner));
        drop(slot);

        owner.start()?;
        Ok(owner)
    }

    /// Whether the caller runs on the thread of an owner that is stopping.
    fn on_retiring_owner_thread(&self) -> bool {
        let stopping_here =
            |owner: &Arc<EventLoopOwner<R>>| !owner.is_live() && owner.invoker().is_owner_thread();
        self.slot.lock().as_ref().is_some_and(stopping_here)
            || self.retiring.lock().as_ref().is_some_and(stopping_here)
    }

    fn await_owner(&self, owner: &EventLoopOwner<R>) -> Readiness {
        if owner.invoker().is_owner_thread() {
            // Called from inside the runtime itself; it cannot wait on itself.
            return Readiness::Ready;
        }
        owner.wait_until_ready(self.config.readiness_timeout())
    }
}

#[track_caller]
fn initialization_failure<R: Runtime>(owner: &EventLoopOwner<R>) -> FacadeError {
    let reason = owner
        .failure_reason()
        .unwrap_or_else(|| "owner stopped before it became ready".to_string());
    FacadeError::initialization_failure(reason)
}
