//! Marshals work onto the owner thread.
//!
//! One FIFO queue per owner, so work submitted from a single thread runs in
//! submission order. Each job leaves the queue exactly once: either the owner
//! runs it, or it is dropped when the owner shuts down. Dropping a blocking
//! job drops its completion sender, and the waiting caller reads that as
//! [`FacadeError::NoActiveOwner`].

use crate::{
    FacadeError, FacadeResult, LoopWaker,
    error::panic_message,
};

use std::{
    panic::{AssertUnwindSafe, Location, catch_unwind},
    sync::{Arc, OnceLock},
    thread::{self, ThreadId},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use error_location::ErrorLocation;
use parking_lot::Mutex;
use tracing::{debug, error, trace};

/// A unit of work awaiting execution on the owner thread.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Posts callables to the owner thread, blocking or fire-and-forget.
pub struct Invoker {
    generation: u32,
    queue: Mutex<Option<Sender<Job>>>,
    receiver: Receiver<Job>,
    waker: OnceLock<Arc<dyn LoopWaker>>,
    owner_thread: OnceLock<ThreadId>,
    marshal_timeout: Duration,
}

impl Invoker {
    pub(crate) fn new(generation: u32, marshal_timeout: Duration) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            generation,
            queue: Mutex::new(Some(sender)),
            receiver,
            waker: OnceLock::new(),
            owner_thread: OnceLock::new(),
            marshal_timeout,
        }
    }

    /// Run `work` on the owner thread and wait for its result.
    ///
    /// Called from the owner thread itself, `work` runs inline without
    /// touching the queue. A panic inside `work` comes back as
    /// [`FacadeError::WorkPanicked`]. On [`FacadeError::MarshalTimeout`] the
    /// work may still run later; its result is discarded.
    #[track_caller]
    pub fn run_blocking<T, F>(&self, work: F) -> FacadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        if self.is_owner_thread() {
            trace!(generation = self.generation, "Same-thread fast path");
            return catch_unwind(AssertUnwindSafe(work))
                .map_err(|payload| FacadeError::work_panicked(&*payload));
        }

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        self.submit(Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(work));
            let _ = done_tx.send(outcome);
        }))?;

        match done_rx.recv_timeout(self.marshal_timeout) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(FacadeError::work_panicked(&*payload)),
            Err(RecvTimeoutError::Timeout) => Err(FacadeError::MarshalTimeout {
                timeout_ms: u64::try_from(self.marshal_timeout.as_millis()).unwrap_or(u64::MAX),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(RecvTimeoutError::Disconnected) => {
                debug!(generation = self.generation, "Blocking work abandoned at shutdown");
                Err(FacadeError::no_active_owner())
            }
        }
    }

    /// Queue `work` for the owner thread and return immediately.
    ///
    /// Returns `false` if the owner no longer accepts work, in which case
    /// `work` is dropped unexecuted. Panics inside `work` are logged.
    pub fn run_async<F>(&self, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let generation = self.generation;
        let accepted = self
            .submit(Box::new(move || {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(work)) {
                    error!(generation, panic = %panic_message(&*payload), "Async work panicked");
                }
            }))
            .is_ok();

        if !accepted {
            debug!(generation, "Async work dropped: no active owner");
        }
        accepted
    }

    /// Process pending work without blocking.
    ///
    /// On the owner thread this drains the queue inline. Elsewhere it only
    /// nudges the loop. Returns the number of jobs run inline.
    pub fn pump_pending(&self) -> usize {
        if self.is_owner_thread() {
            self.drain()
        } else {
            self.wake();
            0
        }
    }

    /// Whether the calling thread is this invoker's owner thread.
    pub fn is_owner_thread(&self) -> bool {
        self.owner_thread
            .get()
            .is_some_and(|id| *id == thread::current().id())
    }

    /// Whether the foreign loop has handed over its waker.
    pub fn has_waker(&self) -> bool {
        self.waker.get().is_some()
    }

    /// Whether new work is still accepted.
    pub fn is_open(&self) -> bool {
        self.queue.lock().is_some()
    }

    #[track_caller]
    fn submit(&self, job: Job) -> FacadeResult<()> {
        {
            // Held across the send so close() cannot slip in between the
            // check and the send.
            let queue = self.queue.lock();
            let Some(sender) = queue.as_ref() else {
                return Err(FacadeError::no_active_owner());
            };
            sender
                .send(job)
                .map_err(|_| FacadeError::no_active_owner())?;
        }
        self.wake();
        Ok(())
    }

    fn wake(&self) {
        if let Some(waker) = self.waker.get()
            && let Err(e) = waker.wake()
        {
            debug!(generation = self.generation, error = %e, "Wake not delivered");
        }
    }

    pub(crate) fn bind_owner_thread(&self, id: ThreadId) {
        let _ = self.owner_thread.set(id);
    }

    pub(crate) fn owner_thread(&self) -> Option<ThreadId> {
        self.owner_thread.get().copied()
    }

    pub(crate) fn install_waker(&self, waker: Arc<dyn LoopWaker>) {
        let _ = self.waker.set(waker);
    }

    pub(crate) fn request_quit(&self) -> bool {
        match self.waker.get() {
            Some(waker) => match waker.request_quit() {
                Ok(()) => true,
                Err(e) => {
                    debug!(generation = self.generation, error = %e, "Quit not delivered");
                    false
                }
            },
            None => false,
        }
    }

    /// Run the jobs queued when the drain began. Owner thread only.
    ///
    /// Jobs submitted meanwhile wait for the next wake, so a quit posted by
    /// one of these jobs is seen before them.
    pub(crate) fn drain(&self) -> usize {
        let pending = self.receiver.len();
        let mut ran = 0;
        while ran < pending {
            let Ok(job) = self.receiver.try_recv() else {
                break;
            };
            job();
            ran += 1;
        }
        ran
    }

    /// Stop accepting work. Returns `false` if already closed.
    pub(crate) fn close(&self) -> bool {
        self.queue.lock().take().is_some()
    }

    /// Drop everything still queued without running it.
    pub(crate) fn abandon_pending(&self) -> usize {
        let mut dropped = 0;
        while let Ok(job) = self.receiver.try_recv() {
            drop(job);
            dropped += 1;
        }
        dropped
    }
}
