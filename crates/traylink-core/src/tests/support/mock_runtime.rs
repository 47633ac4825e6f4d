use crate::{FacadeConfig, ForeignLoop, LoopWaker, Runtime, RuntimeError, WakeError};

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, ThreadId},
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

/// How the mock runtime misbehaves.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockBehavior {
    /// Number of initializations that fail before one succeeds.
    pub failures_before_success: usize,
    /// Panic instead of returning an error when failing.
    pub panic_on_failure: bool,
    /// Sleep this long inside `initialize`.
    pub init_delay: Duration,
    /// Keep looping after a quit request.
    pub ignore_quit: bool,
}

/// What the mock runtime observed.
#[derive(Debug, Default)]
pub(crate) struct MockStats {
    pub initializations: AtomicUsize,
    pub teardowns: AtomicUsize,
    pub pumps: AtomicUsize,
    pub threads: Mutex<Vec<ThreadId>>,
    pub generations: Mutex<Vec<u32>>,
}

impl MockStats {
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

/// A runtime backed by a crossbeam channel instead of a windowing system.
pub(crate) struct MockRuntime {
    behavior: MockBehavior,
    stats: Arc<MockStats>,
}

impl MockRuntime {
    pub fn new(behavior: MockBehavior) -> (Self, Arc<MockStats>) {
        let stats = Arc::new(MockStats::default());
        (
            Self {
                behavior,
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }

    pub fn healthy() -> (Self, Arc<MockStats>) {
        Self::new(MockBehavior::default())
    }
}

impl Runtime for MockRuntime {
    type Loop = MockLoop;

    #[allow(clippy::panic)]
    fn initialize(&self, generation: u32) -> Result<MockLoop, RuntimeError> {
        let attempt = self.stats.initializations.fetch_add(1, Ordering::SeqCst);
        self.stats.threads.lock().push(thread::current().id());
        self.stats.generations.lock().push(generation);

        if !self.behavior.init_delay.is_zero() {
            thread::sleep(self.behavior.init_delay);
        }

        if attempt < self.behavior.failures_before_success {
            if self.behavior.panic_on_failure {
                panic!("mock runtime exploded");
            }
            return Err("mock runtime unavailable".into());
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        Ok(MockLoop {
            sender,
            receiver,
            ignore_quit: self.behavior.ignore_quit,
            stats: Arc::clone(&self.stats),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Wake,
    Quit,
}

pub(crate) struct MockLoop {
    sender: Sender<Signal>,
    receiver: Receiver<Signal>,
    ignore_quit: bool,
    stats: Arc<MockStats>,
}

impl ForeignLoop for MockLoop {
    fn waker(&self) -> Arc<dyn LoopWaker> {
        Arc::new(MockWaker {
            sender: self.sender.clone(),
        })
    }

    fn run_until_stopped(&mut self, pump: &mut dyn FnMut()) {
        let mut counted = || {
            self.stats.pumps.fetch_add(1, Ordering::SeqCst);
            pump();
        };
        counted();
        while let Ok(signal) = self.receiver.recv() {
            match signal {
                Signal::Wake => counted(),
                Signal::Quit if self.ignore_quit => {}
                Signal::Quit => break,
            }
        }
    }

    fn teardown(&mut self) {
        self.stats.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockWaker {
    sender: Sender<Signal>,
}

impl LoopWaker for MockWaker {
    fn wake(&self) -> Result<(), WakeError> {
        self.sender.send(Signal::Wake).map_err(|_| WakeError::LoopGone)
    }

    fn request_quit(&self) -> Result<(), WakeError> {
        self.sender.send(Signal::Quit).map_err(|_| WakeError::LoopGone)
    }
}

/// Short timeouts so failing tests fail quickly.
pub(crate) fn fast_config() -> FacadeConfig {
    FacadeConfig {
        readiness_timeout_ms: 1_000,
        stop_timeout_ms: 1_000,
        marshal_timeout_ms: 1_000,
        ..FacadeConfig::default()
    }
}
