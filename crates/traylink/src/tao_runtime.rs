//! The tao event loop as the owner thread's foreign runtime.
//!
//! Tray and menu events arrive through process-global handlers on whatever
//! thread the platform uses, and are forwarded into the loop as user events
//! so they are handled on the owner thread.

use crate::resources::{self, operations};

use traylink_core::{
    CallbackPolicies, CallbackRegistry, ForeignLoop, LoopWaker, Runtime, RuntimeError, WakeError,
};

use std::sync::Arc;

use parking_lot::Mutex;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoop, EventLoopProxy},
    platform::run_return::EventLoopExtRunReturn,
};
use tracing::{debug, info, instrument, trace};
use tray_icon::{TrayIconEvent, menu::MenuEvent};

/// Messages posted into the event loop.
#[derive(Debug)]
pub enum LoopSignal {
    /// Drain the work queue.
    Wake,
    /// Leave the loop.
    Quit,
    /// A tray icon was clicked.
    Tray(TrayIconEvent),
    /// A menu item was activated.
    Menu(MenuEvent),
}

/// Tray and menu event handlers are process-global; only the generation
/// that installed them last may clear them.
static EVENT_HANDLERS: HandlerOwnership = HandlerOwnership::new();

/// Tracks which owner generation the global event handlers forward to.
pub(crate) struct HandlerOwnership {
    generation: Mutex<Option<u32>>,
}

impl HandlerOwnership {
    pub(crate) const fn new() -> Self {
        Self {
            generation: Mutex::new(None),
        }
    }

    /// Run `install` and record `generation` as the handlers' owner.
    pub(crate) fn claim(&self, generation: u32, install: impl FnOnce()) {
        let mut owner = self.generation.lock();
        install();
        *owner = Some(generation);
    }

    /// Run `clear` only if `generation` still owns the handlers.
    pub(crate) fn release(&self, generation: u32, clear: impl FnOnce()) -> bool {
        let mut owner = self.generation.lock();
        if *owner != Some(generation) {
            return false;
        }
        clear();
        *owner = None;
        true
    }
}

/// Builds a tao event loop on the owner thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaoRuntime {
    callbacks: CallbackPolicies,
}

impl TaoRuntime {
    /// Runtime whose callbacks are dispatched per `callbacks`.
    pub fn new(callbacks: CallbackPolicies) -> Self {
        Self { callbacks }
    }
}

impl Runtime for TaoRuntime {
    type Loop = TaoLoop;

    #[instrument(skip(self))]
    fn initialize(&self, generation: u32) -> Result<TaoLoop, RuntimeError> {
        let event_loop = build_event_loop()?;
        let proxy = Arc::new(Mutex::new(event_loop.create_proxy()));

        EVENT_HANDLERS.claim(generation, || {
            let tray_proxy = Arc::clone(&proxy);
            TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
                if tray_proxy.lock().send_event(LoopSignal::Tray(event)).is_err() {
                    trace!("Tray event after loop exit dropped");
                }
            }));
            let menu_proxy = Arc::clone(&proxy);
            MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
                if menu_proxy.lock().send_event(LoopSignal::Menu(event)).is_err() {
                    trace!("Menu event after loop exit dropped");
                }
            }));
        });

        resources::install(generation, CallbackRegistry::new(self.callbacks));
        info!(generation, "Tao event loop created");

        Ok(TaoLoop {
            generation,
            event_loop,
            waker: Arc::new(TaoWaker { proxy }),
        })
    }
}

/// A tao event loop pinned to the owner thread.
pub struct TaoLoop {
    generation: u32,
    event_loop: EventLoop<LoopSignal>,
    waker: Arc<TaoWaker>,
}

impl ForeignLoop for TaoLoop {
    fn waker(&self) -> Arc<dyn LoopWaker> {
        Arc::clone(&self.waker) as Arc<dyn LoopWaker>
    }

    fn run_until_stopped(&mut self, pump: &mut dyn FnMut()) {
        let code = self.event_loop.run_return(|event, _target, control_flow| {
            if !matches!(*control_flow, ControlFlow::ExitWithCode(_)) {
                *control_flow = ControlFlow::Wait;
            }

            match event {
                Event::NewEvents(StartCause::Init) | Event::UserEvent(LoopSignal::Wake) => pump(),
                Event::UserEvent(LoopSignal::Quit) => *control_flow = ControlFlow::ExitWithCode(0),
                Event::UserEvent(LoopSignal::Tray(event)) => operations::dispatch_tray_event(event),
                Event::UserEvent(LoopSignal::Menu(event)) => operations::dispatch_menu_event(event),
                _ => {}
            }
        });
        debug!(generation = self.generation, code, "Event loop returned");
    }

    fn teardown(&mut self) {
        let released = EVENT_HANDLERS.release(self.generation, || {
            TrayIconEvent::set_event_handler(None::<fn(TrayIconEvent)>);
            MenuEvent::set_event_handler(None::<fn(MenuEvent)>);
        });
        if !released {
            debug!(generation = self.generation, "Event handlers already taken over");
        }
        resources::teardown();
    }
}

struct TaoWaker {
    proxy: Arc<Mutex<EventLoopProxy<LoopSignal>>>,
}

impl TaoWaker {
    fn post(&self, signal: LoopSignal) -> Result<(), WakeError> {
        self.proxy
            .lock()
            .send_event(signal)
            .map_err(|_| WakeError::LoopGone)
    }
}

impl LoopWaker for TaoWaker {
    fn wake(&self) -> Result<(), WakeError> {
        self.post(LoopSignal::Wake)
    }

    fn request_quit(&self) -> Result<(), WakeError> {
        self.post(LoopSignal::Quit)
    }
}

#[cfg(target_os = "macos")]
fn build_event_loop() -> Result<EventLoop<LoopSignal>, RuntimeError> {
    Err("macOS requires the tray event loop on the process main thread".into())
}

#[cfg(not(target_os = "macos"))]
fn build_event_loop() -> Result<EventLoop<LoopSignal>, RuntimeError> {
    use tao::event_loop::EventLoopBuilder;

    let mut builder = EventLoopBuilder::<LoopSignal>::with_user_event();
    allow_any_thread(&mut builder);
    Ok(builder.build())
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn allow_any_thread(builder: &mut tao::event_loop::EventLoopBuilder<LoopSignal>) {
    use tao::platform::unix::EventLoopBuilderExtUnix;
    builder.with_any_thread(true);
}

#[cfg(windows)]
fn allow_any_thread(builder: &mut tao::event_loop::EventLoopBuilder<LoopSignal>) {
    use tao::platform::windows::EventLoopBuilderExtWindows;
    builder.with_any_thread(true);
}

#[cfg(not(any(
    windows,
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn allow_any_thread(_builder: &mut tao::event_loop::EventLoopBuilder<LoopSignal>) {}
