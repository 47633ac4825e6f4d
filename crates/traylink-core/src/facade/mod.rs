mod event_loop_facade;
mod invoker;
mod owner;
pub(crate) mod owner_state;
mod readiness;
mod readiness_gate;
mod stop_outcome;

pub use {
    event_loop_facade::Facade, invoker::Invoker, owner::EventLoopOwner, owner_state::OwnerState,
    readiness::Readiness, readiness_gate::ReadinessGate, stop_outcome::StopOutcome,
};
