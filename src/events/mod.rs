//! Domain events and the undoable event bus.
//!
//! Publishing an event runs every listener registered for its kind,
//! immediately and in registration order. Listeners may publish further
//! events; those are dispatched depth-first before the outer dispatch
//! continues. The undo of a publish reverts every listener's effect.

mod bus;
mod event;

pub use bus::{EventBus, Listener, ListenerId};
pub use event::{DomainEvent, EventKind};
