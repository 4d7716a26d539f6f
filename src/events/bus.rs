//! Listener registry, dispatch and atomic scopes.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::event::{DomainEvent, EventKind};
use crate::core::config::SessionExpiry;
use crate::core::log::VerbosityLevel;
use crate::core::World;
use crate::error::Result;
use crate::undo::{UndoAction, UndoBuilder, Undoable};

/// Unique identifier for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// A reaction to an event. Its returned undo reverts what it did.
pub type Listener = Arc<dyn Fn(&mut World, &DomainEvent) -> Result<UndoAction> + Send + Sync>;

/// Listeners by event kind, plus the log of published events.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: FxHashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u32,
    history: Vector<DomainEvent>,
    atomic_depth: u32,
    /// Listeners dropped by [`EventBus::expire_session`].
    session: Vec<ListenerId>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener after all listeners already registered for `kind`.
    ///
    /// The undo deregisters exactly this listener.
    pub fn register(&mut self, kind: EventKind, listener: Listener) -> Undoable<ListenerId, EventBus> {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(kind).or_default().push((id, listener));
        Undoable::new(
            id,
            UndoAction::new(move |bus: &mut EventBus| {
                let _ = bus.take(id);
            }),
        )
    }

    /// Like [`EventBus::register`], but the listener only lasts until the
    /// next [`EventBus::expire_session`].
    pub fn register_for_session(
        &mut self,
        kind: EventKind,
        listener: Listener,
    ) -> Undoable<ListenerId, EventBus> {
        let (id, undo) = self.register(kind, listener).into_parts();
        self.session.push(id);
        Undoable::new(
            id,
            undo.then(UndoAction::new(move |bus: &mut EventBus| {
                bus.session.retain(|other| *other != id);
            })),
        )
    }

    /// Deregister every session listener.
    ///
    /// The undo re-registers them in their original slots.
    pub fn expire_session(&mut self) -> UndoAction<EventBus> {
        if self.session.is_empty() {
            return UndoAction::noop();
        }
        let expired = std::mem::take(&mut self.session);
        let mut undo = UndoBuilder::new();
        for &id in &expired {
            undo.add(self.unregister(id));
        }
        let restore = UndoAction::new(move |bus: &mut EventBus| bus.session = expired);
        restore.then(undo.build())
    }

    /// Number of live session listeners.
    #[must_use]
    pub fn session_listener_count(&self) -> usize {
        self.session.iter().filter(|&&id| self.is_registered(id)).count()
    }

    /// Remove a listener. The undo puts it back in its original slot.
    pub fn unregister(&mut self, id: ListenerId) -> UndoAction<EventBus> {
        match self.take(id) {
            None => UndoAction::noop(),
            Some((kind, index, listener)) => UndoAction::new(move |bus: &mut EventBus| {
                let listeners = bus.listeners.entry(kind).or_default();
                let index = index.min(listeners.len());
                listeners.insert(index, (id, listener));
            }),
        }
    }

    fn take(&mut self, id: ListenerId) -> Option<(EventKind, usize, Listener)> {
        self.listeners.iter_mut().find_map(|(&kind, listeners)| {
            let index = listeners.iter().position(|(other, _)| *other == id)?;
            let (_, listener) = listeners.remove(index);
            Some((kind, index, listener))
        })
    }

    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners
            .values()
            .any(|listeners| listeners.iter().any(|(other, _)| *other == id))
    }

    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    fn snapshot(&self, kind: EventKind) -> Vec<(ListenerId, Listener)> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    /// Every event published so far, oldest first. Undone publishes are removed.
    #[must_use]
    pub fn history(&self) -> &Vector<DomainEvent> {
        &self.history
    }

    fn record(&mut self, event: DomainEvent) -> UndoAction<EventBus> {
        self.history.push_back(event);
        UndoAction::new(|bus: &mut EventBus| {
            bus.history.pop_back();
        })
    }

    /// Number of atomic scopes currently open.
    #[must_use]
    pub fn atomic_depth(&self) -> u32 {
        self.atomic_depth
    }

    #[must_use]
    pub fn in_atomic(&self) -> bool {
        self.atomic_depth > 0
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("listeners", &listeners)
            .field("history", &self.history.len())
            .field("atomic_depth", &self.atomic_depth)
            .finish()
    }
}

fn bus(world: &mut World) -> Option<&mut EventBus> {
    Some(&mut world.events)
}

impl World {
    /// Register a listener for `kind`. The undo deregisters it.
    pub fn register_listener(
        &mut self,
        kind: EventKind,
        listener: impl Fn(&mut World, &DomainEvent) -> Result<UndoAction> + Send + Sync + 'static,
    ) -> Undoable<ListenerId> {
        let (id, undo) = self.events.register(kind, Arc::new(listener)).into_parts();
        Undoable::new(id, undo.lift(bus))
    }

    /// Register a listener that is dropped when session modifiers expire.
    pub fn register_session_listener(
        &mut self,
        kind: EventKind,
        listener: impl Fn(&mut World, &DomainEvent) -> Result<UndoAction> + Send + Sync + 'static,
    ) -> Undoable<ListenerId> {
        let (id, undo) = self
            .events
            .register_for_session(kind, Arc::new(listener))
            .into_parts();
        Undoable::new(id, undo.lift(bus))
    }

    /// Deregister a listener. The undo restores it at its original position.
    pub fn unregister_listener(&mut self, id: ListenerId) -> UndoAction {
        self.events.unregister(id).lift(bus)
    }

    /// Deliver `event` to every listener registered for its kind.
    ///
    /// Listeners deregistered by an earlier listener of the same dispatch
    /// are skipped. If a listener fails, everything this publish did is
    /// rolled back before the error is returned.
    pub fn publish(&mut self, event: DomainEvent) -> Result<UndoAction> {
        let mut undo = UndoBuilder::new();
        if self.log.enabled(VerbosityLevel::Verbose) {
            self.log.verbose("event", event.to_string());
        }
        let listeners = self.events.snapshot(event.kind());
        undo.add(self.events.record(event.clone()).lift(bus));

        for (id, listener) in listeners {
            if !self.events.is_registered(id) {
                continue;
            }
            match listener(self, &event) {
                Ok(step) => undo.add(step),
                Err(err) => {
                    self.log.minimal("event", format!("{id} failed on {event}: {err}"));
                    undo.rollback(self);
                    return Err(err);
                }
            }
        }
        Ok(undo.build())
    }

    /// Run `action` as one compound effect.
    ///
    /// Listeners can query [`EventBus::atomic_depth`] while it runs. With
    /// [`SessionExpiry::OnOutermostAtomicExit`], leaving the outermost scope
    /// also expires session modifiers, and the returned undo reverts that
    /// too.
    pub fn do_atomic(
        &mut self,
        action: impl FnOnce(&mut World) -> Result<UndoAction>,
    ) -> Result<UndoAction> {
        self.events.atomic_depth += 1;
        let result = action(self);
        self.events.atomic_depth -= 1;

        let undo = result?;
        if self.events.atomic_depth == 0
            && self.config().session_expiry == SessionExpiry::OnOutermostAtomicExit
        {
            return Ok(undo.then(self.expire_session_modifiers()));
        }
        Ok(undo)
    }
}
