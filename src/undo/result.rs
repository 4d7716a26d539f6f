//! Values produced by reversible mutations.

use std::fmt;

use super::UndoAction;
use crate::core::World;

/// A result paired with the undo of the mutation that produced it.
#[must_use = "the undo of this result must be recorded or performed"]
pub struct Undoable<T, C: 'static = World> {
    result: T,
    undo: UndoAction<C>,
}

impl<T, C: 'static> Undoable<T, C> {
    pub fn new(result: T, undo: UndoAction<C>) -> Self {
        Self { result, undo }
    }

    /// A result whose computation changed nothing.
    pub fn unchanged(result: T) -> Self {
        Self::new(result, UndoAction::noop())
    }

    #[must_use]
    pub fn result(&self) -> &T {
        &self.result
    }

    pub fn into_parts(self) -> (T, UndoAction<C>) {
        (self.result, self.undo)
    }

    /// Discard the value, keeping only the undo.
    pub fn into_undo(self) -> UndoAction<C> {
        self.undo
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Undoable<U, C> {
        Undoable::new(f(self.result), self.undo)
    }
}

impl<T: fmt::Debug, C: 'static> fmt::Debug for Undoable<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Undoable")
            .field("result", &self.result)
            .field("undo", &self.undo)
            .finish()
    }
}
