//! Incremental aggregation of undo actions.

use smallvec::SmallVec;

use super::{UndoAction, Undoable};
use crate::core::World;

/// Collects undo actions as a compound mutation produces them.
///
/// `build` consumes the builder, so a partially built aggregate is never
/// observable. The aggregate undoes its parts in reverse insertion order.
#[must_use = "an UndoBuilder must be built or rolled back"]
pub struct UndoBuilder<C: 'static = World> {
    /// Most compound effects produce 1-4 parts.
    steps: SmallVec<[UndoAction<C>; 4]>,
}

impl<C: 'static> UndoBuilder<C> {
    pub fn new() -> Self {
        Self {
            steps: SmallVec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: SmallVec::with_capacity(capacity),
        }
    }

    /// Record the undo of the next performed mutation.
    pub fn add(&mut self, undo: UndoAction<C>) {
        if !undo.is_noop() {
            self.steps.push(undo);
        }
    }

    /// Record the undo of a mutation that produced a value, returning the value.
    pub fn add_result<T>(&mut self, result: Undoable<T, C>) -> T {
        let (value, undo) = result.into_parts();
        self.add(undo);
        value
    }

    /// Number of recorded (non-noop) parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Finish aggregation.
    pub fn build(mut self) -> UndoAction<C> {
        match self.steps.len() {
            0 => UndoAction::noop(),
            1 => self.steps.remove(0),
            _ => {
                let steps = self.steps;
                UndoAction::new(move |ctx| {
                    for step in steps.into_iter().rev() {
                        step.undo(ctx);
                    }
                })
            }
        }
    }

    /// Undo everything recorded so far, immediately.
    ///
    /// Used when a compound mutation fails halfway through.
    pub fn rollback(self, ctx: &mut C) {
        self.build().undo(ctx);
    }
}

impl<C: 'static> Default for UndoBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Extend<UndoAction<C>> for UndoBuilder<C> {
    fn extend<I: IntoIterator<Item = UndoAction<C>>>(&mut self, iter: I) {
        for undo in iter {
            self.add(undo);
        }
    }
}
