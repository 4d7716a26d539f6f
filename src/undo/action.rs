//! The single-use undo handle.

use std::fmt;

use crate::core::World;

type UndoFn<C> = Box<dyn FnOnce(&mut C)>;

/// Handle that reverses one mutation of a context `C` (the [`World`] by default).
///
/// `undo` consumes the handle, so an action can be undone at most once.
/// Dropping a handle without undoing it commits the mutation.
#[must_use = "dropping an UndoAction makes its mutation irreversible"]
pub struct UndoAction<C: 'static = World> {
    step: Option<UndoFn<C>>,
}

impl<C: 'static> UndoAction<C> {
    /// The action representing "nothing happened".
    pub const fn noop() -> Self {
        Self { step: None }
    }

    /// Wrap a closure that reverts a mutation.
    pub fn new(undo: impl FnOnce(&mut C) + 'static) -> Self {
        Self {
            step: Some(Box::new(undo)),
        }
    }

    /// Check if undoing this action does nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.step.is_none()
    }

    /// Revert the mutation.
    pub fn undo(self, ctx: &mut C) {
        if let Some(step) = self.step {
            step(ctx);
        }
    }

    /// Combine with an action performed after this one.
    ///
    /// The result undoes `later` first, then `self`.
    pub fn then(self, later: UndoAction<C>) -> UndoAction<C> {
        match (self.step, later.step) {
            (None, None) => Self::noop(),
            (Some(step), None) | (None, Some(step)) => Self { step: Some(step) },
            (Some(first), Some(second)) => Self::new(move |ctx| {
                second(ctx);
                first(ctx);
            }),
        }
    }

    /// Re-target an undo recorded against a part of a larger context.
    ///
    /// `focus` is resolved when the undo runs. If the part no longer exists
    /// (the owning entity was destroyed since), the undo does nothing.
    pub fn lift<W: 'static>(
        self,
        focus: impl FnOnce(&mut W) -> Option<&mut C> + 'static,
    ) -> UndoAction<W> {
        match self.step {
            None => UndoAction::noop(),
            Some(step) => UndoAction::new(move |outer: &mut W| {
                if let Some(inner) = focus(outer) {
                    step(inner);
                }
            }),
        }
    }
}

impl<C: 'static> Default for UndoAction<C> {
    fn default() -> Self {
        Self::noop()
    }
}

impl<C: 'static> fmt::Debug for UndoAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            f.write_str("UndoAction(noop)")
        } else {
            f.write_str("UndoAction(..)")
        }
    }
}

impl<C: 'static> FromIterator<UndoAction<C>> for UndoAction<C> {
    /// Aggregate actions given in the order they were performed.
    fn from_iter<I: IntoIterator<Item = UndoAction<C>>>(iter: I) -> Self {
        let mut builder = super::UndoBuilder::new();
        for undo in iter {
            builder.add(undo);
        }
        builder.build()
    }
}
