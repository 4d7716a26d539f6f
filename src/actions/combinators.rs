//! Generic composition of actions.
//!
//! Each combinator returns one undo for all the work it did. When a step
//! fails, the steps already done are rolled back before the error is
//! returned, so a failed composite leaves the world as it found it.

use crate::core::World;
use crate::error::Result;
use crate::undo::{UndoAction, UndoBuilder};

/// Something that mutates the world given an argument.
pub trait WorldAction {
    type Arg: Copy;

    fn alter_world(&self, world: &mut World, arg: Self::Arg) -> Result<UndoAction>;
}

/// Run actions in order.
pub fn sequence<'a, A>(
    world: &mut World,
    actions: impl IntoIterator<Item = &'a A>,
    arg: A::Arg,
) -> Result<UndoAction>
where
    A: WorldAction + 'a,
{
    let mut undo = UndoBuilder::new();
    for action in actions {
        match action.alter_world(world, arg) {
            Ok(step) => undo.add(step),
            Err(err) => {
                undo.rollback(world);
                return Err(err);
            }
        }
    }
    Ok(undo.build())
}

/// Run `action` only when `holds` is true.
pub fn guard<A: WorldAction>(world: &mut World, holds: bool, action: &A, arg: A::Arg) -> Result<UndoAction> {
    if holds {
        action.alter_world(world, arg)
    } else {
        Ok(UndoAction::noop())
    }
}

/// Run `action` inside an atomic scope.
pub fn atomic<A: WorldAction>(world: &mut World, action: &A, arg: A::Arg) -> Result<UndoAction> {
    world.do_atomic(|world| action.alter_world(world, arg))
}

/// Run `body`, recording its undos into one.
///
/// If `body` fails, everything it recorded so far is rolled back.
///
/// ```
/// use std::sync::Arc;
/// use brazier_core::actions::transaction;
/// use brazier_core::cards::CardRegistry;
/// use brazier_core::core::{PlayerId, World, WorldConfig};
///
/// let mut world = World::with_seed(WorldConfig::default(), Arc::new(CardRegistry::new()), 0);
/// let undo = transaction(&mut world, |world, undo| {
///     undo.add(world.set_mana(PlayerId(0), 3));
///     undo.add(world.gain_armor(PlayerId(0), 2)?);
///     Ok(())
/// })
/// .unwrap();
///
/// undo.undo(&mut world);
/// assert_eq!(world.player(PlayerId(0)).mana, 10);
/// assert_eq!(world.player(PlayerId(0)).hero.armor, 0);
/// ```
pub fn transaction(
    world: &mut World,
    body: impl FnOnce(&mut World, &mut UndoBuilder) -> Result<()>,
) -> Result<UndoAction> {
    let mut undo = UndoBuilder::new();
    match body(world, &mut undo) {
        Ok(()) => Ok(undo.build()),
        Err(err) => {
            undo.rollback(world);
            Err(err)
        }
    }
}
