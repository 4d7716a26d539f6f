//! Dynamic values with modifier stacks.
//!
//! ## Ordering
//!
//! Modifiers are folded by ascending priority, and by insertion order when
//! priorities tie. The stack is only ever appended to or removed from, and
//! removal is by [`ModifierId`] (identity), never by value.
//!
//! ## Example
//!
//! ```
//! use brazier_core::values::{DynamicValue, Modifier};
//!
//! let mut cost = DynamicValue::new(4);
//! let discount = cost.add_modifier(Modifier::add(-2));
//! assert_eq!(cost.value(), 2);
//!
//! let _big_discount = cost.add_modifier(Modifier::add(-5));
//! assert_eq!(cost.value(), -3); // never clamped here
//!
//! discount.undo(&mut cost);
//! assert_eq!(cost.value(), -1);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::undo::UndoAction;

/// Types that can back a dynamic value.
pub trait ValueType: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {}

impl<T: Copy + fmt::Debug + PartialEq + Send + Sync + 'static> ValueType for T {}

/// A pure transform applied to the running value.
pub type Transform<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Identity of a modifier within one dynamic value.
///
/// Ids are allocated in increasing order, so they double as insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifierId(pub u32);

/// Lifetime of a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierScope {
    /// Lives as long as the owning entity (e.g. a card's cost adjusters).
    Permanent,
    /// Can be detached through its undo handle.
    #[default]
    Removable,
    /// Removable, and also stripped when the current session expires
    /// ("this turn only").
    Session,
}

/// One entry of a modifier stack.
#[derive(Clone)]
pub struct Modifier<T> {
    priority: i32,
    scope: ModifierScope,
    transform: Transform<T>,
}

impl<T: ValueType> Modifier<T> {
    /// Create a removable modifier with default priority.
    pub fn new(transform: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        Self {
            priority: 0,
            scope: ModifierScope::default(),
            transform: Arc::new(transform),
        }
    }

    /// Create a modifier that forces the output to `value`.
    pub fn set(value: T) -> Self {
        Self::new(move |_| value)
    }

    /// Set the priority (builder pattern). Lower priorities fold first.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the scope (builder pattern).
    #[must_use]
    pub fn with_scope(mut self, scope: ModifierScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[must_use]
    pub fn scope(&self) -> ModifierScope {
        self.scope
    }

    /// Apply the transform to a value.
    #[must_use]
    pub fn apply(&self, value: T) -> T {
        (self.transform)(value)
    }
}

impl Modifier<i32> {
    /// Create a modifier adding `delta`.
    pub fn add(delta: i32) -> Self {
        Self::new(move |value| value.saturating_add(delta))
    }

    /// Create a modifier multiplying by `factor`.
    pub fn multiply(factor: i32) -> Self {
        Self::new(move |value| value.saturating_mul(factor))
    }
}

impl<T> fmt::Debug for Modifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifier")
            .field("priority", &self.priority)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct Entry<T> {
    id: ModifierId,
    modifier: Modifier<T>,
}

impl<T> Entry<T> {
    fn key(&self) -> (i32, ModifierId) {
        (self.modifier.priority, self.id)
    }
}

/// A base value with a stack of modifiers.
#[derive(Clone)]
pub struct DynamicValue<T> {
    base: T,
    /// Sorted by `(priority, id)`.
    entries: Vec<Entry<T>>,
    next_id: u32,
}

impl<T: ValueType> DynamicValue<T> {
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a value with permanent modifiers installed up front.
    #[must_use]
    pub fn with_permanent(base: T, modifiers: impl IntoIterator<Item = Modifier<T>>) -> Self {
        let mut value = Self::new(base);
        for modifier in modifiers {
            let _ = value.add_modifier(modifier.with_scope(ModifierScope::Permanent));
        }
        value
    }

    #[must_use]
    pub fn base(&self) -> T {
        self.base
    }

    /// The effective value: the base folded through every modifier.
    #[must_use]
    pub fn value(&self) -> T {
        self.derive_from(self.base)
    }

    /// Fold an arbitrary input through the modifier stack.
    #[must_use]
    pub fn derive_from(&self, input: T) -> T {
        self.entries
            .iter()
            .fold(input, |value, entry| entry.modifier.apply(value))
    }

    /// Number of active modifiers.
    #[must_use]
    pub fn modifier_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn contains(&self, id: ModifierId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Install a modifier.
    ///
    /// Returns an undo detaching exactly this modifier. Permanent modifiers
    /// persist for the owner's lifetime, so their undo is a no-op.
    pub fn add_modifier(&mut self, modifier: Modifier<T>) -> UndoAction<Self> {
        let permanent = modifier.scope == ModifierScope::Permanent;
        let id = self.push(modifier);
        if permanent {
            UndoAction::noop()
        } else {
            UndoAction::new(move |value: &mut Self| {
                let detached = value.detach(id);
                debug_assert!(detached.is_some(), "modifier {id:?} undone twice");
            })
        }
    }

    /// Force the effective value to `value` from this point of the stack on.
    pub fn set_value_to(&mut self, value: T) -> UndoAction<Self> {
        self.add_modifier(Modifier::set(value))
    }

    /// Detach a modifier as a game effect (e.g. an aura leaving play).
    ///
    /// The returned undo puts it back at its original position.
    pub fn remove_modifier(&mut self, id: ModifierId) -> UndoAction<Self> {
        match self.detach(id) {
            None => UndoAction::noop(),
            Some(modifier) => UndoAction::new(move |value: &mut Self| value.restore(id, modifier)),
        }
    }

    /// Strip every session-scoped modifier.
    pub fn expire_session(&mut self) -> UndoAction<Self> {
        if !self.has_session_modifiers() {
            return UndoAction::noop();
        }

        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.modifier.scope == ModifierScope::Session);
        self.entries = kept;

        UndoAction::new(move |value: &mut Self| {
            for entry in expired {
                value.restore(entry.id, entry.modifier);
            }
        })
    }

    #[must_use]
    pub fn has_session_modifiers(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.modifier.scope == ModifierScope::Session)
    }

    fn push(&mut self, modifier: Modifier<T>) -> ModifierId {
        let id = ModifierId(self.next_id);
        self.next_id += 1;
        self.insert(Entry { id, modifier });
        id
    }

    fn insert(&mut self, entry: Entry<T>) {
        let key = entry.key();
        let index = self.entries.partition_point(|e| e.key() < key);
        self.entries.insert(index, entry);
    }

    fn detach(&mut self, id: ModifierId) -> Option<Modifier<T>> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).modifier)
    }

    fn restore(&mut self, id: ModifierId, modifier: Modifier<T>) {
        debug_assert!(!self.contains(id), "modifier {id:?} restored twice");
        self.insert(Entry { id, modifier });
    }
}

impl<T: ValueType> fmt::Debug for DynamicValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicValue")
            .field("base", &self.base)
            .field("value", &self.value())
            .field("modifiers", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        let value = DynamicValue::new(3);
        assert_eq!(value.value(), 3);
        assert_eq!(value.modifier_count(), 0);
    }

    #[test]
    fn test_fold_in_insertion_order() {
        let mut attack = DynamicValue::new(2);
        let _plus = attack.add_modifier(Modifier::add(1));
        let _double = attack.add_modifier(Modifier::multiply(2));
        assert_eq!(attack.value(), 6);

        let mut other = DynamicValue::new(2);
        let _double = other.add_modifier(Modifier::multiply(2));
        let _plus = other.add_modifier(Modifier::add(1));
        assert_eq!(other.value(), 5);
    }

    #[test]
    fn test_priority_orders_before_insertion() {
        let mut attack = DynamicValue::new(2);
        let _double = attack.add_modifier(Modifier::multiply(2));
        let _early = attack.add_modifier(Modifier::add(1).with_priority(-1));
        assert_eq!(attack.value(), 6);
    }

    #[test]
    fn test_undo_removes_by_identity() {
        let mut attack = DynamicValue::new(1);
        let first = attack.add_modifier(Modifier::add(2));
        let _second = attack.add_modifier(Modifier::add(2));
        assert_eq!(attack.value(), 5);

        first.undo(&mut attack);
        assert_eq!(attack.value(), 3);
        assert_eq!(attack.modifier_count(), 1);
    }

    #[test]
    fn test_set_value_to_then_buff() {
        let mut attack = DynamicValue::new(5);
        let set = attack.set_value_to(1);
        let _buff = attack.add_modifier(Modifier::add(2));
        assert_eq!(attack.value(), 3);

        set.undo(&mut attack);
        assert_eq!(attack.value(), 7);
    }

    #[test]
    fn test_bool_value() {
        let mut taunt = DynamicValue::new(false);
        let undo = taunt.set_value_to(true);
        assert!(taunt.value());
        undo.undo(&mut taunt);
        assert!(!taunt.value());
    }

    #[test]
    fn test_permanent_modifier_persists() {
        let mut cost = DynamicValue::with_permanent(5, [Modifier::add(-1)]);
        assert_eq!(cost.value(), 4);

        let undo = cost.add_modifier(Modifier::add(-1).with_scope(ModifierScope::Permanent));
        assert!(undo.is_noop());
        assert_eq!(cost.value(), 3);
    }

    #[test]
    fn test_remove_modifier_restores_position() {
        let mut attack = DynamicValue::new(1);
        let _plus = attack.add_modifier(Modifier::add(1));
        let _double = attack.add_modifier(Modifier::multiply(2));
        assert_eq!(attack.value(), 4);

        let removal = attack.remove_modifier(ModifierId(0));
        assert_eq!(attack.value(), 2);

        removal.undo(&mut attack);
        assert_eq!(attack.value(), 4);
    }

    #[test]
    fn test_remove_unknown_modifier() {
        let mut attack = DynamicValue::new(1);
        assert!(attack.remove_modifier(ModifierId(9)).is_noop());
    }

    #[test]
    fn test_expire_session() {
        let mut attack = DynamicValue::new(1);
        let _permanent = attack.add_modifier(Modifier::add(1));
        let _temporary = attack.add_modifier(Modifier::add(3).with_scope(ModifierScope::Session));
        let _double = attack.add_modifier(Modifier::multiply(2));
        assert_eq!(attack.value(), 10);
        assert!(attack.has_session_modifiers());

        let expiry = attack.expire_session();
        assert_eq!(attack.value(), 4);
        assert!(!attack.has_session_modifiers());

        expiry.undo(&mut attack);
        assert_eq!(attack.value(), 10);
    }

    #[test]
    fn test_expire_without_session_modifiers() {
        let mut attack = DynamicValue::new(1);
        assert!(attack.expire_session().is_noop());
    }

    #[test]
    fn test_derive_from() {
        let mut outgoing = DynamicValue::new(0);
        let _double = outgoing.add_modifier(Modifier::multiply(2));
        assert_eq!(outgoing.derive_from(3), 6);
    }
}
