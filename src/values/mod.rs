//! Derived numeric and boolean properties.
//!
//! A [`DynamicValue`] is a base value plus an ordered stack of
//! [`Modifier`]s. The effective value is recomputed on every read by folding
//! the base through the stack, so adding or removing modifiers in any order
//! always yields a consistent result.

mod dynamic;

pub use dynamic::{DynamicValue, Modifier, ModifierId, ModifierScope, Transform, ValueType};
