//! Reversible operations.
//!
//! Every mutation of shared state returns an [`UndoAction`] that reverses
//! exactly that mutation. Compound mutations aggregate their parts with an
//! [`UndoBuilder`], which undoes them in strict reverse order.
//!
//! ## Example
//!
//! ```
//! use brazier_core::undo::{UndoAction, UndoBuilder};
//!
//! fn push(values: &mut Vec<i32>, value: i32) -> UndoAction<Vec<i32>> {
//!     values.push(value);
//!     UndoAction::new(|values: &mut Vec<i32>| {
//!         values.pop();
//!     })
//! }
//!
//! let mut values = Vec::new();
//! let mut builder = UndoBuilder::new();
//! builder.add(push(&mut values, 1));
//! builder.add(push(&mut values, 2));
//! let undo = builder.build();
//!
//! assert_eq!(values, vec![1, 2]);
//! undo.undo(&mut values);
//! assert!(values.is_empty());
//! ```

mod action;
mod builder;
mod result;

pub use action::UndoAction;
pub use builder::UndoBuilder;
pub use result::Undoable;
