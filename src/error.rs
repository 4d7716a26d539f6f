//! Error types for the rule engine.
//!
//! Unmet preconditions are not errors: actions report them by returning
//! [`UndoAction::noop`](crate::undo::UndoAction::noop). Everything in this
//! enum signals a content or programming defect and is not recoverable.

use thiserror::Error;

use crate::cards::CardId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unknown card: {0}")]
    UnknownCard(CardId),

    #[error("{0} has no minion")]
    MissingMinion(CardId),

    #[error("Duplicate card definition: {0}")]
    DuplicateCard(CardId),

    #[error("Invalid definition of {card}: {reason}")]
    InvalidDefinition { card: CardId, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn invalid(card: CardId, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            card,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
