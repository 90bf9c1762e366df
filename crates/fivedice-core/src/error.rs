//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Rule violations are intent-local: the aggregate that rejects a command is
/// left untouched and the caller simply learns why. None of these variants is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An operation was attempted outside its legal state, e.g. a reroll
    /// with no rolls left or any mutation of a completed game.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A score commit was attempted on a category that already holds a value.
    #[error("category already scored: {0}")]
    CategoryAlreadyScored(String),

    /// An unknown category tag arrived from the boundary.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// A die index outside the hand was referenced.
    #[error("invalid die position: {0}")]
    InvalidPosition(usize),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
