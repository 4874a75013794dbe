use thiserror::Error;

/// Storage-level failure.
///
/// These are **infrastructure errors** (locking, concurrency, corrupt appends)
/// as opposed to domain errors (preconditions, invariants).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid append: {0}")]
    InvalidAppend(String),

    #[error("store lock poisoned")]
    Poisoned,
}
