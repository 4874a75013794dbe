//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a precondition failure: it is raised before anything is
/// written, so a caller that sees one knows no state changed. Infrastructure
/// failures (storage, locking) live in `acctlog-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A uniqueness constraint would be violated (e.g. duplicate account number).
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The referenced account does not exist.
    #[error("not found")]
    NotFound,

    /// Identifiers disagree (e.g. the id in a patch differs from the target id).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The command is not legal for the account's current status.
    #[error("cannot apply {command} to an account in status {status}")]
    InvalidTransition { status: String, command: String },

    /// The command token is not recognized.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_transition(status: impl core::fmt::Display, command: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            status: status.to_string(),
            command: command.to_string(),
        }
    }

    pub fn invalid_command(token: impl Into<String>) -> Self {
        Self::InvalidCommand(token.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_status_and_command() {
        let err = DomainError::invalid_transition("ACCOUNT_ACTIVE", "ACTIVATE_ACCOUNT");
        assert_eq!(
            err.to_string(),
            "cannot apply ACTIVATE_ACCOUNT to an account in status ACCOUNT_ACTIVE"
        );
    }
}
