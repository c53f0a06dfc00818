//! # Error Types
//!
//! Defines the collaborator fault surfaces shared across subsystems.

use thiserror::Error;

/// Errors parsing an opaque identifier from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The string form was not valid base64.
    #[error("invalid base64 identifier: {0}")]
    InvalidBase64(String),
}

/// Faults raised by the confidential store.
///
/// These surface unchanged through the coordination layer; retry policy is
/// the caller's concern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No payload is stored under the given key.
    #[error("payload not found for store key {0}")]
    PayloadNotFound(String),

    /// The referenced privacy group does not exist.
    #[error("privacy group not found: {0}")]
    GroupNotFound(String),

    /// The requesting key is not a recipient of the payload.
    #[error("key {0} is not a recipient of the requested payload")]
    NotAuthorized(String),

    /// The store rejected the request (e.g. malformed recipient list).
    #[error("store rejected the request: {0}")]
    Rejected(String),

    /// The store could not be reached or answered with a transport fault.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A store-side lock was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Faults raised by the group state storage or the world-state reader.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// A state-side lock was poisoned.
    #[error("state lock poisoned")]
    LockPoisoned,

    /// The backing database failed.
    #[error("state database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_carries_key() {
        let err = StoreError::PayloadNotFound("abc123".to_string());
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_not_authorized_display() {
        let err = StoreError::NotAuthorized("cGFydHk=".to_string());
        assert!(err.to_string().contains("not a recipient"));
    }
}
