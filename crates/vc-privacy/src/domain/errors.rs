//! Privacy coordination error types.
//!
//! The taxonomy distinguishes three situations callers must tell apart
//! without string matching:
//!
//! - **Store faults** propagate unchanged, tagged with the failing
//!   operation. `PostStoreRetrieval` is the documented partial-failure
//!   window: the payload is durably stored but its group id was never
//!   learned.
//! - **Invariant violations** (`AmbiguousLegacyGroup`) are fatal and abort
//!   the resolving call; an arbitrary match is never picked silently.
//! - Missing-data defaults (no state root, no view, no account) are NOT
//!   errors and never appear here; they resolve to the default nonce.

use shared_types::{ParticipantKey, PrivacyGroupId, StateError, StoreError, StoreKey};
use thiserror::Error;

use crate::ports::outbound::EncodeError;

/// Error surface of the privacy coordination subsystem.
#[derive(Debug, Clone, Error)]
pub enum PrivacyError {
    /// A confidential store operation failed.
    #[error("confidential store {operation} failed: {source}")]
    Store {
        /// The store operation that failed.
        operation: &'static str,
        /// The underlying store fault.
        #[source]
        source: StoreError,
    },

    /// The payload was stored but the follow-up envelope retrieval failed,
    /// leaving the assigned group id unknown to the caller.
    #[error("transaction stored under key {store_key} but group id retrieval failed: {source}")]
    PostStoreRetrieval {
        /// The key the payload is durably stored under.
        store_key: StoreKey,
        /// The retrieval fault.
        #[source]
        source: StoreError,
    },

    /// The store returned more than one legacy group for one exact member
    /// set, violating its at-most-one guarantee.
    #[error("found {found} legacy privacy groups for one member set, expected at most 1")]
    AmbiguousLegacyGroup {
        /// How many legacy groups matched.
        found: usize,
        /// The member set that matched them.
        members: Vec<ParticipantKey>,
    },

    /// The group state storage or world-state reader failed.
    #[error("group state read failed for {group_id}: {source}")]
    State {
        /// The group whose state was being read.
        group_id: PrivacyGroupId,
        /// The underlying state fault.
        #[source]
        source: StateError,
    },

    /// The transaction could not be encoded to its canonical payload.
    #[error("payload encoding failed: {source}")]
    Encoding {
        /// The underlying codec fault.
        #[from]
        source: EncodeError,
    },
}
