//! Domain entities local to the coordination subsystem.

use serde::{Deserialize, Serialize};

// Re-export from shared-types for convenience
pub use shared_types::{
    AccountState, Address, CallParameters, MarkerTransaction, ParticipantKey, PrivacyGroup,
    PrivacyGroupId, PrivacyGroupType, PrivateAddressing, PrivateTransaction, StateRoot, StoreKey,
    StoredEnvelope,
};

/// Result of submitting a confidential transaction: the store key the
/// payload lives under and the privacy group it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Store-assigned handle for the stored payload.
    pub store_key: StoreKey,
    /// The privacy group the transaction was filed under.
    pub privacy_group_id: PrivacyGroupId,
}
