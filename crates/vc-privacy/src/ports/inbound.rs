//! # Inbound Port (Driving Port / API)
//!
//! The trait the embedding node calls to coordinate confidential
//! transactions. Implemented by
//! [`crate::service::PrivacyCoordinationService`].

use shared_types::{
    Address, CallParameters, MarkerTransaction, ParticipantKey, PrivacyGroup, PrivacyGroupId,
    PrivateTransaction, StoreKey, StoredEnvelope,
};

use crate::domain::entities::SubmissionReceipt;
use crate::domain::errors::PrivacyError;
use crate::ports::outbound::{SimulationResult, ValidationResult};

/// Privacy coordination API.
pub trait PrivacyApi: Send + Sync {
    /// Encodes and stores a confidential transaction, resolving the privacy
    /// group it was filed under.
    ///
    /// Group-addressed transactions resolve without a store round trip;
    /// ad-hoc transactions read their envelope back to learn the assigned
    /// group id.
    fn submit_transaction(&self, tx: &PrivateTransaction)
        -> Result<SubmissionReceipt, PrivacyError>;

    /// Fetches the envelope stored under `key` using the node's own
    /// participant key.
    fn retrieve_transaction(&self, key: &StoreKey) -> Result<StoredEnvelope, PrivacyError>;

    /// Creates an explicit (Pantheon) privacy group.
    fn create_privacy_group(
        &self,
        members: &[ParticipantKey],
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, PrivacyError>;

    /// Deletes a privacy group; returns the store's confirmation id.
    fn delete_privacy_group(&self, group_id: &PrivacyGroupId) -> Result<String, PrivacyError>;

    /// Finds the groups whose member set matches `members` exactly.
    fn find_privacy_groups(
        &self,
        members: &[ParticipantKey],
    ) -> Result<Vec<PrivacyGroup>, PrivacyError>;

    /// Validates `tx` against the sender's expected nonce in `group_id`.
    fn validate_transaction(
        &self,
        tx: &PrivateTransaction,
        group_id: &PrivacyGroupId,
    ) -> Result<ValidationResult, PrivacyError>;

    /// Derives the next valid nonce for `sender` within `group_id`.
    fn next_group_nonce(
        &self,
        sender: &Address,
        group_id: &PrivacyGroupId,
    ) -> Result<u64, PrivacyError>;

    /// Derives the next valid nonce for `sender` within the legacy group
    /// implied by `(private_from, private_for)`, defaulting when no such
    /// group exists yet.
    fn next_legacy_nonce(
        &self,
        private_from: &ParticipantKey,
        private_for: &[ParticipantKey],
        sender: &Address,
    ) -> Result<u64, PrivacyError>;

    /// Simulates a call against `group_id`'s private state at
    /// `block_number`; pure pass-through to the simulator.
    fn simulate_transaction(
        &self,
        group_id: &PrivacyGroupId,
        call: &CallParameters,
        block_number: u64,
    ) -> Result<Option<SimulationResult>, PrivacyError>;

    /// Builds the public-chain marker transaction for a stored
    /// confidential transaction.
    fn create_marker_transaction(
        &self,
        store_key: &StoreKey,
        tx: &PrivateTransaction,
    ) -> MarkerTransaction;
}
