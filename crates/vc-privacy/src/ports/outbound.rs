//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define the external collaborators this subsystem needs.
//! Every operation is synchronous; timeout, cancellation and retry policy
//! belong to the collaborator or the caller, never to this layer.

use serde::{Deserialize, Serialize};
use shared_types::{
    AccountState, Address, CallParameters, MarkerTransaction, ParticipantKey, PrivacyGroup,
    PrivacyGroupId, PrivateTransaction, StateError, StateRoot, StoreError, StoreKey,
    StoredEnvelope,
};
use thiserror::Error;

/// Error from payload encoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The transaction could not be serialized.
    #[error("payload serialization failed: {0}")]
    Serialize(String),

    /// A stored payload could not be deserialized.
    #[error("payload deserialization failed: {0}")]
    Deserialize(String),
}

/// The audience of a confidential store send.
///
/// Mirrors the two addressing modes of [`shared_types::PrivateAddressing`]
/// at the store boundary: either an existing group, or an explicit
/// recipient list from which the store derives (or reuses) a legacy group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRecipients {
    /// Send to an existing privacy group.
    Group(PrivacyGroupId),
    /// Send to an explicit recipient list. Must not be empty.
    Direct(Vec<ParticipantKey>),
}

/// The confidential store: holds encrypted payloads and privacy-group
/// metadata off-chain, addressed by opaque keys.
pub trait ConfidentialStore: Send + Sync {
    /// Stores a payload for the given audience and returns its key.
    fn send(
        &self,
        payload: &[u8],
        sender_key: &ParticipantKey,
        recipients: &StoreRecipients,
    ) -> Result<StoreKey, StoreError>;

    /// Fetches the envelope stored under `key` on behalf of
    /// `requesting_key`.
    fn receive(
        &self,
        key: &StoreKey,
        requesting_key: &ParticipantKey,
    ) -> Result<StoredEnvelope, StoreError>;

    /// Creates an explicit (Pantheon) privacy group.
    fn create_group(
        &self,
        members: &[ParticipantKey],
        requesting_key: &ParticipantKey,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, StoreError>;

    /// Deletes a privacy group; returns the store's confirmation id.
    fn delete_group(
        &self,
        group_id: &PrivacyGroupId,
        requesting_key: &ParticipantKey,
    ) -> Result<String, StoreError>;

    /// Finds the groups whose member set matches `members` exactly.
    fn find_groups(&self, members: &[ParticipantKey]) -> Result<Vec<PrivacyGroup>, StoreError>;
}

/// Group-scoped state storage: tracks the latest private-state root per
/// privacy group.
pub trait GroupStateReader: Send + Sync {
    /// Returns the latest state root for the group, or `None` if the group
    /// has never advanced any private state.
    fn latest_state_root(&self, group_id: &PrivacyGroupId)
        -> Result<Option<StateRoot>, StateError>;
}

/// A read-only view of a privacy group's account state at one root.
pub trait WorldStateView {
    /// Returns the account record for `address`, or `None` if the address
    /// has never transacted in this private state.
    fn account(&self, address: &Address) -> Option<AccountState>;
}

/// The replicated world-state reader: resolves a state root to an account
/// view.
pub trait WorldStateArchive: Send + Sync {
    /// Returns the world-state view at `root`, or `None` if no state exists
    /// for that root.
    fn at_root(&self, root: &StateRoot) -> Result<Option<Box<dyn WorldStateView>>, StateError>;
}

/// Why a confidential transaction was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidTransactionReason {
    /// The transaction nonce is behind the sender's group nonce.
    NonceTooLow {
        /// The expected next nonce.
        expected: u64,
        /// The nonce the transaction carried.
        actual: u64,
    },
    /// The transaction nonce does not match the sender's group nonce.
    IncorrectNonce {
        /// The expected next nonce.
        expected: u64,
        /// The nonce the transaction carried.
        actual: u64,
    },
    /// The transaction signature failed verification.
    InvalidSignature,
}

/// Outcome of transaction validation.
///
/// Acceptance and rejection reasons are defined by the validator
/// collaborator; this subsystem returns them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// The transaction is valid in its group/nonce context.
    Valid,
    /// The transaction was rejected.
    Invalid(InvalidTransactionReason),
}

impl ValidationResult {
    /// Returns true if the transaction was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// The external transaction validator.
pub trait PrivateTransactionValidator: Send + Sync {
    /// Validates `tx` against the expected next nonce for its sender in
    /// the resolved privacy group.
    fn validate(&self, tx: &PrivateTransaction, expected_nonce: u64) -> ValidationResult;
}

/// Result of simulating a call against a group's private state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Whether the simulated call completed successfully.
    pub successful: bool,
    /// The call's return data.
    pub output: Vec<u8>,
    /// Gas consumed by the simulated call.
    pub gas_used: u64,
}

/// The external transaction simulator. Simulation is read-only against a
/// historical block and carries its own context; no nonce or group
/// resolution happens on this path.
pub trait PrivateTransactionSimulator: Send + Sync {
    /// Processes a simulated call; `None` when the group's state at the
    /// requested block is unavailable.
    fn process(
        &self,
        group_id: &PrivacyGroupId,
        call: &CallParameters,
        block_number: u64,
    ) -> Option<SimulationResult>;
}

/// Serializes a confidential transaction to its canonical byte payload.
pub trait PayloadEncoder: Send + Sync {
    /// Encodes `tx` to the payload handed to the confidential store.
    fn encode(&self, tx: &PrivateTransaction) -> Result<Vec<u8>, EncodeError>;
}

/// Builds the public-chain marker transaction anchoring a stored
/// confidential transaction. Signing and public nonce management are the
/// factory's concern.
pub trait MarkerTransactionFactory: Send + Sync {
    /// Creates the marker transaction referencing `store_key`.
    fn create(&self, store_key: &StoreKey, tx: &PrivateTransaction) -> MarkerTransaction;
}

// =============================================================================
// Test doubles
// =============================================================================

/// Recording confidential store mock with scriptable responses.
#[cfg(test)]
pub struct MockConfidentialStore {
    /// Response returned from `send`.
    pub send_response: Result<StoreKey, StoreError>,
    /// Response returned from `receive`.
    pub receive_response: Result<StoredEnvelope, StoreError>,
    /// Response returned from `find_groups`.
    pub find_response: Result<Vec<PrivacyGroup>, StoreError>,
    /// Recorded `send` calls.
    pub sends: std::sync::Mutex<Vec<(Vec<u8>, ParticipantKey, StoreRecipients)>>,
    /// Recorded `receive` calls.
    pub receives: std::sync::Mutex<Vec<(StoreKey, ParticipantKey)>>,
    /// Recorded `find_groups` calls.
    pub find_calls: std::sync::Mutex<Vec<Vec<ParticipantKey>>>,
}

#[cfg(test)]
impl MockConfidentialStore {
    pub fn new() -> Self {
        Self {
            send_response: Ok(StoreKey::new("mock-key")),
            receive_response: Err(StoreError::PayloadNotFound("mock-key".to_string())),
            find_response: Ok(Vec::new()),
            sends: std::sync::Mutex::new(Vec::new()),
            receives: std::sync::Mutex::new(Vec::new()),
            find_calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_send_key(mut self, key: &str) -> Self {
        self.send_response = Ok(StoreKey::new(key));
        self
    }

    pub fn with_envelope(mut self, envelope: StoredEnvelope) -> Self {
        self.receive_response = Ok(envelope);
        self
    }

    pub fn with_groups(mut self, groups: Vec<PrivacyGroup>) -> Self {
        self.find_response = Ok(groups);
        self
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }

    pub fn receive_count(&self) -> usize {
        self.receives.lock().unwrap().len()
    }
}

#[cfg(test)]
impl ConfidentialStore for MockConfidentialStore {
    fn send(
        &self,
        payload: &[u8],
        sender_key: &ParticipantKey,
        recipients: &StoreRecipients,
    ) -> Result<StoreKey, StoreError> {
        self.sends
            .lock()
            .unwrap()
            .push((payload.to_vec(), sender_key.clone(), recipients.clone()));
        self.send_response.clone()
    }

    fn receive(
        &self,
        key: &StoreKey,
        requesting_key: &ParticipantKey,
    ) -> Result<StoredEnvelope, StoreError> {
        self.receives
            .lock()
            .unwrap()
            .push((key.clone(), requesting_key.clone()));
        self.receive_response.clone()
    }

    fn create_group(
        &self,
        members: &[ParticipantKey],
        _requesting_key: &ParticipantKey,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, StoreError> {
        Ok(PrivacyGroup {
            id: PrivacyGroupId::new(b"mock-group".to_vec()),
            group_type: shared_types::PrivacyGroupType::Pantheon,
            members: members.to_vec(),
            name,
            description,
        })
    }

    fn delete_group(
        &self,
        group_id: &PrivacyGroupId,
        _requesting_key: &ParticipantKey,
    ) -> Result<String, StoreError> {
        Ok(group_id.to_base64())
    }

    fn find_groups(&self, members: &[ParticipantKey]) -> Result<Vec<PrivacyGroup>, StoreError> {
        self.find_calls.lock().unwrap().push(members.to_vec());
        self.find_response.clone()
    }
}

/// Group state reader mock counting root lookups.
#[cfg(test)]
pub struct MockGroupStateReader {
    /// The root returned for every group, if any.
    pub root: Option<StateRoot>,
    /// Number of `latest_state_root` calls.
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGroupStateReader {
    pub fn empty() -> Self {
        Self {
            root: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_root(root: StateRoot) -> Self {
        Self {
            root: Some(root),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl GroupStateReader for MockGroupStateReader {
    fn latest_state_root(
        &self,
        _group_id: &PrivacyGroupId,
    ) -> Result<Option<StateRoot>, StateError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.root)
    }
}

/// World-state archive mock serving fixed account maps per root.
#[cfg(test)]
pub struct MockWorldStateArchive {
    /// Account maps by root.
    pub views: std::collections::HashMap<StateRoot, std::collections::HashMap<Address, AccountState>>,
}

#[cfg(test)]
impl MockWorldStateArchive {
    pub fn empty() -> Self {
        Self {
            views: std::collections::HashMap::new(),
        }
    }

    pub fn with_account(root: StateRoot, address: Address, account: AccountState) -> Self {
        let mut accounts = std::collections::HashMap::new();
        accounts.insert(address, account);
        let mut views = std::collections::HashMap::new();
        views.insert(root, accounts);
        Self { views }
    }
}

#[cfg(test)]
struct MockView {
    accounts: std::collections::HashMap<Address, AccountState>,
}

#[cfg(test)]
impl WorldStateView for MockView {
    fn account(&self, address: &Address) -> Option<AccountState> {
        self.accounts.get(address).cloned()
    }
}

#[cfg(test)]
impl WorldStateArchive for MockWorldStateArchive {
    fn at_root(&self, root: &StateRoot) -> Result<Option<Box<dyn WorldStateView>>, StateError> {
        Ok(self.views.get(root).map(|accounts| {
            Box::new(MockView {
                accounts: accounts.clone(),
            }) as Box<dyn WorldStateView>
        }))
    }
}

/// Validator mock recording the expected nonce it was handed.
#[cfg(test)]
pub struct MockValidator {
    /// Result returned from every `validate` call.
    pub result: ValidationResult,
    /// Recorded `(tx nonce, expected nonce)` pairs.
    pub calls: std::sync::Mutex<Vec<(u64, u64)>>,
}

#[cfg(test)]
impl MockValidator {
    pub fn accepting() -> Self {
        Self {
            result: ValidationResult::Valid,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl PrivateTransactionValidator for MockValidator {
    fn validate(&self, tx: &PrivateTransaction, expected_nonce: u64) -> ValidationResult {
        self.calls.lock().unwrap().push((tx.nonce, expected_nonce));
        self.result.clone()
    }
}

/// Simulator mock returning a canned result.
#[cfg(test)]
pub struct MockSimulator {
    /// Result returned from every `process` call.
    pub result: Option<SimulationResult>,
    /// Recorded `(group id, block number)` pairs.
    pub calls: std::sync::Mutex<Vec<(PrivacyGroupId, u64)>>,
}

#[cfg(test)]
impl MockSimulator {
    pub fn with_result(result: Option<SimulationResult>) -> Self {
        Self {
            result,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl PrivateTransactionSimulator for MockSimulator {
    fn process(
        &self,
        group_id: &PrivacyGroupId,
        _call: &CallParameters,
        block_number: u64,
    ) -> Option<SimulationResult> {
        self.calls
            .lock()
            .unwrap()
            .push((group_id.clone(), block_number));
        self.result.clone()
    }
}

/// Encoder mock emitting a fixed payload.
#[cfg(test)]
pub struct MockEncoder {
    /// Payload returned from every `encode` call.
    pub payload: Vec<u8>,
}

#[cfg(test)]
impl MockEncoder {
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

#[cfg(test)]
impl PayloadEncoder for MockEncoder {
    fn encode(&self, _tx: &PrivateTransaction) -> Result<Vec<u8>, EncodeError> {
        Ok(self.payload.clone())
    }
}
