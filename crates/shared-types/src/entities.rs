//! # Core Domain Entities
//!
//! Defines the entities that cross the privacy subsystem boundary.
//!
//! ## Clusters
//!
//! - **Identity**: `ParticipantKey`, `PrivacyGroupId`, `StoreKey`, `Address`
//! - **Transactions**: `PrivateTransaction`, `PrivateAddressing`,
//!   `MarkerTransaction`, `CallParameters`
//! - **Groups**: `PrivacyGroup`, `PrivacyGroupType`
//! - **State & Storage**: `AccountState`, `StateRoot`, `StoredEnvelope`

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::IdentifierError;

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Opaque hash identifying a snapshot of a privacy group's private state.
///
/// Roots are produced externally each time the group's private state
/// advances; only the latest root per group is consulted here.
pub type StateRoot = Hash;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A participant's public key in the confidential store.
///
/// Opaque bytes; equality is byte equality. The string form used on the
/// wire and in logs is base64.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantKey(Vec<u8>);

impl ParticipantKey {
    /// Creates a key from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parses a key from its base64 string form.
    pub fn from_base64(encoded: &str) -> Result<Self, IdentifierError> {
        BASE64_STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|e| IdentifierError::InvalidBase64(e.to_string()))
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the base64 string form.
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.0)
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Identifier of a privacy group, assigned by the confidential store.
///
/// Opaque bytes; equality is byte equality. Base64 in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivacyGroupId(Vec<u8>);

impl PrivacyGroupId {
    /// Creates a group id from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parses a group id from its base64 string form.
    pub fn from_base64(encoded: &str) -> Result<Self, IdentifierError> {
        BASE64_STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|e| IdentifierError::InvalidBase64(e.to_string()))
    }

    /// Returns the raw id bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the base64 string form.
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.0)
    }
}

impl fmt::Display for PrivacyGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Store-assigned handle for a stored payload.
///
/// Once issued, a key deterministically resolves to the same envelope for
/// the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey(String);

impl StoreKey {
    /// Creates a store key from its string form.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key's string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// How a confidential transaction addresses its audience.
///
/// Exactly one of the two modes applies to any transaction; the store
/// dispatch path is chosen exhaustively on this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateAddressing {
    /// Addressed to an existing privacy group by id.
    Group {
        /// The target privacy group.
        privacy_group_id: PrivacyGroupId,
    },
    /// Ad-hoc (legacy) addressing by explicit recipient list.
    AdHoc {
        /// The sending participant's store key.
        private_from: ParticipantKey,
        /// The ordered recipient list. May be empty (self-send).
        private_for: Vec<ParticipantKey>,
    },
}

/// An immutable confidential transaction.
///
/// The payload is opaque to this subsystem; it is encoded and handed to the
/// confidential store without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTransaction {
    /// Sender address within the private state.
    pub sender: Address,
    /// Sender's nonce within the addressed privacy group.
    pub nonce: u64,
    /// Opaque transaction payload.
    pub payload: Vec<u8>,
    /// The addressing mode for this transaction.
    pub addressing: PrivateAddressing,
}

impl PrivateTransaction {
    /// Creates a group-addressed transaction.
    pub fn group_addressed(
        sender: Address,
        nonce: u64,
        payload: Vec<u8>,
        privacy_group_id: PrivacyGroupId,
    ) -> Self {
        Self {
            sender,
            nonce,
            payload,
            addressing: PrivateAddressing::Group { privacy_group_id },
        }
    }

    /// Creates an ad-hoc (legacy) addressed transaction.
    pub fn ad_hoc(
        sender: Address,
        nonce: u64,
        payload: Vec<u8>,
        private_from: ParticipantKey,
        private_for: Vec<ParticipantKey>,
    ) -> Self {
        Self {
            sender,
            nonce,
            payload,
            addressing: PrivateAddressing::AdHoc {
                private_from,
                private_for,
            },
        }
    }

    /// Returns the explicit privacy group id, if group-addressed.
    pub fn privacy_group_id(&self) -> Option<&PrivacyGroupId> {
        match &self.addressing {
            PrivateAddressing::Group { privacy_group_id } => Some(privacy_group_id),
            PrivateAddressing::AdHoc { .. } => None,
        }
    }
}

/// Parameters for a simulated call against a group's private state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallParameters {
    /// Caller address, if any.
    pub from: Option<Address>,
    /// Callee address, if any (None for contract creation).
    pub to: Option<Address>,
    /// Gas limit for the simulated call.
    pub gas_limit: u64,
    /// Gas price for the simulated call.
    pub gas_price: u64,
    /// Value transferred by the simulated call.
    pub value: u64,
    /// Call data.
    pub payload: Vec<u8>,
}

/// A minimal public-chain transaction anchoring a confidential transaction.
///
/// The payload references the confidential store key so the private
/// transaction's existence and ordering are fixed on the public ledger.
/// Construction (signing, public nonce) is external to this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTransaction {
    /// The marker's public-chain sender.
    pub sender: Address,
    /// The privacy precompile address the marker targets.
    pub to: Address,
    /// The marker's public-chain nonce.
    pub nonce: u64,
    /// The referenced store key, as payload bytes.
    pub payload: Vec<u8>,
}

// =============================================================================
// CLUSTER C: GROUPS
// =============================================================================

/// How a privacy group came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivacyGroupType {
    /// Explicitly created, named group.
    Pantheon,
    /// Ad-hoc group, materialized by the store from a recipient set.
    Legacy,
}

/// A privacy group: the fixed set of participants authorized to see a
/// confidential transaction's content.
///
/// This subsystem never mutates a group; it only resolves identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyGroup {
    /// Store-assigned group identifier.
    pub id: PrivacyGroupId,
    /// Whether the group was explicitly created or ad-hoc materialized.
    pub group_type: PrivacyGroupType,
    /// The member participant keys.
    pub members: Vec<ParticipantKey>,
    /// Optional human-readable name (Pantheon groups).
    pub name: Option<String>,
    /// Optional description (Pantheon groups).
    pub description: Option<String>,
}

impl PrivacyGroup {
    /// Returns true if this group's member set equals `members` exactly,
    /// ignoring order and duplicates.
    pub fn matches_members(&self, members: &[ParticipantKey]) -> bool {
        let mut own: Vec<&ParticipantKey> = self.members.iter().collect();
        let mut other: Vec<&ParticipantKey> = members.iter().collect();
        own.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        own.dedup();
        other.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        other.dedup();
        own == other
    }
}

// =============================================================================
// CLUSTER D: STATE & STORAGE
// =============================================================================

/// The envelope a store key resolves to: the stored payload plus the
/// identities the store recorded at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEnvelope {
    /// The stored payload bytes.
    pub payload: Vec<u8>,
    /// The participant key the payload was sent under.
    pub sender_key: ParticipantKey,
    /// The privacy group the store filed the payload under.
    pub privacy_group_id: PrivacyGroupId,
}

/// The state of an account within a privacy group's private state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Account balance in base units.
    pub balance: u64,
    /// Account nonce (number of transactions sent in this group).
    pub nonce: u64,
    /// Optional code hash for contract accounts.
    pub code_hash: Option<Hash>,
    /// Optional storage root for contract accounts.
    pub storage_root: Option<Hash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_key_base64_round_trip() {
        let key = ParticipantKey::new(b"participant-one".to_vec());
        let encoded = key.to_base64();
        let decoded = ParticipantKey::from_base64(&encoded).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_participant_key_rejects_invalid_base64() {
        assert!(ParticipantKey::from_base64("not-base64!!!").is_err());
    }

    #[test]
    fn test_group_id_display_is_base64() {
        let id = PrivacyGroupId::new(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(id.to_string(), "3q2+7w==");
    }

    #[test]
    fn test_group_addressed_constructor() {
        let id = PrivacyGroupId::new(b"group".to_vec());
        let tx = PrivateTransaction::group_addressed([0xAA; 20], 3, vec![1, 2, 3], id.clone());
        assert_eq!(tx.privacy_group_id(), Some(&id));
        assert_eq!(tx.nonce, 3);
    }

    #[test]
    fn test_ad_hoc_constructor_has_no_group_id() {
        let tx = PrivateTransaction::ad_hoc(
            [0xAA; 20],
            0,
            vec![],
            ParticipantKey::new(b"from".to_vec()),
            vec![ParticipantKey::new(b"to".to_vec())],
        );
        assert_eq!(tx.privacy_group_id(), None);
    }

    #[test]
    fn test_matches_members_ignores_order_and_duplicates() {
        let a = ParticipantKey::new(b"a".to_vec());
        let b = ParticipantKey::new(b"b".to_vec());
        let group = PrivacyGroup {
            id: PrivacyGroupId::new(b"g".to_vec()),
            group_type: PrivacyGroupType::Legacy,
            members: vec![a.clone(), b.clone()],
            name: None,
            description: None,
        };

        assert!(group.matches_members(&[b.clone(), a.clone()]));
        assert!(group.matches_members(&[a.clone(), b.clone(), a.clone()]));
        assert!(!group.matches_members(&[a.clone()]));
        assert!(!group.matches_members(&[a, b, ParticipantKey::new(b"c".to_vec())]));
    }

    #[test]
    fn test_private_transaction_serde_round_trip() {
        let tx = PrivateTransaction::group_addressed(
            [0x11; 20],
            7,
            vec![0xCA, 0xFE],
            PrivacyGroupId::new(b"g1".to_vec()),
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: PrivateTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}
