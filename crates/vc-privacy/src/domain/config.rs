//! Privacy subsystem configuration.

use shared_types::ParticipantKey;

/// Configuration for the privacy coordination subsystem.
///
/// The node runs single-tenant against the confidential store: one
/// participant key identifies it for group-addressed sends, envelope
/// retrieval and group lifecycle calls. Ad-hoc submission paths use the
/// transaction's own `private_from` instead.
#[derive(Debug, Clone)]
pub struct PrivacyConfig {
    /// The node's participant key in the confidential store.
    pub participant_key: ParticipantKey,
}

impl PrivacyConfig {
    /// Creates a configuration for the given node key.
    pub fn new(participant_key: ParticipantKey) -> Self {
        Self { participant_key }
    }

    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            participant_key: ParticipantKey::new(b"test-node-key".to_vec()),
        }
    }
}
