//! # Privacy Coordination Service
//!
//! Application service layer that implements the [`PrivacyApi`] trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`PrivacyApi`)
//! - Is constructed from the outbound ports, so every collaborator backend
//!   is substitutable (in-memory adapters for tests, remote clients in the
//!   node)
//! - Composes the domain components: submission, group resolution, nonce
//!   derivation, validation/simulation binding

use std::sync::Arc;

use shared_types::{
    Address, CallParameters, MarkerTransaction, ParticipantKey, PrivacyGroup, PrivacyGroupId,
    PrivateTransaction, StoreKey, StoredEnvelope,
};

use crate::domain::config::PrivacyConfig;
use crate::domain::entities::SubmissionReceipt;
use crate::domain::errors::PrivacyError;
use crate::domain::groups::GroupResolver;
use crate::domain::nonce::{NonceResolver, DEFAULT_NONCE};
use crate::domain::submitter::TransactionSubmitter;
use crate::domain::validation::ValidationOrchestrator;
use crate::ports::inbound::PrivacyApi;
use crate::ports::outbound::{
    ConfidentialStore, GroupStateReader, MarkerTransactionFactory, PayloadEncoder,
    PrivateTransactionSimulator, PrivateTransactionValidator, SimulationResult, ValidationResult,
    WorldStateArchive,
};

/// Privacy coordination service.
///
/// Stateless between calls: every operation is a synchronous
/// request/response against the injected collaborators, and the service
/// requires no locking of its own.
pub struct PrivacyCoordinationService {
    submitter: TransactionSubmitter,
    groups: GroupResolver,
    nonces: NonceResolver,
    validation: ValidationOrchestrator,
    store: Arc<dyn ConfidentialStore>,
    marker_factory: Arc<dyn MarkerTransactionFactory>,
    participant_key: ParticipantKey,
}

impl PrivacyCoordinationService {
    /// Wires the service from its collaborator ports.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: PrivacyConfig,
        encoder: Arc<dyn PayloadEncoder>,
        store: Arc<dyn ConfidentialStore>,
        group_state: Arc<dyn GroupStateReader>,
        world_state: Arc<dyn WorldStateArchive>,
        validator: Arc<dyn PrivateTransactionValidator>,
        simulator: Arc<dyn PrivateTransactionSimulator>,
        marker_factory: Arc<dyn MarkerTransactionFactory>,
    ) -> Self {
        let nonces = NonceResolver::new(group_state, world_state);
        Self {
            submitter: TransactionSubmitter::new(
                encoder,
                store.clone(),
                config.participant_key.clone(),
            ),
            groups: GroupResolver::new(store.clone(), config.participant_key.clone()),
            validation: ValidationOrchestrator::new(nonces.clone(), validator, simulator),
            nonces,
            store,
            marker_factory,
            participant_key: config.participant_key,
        }
    }
}

impl PrivacyApi for PrivacyCoordinationService {
    fn submit_transaction(
        &self,
        tx: &PrivateTransaction,
    ) -> Result<SubmissionReceipt, PrivacyError> {
        self.submitter.submit(tx)
    }

    fn retrieve_transaction(&self, key: &StoreKey) -> Result<StoredEnvelope, PrivacyError> {
        self.store
            .receive(key, &self.participant_key)
            .map_err(|source| PrivacyError::Store {
                operation: "receive",
                source,
            })
    }

    fn create_privacy_group(
        &self,
        members: &[ParticipantKey],
        name: Option<String>,
        description: Option<String>,
    ) -> Result<PrivacyGroup, PrivacyError> {
        self.groups.create_group(members, name, description)
    }

    fn delete_privacy_group(&self, group_id: &PrivacyGroupId) -> Result<String, PrivacyError> {
        self.groups.delete_group(group_id)
    }

    fn find_privacy_groups(
        &self,
        members: &[ParticipantKey],
    ) -> Result<Vec<PrivacyGroup>, PrivacyError> {
        self.groups.find_groups(members)
    }

    fn validate_transaction(
        &self,
        tx: &PrivateTransaction,
        group_id: &PrivacyGroupId,
    ) -> Result<ValidationResult, PrivacyError> {
        self.validation.validate(tx, group_id)
    }

    fn next_group_nonce(
        &self,
        sender: &Address,
        group_id: &PrivacyGroupId,
    ) -> Result<u64, PrivacyError> {
        self.nonces.next_nonce(sender, group_id)
    }

    fn next_legacy_nonce(
        &self,
        private_from: &ParticipantKey,
        private_for: &[ParticipantKey],
        sender: &Address,
    ) -> Result<u64, PrivacyError> {
        match self.groups.resolve_legacy_group(private_from, private_for)? {
            Some(group) => self.nonces.next_nonce(sender, &group.id),
            // the legacy group does not exist yet; no state to consult
            None => Ok(DEFAULT_NONCE),
        }
    }

    fn simulate_transaction(
        &self,
        group_id: &PrivacyGroupId,
        call: &CallParameters,
        block_number: u64,
    ) -> Result<Option<SimulationResult>, PrivacyError> {
        Ok(self.validation.simulate(group_id, call, block_number))
    }

    fn create_marker_transaction(
        &self,
        store_key: &StoreKey,
        tx: &PrivateTransaction,
    ) -> MarkerTransaction {
        self.marker_factory.create(store_key, tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{
        MockConfidentialStore, MockEncoder, MockGroupStateReader, MockSimulator, MockValidator,
        MockWorldStateArchive,
    };
    use shared_types::{PrivacyGroupType, StateRoot};

    fn key(name: &str) -> ParticipantKey {
        ParticipantKey::new(name.as_bytes().to_vec())
    }

    struct ServiceFixture {
        store: Arc<MockConfidentialStore>,
        group_state: Arc<MockGroupStateReader>,
        service: PrivacyCoordinationService,
    }

    fn fixture(store: MockConfidentialStore, root: Option<StateRoot>) -> ServiceFixture {
        let store = Arc::new(store);
        let group_state = Arc::new(match root {
            Some(root) => MockGroupStateReader::with_root(root),
            None => MockGroupStateReader::empty(),
        });
        let service = PrivacyCoordinationService::new(
            PrivacyConfig::for_testing(),
            Arc::new(MockEncoder::with_payload(vec![0x01])),
            store.clone(),
            group_state.clone(),
            Arc::new(MockWorldStateArchive::empty()),
            Arc::new(MockValidator::accepting()),
            Arc::new(MockSimulator::with_result(None)),
            Arc::new(crate::adapters::marker::FixedKeyMarkerFactory::new(
                [0x0E; 20],
                [0x0F; 20],
            )),
        );
        ServiceFixture {
            store,
            group_state,
            service,
        }
    }

    #[test]
    fn test_legacy_nonce_short_circuits_without_state_query() {
        // no legacy group exists: the state collaborator must not be hit
        let f = fixture(MockConfidentialStore::new(), Some([0x01; 32]));

        let nonce = f
            .service
            .next_legacy_nonce(&key("a"), &[key("b")], &[0xAA; 20])
            .unwrap();

        assert_eq!(nonce, 0);
        assert_eq!(f.group_state.call_count(), 0);
    }

    #[test]
    fn test_legacy_nonce_consults_state_for_resolved_group() {
        let members = vec![key("a"), key("b")];
        let group = PrivacyGroup {
            id: PrivacyGroupId::new(b"L1".to_vec()),
            group_type: PrivacyGroupType::Legacy,
            members,
            name: None,
            description: None,
        };
        let f = fixture(MockConfidentialStore::new().with_groups(vec![group]), None);

        let nonce = f
            .service
            .next_legacy_nonce(&key("a"), &[key("b")], &[0xAA; 20])
            .unwrap();

        // group resolved, but it has no private state yet
        assert_eq!(nonce, 0);
        assert_eq!(f.group_state.call_count(), 1);
    }

    #[test]
    fn test_retrieve_transaction_uses_node_key() {
        let f = fixture(MockConfidentialStore::new(), None);

        // the default mock receive response is a PayloadNotFound fault
        let err = f
            .service
            .retrieve_transaction(&StoreKey::new("K1"))
            .unwrap_err();
        assert!(matches!(
            err,
            PrivacyError::Store {
                operation: "receive",
                ..
            }
        ));

        let receives = f.store.receives.lock().unwrap();
        assert_eq!(
            receives[0],
            (
                StoreKey::new("K1"),
                PrivacyConfig::for_testing().participant_key
            )
        );
    }

    #[test]
    fn test_marker_transaction_references_store_key() {
        let f = fixture(MockConfidentialStore::new(), None);
        let tx = PrivateTransaction::group_addressed(
            [0xAA; 20],
            0,
            vec![1],
            PrivacyGroupId::new(b"G1".to_vec()),
        );

        let marker = f
            .service
            .create_marker_transaction(&StoreKey::new("3q2+7w=="), &tx);

        assert_eq!(marker.to, [0x0F; 20]);
        assert_eq!(marker.payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
