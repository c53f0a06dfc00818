//! Submission and nonce resolution flows over the in-memory adapters.

use std::sync::Arc;

use shared_types::{CallParameters, ParticipantKey, PrivacyGroupId};
use vc_privacy::adapters::{
    BincodePayloadEncoder, FixedKeyMarkerFactory, InMemoryConfidentialStore, InMemoryGroupState,
    InMemoryWorldState, NonceCheckingValidator,
};
use vc_privacy::domain::PrivacyConfig;
use vc_privacy::ports::outbound::{PrivateTransactionSimulator, SimulationResult};
use vc_privacy::service::PrivacyCoordinationService;

/// Simulator stub standing in for the node's execution engine: succeeds
/// with empty output for any block it is asked about.
pub struct StubSimulator;

impl PrivateTransactionSimulator for StubSimulator {
    fn process(
        &self,
        _group_id: &PrivacyGroupId,
        _call: &CallParameters,
        _block_number: u64,
    ) -> Option<SimulationResult> {
        Some(SimulationResult {
            successful: true,
            output: Vec::new(),
            gas_used: 21_000,
        })
    }
}

/// A fully wired service plus handles to the adapters behind it.
pub struct PrivacyHarness {
    pub node_key: ParticipantKey,
    pub store: Arc<InMemoryConfidentialStore>,
    pub group_state: Arc<InMemoryGroupState>,
    pub world_state: Arc<InMemoryWorldState>,
    pub service: PrivacyCoordinationService,
}

/// Wires the service exactly as an embedding node would, over the
/// in-memory adapters.
pub fn wire_privacy_subsystem() -> PrivacyHarness {
    let node_key = ParticipantKey::new(b"node-key".to_vec());
    let store = Arc::new(InMemoryConfidentialStore::new());
    let group_state = Arc::new(InMemoryGroupState::new());
    let world_state = Arc::new(InMemoryWorldState::new());

    let service = PrivacyCoordinationService::new(
        PrivacyConfig::new(node_key.clone()),
        Arc::new(BincodePayloadEncoder::new()),
        store.clone(),
        group_state.clone(),
        world_state.clone(),
        Arc::new(NonceCheckingValidator::new()),
        Arc::new(StubSimulator),
        Arc::new(FixedKeyMarkerFactory::new([0x0E; 20], [0x0F; 20])),
    );

    PrivacyHarness {
        node_key,
        store,
        group_state,
        world_state,
        service,
    }
}
