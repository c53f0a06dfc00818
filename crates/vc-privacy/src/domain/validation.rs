//! Validation and simulation bound to the resolved group/nonce context.

use std::sync::Arc;

use shared_types::{CallParameters, PrivacyGroupId, PrivateTransaction};

use crate::domain::errors::PrivacyError;
use crate::domain::nonce::NonceResolver;
use crate::ports::outbound::{
    PrivateTransactionSimulator, PrivateTransactionValidator, SimulationResult, ValidationResult,
};

/// Binds the external validator and simulator to a resolved group/nonce
/// context.
#[derive(Clone)]
pub struct ValidationOrchestrator {
    nonces: NonceResolver,
    validator: Arc<dyn PrivateTransactionValidator>,
    simulator: Arc<dyn PrivateTransactionSimulator>,
}

impl ValidationOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(
        nonces: NonceResolver,
        validator: Arc<dyn PrivateTransactionValidator>,
        simulator: Arc<dyn PrivateTransactionSimulator>,
    ) -> Self {
        Self {
            nonces,
            validator,
            simulator,
        }
    }

    /// Validates `tx` against the sender's expected nonce in `group_id`.
    ///
    /// The validator's verdict is returned unchanged; acceptance and
    /// rejection reasons are its contract, not this subsystem's.
    pub fn validate(
        &self,
        tx: &PrivateTransaction,
        group_id: &PrivacyGroupId,
    ) -> Result<ValidationResult, PrivacyError> {
        let expected_nonce = self.nonces.next_nonce(&tx.sender, group_id)?;
        Ok(self.validator.validate(tx, expected_nonce))
    }

    /// Simulates a call against `group_id`'s private state at
    /// `block_number`. Pure pass-through; simulation carries its own
    /// context.
    pub fn simulate(
        &self,
        group_id: &PrivacyGroupId,
        call: &CallParameters,
        block_number: u64,
    ) -> Option<SimulationResult> {
        self.simulator.process(group_id, call, block_number)
    }
}
