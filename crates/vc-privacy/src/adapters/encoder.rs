//! Canonical payload encoding.

use shared_types::PrivateTransaction;

use crate::ports::outbound::{EncodeError, PayloadEncoder};

/// Encodes confidential transactions with the workspace's bincode wire
/// format.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodePayloadEncoder;

impl BincodePayloadEncoder {
    /// Creates the encoder.
    pub fn new() -> Self {
        Self
    }

    /// Decodes a stored payload back into a transaction.
    pub fn decode(payload: &[u8]) -> Result<PrivateTransaction, EncodeError> {
        bincode::deserialize(payload).map_err(|e| EncodeError::Deserialize(e.to_string()))
    }
}

impl PayloadEncoder for BincodePayloadEncoder {
    fn encode(&self, tx: &PrivateTransaction) -> Result<Vec<u8>, EncodeError> {
        bincode::serialize(tx).map_err(|e| EncodeError::Serialize(e.to_string()))
    }
}
