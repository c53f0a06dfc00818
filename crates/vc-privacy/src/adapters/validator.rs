//! Nonce-sequence validator.

use std::cmp::Ordering;

use shared_types::PrivateTransaction;

use crate::ports::outbound::{
    InvalidTransactionReason, PrivateTransactionValidator, ValidationResult,
};

/// Validator enforcing the group-scoped nonce sequence.
///
/// Signature and chain-id checks belong to the embedding node's validator;
/// this adapter covers the nonce contract the coordination layer resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceCheckingValidator;

impl NonceCheckingValidator {
    pub fn new() -> Self {
        Self
    }
}

impl PrivateTransactionValidator for NonceCheckingValidator {
    fn validate(&self, tx: &PrivateTransaction, expected_nonce: u64) -> ValidationResult {
        match tx.nonce.cmp(&expected_nonce) {
            Ordering::Equal => ValidationResult::Valid,
            Ordering::Less => ValidationResult::Invalid(InvalidTransactionReason::NonceTooLow {
                expected: expected_nonce,
                actual: tx.nonce,
            }),
            Ordering::Greater => {
                ValidationResult::Invalid(InvalidTransactionReason::IncorrectNonce {
                    expected: expected_nonce,
                    actual: tx.nonce,
                })
            }
        }
    }
}
