//! Confidential transaction submission.

use std::sync::Arc;

use shared_types::{ParticipantKey, PrivateAddressing, PrivateTransaction};

use crate::domain::entities::SubmissionReceipt;
use crate::domain::errors::PrivacyError;
use crate::ports::outbound::{ConfidentialStore, PayloadEncoder, StoreRecipients};

/// Orchestrates encode → store → group-id resolution for a submission.
///
/// Exactly one store send per call, plus exactly one retrieval on the
/// ad-hoc path. Store faults surface unchanged; retry idempotency is the
/// store's concern, not this component's.
#[derive(Clone)]
pub struct TransactionSubmitter {
    encoder: Arc<dyn PayloadEncoder>,
    store: Arc<dyn ConfidentialStore>,
    participant_key: ParticipantKey,
}

impl TransactionSubmitter {
    /// Creates a submitter sending group-addressed transactions under the
    /// node's `participant_key`.
    pub fn new(
        encoder: Arc<dyn PayloadEncoder>,
        store: Arc<dyn ConfidentialStore>,
        participant_key: ParticipantKey,
    ) -> Self {
        Self {
            encoder,
            store,
            participant_key,
        }
    }

    /// Encodes and stores `tx`, returning the store key and the privacy
    /// group the transaction was filed under.
    ///
    /// Group-addressed transactions resolve to their own group id with no
    /// store round trip. Ad-hoc transactions learn the assigned group id
    /// by reading their envelope back; if that read-back fails after a
    /// successful send, the transaction is durably stored but its group id
    /// stays unknown, surfaced as [`PrivacyError::PostStoreRetrieval`].
    pub fn submit(&self, tx: &PrivateTransaction) -> Result<SubmissionReceipt, PrivacyError> {
        let payload = self.encoder.encode(tx)?;

        tracing::trace!("[vc-privacy] storing confidential transaction");
        match &tx.addressing {
            PrivateAddressing::Group { privacy_group_id } => {
                let store_key = self
                    .store
                    .send(
                        &payload,
                        &self.participant_key,
                        &StoreRecipients::Group(privacy_group_id.clone()),
                    )
                    .map_err(|source| {
                        tracing::error!(
                            "[vc-privacy] failed to store transaction for group {}: {}",
                            privacy_group_id,
                            source
                        );
                        PrivacyError::Store {
                            operation: "send",
                            source,
                        }
                    })?;

                Ok(SubmissionReceipt {
                    store_key,
                    privacy_group_id: privacy_group_id.clone(),
                })
            }
            PrivateAddressing::AdHoc {
                private_from,
                private_for,
            } => {
                let mut recipients = private_for.clone();
                if recipients.is_empty() {
                    // the store rejects a send with zero recipients
                    recipients.push(private_from.clone());
                }

                let store_key = self
                    .store
                    .send(&payload, private_from, &StoreRecipients::Direct(recipients))
                    .map_err(|source| {
                        tracing::error!(
                            "[vc-privacy] failed to store ad-hoc transaction from {}: {}",
                            private_from,
                            source
                        );
                        PrivacyError::Store {
                            operation: "send",
                            source,
                        }
                    })?;

                tracing::debug!(
                    "[vc-privacy] resolving group id for key {} and sender {}",
                    store_key,
                    private_from
                );
                let envelope =
                    self.store
                        .receive(&store_key, private_from)
                        .map_err(|source| {
                            tracing::error!(
                                "[vc-privacy] transaction stored under {} but group id retrieval failed: {}",
                                store_key,
                                source
                            );
                            PrivacyError::PostStoreRetrieval {
                                store_key: store_key.clone(),
                                source,
                            }
                        })?;

                Ok(SubmissionReceipt {
                    store_key,
                    privacy_group_id: envelope.privacy_group_id,
                })
            }
        }
    }
}
