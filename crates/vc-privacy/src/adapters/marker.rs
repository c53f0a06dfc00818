//! Marker transaction factory signing with a fixed public-chain key.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use shared_types::{Address, MarkerTransaction, PrivateTransaction, StoreKey};

use crate::ports::outbound::MarkerTransactionFactory;

/// Builds marker transactions from one fixed signing address, managing
/// that address's public-chain nonce sequence itself.
pub struct FixedKeyMarkerFactory {
    signer: Address,
    precompile: Address,
    next_nonce: AtomicU64,
}

impl FixedKeyMarkerFactory {
    /// Creates a factory signing as `signer`, targeting the privacy
    /// precompile at `precompile`.
    pub fn new(signer: Address, precompile: Address) -> Self {
        Self {
            signer,
            precompile,
            next_nonce: AtomicU64::new(0),
        }
    }
}

impl MarkerTransactionFactory for FixedKeyMarkerFactory {
    fn create(&self, store_key: &StoreKey, _tx: &PrivateTransaction) -> MarkerTransaction {
        // store keys are base64 on the wire; the marker carries the raw bytes
        let payload = BASE64_STANDARD
            .decode(store_key.as_str())
            .unwrap_or_else(|_| store_key.as_str().as_bytes().to_vec());

        MarkerTransaction {
            sender: self.signer,
            to: self.precompile,
            nonce: self.next_nonce.fetch_add(1, Ordering::SeqCst),
            payload,
        }
    }
}
