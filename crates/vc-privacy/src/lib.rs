//! # vc-privacy
//!
//! Confidential Transaction Coordination subsystem for Veil-Chain.
//!
//! ## Role in System
//!
//! - Sits between the public-chain client and the off-chain confidential
//!   store; confidential payloads never touch the public ledger.
//! - Resolves privacy-group identity for both explicit (Pantheon) and
//!   ad-hoc (Legacy) addressing, including legacy-group disambiguation.
//! - Derives the next valid nonce for a sender within a privacy group from
//!   that group's latest replicated private state.
//! - Binds transaction validation and call simulation to the resolved
//!   group/nonce context before a transaction is marker-wrapped for
//!   on-chain inclusion.
//!
//! ## What It Does Not Do
//!
//! Consensus, execution, payload encryption and persistence all belong to
//! external collaborators reached through the outbound ports. The subsystem
//! holds no persistent state of its own; every operation is a synchronous,
//! stateless request/response call.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::*;
