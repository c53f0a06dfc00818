//! # Integration Tests Crate
//!
//! This crate contains integration tests that exercise the privacy
//! coordination subsystem end-to-end against the real in-memory adapters,
//! rather than against per-component mocks.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! ├── src/
//! │   ├── lib.rs                # This file
//! │   ├── flows.rs              # Submission and nonce resolution flows
//! │   └── runtime_simulation.rs # Full wiring simulation
//! ```
//!
//! ## Flows (flows.rs)
//!
//! 1. **Group-addressed submission**: one store send, no read-back
//! 2. **Ad-hoc submission**: recipient defaulting, group id read-back
//! 3. **Nonce derivation**: empty-state defaults and stored-account nonces
//! 4. **Legacy disambiguation**: at-most-one invariant surfaced loudly
//!
//! ## Runtime Simulation (runtime_simulation.rs)
//!
//! Wires the full service exactly as an embedding node would and walks a
//! privacy group through its life: creation, submissions, private state
//! advancement, validation and marker anchoring.

pub mod flows;
pub mod runtime_simulation;
