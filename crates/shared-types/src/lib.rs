//! # Shared Types Crate
//!
//! This crate contains the domain entities shared between the privacy
//! coordination subsystem (`vc-privacy`) and the node that embeds it.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Identifiers**: Participant keys, privacy group ids and store
//!   keys are opaque byte strings. Equality is byte equality; the string
//!   form is always base64.
//! - **Statically Distinguished Addressing**: A confidential transaction is
//!   either group-addressed or ad-hoc addressed, never both. The sum type
//!   makes that invariant structural instead of an optional-field check.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
