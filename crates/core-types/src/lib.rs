//! # Wallasign Core Types
//!
//! The plain data structures shared by every other crate in the workspace:
//! what goes into a signature, what comes out of it, and the record of a
//! completed signing call.
//!
//! As a Layer 0 crate, it depends on no other workspace crate.

pub mod error;
pub mod signature;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use signature::{SIGNATURE_LEN, Signature};
pub use structs::{SignedRequest, SigningInput};
