//! Utility functions and helpers
//!
//! This module contains the digest functions and the bincode helpers
//! used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{sha256_digest, sha256_hex, stable_hash};

pub use serialization::{deserialize, serialize};
