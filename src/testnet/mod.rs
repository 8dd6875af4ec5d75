//! Test helpers for ledger testing
//!
//! This module builds small in-process networks with pinned entropy so
//! that block hashes are reproducible across test runs.

pub mod test_utils;

pub use test_utils::*;
