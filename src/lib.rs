//! # Quantum Ledger - a minimal replicated block chain
//!
//! A set of nodes each hold a replica of an append-only chain of blocks.
//! A coordinating network seals new blocks through one producer node,
//! broadcasts them to every replica and can check that the canonical
//! chain's hash links are intact.
//!
//! ## What's in here
//! - **Blocks and chains**: SHA-256 linked blocks with a 64-zero genesis sentinel
//! - **Entropy**: a tiny 4-qubit circuit mixed into every hash, either as a
//!   fixed state-vector printout or as a single measurement sample
//! - **Replication**: in-process nodes, a cloud that broadcasts to them and
//!   a network that owns the canonical chain
//! - **Ordering**: exhaustive search for the cheapest transaction order
//! - **Settlement**: a connector interface for pushing transactions to an
//!   outside network
//!
//! ## How the code is organized
//! - `core/`: blocks, chains, entropy sources and the ordering optimizer
//! - `network/`: nodes, cloud broadcast and the coordinating network
//! - `settlement/`: external ledger connector and the gateway wrapping it
//! - `config/`: settings from defaults, TOML and environment
//! - `utils/`: digests, the stable string hash and bincode helpers
//! - `cli/`: command-line interface
//!
//! Block hashes are only reproducible with `EntropyMode::Deterministic`.
//! The sampled mode draws a fresh measurement for every block.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod settlement;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use crate::cli::{parse_batch, Command, Opt};
pub use crate::config::{Config, LedgerSettings, GLOBAL_CONFIG};
pub use crate::core::{
    entropy_source, Block, BlockFactory, Chain, EntropyMode, EntropySource, SampledEntropy,
    StateVectorEntropy, TransactionOrderOptimizer, GENESIS_HASH,
};
pub use crate::error::{LedgerError, Result};
pub use crate::network::{Cloud, Network, Node};
pub use crate::settlement::{
    ContractSpec, LedgerConnector, SettlementGateway, SettlementReceipt, SimulatedConnector,
};
pub use crate::utils::{sha256_digest, sha256_hex, stable_hash};
