//! Core ledger functionality
//!
//! This module contains the block model, the hash-linked chain, the
//! entropy sources mixed into block hashes and the transaction ordering
//! optimizer.

pub mod block;
pub mod chain;
pub mod entropy;
pub mod optimizer;

pub use block::{Block, BlockFactory, GENESIS_HASH};
pub use chain::Chain;
pub use entropy::{
    entropy_source, EntropyMode, EntropySource, SampledEntropy, StateVectorEntropy,
};
pub use optimizer::{TransactionOrderOptimizer, DEFAULT_WARN_THRESHOLD};
