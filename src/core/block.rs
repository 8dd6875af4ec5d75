use crate::core::EntropySource;
use crate::error::Result;
use crate::utils::{deserialize, serialize, sha256_hex};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `previous_hash` of the first block in any chain
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    transactions: Vec<String>,
    previous_hash: String,
    hash: String,
}

impl Block {
    /// Reassemble a block from fields that were already hashed elsewhere,
    /// e.g. a block read back from an export. The hash is taken as given.
    pub fn from_parts(transactions: Vec<String>, previous_hash: String, hash: String) -> Block {
        Block {
            transactions,
            previous_hash,
            hash,
        }
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_transactions(&self) -> &[String] {
        self.transactions.as_slice()
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_HASH
    }
}

/// Seals transaction batches into blocks.
///
/// The hash is `sha256_hex(payload ++ entropy)` where `payload` is every
/// transaction concatenated in order followed by `previous_hash`, and
/// `entropy` is whatever the configured source derives from that payload.
#[derive(Clone)]
pub struct BlockFactory {
    entropy: Arc<dyn EntropySource>,
}

impl BlockFactory {
    pub fn new(entropy: Arc<dyn EntropySource>) -> BlockFactory {
        BlockFactory { entropy }
    }

    pub fn entropy(&self) -> &Arc<dyn EntropySource> {
        &self.entropy
    }

    pub fn payload(transactions: &[String], previous_hash: &str) -> Vec<u8> {
        let mut payload = transactions.concat().into_bytes();
        payload.extend_from_slice(previous_hash.as_bytes());
        payload
    }

    pub fn compute_hash(&self, transactions: &[String], previous_hash: &str) -> String {
        let mut data = Self::payload(transactions, previous_hash);
        let entropy = self.entropy.derive(&data);
        data.extend_from_slice(&entropy);
        sha256_hex(&data)
    }

    pub fn create_block(&self, transactions: &[String], previous_hash: &str) -> Block {
        let hash = self.compute_hash(transactions, previous_hash);
        debug!(
            "Sealed {} transactions on {previous_hash} into {hash}",
            transactions.len()
        );
        Block {
            transactions: transactions.to_vec(),
            previous_hash: previous_hash.to_string(),
            hash,
        }
    }
}
