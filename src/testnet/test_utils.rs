//! Test utilities for ledger testing

use crate::core::{entropy_source, Block, Chain, EntropyMode};
use crate::error::Result;
use crate::network::Network;

/// Seed used whenever a test needs the sampled entropy source
pub const TEST_SEED: u64 = 0x5eed;

/// Network with deterministic entropy
pub fn create_test_network(node_count: usize) -> Result<Network> {
    Network::new(node_count, entropy_source(EntropyMode::Deterministic, None))
}

/// Network with seeded sampled entropy
pub fn create_sampled_test_network(node_count: usize) -> Result<Network> {
    Network::new(
        node_count,
        entropy_source(EntropyMode::Sampled, Some(TEST_SEED)),
    )
}

/// Add one block per batch, in order
pub fn fill_network(network: &Network, batches: &[&[&str]]) -> Result<Vec<Block>> {
    batches
        .iter()
        .map(|batch| network.add_block(batch.iter().map(|tx| tx.to_string()).collect()))
        .collect()
}

/// Copy of `chain` with the `previous_hash` of block `index` overwritten
pub fn tamper_previous_hash(chain: &Chain, index: usize, previous_hash: &str) -> Chain {
    let mut blocks = chain.blocks().to_vec();
    let victim = &blocks[index];
    blocks[index] = Block::from_parts(
        victim.get_transactions().to_vec(),
        previous_hash.to_string(),
        victim.get_hash().to_string(),
    );
    Chain::from_blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_network() {
        let network = create_test_network(3).unwrap();
        assert_eq!(network.nodes().len(), 3);
        assert!(network.is_deterministic());
    }

    #[test]
    fn test_fill_network() {
        let network = create_sampled_test_network(2).unwrap();
        let blocks = fill_network(&network, &[&["a"], &["b", "c"]]).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(network.len(), 2);
        assert!(network.validate());
    }

    #[test]
    fn test_tamper_previous_hash() {
        let network = create_test_network(1).unwrap();
        fill_network(&network, &[&["a"], &["b"]]).unwrap();
        let tampered = tamper_previous_hash(&network.canonical_chain(), 1, "bad");
        assert!(!tampered.validate());
    }
}
