// The coordinator owns the canonical chain and drives block production.
// One designated producer node seals every block, the cloud copies it to
// every replica node, and the canonical chain keeps the ground truth.

use crate::config::LedgerSettings;
use crate::core::{entropy_source, Block, BlockFactory, Chain, EntropySource};
use crate::error::{LedgerError, Result};
use crate::network::{Cloud, Node};
use log::{info, warn};
use std::sync::{Arc, PoisonError, RwLock};

pub struct Network {
    // Held for writing across create + append + broadcast so that
    // concurrent add_block calls serialize and replicas never lag behind
    canonical: RwLock<Chain>,
    cloud: Cloud,
    nodes: Vec<Arc<Node>>,
    producer: Arc<Node>,
}

impl Network {
    /// Build a network of `node_count` replica nodes, all connected to the
    /// cloud, plus one producer node that seals blocks.
    pub fn new(node_count: usize, entropy: Arc<dyn EntropySource>) -> Result<Network> {
        if node_count == 0 {
            return Err(LedgerError::Config(
                "A network needs at least one node".to_string(),
            ));
        }

        let factory = BlockFactory::new(entropy);
        let cloud = Cloud::new();
        let nodes: Vec<Arc<Node>> = (0..node_count)
            .map(|node_id| Arc::new(Node::new(node_id, factory.clone())))
            .collect();
        for node in &nodes {
            cloud.connect(node);
        }
        // The producer keeps its own copy via create_block, so it stays
        // out of the cloud to avoid holding every block twice
        let producer = Arc::new(Node::new(node_count, factory.clone()));

        info!(
            "Created network with {node_count} nodes ({} entropy)",
            factory.entropy().mode()
        );

        Ok(Network {
            canonical: RwLock::new(Chain::new()),
            cloud,
            nodes,
            producer,
        })
    }

    pub fn from_settings(settings: &LedgerSettings) -> Result<Network> {
        let entropy = entropy_source(settings.entropy_mode, settings.entropy_seed);
        Self::new(settings.node_count, entropy)
    }

    /// Seal `transactions` into the next block, append it to the canonical
    /// chain and replicate it to every node. An empty batch is allowed.
    pub fn add_block(&self, transactions: Vec<String>) -> Result<Block> {
        let mut canonical = self
            .canonical
            .write()
            .map_err(|e| LedgerError::Lock(format!("Canonical chain lock poisoned: {e}")))?;

        let previous_hash = canonical.tip_hash().to_string();
        let block = self.producer.create_block(&transactions, &previous_hash);
        canonical.push(block.clone());
        let delivered = self.cloud.broadcast(&block);

        info!(
            "Added block {} at height {} ({} transactions, {delivered} replicas)",
            block.get_hash(),
            canonical.len() - 1,
            transactions.len()
        );
        Ok(block)
    }

    /// Check every hash link of the canonical chain. Read-only.
    pub fn validate(&self) -> bool {
        let canonical = self
            .canonical
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let valid = canonical.validate();
        if !valid {
            warn!("Canonical chain failed validation");
        }
        valid
    }

    /// Snapshot of the canonical chain
    pub fn canonical_chain(&self) -> Chain {
        self.canonical
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.canonical
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn producer(&self) -> &Arc<Node> {
        &self.producer
    }

    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    pub fn is_deterministic(&self) -> bool {
        self.producer.factory().entropy().is_deterministic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntropyMode, GENESIS_HASH};
    use crate::testnet::create_test_network;
    use std::thread;

    #[test]
    fn test_zero_nodes_rejected() {
        let entropy = entropy_source(EntropyMode::Deterministic, None);
        assert!(matches!(
            Network::new(0, entropy),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_fresh_network_is_valid() {
        let network = create_test_network(3).unwrap();
        assert!(network.is_empty());
        assert!(network.validate());
        assert_eq!(network.cloud().len(), 3);
    }

    #[test]
    fn test_first_block_links_to_genesis() {
        let network = create_test_network(2).unwrap();
        let block = network
            .add_block(vec!["JF pays DF 20 QTP".to_string()])
            .unwrap();
        assert_eq!(block.get_previous_hash(), GENESIS_HASH);
        assert!(network.validate());
    }

    #[test]
    fn test_producer_keeps_its_own_copy() {
        let network = create_test_network(2).unwrap();
        network.add_block(vec!["a".to_string()]).unwrap();
        network.add_block(vec!["b".to_string()]).unwrap();
        assert_eq!(network.producer().chain(), network.canonical_chain());
        assert_eq!(network.producer().node_id(), 2);
    }

    #[test]
    fn test_concurrent_add_block_serializes() {
        let network = Arc::new(create_test_network(3).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let network = Arc::clone(&network);
                thread::spawn(move || {
                    for j in 0..5 {
                        network.add_block(vec![format!("tx {i}-{j}")]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(network.len(), 40);
        assert!(network.validate());
        let canonical = network.canonical_chain();
        for node in network.nodes() {
            assert_eq!(node.chain(), canonical);
        }
    }

    #[test]
    fn test_from_settings() {
        let settings = LedgerSettings {
            node_count: 4,
            entropy_mode: EntropyMode::Sampled,
            entropy_seed: Some(9),
            ..LedgerSettings::default()
        };
        let network = Network::from_settings(&settings).unwrap();
        assert_eq!(network.nodes().len(), 4);
        assert!(!network.is_deterministic());
    }
}
