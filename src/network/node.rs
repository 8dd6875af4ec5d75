use crate::core::{Block, BlockFactory, Chain};
use log::debug;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A ledger participant holding one chain replica.
///
/// The replica is only ever mutated through `create_block` and `append`,
/// both of which take the node's own write lock.
pub struct Node {
    node_id: usize,
    factory: BlockFactory,
    chain: RwLock<Chain>,
}

impl Node {
    pub fn new(node_id: usize, factory: BlockFactory) -> Node {
        Node {
            node_id,
            factory,
            chain: RwLock::new(Chain::new()),
        }
    }

    pub fn node_id(&self) -> usize {
        self.node_id
    }

    pub fn factory(&self) -> &BlockFactory {
        &self.factory
    }

    // A panicking writer can only leave a fully pushed or untouched Vec
    // behind, so reading through the poison is safe here.
    fn read_chain(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seal `transactions` on top of `previous_hash`, keep the block in this
    /// node's replica and hand it back to the caller
    pub fn create_block(&self, transactions: &[String], previous_hash: &str) -> Block {
        let block = self.factory.create_block(transactions, previous_hash);
        self.write_chain().push(block.clone());
        debug!("Node {} created block {}", self.node_id, block.get_hash());
        block
    }

    /// Replication target. The block is stored as given, links are not checked.
    pub fn append(&self, block: Block) {
        let mut chain = self.write_chain();
        chain.push(block);
        debug!("Node {} replica now holds {} blocks", self.node_id, chain.len());
    }

    /// Snapshot of the replica
    pub fn chain(&self) -> Chain {
        self.read_chain().clone()
    }

    pub fn last_block(&self) -> Option<Block> {
        self.read_chain().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.read_chain().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_chain().is_empty()
    }
}
