// An append-only sequence of blocks linked by digest references.
// Both the canonical chain and every node replica use this type.

use crate::core::{Block, GENESIS_HASH};
use crate::error::Result;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Chain {
        Chain { blocks: Vec::new() }
    }

    /// Wrap blocks as-is. No linkage is checked, call `validate` for that.
    pub fn from_blocks(blocks: Vec<Block>) -> Chain {
        Chain { blocks }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Hash the next block must link to
    pub fn tip_hash(&self) -> &str {
        self.blocks
            .last()
            .map(Block::get_hash)
            .unwrap_or(GENESIS_HASH)
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Index of the first block whose `previous_hash` does not match its
    /// predecessor, if any. Only pairs are compared: the first block's
    /// `previous_hash` is never inspected.
    pub fn first_broken_link(&self) -> Option<usize> {
        self.blocks
            .windows(2)
            .position(|pair| pair[1].get_previous_hash() != pair[0].get_hash())
            .map(|position| position + 1)
    }

    /// Single front-to-back scan of the hash links.
    /// Empty and single-block chains are valid.
    pub fn validate(&self) -> bool {
        match self.first_broken_link() {
            Some(index) => {
                warn!(
                    "Broken link at block {index}: expected previous hash {}, found {}",
                    self.blocks[index - 1].get_hash(),
                    self.blocks[index].get_previous_hash()
                );
                false
            }
            None => true,
        }
    }

    /// `validate` plus the genesis check on the first block
    pub fn is_anchored(&self) -> bool {
        self.blocks.first().map_or(true, Block::is_genesis) && self.validate()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Chain> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
