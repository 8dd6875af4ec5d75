use crate::core::Block;
use crate::network::Node;
use log::{info, warn};
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// In-process replication fabric.
///
/// The cloud only remembers which nodes to reach; it never owns them.
/// Broadcast is plain full replication: no quorum, no acknowledgements and
/// no rollback. A registration whose node has since been dropped is skipped.
#[derive(Default)]
pub struct Cloud {
    connected: RwLock<Vec<Weak<Node>>>,
}

impl Cloud {
    pub fn new() -> Cloud {
        Cloud {
            connected: RwLock::new(vec![]),
        }
    }

    /// Register `node` for future broadcasts. Registering the same node
    /// twice makes it receive every block twice.
    pub fn connect(&self, node: &Arc<Node>) {
        let mut connected = self
            .connected
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        connected.push(Arc::downgrade(node));
        info!("Node {} connected to the cloud", node.node_id());
    }

    /// Append an owned copy of `block` to every registered node, in
    /// registration order. Returns how many replicas received it.
    pub fn broadcast(&self, block: &Block) -> usize {
        let connected = self
            .connected
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        for registration in connected.iter() {
            match registration.upgrade() {
                Some(node) => {
                    node.append(block.clone());
                    delivered += 1;
                }
                None => warn!("Skipping a dropped node during broadcast"),
            }
        }
        info!(
            "Broadcast block {} to {delivered}/{} nodes",
            block.get_hash(),
            connected.len()
        );
        delivered
    }

    pub fn len(&self) -> usize {
        self.connected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
