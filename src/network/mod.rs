//! In-process multi-node replication
//!
//! This module holds the nodes that keep chain replicas, the cloud that
//! broadcasts blocks to them and the coordinating network that owns the
//! canonical chain.
//!
//! There is no transport here: every node lives in the same process.

pub mod cloud;
pub mod coordinator;
pub mod node;

pub use cloud::Cloud;
pub use coordinator::Network;
pub use node::Node;
