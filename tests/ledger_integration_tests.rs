//! Ledger integration tests
//!
//! Exercises the public surface end to end: block production through the
//! network, replication to every node, chain validation and transaction
//! ordering.

use quantum_ledger::{
    entropy_source, stable_hash, Block, BlockFactory, Chain, EntropyMode, LedgerError,
    Network, SettlementGateway, SimulatedConnector, StateVectorEntropy,
    TransactionOrderOptimizer, GENESIS_HASH,
};
use std::sync::Arc;

fn deterministic_network(node_count: usize) -> Network {
    Network::new(node_count, entropy_source(EntropyMode::Deterministic, None)).unwrap()
}

fn batch(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_genesis_invariant() {
    let network = deterministic_network(3);
    assert!(network.validate());

    let block = network.add_block(batch(&["JF pays DF 20 QTP"])).unwrap();
    assert_eq!(block.get_previous_hash(), "0".repeat(64));
    assert_eq!(block.get_previous_hash(), GENESIS_HASH);
}

#[test]
fn test_chain_links_after_many_blocks() {
    let network = deterministic_network(2);
    for i in 0..6 {
        network.add_block(batch(&[format!("tx {i}").as_str()])).unwrap();
    }

    let chain = network.canonical_chain();
    assert_eq!(chain.len(), 6);
    assert_eq!(chain.get(0).unwrap().get_previous_hash(), GENESIS_HASH);
    for i in 1..chain.len() {
        assert_eq!(
            chain.get(i).unwrap().get_previous_hash(),
            chain.get(i - 1).unwrap().get_hash()
        );
    }
    assert!(network.validate());
}

#[test]
fn test_corrupted_link_fails_validation() {
    let network = deterministic_network(1);
    for tx in ["a", "b", "c"] {
        network.add_block(batch(&[tx])).unwrap();
    }

    let mut blocks = network.canonical_chain().blocks().to_vec();
    let victim = blocks[1].clone();
    blocks[1] = Block::from_parts(
        victim.get_transactions().to_vec(),
        "0".repeat(64),
        victim.get_hash().to_string(),
    );

    let corrupted = Chain::from_blocks(blocks);
    assert!(!corrupted.validate());
    // The network's own chain is untouched
    assert!(network.validate());
}

#[test]
fn test_replication_fidelity() {
    let network = deterministic_network(3);
    network.add_block(batch(&["first"])).unwrap();

    let before: Vec<usize> = network.nodes().iter().map(|node| node.len()).collect();
    let block = network
        .add_block(batch(&["Alice pays Bob 10 QTK", "Bob pays Charlie 5 QTK"]))
        .unwrap();

    let canonical = network.canonical_chain();
    let canonical_last = canonical.last().unwrap();
    assert_eq!(canonical_last, &block);

    for (node, len_before) in network.nodes().iter().zip(before) {
        assert_eq!(node.len(), len_before + 1);
        let replica_last = node.last_block().unwrap();
        assert_eq!(&replica_last, canonical_last);
        assert_eq!(
            replica_last.serialize().unwrap(),
            canonical_last.serialize().unwrap()
        );
    }
}

#[test]
fn test_every_replica_matches_canonical_chain() {
    let network = Network::new(4, entropy_source(EntropyMode::Sampled, Some(17))).unwrap();
    for tx in ["a pays b 1", "b pays c 61", "charlie pays dave 77"] {
        network.add_block(batch(&[tx])).unwrap();
    }

    let canonical = network.canonical_chain();
    assert!(network.validate());
    for node in network.nodes() {
        assert_eq!(node.chain(), canonical);
    }
}

#[test]
fn test_deterministic_hash_repeats() {
    let factory = BlockFactory::new(Arc::new(StateVectorEntropy::new()));
    let transactions = batch(&["DF pays HV 1% QTP"]);
    let first = factory.compute_hash(&transactions, GENESIS_HASH);
    let second = factory.compute_hash(&transactions, GENESIS_HASH);
    assert_eq!(first, second);

    // Two independent networks agree on every hash
    let left = deterministic_network(1);
    let right = deterministic_network(5);
    for tx in ["x", "y"] {
        assert_eq!(
            left.add_block(batch(&[tx])).unwrap(),
            right.add_block(batch(&[tx])).unwrap()
        );
    }
}

#[test]
fn test_optimizer_matches_brute_force() {
    let input = ["a", "b", "c"];
    let optimizer = TransactionOrderOptimizer::new();
    let result = optimizer.optimize(&input);

    let cost = |order: &[&str]| -> u128 {
        order
            .windows(2)
            .map(|w| u128::from(stable_hash(w[0]).abs_diff(stable_hash(w[1]))))
            .sum()
    };
    let all_orders: [[&str; 3]; 6] = [
        ["a", "b", "c"],
        ["a", "c", "b"],
        ["b", "a", "c"],
        ["b", "c", "a"],
        ["c", "a", "b"],
        ["c", "b", "a"],
    ];
    let min = all_orders.iter().map(|o| cost(&o[..])).min().unwrap();
    let first_min = all_orders.iter().find(|o| cost(&o[..]) == min).unwrap();

    assert_eq!(cost(result.as_slice()), min);
    assert_eq!(result.as_slice(), first_min);
}

#[test]
fn test_optimizer_trivial_inputs() {
    let optimizer = TransactionOrderOptimizer::new();
    assert!(optimizer.optimize::<String>(&[]).is_empty());
    assert_eq!(optimizer.optimize(&["x"]), vec!["x"]);
}

#[test]
fn test_empty_and_singleton_chains_validate() {
    let network = deterministic_network(2);
    assert!(network.validate());
    network.add_block(Vec::new()).unwrap();
    assert!(network.validate());
    assert!(network.canonical_chain().get(0).unwrap().get_transactions().is_empty());
}

#[test]
fn test_optimized_batch_sealed_in_order() {
    let network = deterministic_network(3);
    let optimizer = TransactionOrderOptimizer::new();
    let ordered = optimizer.optimize(&batch(&[
        "Alice pays Bob 10 QTK",
        "Bob pays Charlie 5 QTK",
        "Charlie pays Dave 2 QTK",
    ]));

    let block = network.add_block(ordered.clone()).unwrap();
    assert_eq!(block.get_transactions(), ordered.as_slice());
}

#[test]
fn test_zero_node_network_rejected() {
    let result = Network::new(0, entropy_source(EntropyMode::Deterministic, None));
    assert!(matches!(result, Err(LedgerError::Config(_))));
}

#[test]
fn test_settling_a_sealed_block() {
    let network = deterministic_network(2);
    let block = network.add_block(batch(&["a pays b 1", "b pays c 61"])).unwrap();

    let unconfigured = SettlementGateway::new();
    assert!(matches!(
        unconfigured.submit_batch(block.get_transactions()),
        Err(LedgerError::NotConfigured(_))
    ));

    let gateway = SettlementGateway::with_connector(Box::new(SimulatedConnector::default()));
    let ids = gateway.submit_batch(block.get_transactions()).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(matches!(
        gateway.transfer("alice", "bob", 5),
        Err(LedgerError::NotConfigured(_))
    ));
}
