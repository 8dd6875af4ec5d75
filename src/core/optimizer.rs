//! Transaction ordering
//!
//! Reorders a pending batch so that neighbouring transactions are as close
//! as possible under a stable hash, before the batch is sealed into a block.
//!
//! The search is exhaustive: every one of the n! orderings is scored, which
//! costs O(n! * n). Ten transactions already mean 3.6 million candidates, so
//! callers should keep batches small. Large batches are logged, not
//! approximated, because callers rely on getting the exact minimum.

use crate::utils::stable_hash;
use itertools::Itertools;
use log::{debug, warn};

/// Batches longer than this get a warning before the search starts
pub const DEFAULT_WARN_THRESHOLD: usize = 9;

#[derive(Debug, Clone, Copy)]
pub struct TransactionOrderOptimizer {
    hasher: fn(&str) -> u64,
    warn_threshold: usize,
}

impl Default for TransactionOrderOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionOrderOptimizer {
    pub fn new() -> TransactionOrderOptimizer {
        TransactionOrderOptimizer {
            hasher: stable_hash,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }

    /// Use a different hash for the pairwise cost. It must be stable
    /// across processes or the chosen order will not be reproducible.
    pub fn with_hasher(mut self, hasher: fn(&str) -> u64) -> TransactionOrderOptimizer {
        self.hasher = hasher;
        self
    }

    pub fn with_warn_threshold(mut self, warn_threshold: usize) -> TransactionOrderOptimizer {
        self.warn_threshold = warn_threshold;
        self
    }

    /// Sum of `|h(a) - h(b)|` over adjacent pairs
    pub fn cost<T: AsRef<str>>(&self, order: &[T]) -> u128 {
        let hashes: Vec<u64> = order.iter().map(|tx| (self.hasher)(tx.as_ref())).collect();
        Self::cost_of_hashes(hashes.iter())
    }

    fn cost_of_hashes<'a, I>(hashes: I) -> u128
    where
        I: Iterator<Item = &'a u64>,
    {
        hashes
            .tuple_windows()
            .map(|(a, b)| u128::from(a.abs_diff(*b)))
            .sum()
    }

    /// Return the permutation of `transactions` with the lowest cost.
    ///
    /// Permutations are visited in lexicographic order of input positions
    /// and only a strictly lower cost replaces the current best, so among
    /// equally cheap orderings the first one visited wins.
    pub fn optimize<T: AsRef<str> + Clone>(&self, transactions: &[T]) -> Vec<T> {
        let n = transactions.len();
        if n <= 1 {
            return transactions.to_vec();
        }
        if n > self.warn_threshold {
            warn!("Optimizing {n} transactions exhaustively, this may take a very long time");
        }

        let hashes: Vec<u64> = transactions
            .iter()
            .map(|tx| (self.hasher)(tx.as_ref()))
            .collect();

        let mut best: Option<(u128, Vec<usize>)> = None;
        for order in (0..n).permutations(n) {
            let cost = Self::cost_of_hashes(order.iter().map(|&index| &hashes[index]));
            let improves = match &best {
                Some((best_cost, _)) => cost < *best_cost,
                None => true,
            };
            if improves {
                best = Some((cost, order));
            }
        }

        match best {
            Some((cost, order)) => {
                debug!("Best ordering of {n} transactions costs {cost}");
                order
                    .into_iter()
                    .map(|index| transactions[index].clone())
                    .collect()
            }
            None => transactions.to_vec(),
        }
    }
}
