use crate::core::{EntropyMode, GENESIS_HASH};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Separator between transactions inside one `--block` batch
pub const BATCH_SEPARATOR: char = ';';

#[derive(Debug, Parser)]
#[command(name = "quantum-ledger")]
pub struct Opt {
    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "simulate",
        about = "Build a network, add one block per batch and validate the chain"
    )]
    Simulate {
        #[arg(
            help = "Transaction batches, transactions separated by ';'",
            required = true
        )]
        batches: Vec<String>,
        #[arg(long = "nodes", help = "Number of replica nodes")]
        nodes: Option<usize>,
        #[arg(long = "entropy", help = "Entropy mode (deterministic, sampled)")]
        entropy: Option<EntropyMode>,
        #[arg(long = "seed", help = "Seed for the sampled entropy source")]
        seed: Option<u64>,
        #[arg(long = "optimize", help = "Reorder every batch before sealing it")]
        optimize: bool,
        #[arg(long = "json", help = "Print the canonical chain as JSON")]
        json: bool,
    },
    #[command(name = "optimize", about = "Print the cheapest ordering of transactions")]
    Optimize {
        #[arg(help = "Transactions to reorder")]
        transactions: Vec<String>,
    },
    #[command(name = "hash", about = "Print the block hash for a transaction batch")]
    Hash {
        #[arg(help = "Transactions in settlement order")]
        transactions: Vec<String>,
        #[arg(long = "previous", default_value = GENESIS_HASH, help = "Previous block hash")]
        previous: String,
        #[arg(long = "entropy", help = "Entropy mode (deterministic, sampled)")]
        entropy: Option<EntropyMode>,
        #[arg(long = "seed", help = "Seed for the sampled entropy source")]
        seed: Option<u64>,
    },
    #[command(
        name = "settle",
        about = "Deploy a token on the simulated settlement layer and transfer from it"
    )]
    Settle {
        #[arg(help = "Token owner and transfer sender")]
        owner: String,
        #[arg(help = "Transfer recipient")]
        recipient: String,
        #[arg(help = "Amount to transfer")]
        amount: u64,
        #[arg(long = "name", default_value = "QuantumToken")]
        name: String,
        #[arg(long = "symbol", default_value = "QTK")]
        symbol: String,
        #[arg(long = "supply", default_value_t = 1_000_000)]
        supply: u64,
        #[arg(long = "submit", help = "Extra raw transactions to submit afterwards")]
        submit: Vec<String>,
    },
}

/// Split a `;`-separated batch, dropping empty entries
pub fn parse_batch(batch: &str) -> Vec<String> {
    batch
        .split(BATCH_SEPARATOR)
        .map(str::trim)
        .filter(|tx| !tx.is_empty())
        .map(String::from)
        .collect()
}
