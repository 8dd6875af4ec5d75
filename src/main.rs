// Entry point for the ledger CLI
// Every command runs against a fresh in-process network; nothing is persisted.
use clap::Parser;
use log::{error, info, LevelFilter};
use quantum_ledger::{
    entropy_source, parse_batch, BlockFactory, Command, ContractSpec, LedgerSettings, Network,
    Opt, SettlementGateway, SimulatedConnector, TransactionOrderOptimizer, GLOBAL_CONFIG,
};
use std::process;

fn main() {
    // Info by default, RUST_LOG still wins
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Some(path) = &opt.config {
        if let Err(e) = GLOBAL_CONFIG.load_file(path) {
            error!("Error: {e}");
            process::exit(1);
        }
    }

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn optimizer(settings: &LedgerSettings) -> TransactionOrderOptimizer {
    TransactionOrderOptimizer::new().with_warn_threshold(settings.optimizer_warn_threshold)
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Simulate {
            batches,
            nodes,
            entropy,
            seed,
            optimize,
            json,
        } => {
            // Command line flags override whatever the config layer produced
            let mut settings = GLOBAL_CONFIG.settings();
            if let Some(nodes) = nodes {
                settings.node_count = nodes;
            }
            if let Some(entropy) = entropy {
                settings.entropy_mode = entropy;
            }
            if seed.is_some() {
                settings.entropy_seed = seed;
            }
            settings.validate()?;

            let network = Network::from_settings(&settings)?;
            let optimizer = optimizer(&settings);

            for batch in &batches {
                let mut transactions = parse_batch(batch);
                if optimize {
                    transactions = optimizer.optimize(&transactions);
                    println!("Optimized Transaction Order: {transactions:?}");
                }
                network.add_block(transactions)?;
            }

            let chain = network.canonical_chain();
            if json {
                println!("{}", chain.to_json()?);
            } else {
                for (i, block) in chain.iter().enumerate() {
                    println!("Block {i}:");
                    println!("  Transactions: {:?}", block.get_transactions());
                    println!("  Previous Hash: {}", block.get_previous_hash());
                    println!("  Hash: {}\n", block.get_hash());
                }
            }

            for node in network.nodes() {
                info!("Node {} holds {} blocks", node.node_id(), node.len());
            }
            println!("Is global blockchain valid? {}", network.validate());
        }
        Command::Optimize { transactions } => {
            let optimizer = optimizer(&GLOBAL_CONFIG.settings());
            let ordered = optimizer.optimize(&transactions);
            println!("Optimized Transaction Order: {ordered:?}");
            println!("Cost: {}", optimizer.cost(&ordered));
        }
        Command::Hash {
            transactions,
            previous,
            entropy,
            seed,
        } => {
            let mode = entropy.unwrap_or_else(|| GLOBAL_CONFIG.get_entropy_mode());
            let source = entropy_source(mode, seed.or_else(|| GLOBAL_CONFIG.get_entropy_seed()));
            if !source.is_deterministic() {
                info!("Sampled entropy: this hash will differ between runs unless --seed is pinned");
            }
            let factory = BlockFactory::new(source);
            println!("{}", factory.compute_hash(&transactions, &previous));
        }
        Command::Settle {
            owner,
            recipient,
            amount,
            name,
            symbol,
            supply,
            submit,
        } => {
            let mut gateway =
                SettlementGateway::with_connector(Box::new(SimulatedConnector::default()));
            let address = gateway.deploy_token(&ContractSpec {
                name,
                symbol,
                initial_supply: supply,
                owner: owner.clone(),
            })?;
            println!("Token Contract Deployed at {address}");

            let receipt = gateway.transfer(&owner, &recipient, amount)?;
            println!("Gas cost for the transaction: {}", receipt.fee);
            println!("Transaction Hash: {}", receipt.tx_id);

            for id in gateway.submit_batch(&submit)? {
                println!("Submitted transaction: {id}");
            }
        }
    }
    Ok(())
}
