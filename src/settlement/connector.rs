use crate::error::{LedgerError, Result};
use crate::utils::sha256_hex;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// What to deploy on the outside settlement layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub name: String,
    pub symbol: String,
    pub initial_supply: u64,
    pub owner: String,
}

/// Narrow interface to an outside settlement network.
///
/// The ledger core never calls this; only application code wrapping the
/// core does, through `SettlementGateway`.
pub trait LedgerConnector: Send + Sync {
    /// Fee the settlement layer would charge for `transaction`
    fn estimate_cost(&self, transaction: &str) -> Result<u128>;

    /// Submit `transaction` and return its identifier
    fn submit(&self, transaction: &str) -> Result<String>;

    /// Deploy a contract and return its address
    fn deploy(&self, contract: &ContractSpec) -> Result<String>;
}

const BASE_GAS: u128 = 21_000;
const GAS_PER_BYTE: u128 = 16;
const DEFAULT_GAS_PRICE: u128 = 50;

/// In-memory settlement layer used by the CLI and in tests.
///
/// Fees are `gas * gas_price` with `gas = 21000 + 16 * len(transaction)`.
/// Transaction ids are random v4 uuids, contract addresses are the first
/// 20 bytes of the contract spec digest.
pub struct SimulatedConnector {
    gas_price: u128,
    submitted: RwLock<Vec<(String, String)>>,
    contracts: RwLock<HashMap<String, ContractSpec>>,
}

impl Default for SimulatedConnector {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_PRICE)
    }
}

impl SimulatedConnector {
    pub fn new(gas_price: u128) -> SimulatedConnector {
        SimulatedConnector {
            gas_price,
            submitted: RwLock::new(vec![]),
            contracts: RwLock::new(HashMap::new()),
        }
    }

    /// `(id, transaction)` pairs in submission order
    pub fn submitted(&self) -> Vec<(String, String)> {
        self.submitted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contract(&self, address: &str) -> Option<ContractSpec> {
        self.contracts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
    }
}

impl LedgerConnector for SimulatedConnector {
    fn estimate_cost(&self, transaction: &str) -> Result<u128> {
        let gas = BASE_GAS + GAS_PER_BYTE * transaction.len() as u128;
        Ok(gas * self.gas_price)
    }

    fn submit(&self, transaction: &str) -> Result<String> {
        if transaction.is_empty() {
            return Err(LedgerError::Connector(
                "Refusing to submit an empty transaction".to_string(),
            ));
        }
        let id = Uuid::new_v4().to_string();
        self.submitted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), transaction.to_string()));
        Ok(id)
    }

    fn deploy(&self, contract: &ContractSpec) -> Result<String> {
        let material = serde_json::to_vec(contract)?;
        let address = format!("0x{}", &sha256_hex(&material)[..40]);
        self.contracts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), contract.clone());
        info!(
            "Deployed {} ({}) at {address}",
            contract.name, contract.symbol
        );
        Ok(address)
    }
}
