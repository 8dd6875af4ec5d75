// Application-side wrapper around a LedgerConnector.
// It remembers the deployed token contract and refuses any operation whose
// prerequisites are missing instead of silently doing nothing.

use crate::error::{LedgerError, Result};
use crate::settlement::{ContractSpec, LedgerConnector};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub tx_id: String,
    pub fee: u128,
}

#[derive(Default)]
pub struct SettlementGateway {
    connector: Option<Box<dyn LedgerConnector>>,
    contract: Option<String>,
}

impl SettlementGateway {
    pub fn new() -> SettlementGateway {
        SettlementGateway {
            connector: None,
            contract: None,
        }
    }

    pub fn with_connector(connector: Box<dyn LedgerConnector>) -> SettlementGateway {
        SettlementGateway {
            connector: Some(connector),
            contract: None,
        }
    }

    fn connector(&self) -> Result<&dyn LedgerConnector> {
        self.connector.as_deref().ok_or_else(|| {
            LedgerError::NotConfigured("No ledger connector configured".to_string())
        })
    }

    /// Address of the active token contract, if one was deployed
    pub fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    /// Deploy a token contract and make it the active one
    pub fn deploy_token(&mut self, spec: &ContractSpec) -> Result<String> {
        let address = self.connector()?.deploy(spec)?;
        info!("Token contract {} active at {address}", spec.symbol);
        self.contract = Some(address.clone());
        Ok(address)
    }

    /// Transfer `amount` tokens through the active contract.
    /// The fee is estimated before the transfer is submitted.
    pub fn transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
    ) -> Result<SettlementReceipt> {
        let connector = self.connector()?;
        let contract = self.contract.as_deref().ok_or_else(|| {
            LedgerError::NotConfigured("Token contract not deployed".to_string())
        })?;

        let transaction = format!("{contract}:transfer:{sender}:{recipient}:{amount}");
        let fee = connector.estimate_cost(&transaction)?;
        info!("Fee for transfer of {amount} from {sender} to {recipient}: {fee}");
        let tx_id = connector.submit(&transaction)?;
        Ok(SettlementReceipt { tx_id, fee })
    }

    /// Submit each transaction of a sealed batch, in order. Stops at the
    /// first rejection; earlier submissions are not rolled back.
    pub fn submit_batch(&self, transactions: &[String]) -> Result<Vec<String>> {
        let connector = self.connector()?;
        let mut ids = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            let id = connector.submit(transaction)?;
            info!("Submitted transaction {id}");
            ids.push(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingConnector {
        submits: Arc<AtomicUsize>,
        estimates: Arc<AtomicUsize>,
    }

    impl LedgerConnector for CountingConnector {
        fn estimate_cost(&self, _transaction: &str) -> Result<u128> {
            self.estimates.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        }

        fn submit(&self, transaction: &str) -> Result<String> {
            if transaction == "reject" {
                return Err(LedgerError::Connector("rejected".to_string()));
            }
            let n = self.submits.fetch_add(1, Ordering::SeqCst);
            Ok(format!("tx-{n}"))
        }

        fn deploy(&self, contract: &ContractSpec) -> Result<String> {
            Ok(format!("0x{}", contract.symbol.to_lowercase()))
        }
    }

    fn token() -> ContractSpec {
        ContractSpec {
            name: "QuantumToken".to_string(),
            symbol: "QTK".to_string(),
            initial_supply: 1_000_000,
            owner: "0xowner".to_string(),
        }
    }

    #[test]
    fn test_no_connector_is_not_configured() {
        let mut gateway = SettlementGateway::new();
        assert!(matches!(
            gateway.deploy_token(&token()),
            Err(LedgerError::NotConfigured(_))
        ));
        assert!(matches!(
            gateway.submit_batch(&["a".to_string()]),
            Err(LedgerError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_transfer_requires_contract() {
        let connector = CountingConnector::default();
        let submits = Arc::clone(&connector.submits);
        let gateway = SettlementGateway::with_connector(Box::new(connector));

        let result = gateway.transfer("alice", "bob", 10);
        assert!(matches!(result, Err(LedgerError::NotConfigured(_))));
        assert_eq!(submits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_transfer_estimates_then_submits() {
        let connector = CountingConnector::default();
        let estimates = Arc::clone(&connector.estimates);
        let mut gateway = SettlementGateway::with_connector(Box::new(connector));

        assert_eq!(gateway.deploy_token(&token()).unwrap(), "0xqtk");
        assert_eq!(gateway.contract(), Some("0xqtk"));

        let receipt = gateway.transfer("alice", "bob", 100).unwrap();
        assert_eq!(receipt.fee, 7);
        assert_eq!(receipt.tx_id, "tx-0");
        assert_eq!(estimates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_batch_keeps_order() {
        let gateway = SettlementGateway::with_connector(Box::new(CountingConnector::default()));
        let ids = gateway
            .submit_batch(&["x".to_string(), "y".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["tx-0", "tx-1"]);
    }

    #[test]
    fn test_submit_batch_stops_on_rejection() {
        let connector = CountingConnector::default();
        let submits = Arc::clone(&connector.submits);
        let gateway = SettlementGateway::with_connector(Box::new(connector));

        let result = gateway.submit_batch(&[
            "x".to_string(),
            "reject".to_string(),
            "y".to_string(),
        ]);
        assert!(matches!(result, Err(LedgerError::Connector(_))));
        assert_eq!(submits.load(Ordering::SeqCst), 1);
    }
}
