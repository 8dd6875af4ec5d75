//! Outside settlement layer
//!
//! The ledger core never talks to an external network. Application code
//! that wants to deploy a token or push sealed transactions somewhere else
//! goes through a `LedgerConnector`, wrapped by a `SettlementGateway`.

pub mod connector;
pub mod gateway;

pub use connector::{ContractSpec, LedgerConnector, SimulatedConnector};
pub use gateway::{SettlementGateway, SettlementReceipt};
