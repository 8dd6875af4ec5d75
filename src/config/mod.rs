//! Configuration management
//!
//! This module handles the settings a ledger network is built from:
//! node count, entropy mode and optimizer limits. Values come from
//! defaults, an optional TOML file and `LEDGER_*` environment variables.

pub mod settings;

pub use settings::{Config, LedgerSettings, GLOBAL_CONFIG};
