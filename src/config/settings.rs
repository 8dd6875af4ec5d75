use crate::core::{EntropyMode, DEFAULT_WARN_THRESHOLD};
use crate::error::{LedgerError, Result};
use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

const DEFAULT_NODE_COUNT: usize = 3;

const NODE_COUNT_KEY: &str = "LEDGER_NODE_COUNT";
const ENTROPY_MODE_KEY: &str = "LEDGER_ENTROPY_MODE";
const ENTROPY_SEED_KEY: &str = "LEDGER_ENTROPY_SEED";
const WARN_THRESHOLD_KEY: &str = "LEDGER_OPTIMIZER_WARN_THRESHOLD";

/// Everything needed to stand up a ledger network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    pub node_count: usize,
    pub entropy_mode: EntropyMode,
    /// Only used by the sampled entropy source
    pub entropy_seed: Option<u64>,
    pub optimizer_warn_threshold: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            node_count: DEFAULT_NODE_COUNT,
            entropy_mode: EntropyMode::default(),
            entropy_seed: None,
            optimizer_warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

impl LedgerSettings {
    pub fn from_toml_str(text: &str) -> Result<LedgerSettings> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<LedgerSettings> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `LEDGER_*` overrides read through `lookup`
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(count) = lookup(NODE_COUNT_KEY) {
            self.node_count = parse_number(NODE_COUNT_KEY, &count)?;
        }
        if let Some(mode) = lookup(ENTROPY_MODE_KEY) {
            self.entropy_mode = mode.parse()?;
        }
        if let Some(seed) = lookup(ENTROPY_SEED_KEY) {
            self.entropy_seed = Some(parse_number(ENTROPY_SEED_KEY, &seed)?);
        }
        if let Some(threshold) = lookup(WARN_THRESHOLD_KEY) {
            self.optimizer_warn_threshold = parse_number(WARN_THRESHOLD_KEY, &threshold)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(LedgerError::Config(
                "node_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| LedgerError::Config(format!("Invalid value for {key}: {value}")))
}

/// Process-wide settings, seeded from defaults and `LEDGER_*` variables
pub struct Config {
    inner: RwLock<LedgerSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut settings = LedgerSettings::default();
        // A bad variable should not stop the process from starting
        if let Err(e) = settings.apply_overrides(|key| env::var(key).ok()) {
            log::error!("Ignoring environment overrides: {e}");
            settings = LedgerSettings::default();
        }
        Config {
            inner: RwLock::new(settings),
        }
    }

    /// Replace the current settings with a TOML file, then re-apply the
    /// environment so variables still win over the file
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let mut settings = LedgerSettings::from_file(path)?;
        settings.apply_overrides(|key| env::var(key).ok())?;
        settings.validate()?;
        info!("Loaded ledger settings from {}", path.display());
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    pub fn settings(&self) -> LedgerSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_node_count(&self) -> usize {
        self.settings().node_count
    }

    pub fn set_node_count(&self, node_count: usize) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .node_count = node_count;
    }

    pub fn get_entropy_mode(&self) -> EntropyMode {
        self.settings().entropy_mode
    }

    pub fn set_entropy_mode(&self, mode: EntropyMode) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entropy_mode = mode;
    }

    pub fn get_entropy_seed(&self) -> Option<u64> {
        self.settings().entropy_seed
    }

    pub fn set_entropy_seed(&self, seed: u64) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entropy_seed = Some(seed);
    }

    pub fn get_optimizer_warn_threshold(&self) -> usize {
        self.settings().optimizer_warn_threshold
    }
}
