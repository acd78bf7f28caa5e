//! Process-wide wallet configuration, read once at startup and never
//! mutated afterwards.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, WalletError};
use crate::types::Address;

/// Most-recent proposals fetched per aggregation cycle.
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Interval between post-write receipt checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Maximum post-write receipt checks before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the test network node.
    pub rpc_url: String,

    /// Chain id the node is expected to serve.
    pub chain_id: u64,

    /// Multisig contract address.
    pub multisig_address: Address,

    /// Freeze contract address, the only call target the classifier decodes.
    pub freeze_address: Address,

    /// Base URL of the backend payment/policy API.
    pub api_base_url: String,

    /// Account used as `from` for multisig writes. The key is managed by the
    /// test node, so the wallet submits unsigned transactions.
    pub sender: Option<Address>,

    #[serde(default = "default_page_size")]
    pub page_size: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_poll_attempts() -> u32 {
    DEFAULT_POLL_ATTEMPTS
}

impl WalletConfig {
    /// Loads configuration from a JSON file, then applies environment
    /// overrides (`FREEZE_WALLET_RPC_URL`, `FREEZE_WALLET_API_URL`).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            WalletError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: WalletConfig = serde_json::from_str(&raw)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        if let Ok(url) = env::var("FREEZE_WALLET_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(url) = env::var("FREEZE_WALLET_API_URL") {
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.rpc_url.starts_with("http") {
            return Err(WalletError::Config(format!(
                "rpc_url must be an http(s) endpoint: {}",
                self.rpc_url
            )));
        }
        if !self.api_base_url.starts_with("http") {
            return Err(WalletError::Config(format!(
                "api_base_url must be an http(s) endpoint: {}",
                self.api_base_url
            )));
        }
        if self.page_size == 0 {
            return Err(WalletError::Config("page_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Sender account, required for write commands.
    pub fn require_sender(&self) -> Result<Address> {
        self.sender.ok_or_else(|| {
            WalletError::Config("no sender account configured (set \"sender\")".into())
        })
    }
}
