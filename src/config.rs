// Runtime configuration
// config/default.toml + COIN_* environment overrides; every field has a
// default so the service runs with no config file at all

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub providers: ProviderConfig,

    #[serde(default)]
    pub data: DataConfig,

    /// Public explorer link base; the address is appended
    #[serde(default = "default_explorer_base")]
    pub explorer_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Bulk balance endpoint; `addr1|addr2|...` is appended
    #[serde(default = "default_bulk_base")]
    pub bulk_base: String,

    /// Per-address fallback endpoint; the address is appended
    #[serde(default = "default_fallback_base")]
    pub fallback_base: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Directory holding the address list files
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Optional JSON file of drop definitions; built-in defaults when absent
    #[serde(default)]
    pub drops_file: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_bulk_base() -> String {
    "https://blockchain.info/balance?active=".to_string()
}

fn default_fallback_base() -> String {
    "https://mempool.space/api/address/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_explorer_base() -> String {
    "https://www.blockchain.com/explorer/addresses/btc/".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            bulk_base: default_bulk_base(),
            fallback_base: default_fallback_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            dir: default_data_dir(),
            drops_file: None,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("COIN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs)
    }
}

// ============================================================================
// TESTS
// ============================================================================
