// Coin Redemption Status - Core Library
// Exposes all modules for use in the CLI, the web server, and tests

pub mod config;
pub mod drops;
pub mod loader;
pub mod presenter;
pub mod providers;
pub mod resolver;
pub mod status;

// Re-export commonly used types
pub use config::Config;
pub use drops::{DropDef, DropRegistry, SectionDef};
pub use loader::{addresses_of, load_addresses, AddressEntry};
pub use presenter::{present_drop, CoinView, DropView, SectionView};
pub use providers::{
    sats_to_coin, AddressStats, BalanceApi, BulkBalance, ChainStats, HttpBalanceApi,
    ProviderError, SATS_PER_COIN,
};
pub use resolver::{resolve_balances, BalanceRecord, Resolution, Source};
pub use status::{classify, Status, StatusLabel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
