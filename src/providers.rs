// Blockchain Balance Providers
// HTTP clients for the bulk provider (blockchain.info-style) and the
// per-address fallback provider (mempool.space-style)

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Minor units (satoshis) per whole coin
pub const SATS_PER_COIN: f64 = 100_000_000.0;

/// Convert an integer minor-unit amount to whole coins
pub fn sats_to_coin(sats: u64) -> f64 {
    sats as f64 / SATS_PER_COIN
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failure of a single provider call. Never leaves the resolver boundary:
/// the resolver turns these into a fallback attempt or a degraded record.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure, non-2xx status, or undecodable response body
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bulk response came back without an entry for a requested address
    #[error("bulk response missing address: {0}")]
    MissingAddress(String),
}

// ============================================================================
// RESPONSE SHAPES
// ============================================================================

/// Per-address entry of the bulk provider response, in minor units
#[derive(Debug, Clone, Deserialize)]
pub struct BulkBalance {
    pub final_balance: u64,
    pub total_received: u64,
}

/// Fallback provider response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct AddressStats {
    pub chain_stats: ChainStats,
}

/// Confirmed funded/spent totals for one address, in minor units
#[derive(Debug, Clone, Deserialize)]
pub struct ChainStats {
    pub funded_txo_sum: u64,
    pub spent_txo_sum: u64,
}

// ============================================================================
// PROVIDER SEAM
// ============================================================================

/// The two upstream calls the resolver makes. Trait seam so tests can run
/// without the network.
#[cfg_attr(test, automock)]
pub trait BalanceApi {
    /// One batched lookup covering every address
    fn bulk_balances(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, BulkBalance>, ProviderError>;

    /// Single-address lookup against the fallback provider
    fn address_stats(&self, address: &str) -> Result<ChainStats, ProviderError>;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// Blocking HTTP client against the real providers.
///
/// Calls are sequential; there is no fan-out. Base URLs are configurable so
/// the service can be pointed at compatible self-hosted instances.
pub struct HttpBalanceApi {
    http: reqwest::blocking::Client,
    bulk_base: String,
    fallback_base: String,
}

impl HttpBalanceApi {
    pub fn new(bulk_base: &str, fallback_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(HttpBalanceApi {
            http,
            bulk_base: bulk_base.to_string(),
            fallback_base: fallback_base.to_string(),
        })
    }

    /// Bulk endpoint URL: addresses joined by `|` after the base path
    fn bulk_url(&self, addresses: &[String]) -> String {
        format!("{}{}", self.bulk_base, addresses.join("|"))
    }
}

impl BalanceApi for HttpBalanceApi {
    fn bulk_balances(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, BulkBalance>, ProviderError> {
        let url = self.bulk_url(addresses);
        tracing::debug!(%url, count = addresses.len(), "bulk balance request");

        let response: HashMap<String, BulkBalance> = self
            .http
            .get(&url)
            .send()?
            .error_for_status()?
            .json()?;

        ensure_all_present(addresses, response)
    }

    fn address_stats(&self, address: &str) -> Result<ChainStats, ProviderError> {
        let url = format!("{}{}", self.fallback_base, address);
        tracing::debug!(%url, "fallback balance request");

        let stats: AddressStats = self
            .http
            .get(&url)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(stats.chain_stats)
    }
}

/// All-or-nothing check on the bulk body: a response missing any requested
/// address fails the whole call, never a partial result
fn ensure_all_present(
    addresses: &[String],
    response: HashMap<String, BulkBalance>,
) -> Result<HashMap<String, BulkBalance>, ProviderError> {
    for address in addresses {
        if !response.contains_key(address) {
            return Err(ProviderError::MissingAddress(address.clone()));
        }
    }
    Ok(response)
}

// ============================================================================
// TESTS
// ============================================================================
