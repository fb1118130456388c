// Balance Resolver
// Bulk lookup with whole-batch fallback to the per-address provider

use serde::Serialize;
use std::collections::HashMap;

use crate::providers::{sats_to_coin, BalanceApi};
use crate::status::{classify, Status, StatusLabel};

// ============================================================================
// TYPES
// ============================================================================

/// Which upstream produced a batch of balance records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    #[serde(rename = "Blockchain.info")]
    BlockchainInfo,

    #[serde(rename = "Mempool")]
    Mempool,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::BlockchainInfo => "Blockchain.info",
            Source::Mempool => "Mempool",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved balance for one address, in whole-coin units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRecord {
    pub final_balance: f64,
    pub status: Status,
}

impl BalanceRecord {
    /// Degraded record for an address whose lookup failed
    pub fn error() -> Self {
        BalanceRecord {
            final_balance: 0.0,
            status: StatusLabel::Error.into(),
        }
    }
}

/// Result of one resolution call: the source used for the whole batch plus
/// exactly one record per requested address
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub source: Source,
    pub balances: HashMap<String, BalanceRecord>,
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolve balances for every address in `addresses`.
///
/// One bulk request covers the whole batch. If it fails in any way
/// (transport, HTTP status, undecodable body, missing entry) the partial
/// result is discarded and every address is re-queried one at a time against
/// the fallback provider. A per-address fallback failure degrades that
/// address to an Error record and the rest of the batch continues.
///
/// Always returns a record for every input address; never fails.
pub fn resolve_balances(api: &dyn BalanceApi, addresses: &[String]) -> Resolution {
    if addresses.is_empty() {
        return Resolution {
            source: Source::BlockchainInfo,
            balances: HashMap::new(),
        };
    }

    match api.bulk_balances(addresses) {
        Ok(bulk) => {
            // All-or-nothing: an entry missing for any requested address
            // discards the whole bulk result
            let complete: Option<HashMap<String, BalanceRecord>> = addresses
                .iter()
                .map(|address| {
                    bulk.get(address).map(|data| {
                        let final_balance = sats_to_coin(data.final_balance);
                        let total_received = sats_to_coin(data.total_received);
                        let record = BalanceRecord {
                            final_balance,
                            status: classify(final_balance, total_received),
                        };
                        (address.clone(), record)
                    })
                })
                .collect();

            match complete {
                Some(balances) => Resolution {
                    source: Source::BlockchainInfo,
                    balances,
                },
                None => {
                    tracing::warn!(
                        "bulk response incomplete, falling back to per-address lookups"
                    );
                    resolve_from_fallback(api, addresses)
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "bulk provider failed, falling back to per-address lookups");
            resolve_from_fallback(api, addresses)
        }
    }
}

/// Sequential per-address lookups against the fallback provider
fn resolve_from_fallback(api: &dyn BalanceApi, addresses: &[String]) -> Resolution {
    let mut balances = HashMap::with_capacity(addresses.len());

    for address in addresses {
        let record = match api.address_stats(address) {
            Ok(stats) => {
                let total_received = sats_to_coin(stats.funded_txo_sum);
                let total_spent = sats_to_coin(stats.spent_txo_sum);
                let final_balance = total_received - total_spent;
                BalanceRecord {
                    final_balance,
                    status: classify(final_balance, total_received),
                }
            }
            Err(err) => {
                tracing::warn!(%address, error = %err, "fallback lookup failed, recording error status");
                BalanceRecord::error()
            }
        };
        balances.insert(address.clone(), record);
    }

    Resolution {
        source: Source::Mempool,
        balances,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{BulkBalance, ChainStats, MockBalanceApi, ProviderError};
    use std::collections::HashMap;

    fn addrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn bulk_entry(final_balance: u64, total_received: u64) -> BulkBalance {
        BulkBalance {
            final_balance,
            total_received,
        }
    }

    /// reqwest::Error cannot be constructed directly; MissingAddress stands
    /// in for any bulk failure since the resolver treats them all the same
    fn bulk_failure() -> ProviderError {
        ProviderError::MissingAddress("addr_x".to_string())
    }

    #[test]
    fn test_empty_input_makes_no_calls() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances().times(0);
        api.expect_address_stats().times(0);

        let resolution = resolve_balances(&api, &[]);
        assert!(resolution.balances.is_empty());
    }

    #[test]
    fn test_primary_success_reports_primary_source() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances().times(1).returning(|addresses| {
            let mut map = HashMap::new();
            for a in addresses {
                map.insert(a.clone(), bulk_entry(250_000_000, 500_000_000));
            }
            Ok(map)
        });
        api.expect_address_stats().times(0);

        let addresses = addrs(&["a1", "a2"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(resolution.source, Source::BlockchainInfo);
        assert_eq!(resolution.balances.len(), 2);

        // 250_000_000 sats -> 2.5 whole coins, half withdrawn
        let record = &resolution.balances["a1"];
        assert_eq!(record.final_balance, 2.5);
        assert_eq!(record.status.label, StatusLabel::PartialRedeemed);
    }

    #[test]
    fn test_primary_classification_per_address() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances().times(1).returning(|_| {
            let mut map = HashMap::new();
            map.insert("never_loaded".to_string(), bulk_entry(0, 0));
            map.insert("never_redeemed".to_string(), bulk_entry(100_000_000, 100_000_000));
            map.insert("fully_redeemed".to_string(), bulk_entry(0, 100_000_000));
            Ok(map)
        });

        let addresses = addrs(&["never_loaded", "never_redeemed", "fully_redeemed"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(
            resolution.balances["never_loaded"].status.label,
            StatusLabel::NeverLoaded
        );
        assert_eq!(
            resolution.balances["never_redeemed"].status.label,
            StatusLabel::NeverRedeemed
        );
        assert_eq!(
            resolution.balances["fully_redeemed"].status.label,
            StatusLabel::FullyRedeemed
        );
    }

    #[test]
    fn test_sparse_bulk_map_falls_back_for_whole_batch() {
        // a provider returning Ok but missing a requested address must be
        // treated like any other bulk failure, not indexed into
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances().times(1).returning(|_| {
            let mut map = HashMap::new();
            map.insert("a1".to_string(), bulk_entry(100_000_000, 100_000_000));
            Ok(map)
        });
        api.expect_address_stats().times(2).returning(|_| {
            Ok(ChainStats {
                funded_txo_sum: 100_000_000,
                spent_txo_sum: 0,
            })
        });

        let addresses = addrs(&["a1", "a2"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(resolution.source, Source::Mempool);
        assert_eq!(resolution.balances.len(), 2);
        for address in &addresses {
            assert_eq!(
                resolution.balances[address].status.label,
                StatusLabel::NeverRedeemed
            );
        }
    }

    #[test]
    fn test_bulk_failure_falls_back_once_per_address() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances()
            .times(1)
            .returning(|_| Err(bulk_failure()));
        api.expect_address_stats().times(3).returning(|_| {
            Ok(ChainStats {
                funded_txo_sum: 500_000_000,
                spent_txo_sum: 250_000_000,
            })
        });

        let addresses = addrs(&["a1", "a2", "a3"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(resolution.source, Source::Mempool);
        assert_eq!(resolution.balances.len(), 3);
        for address in &addresses {
            let record = &resolution.balances[address];
            assert_eq!(record.final_balance, 2.5);
            assert_eq!(record.status.label, StatusLabel::PartialRedeemed);
        }
    }

    #[test]
    fn test_fallback_failure_degrades_single_address() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances()
            .times(1)
            .returning(|_| Err(bulk_failure()));
        api.expect_address_stats()
            .times(3)
            .returning(|address| {
                if address == "a2" {
                    Err(ProviderError::MissingAddress(address.to_string()))
                } else {
                    Ok(ChainStats {
                        funded_txo_sum: 100_000_000,
                        spent_txo_sum: 0,
                    })
                }
            });

        let addresses = addrs(&["a1", "a2", "a3"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(resolution.source, Source::Mempool);
        assert_eq!(resolution.balances.len(), 3);

        let degraded = &resolution.balances["a2"];
        assert_eq!(degraded.final_balance, 0.0);
        assert_eq!(degraded.status.label, StatusLabel::Error);
        assert_eq!(degraded.status.color, "#FF0000");

        assert_eq!(
            resolution.balances["a1"].status.label,
            StatusLabel::NeverRedeemed
        );
        assert_eq!(
            resolution.balances["a3"].status.label,
            StatusLabel::NeverRedeemed
        );
    }

    #[test]
    fn test_key_set_matches_input_under_total_failure() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances()
            .times(1)
            .returning(|_| Err(bulk_failure()));
        api.expect_address_stats()
            .returning(|address| Err(ProviderError::MissingAddress(address.to_string())));

        let addresses = addrs(&["a1", "a2"]);
        let resolution = resolve_balances(&api, &addresses);

        assert_eq!(resolution.balances.len(), 2);
        for address in &addresses {
            assert_eq!(
                resolution.balances[address].status.label,
                StatusLabel::Error
            );
        }
    }

    #[test]
    fn test_fallback_subtracts_spent_from_funded() {
        let mut api = MockBalanceApi::new();
        api.expect_bulk_balances()
            .times(1)
            .returning(|_| Err(bulk_failure()));
        api.expect_address_stats().times(1).returning(|_| {
            Ok(ChainStats {
                funded_txo_sum: 100_000_000,
                spent_txo_sum: 100_000_000,
            })
        });

        let addresses = addrs(&["a1"]);
        let resolution = resolve_balances(&api, &addresses);

        let record = &resolution.balances["a1"];
        assert_eq!(record.final_balance, 0.0);
        assert_eq!(record.status.label, StatusLabel::FullyRedeemed);
    }

    #[test]
    fn test_source_serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&Source::BlockchainInfo).unwrap(),
            "\"Blockchain.info\""
        );
        assert_eq!(serde_json::to_string(&Source::Mempool).unwrap(), "\"Mempool\"");
    }
}
