// Drop Presenter
// Loads the address lists of one drop, resolves balances, builds the view model

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::drops::DropDef;
use crate::loader::{addresses_of, load_addresses};
use crate::providers::BalanceApi;
use crate::resolver::{resolve_balances, BalanceRecord, Source};
use crate::status::Status;

// ============================================================================
// VIEW MODEL
// ============================================================================

/// One coin row as rendered: serial number, address, resolved balance,
/// status token, and a public explorer link
#[derive(Debug, Clone, Serialize)]
pub struct CoinView {
    pub serial_number: String,
    pub address: String,
    pub final_balance: f64,
    pub status: Status,
    pub explorer_url: String,
}

/// One address list of a drop, with the source that served its batch
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub label: String,
    pub source: Source,
    pub coins: Vec<CoinView>,
}

/// Everything the rendering layer needs for one drop page
#[derive(Debug, Clone, Serialize)]
pub struct DropView {
    pub slug: String,
    pub title: String,
    pub sections: Vec<SectionView>,
}

// ============================================================================
// PRESENTER
// ============================================================================

/// Build the view model for one drop.
///
/// Each section gets one loader pass and one resolver call, so sections
/// report their sources independently. Coin order follows file order.
/// The only error path is reading an address file; balance lookups never
/// fail past the resolver.
pub fn present_drop(
    def: &DropDef,
    data_dir: &Path,
    explorer_base: &str,
    api: &dyn BalanceApi,
) -> Result<DropView> {
    let mut sections = Vec::with_capacity(def.sections.len());

    for section in &def.sections {
        let entries = load_addresses(data_dir.join(&section.file), section.max_coins)?;
        let addresses = addresses_of(&entries);

        let resolution = resolve_balances(api, &addresses);

        let coins = entries
            .into_iter()
            .map(|entry| {
                // Resolver guarantees a record per requested address; an
                // address stamped on several coins shares one record
                let record = resolution
                    .balances
                    .get(&entry.address)
                    .cloned()
                    .unwrap_or_else(BalanceRecord::error);
                CoinView {
                    explorer_url: format!("{}{}", explorer_base, entry.address),
                    serial_number: entry.serial_number,
                    address: entry.address,
                    final_balance: record.final_balance,
                    status: record.status,
                }
            })
            .collect();

        sections.push(SectionView {
            label: section.label.clone(),
            source: resolution.source,
            coins,
        });
    }

    Ok(DropView {
        slug: def.slug.clone(),
        title: def.title.clone(),
        sections,
    })
}

// ============================================================================
// TESTS
// ============================================================================
