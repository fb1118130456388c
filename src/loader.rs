// Address List Loader
// Reads "serial_number,address" lines from a drop's data file

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One coin in a drop: its stamped serial number and its on-chain address.
/// File order is display order and is preserved end-to-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    pub serial_number: String,
    pub address: String,
}

/// Load up to `max_coins` entries from a line-delimited address file.
///
/// Each line is `serial_number,address` with no header row. Lines that do
/// not have exactly two fields are skipped with a warning.
pub fn load_addresses<P: AsRef<Path>>(path: P, max_coins: usize) -> Result<Vec<AddressEntry>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open address file: {:?}", path))?;

    if max_coins == 0 {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    for (line_number, result) in rdr.records().enumerate() {
        if entries.len() >= max_coins {
            break;
        }

        let record = result
            .with_context(|| format!("Failed to read line {} of {:?}", line_number + 1, path))?;

        if record.len() != 2 {
            tracing::warn!(
                file = ?path,
                line = line_number + 1,
                fields = record.len(),
                "skipping malformed address line"
            );
            continue;
        }

        entries.push(AddressEntry {
            serial_number: record[0].to_string(),
            address: record[1].to_string(),
        });
    }

    Ok(entries)
}

/// Addresses only, in file order (what the resolver consumes)
pub fn addresses_of(entries: &[AddressEntry]) -> Vec<String> {
    entries.iter().map(|e| e.address.clone()).collect()
}

// ============================================================================
// TESTS
// ============================================================================
