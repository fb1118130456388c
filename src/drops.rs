// Drop Definitions - Drops as Data
// One configurable registry instead of one bespoke route per product line

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// DROP DEFINITION
// ============================================================================

/// One address list within a drop (e.g. the "Gilded Silver" coins)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDef {
    /// Display label for this list
    pub label: String,

    /// Address file name, relative to the data directory
    pub file: String,

    /// Maximum entries read from the file
    pub max_coins: usize,
}

/// A named product line of physical coins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropDef {
    /// URL slug, e.g. "vigilante-2021"
    pub slug: String,

    /// Display title
    pub title: String,

    /// Address lists in display order
    pub sections: Vec<SectionDef>,
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct DropRegistry {
    drops: Vec<DropDef>,
}

impl DropRegistry {
    /// Load drop definitions from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read drops file: {:?}", path.as_ref()))?;

        let drops: Vec<DropDef> =
            serde_json::from_str(&content).context("Failed to parse drops JSON")?;

        Ok(DropRegistry { drops })
    }

    pub fn from_defs(drops: Vec<DropDef>) -> Self {
        DropRegistry { drops }
    }

    /// The shipped product lines
    pub fn defaults() -> Self {
        let section = |label: &str, file: &str, max_coins: usize| SectionDef {
            label: label.to_string(),
            file: file.to_string(),
            max_coins,
        };
        let def = |slug: &str, title: &str, sections: Vec<SectionDef>| DropDef {
            slug: slug.to_string(),
            title: title.to_string(),
            sections,
        };

        DropRegistry::from_defs(vec![
            def(
                "vigilante-2021",
                "Vigilante 2021 Set 1",
                vec![
                    section("Gilded Silver", "2021_set_1_gilded_silver_addresses.txt", 25),
                    section("Silver", "2021_set_1_silver_addresses.txt", 75),
                ],
            ),
            def(
                "lcs-v1",
                "LCS V1",
                vec![
                    section("Silver", "lcs_v1_silver_addresses.txt", 100),
                    section("Zinc", "lcs_v1_zinc_addresses.txt", 200),
                ],
            ),
            def(
                "lcs-v2",
                "LCS V2",
                vec![
                    section("Gilded Silver", "lcs_v2_gilded_silver_addresses.txt", 100),
                    section("Zinc", "lcs_v2_zinc_addresses.txt", 200),
                    section("5 Oz Gilded Silver", "lcs_v2_5_Oz_gilded_silver_addresses.txt", 200),
                    section("Error Silver", "lcs_v2_error_silver_addresses.txt", 200),
                ],
            ),
            def(
                "vibgyor-orange",
                "VIBGYOR Orange",
                vec![
                    section("Gilded", "vigyor_orange_gilded_addresses.txt", 100),
                    section("Silver", "vigyor_orange_silver_addresses.txt", 100),
                ],
            ),
            def(
                "vibgyor-orange-compromised",
                "VIBGYOR Orange (Compromised)",
                vec![
                    section("Gilded", "compromised_vigyor_orange_gilded_addresses.txt", 100),
                    section("Silver", "compromised_vigyor_orange_silver_addresses.txt", 100),
                ],
            ),
        ])
    }

    /// Look up a drop by its slug
    pub fn get(&self, slug: &str) -> Option<&DropDef> {
        self.drops.iter().find(|d| d.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropDef> {
        self.drops.iter()
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
