// Catalog access: read-only medicine and generic records.
//
// Storage of the catalogs belongs to whatever service owns them. Here they
// arrive as two JSON array files (an export of the medicine and generic
// collections) and are held in memory for the length of one command.

pub mod models;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use models::{BrandedProduct, GenericCandidate};

/// In-memory snapshot of both catalogs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub medicines: Vec<BrandedProduct>,
    pub generics: Vec<GenericCandidate>,
}

impl Catalog {
    pub fn new(medicines: Vec<BrandedProduct>, generics: Vec<GenericCandidate>) -> Self {
        Self {
            medicines,
            generics,
        }
    }

    /// Load both catalogs from JSON array files.
    pub fn load(medicines_path: &Path, generics_path: &Path) -> Result<Self> {
        let medicines: Vec<BrandedProduct> = read_records(medicines_path)?;
        let generics: Vec<GenericCandidate> = read_records(generics_path)?;

        info!(
            medicines = medicines.len(),
            generics = generics.len(),
            "Loaded catalog"
        );

        Ok(Self::new(medicines, generics))
    }

    /// First medicine whose name contains `query`, ignoring case.
    pub fn search_by_name(&self, query: &str) -> Option<&BrandedProduct> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.medicines
            .iter()
            .find(|m| m.name.to_lowercase().contains(&query))
    }

    /// Generic candidates that carry a usable name.
    pub fn named_generic_count(&self) -> usize {
        self.generics.iter().filter(|g| g.label().is_some()).count()
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> BrandedProduct {
        BrandedProduct {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = Catalog::new(vec![product("Dolo 650 Tablet"), product("Crocin Advance")], vec![]);
        let found = catalog.search_by_name("CROCIN").map(|m| m.name.as_str());
        assert_eq!(found, Some("Crocin Advance"));
    }

    #[test]
    fn test_search_first_match_wins() {
        let catalog = Catalog::new(vec![product("Dolo 650"), product("Dolo 500")], vec![]);
        let found = catalog.search_by_name("dolo").map(|m| m.name.as_str());
        assert_eq!(found, Some("Dolo 650"));
    }

    #[test]
    fn test_empty_query_finds_nothing() {
        let catalog = Catalog::new(vec![product("Dolo 650")], vec![]);
        assert!(catalog.search_by_name("  ").is_none());
    }
}
