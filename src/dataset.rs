//! Food dataset the spawner draws bubbles from
//!
//! Loaded once before the first spawn and read-only afterwards. Records with
//! a status other than halal/haram are dropped during load.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::sim::Category;

/// Raw record as it appears in the dataset file
#[derive(Debug, Clone, Default, Deserialize)]
struct RawFoodRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default, alias = "note")]
    notes: String,
}

/// A validated food item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub category: Category,
    /// Educational note shown after a correct sort (may be empty)
    pub note: String,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, category: Category, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            note: note.into(),
        }
    }
}

/// Immutable list of food items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDataset {
    items: Vec<FoodItem>,
}

impl FoodDataset {
    pub fn new(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{ name, status, notes }` records
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let raw: Vec<RawFoodRecord> =
            serde_json::from_str(json).context("dataset is not a JSON array of records")?;
        let total = raw.len();

        let items: Vec<FoodItem> = raw
            .into_iter()
            .filter_map(|r| match Category::parse(&r.status) {
                Some(category) => Some(FoodItem {
                    name: r.name,
                    category,
                    note: r.notes,
                }),
                None => {
                    log::debug!("Skipping '{}' with status '{}'", r.name, r.status);
                    None
                }
            })
            .collect();

        log::info!("Dataset: {} of {} records usable", items.len(), total);
        Ok(Self { items })
    }

    /// Load the dataset from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("parsing dataset {}", path.display()))
    }

    /// Load the dataset, degrading to an empty one on any failure
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                log::warn!("Failed loading foods dataset: {e:#}");
                Self::empty()
            }
        }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
