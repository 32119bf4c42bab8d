// 🏪 Vendor Records - Who accepts which waste categories

use super::waste::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price range a vendor quotes for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    /// Free-form unit such as "$/kg" or "$/item"
    pub unit: String,
}

impl PriceRange {
    pub fn display(&self) -> String {
        format!("{:.2} - {:.2} {}", self.min, self.max, self.unit)
    }
}

/// Catalog-defined vendor. Same lifecycle as `WasteType`: built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub accepted_categories: Vec<Category>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pricing: BTreeMap<Category, PriceRange>,

    pub location: String,
    pub contact: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl VendorType {
    pub fn accepts(&self, category: Category) -> bool {
        self.accepted_categories.contains(&category)
    }

    pub fn price_for(&self, category: Category) -> Option<&PriceRange> {
        self.pricing.get(&category)
    }
}
