// 📖 Reference Catalog - Read-only lookup tables
//
// Waste types and vendors are baked into the program. Every operation here is
// pure: lookups return `Option`, searches return possibly-empty vectors, and
// nothing is ever mutated after construction.

pub mod data;
pub mod vendor;
pub mod waste;

pub use vendor::{PriceRange, VendorType};
pub use waste::{
    Category, CategoryDescriptor, DecompositionTime, FiveR, FiveRApplicability, ImpactLevel,
    TimeUnit, WasteType,
};

use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ============================================================================
// VALIDATION ISSUES
// ============================================================================

/// Shape problem found by `Catalog::validate`
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    /// Record id the issue belongs to
    pub record: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.record, self.field, self.message)
    }
}

impl std::error::Error for CatalogIssue {}

fn issue(record: &str, field: &str, message: impl Into<String>) -> CatalogIssue {
    CatalogIssue {
        record: record.to_string(),
        field: field.to_string(),
        message: message.into(),
    }
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    waste_types: Vec<WasteType>,
    vendors: Vec<VendorType>,
}

impl Catalog {
    /// The catalog shipped with the program
    pub fn builtin() -> Self {
        Catalog {
            waste_types: data::builtin_waste_types(),
            vendors: data::builtin_vendors(),
        }
    }

    /// Build a catalog from explicit records (tests, alternative data sets)
    pub fn from_records(waste_types: Vec<WasteType>, vendors: Vec<VendorType>) -> Self {
        Catalog { waste_types, vendors }
    }

    pub fn waste_types(&self) -> &[WasteType] {
        &self.waste_types
    }

    pub fn vendors(&self) -> &[VendorType] {
        &self.vendors
    }

    pub fn is_empty(&self) -> bool {
        self.waste_types.is_empty()
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<&WasteType> {
        self.waste_types.iter().find(|w| w.id == id)
    }

    pub fn vendor_by_id(&self, id: &str) -> Option<&VendorType> {
        self.vendors.iter().find(|v| v.id == id)
    }

    /// Case-insensitive substring search over name, description and category.
    /// Results keep catalog order. A blank query yields nothing.
    pub fn search(&self, query: &str) -> Vec<&WasteType> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.waste_types
            .iter()
            .filter(|w| w.matches(&query))
            .collect()
    }

    /// Fixed, ordered category descriptors
    pub fn categories(&self) -> &'static [CategoryDescriptor] {
        &data::CATEGORY_DESCRIPTORS
    }

    pub fn category(&self, category: Category) -> &'static CategoryDescriptor {
        // CATEGORY_DESCRIPTORS is indexed in `Category::ALL` order
        let index = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        &data::CATEGORY_DESCRIPTORS[index]
    }

    pub fn default_limit(&self, category: Category) -> u32 {
        self.category(category).default_limit
    }

    /// Default daily limit for every category
    pub fn default_limits(&self) -> BTreeMap<Category, u32> {
        data::CATEGORY_DESCRIPTORS
            .iter()
            .map(|d| (d.id, d.default_limit))
            .collect()
    }

    pub fn waste_types_in(&self, category: Category) -> Vec<&WasteType> {
        self.waste_types
            .iter()
            .filter(|w| w.category == category)
            .collect()
    }

    pub fn vendors_accepting(&self, category: Category) -> Vec<&VendorType> {
        self.vendors.iter().filter(|v| v.accepts(category)).collect()
    }

    pub fn vendor_pricing(&self, vendor_id: &str, category: Category) -> Option<&PriceRange> {
        self.vendor_by_id(vendor_id)?.price_for(category)
    }

    /// Check shape invariants. Returns every issue found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<CatalogIssue>> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for waste in &self.waste_types {
            if !seen.insert(waste.id.as_str()) {
                issues.push(issue(&waste.id, "id", "duplicate waste id"));
            }
            if waste.name.trim().is_empty() {
                issues.push(issue(&waste.id, "name", "name is empty"));
            }
            if !waste.decomposition_time.is_valid() {
                issues.push(issue(
                    &waste.id,
                    "decompositionTime",
                    format!(
                        "min {} exceeds max {}",
                        waste.decomposition_time.min, waste.decomposition_time.max
                    ),
                ));
            }
        }

        let mut seen = HashSet::new();
        for vendor in &self.vendors {
            if !seen.insert(vendor.id.as_str()) {
                issues.push(issue(&vendor.id, "id", "duplicate vendor id"));
            }
            if vendor.name.trim().is_empty() {
                issues.push(issue(&vendor.id, "name", "name is empty"));
            }
            for (category, range) in &vendor.pricing {
                if !vendor.accepts(*category) {
                    issues.push(issue(
                        &vendor.id,
                        "pricing",
                        format!("priced category {} is not accepted", category),
                    ));
                }
                if range.min > range.max {
                    issues.push(issue(
                        &vendor.id,
                        "pricing",
                        format!("{}: min {} exceeds max {}", category, range.min, range.max),
                    ));
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// TESTS
// ============================================================================
