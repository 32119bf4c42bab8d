// ♻️ Waste Type Records - Static reference data
// Categories, decomposition ranges, and the 5R tag set attached to each item

use crate::error::WasteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY
// ============================================================================

/// One of the eight fixed waste classifications.
///
/// Serialized as its lowercase id (`"plastic"`), which is also the key used
/// in the persisted `disposalLimits` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Organic,
    Plastic,
    Glass,
    Metal,
    Paper,
    Electronic,
    Hazardous,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Category::Organic,
        Category::Plastic,
        Category::Glass,
        Category::Metal,
        Category::Paper,
        Category::Electronic,
        Category::Hazardous,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Organic => "organic",
            Category::Plastic => "plastic",
            Category::Glass => "glass",
            Category::Metal => "metal",
            Category::Paper => "paper",
            Category::Electronic => "electronic",
            Category::Hazardous => "hazardous",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = WasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| WasteError::InvalidInput(format!("unknown category: {}", s)))
    }
}

/// Display metadata for a category, including its default daily limit
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDescriptor {
    pub id: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub default_limit: u32,
}

// ============================================================================
// DECOMPOSITION TIME
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }
}

/// Estimated natural breakdown range. Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompositionTime {
    pub min: u32,
    pub max: u32,
    pub unit: TimeUnit,
}

impl DecompositionTime {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Human-readable range: "2 to 5 weeks", or "3 years" when min == max
    pub fn display(&self) -> String {
        if self.min == self.max {
            format!("{} {}", self.min, self.unit.as_str())
        } else {
            format!("{} to {} {}", self.min, self.max, self.unit.as_str())
        }
    }

    /// Environmental impact bucket derived from the upper bound
    pub fn impact_level(&self) -> ImpactLevel {
        match self.unit {
            TimeUnit::Days | TimeUnit::Weeks => ImpactLevel::Low,
            TimeUnit::Months if self.max < 6 => ImpactLevel::Low,
            TimeUnit::Months => ImpactLevel::Medium,
            TimeUnit::Years if self.max < 10 => ImpactLevel::Medium,
            TimeUnit::Years if self.max < 100 => ImpactLevel::High,
            TimeUnit::Years => ImpactLevel::Severe,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Severe,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "Low",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::High => "High",
            ImpactLevel::Severe => "Severe",
        }
    }
}

// ============================================================================
// 5Rs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiveR {
    Refuse,
    Reduce,
    Reuse,
    Repurpose,
    Recycle,
}

impl FiveR {
    pub const ALL: [FiveR; 5] = [
        FiveR::Refuse,
        FiveR::Reduce,
        FiveR::Reuse,
        FiveR::Repurpose,
        FiveR::Recycle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FiveR::Refuse => "Refuse",
            FiveR::Reduce => "Reduce",
            FiveR::Reuse => "Reuse",
            FiveR::Repurpose => "Repurpose",
            FiveR::Recycle => "Recycle",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FiveR::Refuse => "Avoid creating waste by not accepting or purchasing items that generate waste",
            FiveR::Reduce => "Minimize waste by using less of the product or finding alternatives",
            FiveR::Reuse => "Use items again for the same or different purposes",
            FiveR::Repurpose => "Transform an item to serve a different function",
            FiveR::Recycle => "Process items into new products or materials",
        }
    }
}

/// A 5R strategy with whether it applies to a given waste type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiveRApplicability {
    pub strategy: FiveR,
    pub applicable: bool,
}

// ============================================================================
// WASTE TYPE
// ============================================================================

/// Catalog-defined waste item. Never mutated after the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteType {
    /// Stable key referenced by disposal entries
    pub id: String,
    pub name: String,
    pub category: Category,
    pub decomposition_time: DecompositionTime,
    pub description: String,
    pub applicable_rs: Vec<FiveR>,
    pub reuse_suggestions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycling_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazardous_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl WasteType {
    pub fn is_applicable(&self, strategy: FiveR) -> bool {
        self.applicable_rs.contains(&strategy)
    }

    /// All five strategies in canonical order, flagged by applicability
    pub fn five_rs(&self) -> Vec<FiveRApplicability> {
        FiveR::ALL
            .iter()
            .map(|&strategy| FiveRApplicability {
                strategy,
                applicable: self.is_applicable(strategy),
            })
            .collect()
    }

    pub fn impact_level(&self) -> ImpactLevel {
        self.decomposition_time.impact_level()
    }

    /// Case-insensitive substring match against name, description and category
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
            || self.category.as_str().contains(query_lower)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: u32, max: u32, unit: TimeUnit) -> DecompositionTime {
        DecompositionTime { min, max, unit }
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("Plastic".parse::<Category>().unwrap(), Category::Plastic);
        assert_eq!(" glass ".parse::<Category>().unwrap(), Category::Glass);
        assert!(matches!(
            "styrofoam".parse::<Category>(),
            Err(WasteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Electronic).unwrap();
        assert_eq!(json, "\"electronic\"");
    }

    #[test]
    fn test_decomposition_display() {
        assert_eq!(range(2, 5, TimeUnit::Weeks).display(), "2 to 5 weeks");
        assert_eq!(range(3, 3, TimeUnit::Years).display(), "3 years");
    }

    #[test]
    fn test_impact_levels() {
        assert_eq!(range(2, 5, TimeUnit::Weeks).impact_level(), ImpactLevel::Low);
        assert_eq!(range(1, 5, TimeUnit::Months).impact_level(), ImpactLevel::Low);
        assert_eq!(range(1, 6, TimeUnit::Months).impact_level(), ImpactLevel::Medium);
        assert_eq!(range(1, 2, TimeUnit::Years).impact_level(), ImpactLevel::Medium);
        assert_eq!(range(80, 99, TimeUnit::Years).impact_level(), ImpactLevel::High);
        assert_eq!(range(450, 1000, TimeUnit::Years).impact_level(), ImpactLevel::Severe);
    }

    #[test]
    fn test_decomposition_validity() {
        assert!(range(1, 1, TimeUnit::Days).is_valid());
        assert!(!range(5, 1, TimeUnit::Days).is_valid());
    }
}
