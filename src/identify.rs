// 🔍 Identification Stub - Keyword and file-size heuristics
//
// Not a classifier. The name hint is matched against keyword rules (first
// matching rule wins); failing that the size hint picks a band of categories;
// failing that anything in the catalog will do. The final pick inside the
// chosen pool is uniform random.

use crate::catalog::{Catalog, Category, WasteType};
use crate::error::{WasteError, WasteResult};
use anyhow::Context as AnyhowContext;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// INPUT DESCRIPTOR
// ============================================================================

/// What the caller knows about the thing to identify
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDescriptor {
    /// File name or free text
    pub name_hint: Option<String>,
    /// Payload size in bytes
    pub size_hint: Option<u64>,
}

impl InputDescriptor {
    pub fn new(name_hint: Option<&str>, size_hint: Option<u64>) -> Self {
        InputDescriptor {
            name_hint: name_hint.map(str::to_string),
            size_hint,
        }
    }

    /// Describe an image on disk by its file name and size
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read image metadata: {:?}", path))?;

        Ok(InputDescriptor {
            name_hint: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            size_hint: Some(metadata.len()),
        })
    }

    /// True when neither hint carries anything
    pub fn is_empty(&self) -> bool {
        let no_name = self
            .name_hint
            .as_deref()
            .map(|n| n.trim().is_empty())
            .unwrap_or(true);
        no_name && self.size_hint.is_none()
    }
}

// ============================================================================
// KEYWORD RULES
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// Whole-word match against an already-lowercased hint. A trailing
    /// plural "s" or "es" on the word is accepted.
    pub fn matches(&self, text_lower: &str) -> bool {
        hint_words(text_lower).any(|word| self.keywords.iter().any(|k| word_matches(word, k)))
    }
}

/// Alphanumeric runs of a hint: "used-battery_2.png" -> used, battery, 2, png
pub fn hint_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

fn word_matches(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest == "s" || rest == "es",
        None => false,
    }
}

/// Evaluated in order; more specific categories come first so that
/// "glass-bottle" lands on glass rather than plastic's "bottle".
pub const KEYWORD_RULES: [KeywordRule; 8] = [
    KeywordRule {
        category: Category::Hazardous,
        keywords: &["battery", "batteries", "chemical", "paint", "toxic"],
    },
    KeywordRule {
        category: Category::Electronic,
        keywords: &["phone", "smartphone", "electronic", "laptop", "computer", "charger", "cable"],
    },
    KeywordRule {
        category: Category::Glass,
        keywords: &["glass", "jar", "wine", "beer"],
    },
    KeywordRule {
        category: Category::Metal,
        keywords: &["metal", "can", "tin", "aluminum", "foil"],
    },
    KeywordRule {
        category: Category::Paper,
        keywords: &["paper", "newspaper", "cardboard", "magazine", "box"],
    },
    KeywordRule {
        category: Category::Plastic,
        keywords: &["plastic", "bottle", "container", "packaging"],
    },
    KeywordRule {
        category: Category::Organic,
        keywords: &["food", "fruit", "peel", "vegetable", "compost", "leftover"],
    },
    KeywordRule {
        category: Category::Other,
        keywords: &["fabric", "cloth", "textile", "shirt"],
    },
];

// ============================================================================
// SIZE BANDS
// ============================================================================

pub const SMALL_BAND_LIMIT: u64 = 200_000;
pub const MEDIUM_BAND_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBand {
    /// < 200,000 bytes
    Small,
    /// < 1,000,000 bytes
    Medium,
    /// Everything else
    Large,
}

impl SizeBand {
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes < SMALL_BAND_LIMIT {
            SizeBand::Small
        } else if bytes < MEDIUM_BAND_LIMIT {
            SizeBand::Medium
        } else {
            SizeBand::Large
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        match self {
            SizeBand::Small => &[Category::Organic],
            SizeBand::Medium => &[Category::Plastic, Category::Paper, Category::Glass, Category::Metal],
            SizeBand::Large => &[Category::Electronic, Category::Hazardous, Category::Other],
        }
    }
}

/// Which heuristic decided the candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyBasis {
    Keyword(Category),
    Size(SizeBand),
    Anything,
}

impl IdentifyBasis {
    /// Pure part of identification: no randomness, no catalog
    pub fn for_descriptor(descriptor: &InputDescriptor) -> Self {
        if let Some(name) = descriptor.name_hint.as_deref() {
            let lower = name.to_lowercase();
            if let Some(rule) = KEYWORD_RULES.iter().find(|r| r.matches(&lower)) {
                return IdentifyBasis::Keyword(rule.category);
            }
        }

        match descriptor.size_hint {
            Some(bytes) => IdentifyBasis::Size(SizeBand::from_bytes(bytes)),
            None => IdentifyBasis::Anything,
        }
    }

    pub fn categories(&self) -> &[Category] {
        match self {
            IdentifyBasis::Keyword(category) => std::slice::from_ref(category),
            IdentifyBasis::Size(band) => band.categories(),
            IdentifyBasis::Anything => &Category::ALL,
        }
    }
}

// ============================================================================
// STUB
// ============================================================================

pub struct IdentificationStub {
    catalog: Arc<Catalog>,
    rng: StdRng,
    max_bytes: Option<u64>,
}

impl IdentificationStub {
    /// Seeded from OS entropy
    pub fn new(catalog: Arc<Catalog>) -> Self {
        IdentificationStub {
            catalog,
            rng: StdRng::from_entropy(),
            max_bytes: None,
        }
    }

    /// Deterministic picks for a given seed
    pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
        IdentificationStub {
            catalog,
            rng: StdRng::seed_from_u64(seed),
            max_bytes: None,
        }
    }

    /// Reject inputs whose size hint exceeds `max_bytes`
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Independent stub over the same catalog, seeded from this one's RNG.
    /// Forks of a seeded stub are deterministic too.
    pub fn fork(&mut self) -> IdentificationStub {
        IdentificationStub {
            catalog: self.catalog.clone(),
            rng: StdRng::seed_from_u64(self.rng.gen()),
            max_bytes: self.max_bytes,
        }
    }

    /// Map a descriptor to one catalog entry.
    ///
    /// Fails with `InvalidInput` when no (or an empty) descriptor is given or
    /// the size hint exceeds the configured ceiling, and with `NotFound` only
    /// when the catalog has no waste types at all.
    pub fn identify(&mut self, descriptor: Option<&InputDescriptor>) -> WasteResult<WasteType> {
        let descriptor = descriptor
            .filter(|d| !d.is_empty())
            .ok_or_else(|| WasteError::InvalidInput("no input descriptor supplied".to_string()))?;

        if let (Some(max), Some(size)) = (self.max_bytes, descriptor.size_hint) {
            if size > max {
                return Err(WasteError::InvalidInput(format!(
                    "input of {} bytes exceeds the {} byte limit",
                    size, max
                )));
            }
        }

        let basis = IdentifyBasis::for_descriptor(descriptor);
        let mut pool: Vec<&WasteType> = self
            .catalog
            .waste_types()
            .iter()
            .filter(|w| basis.categories().contains(&w.category))
            .collect();

        if pool.is_empty() {
            pool = self.catalog.waste_types().iter().collect();
        }

        let picked = pool
            .choose(&mut self.rng)
            .map(|w| (*w).clone())
            .ok_or_else(|| WasteError::NotFound("catalog has no waste types".to_string()))?;

        debug!(?basis, waste_id = %picked.id, "identified");
        Ok(picked)
    }

    /// `identify` after an artificial delay standing in for a network round-trip
    #[cfg(feature = "async")]
    pub async fn identify_after(
        &mut self,
        descriptor: Option<InputDescriptor>,
        delay: std::time::Duration,
    ) -> WasteResult<WasteType> {
        tokio::time::sleep(delay).await;
        self.identify(descriptor.as_ref())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(seed: u64) -> IdentificationStub {
        IdentificationStub::with_seed(Arc::new(Catalog::builtin()), seed)
    }

    #[test]
    fn test_keyword_match_wins() {
        let descriptor = InputDescriptor::new(Some("My-PLASTIC-Thing.png"), Some(5_000_000));
        assert_eq!(
            IdentifyBasis::for_descriptor(&descriptor),
            IdentifyBasis::Keyword(Category::Plastic)
        );

        let waste = stub(7).identify(Some(&descriptor)).unwrap();
        assert_eq!(waste.id, "plastic-bottle");
    }

    #[test]
    fn test_rule_order_prefers_glass_over_bottle() {
        let descriptor = InputDescriptor::new(Some("glass-bottle.jpg"), None);
        assert_eq!(
            IdentifyBasis::for_descriptor(&descriptor),
            IdentifyBasis::Keyword(Category::Glass)
        );
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let cases = [
            ("scan_0001.jpg", IdentifyBasis::Anything),
            ("pecan-pie.jpg", IdentifyBasis::Anything),
            ("painting.png", IdentifyBasis::Anything),
            ("boxing.jpg", IdentifyBasis::Anything),
            ("empty-cans.jpg", IdentifyBasis::Keyword(Category::Metal)),
            ("pizza_boxes.png", IdentifyBasis::Keyword(Category::Paper)),
            ("Old_Smartphone.HEIC", IdentifyBasis::Keyword(Category::Electronic)),
            ("battery-box.jpg", IdentifyBasis::Keyword(Category::Hazardous)),
        ];

        for (name, expected) in cases {
            let descriptor = InputDescriptor::new(Some(name), None);
            assert_eq!(IdentifyBasis::for_descriptor(&descriptor), expected, "name: {}", name);
        }
    }

    #[test]
    fn test_scan_with_small_size_is_organic_not_metal() {
        let descriptor = InputDescriptor::new(Some("scan_0001.jpg"), Some(50_000));
        let waste = stub(1).identify(Some(&descriptor)).unwrap();
        assert_eq!(waste.category, Category::Organic);
    }

    #[test]
    fn test_hint_words() {
        let words: Vec<&str> = hint_words("used-battery_2.png").collect();
        assert_eq!(words, vec!["used", "battery", "2", "png"]);
    }

    #[test]
    fn test_banana_falls_through_to_small_band() {
        let descriptor = InputDescriptor::new(Some("banana.jpg"), Some(50_000));
        assert_eq!(
            IdentifyBasis::for_descriptor(&descriptor),
            IdentifyBasis::Size(SizeBand::Small)
        );

        for seed in 0..20 {
            let waste = stub(seed).identify(Some(&descriptor)).unwrap();
            assert_eq!(waste.category, Category::Organic);
        }
    }

    #[test]
    fn test_size_bands() {
        assert_eq!(SizeBand::from_bytes(0), SizeBand::Small);
        assert_eq!(SizeBand::from_bytes(199_999), SizeBand::Small);
        assert_eq!(SizeBand::from_bytes(200_000), SizeBand::Medium);
        assert_eq!(SizeBand::from_bytes(999_999), SizeBand::Medium);
        assert_eq!(SizeBand::from_bytes(1_000_000), SizeBand::Large);
    }

    #[test]
    fn test_medium_and_large_pools() {
        let medium = InputDescriptor::new(Some("IMG_0001.jpg"), Some(500_000));
        let large = InputDescriptor::new(Some("IMG_0002.jpg"), Some(3_000_000));

        for seed in 0..20 {
            let waste = stub(seed).identify(Some(&medium)).unwrap();
            assert!(SizeBand::Medium.categories().contains(&waste.category));

            let waste = stub(seed).identify(Some(&large)).unwrap();
            assert!(SizeBand::Large.categories().contains(&waste.category));
        }
    }

    #[test]
    fn test_name_only_without_keyword_picks_anything() {
        let descriptor = InputDescriptor::new(Some("IMG_0003.jpg"), None);
        assert_eq!(IdentifyBasis::for_descriptor(&descriptor), IdentifyBasis::Anything);
        assert!(stub(1).identify(Some(&descriptor)).is_ok());
    }

    #[test]
    fn test_missing_descriptor_is_invalid() {
        let mut stub = stub(1);
        assert!(matches!(stub.identify(None), Err(WasteError::InvalidInput(_))));

        let empty = InputDescriptor::new(Some("  "), None);
        assert!(matches!(stub.identify(Some(&empty)), Err(WasteError::InvalidInput(_))));
    }

    #[test]
    fn test_oversized_input_rejected() {
        let mut stub = stub(1).with_max_bytes(5 * 1024 * 1024);
        let huge = InputDescriptor::new(Some("photo.jpg"), Some(6 * 1024 * 1024));
        assert!(matches!(stub.identify(Some(&huge)), Err(WasteError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_pool_falls_back_to_whole_catalog() {
        // Catalog without any organic items
        let waste_types: Vec<WasteType> = Catalog::builtin()
            .waste_types()
            .iter()
            .filter(|w| w.category != Category::Organic)
            .cloned()
            .collect();
        let catalog = Arc::new(Catalog::from_records(waste_types, Vec::new()));

        let descriptor = InputDescriptor::new(Some("banana.jpg"), Some(10));
        let waste = IdentificationStub::with_seed(catalog, 3)
            .identify(Some(&descriptor))
            .unwrap();
        assert_ne!(waste.category, Category::Organic);
    }

    #[test]
    fn test_empty_catalog_is_not_found() {
        let catalog = Arc::new(Catalog::from_records(Vec::new(), Vec::new()));
        let descriptor = InputDescriptor::new(Some("anything"), None);
        let result = IdentificationStub::with_seed(catalog, 3).identify(Some(&descriptor));
        assert!(matches!(result, Err(WasteError::NotFound(_))));
    }

    #[test]
    fn test_same_seed_same_picks() {
        let descriptor = InputDescriptor::new(None, Some(2_000_000));
        let mut a = stub(99);
        let mut b = stub(99);
        for _ in 0..10 {
            assert_eq!(
                a.identify(Some(&descriptor)).unwrap().id,
                b.identify(Some(&descriptor)).unwrap().id
            );
        }
    }

    #[test]
    fn test_forks_are_deterministic_and_keep_ceiling() {
        let descriptor = InputDescriptor::new(None, Some(500_000));
        let mut a = stub(42).with_max_bytes(1_000);
        let mut b = stub(42).with_max_bytes(1_000);

        let mut fork_a = a.fork();
        let mut fork_b = b.fork();
        assert!(matches!(fork_a.identify(Some(&descriptor)), Err(WasteError::InvalidInput(_))));

        let small = InputDescriptor::new(None, Some(10));
        for _ in 0..10 {
            assert_eq!(
                fork_a.identify(Some(&small)).unwrap().id,
                fork_b.identify(Some(&small)).unwrap().id
            );
        }
    }

    #[test]
    fn test_descriptor_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old-phone.jpg");
        fs::write(&path, vec![0u8; 1234]).unwrap();

        let descriptor = InputDescriptor::from_path(&path).unwrap();
        assert_eq!(descriptor.name_hint.as_deref(), Some("old-phone.jpg"));
        assert_eq!(descriptor.size_hint, Some(1234));
        assert!(InputDescriptor::from_path(dir.path().join("missing.jpg")).is_err());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_identify_after_delay() {
        let mut stub = stub(5);
        let descriptor = InputDescriptor::new(Some("aluminum-can.png"), None);
        let waste = stub
            .identify_after(Some(descriptor), std::time::Duration::from_millis(5))
            .await
            .unwrap();
        assert_eq!(waste.category, Category::Metal);
    }
}
