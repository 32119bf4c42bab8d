// 📚 Built-in catalog data
// Shipped with the program; never loaded from an external source.

use super::vendor::{PriceRange, VendorType};
use super::waste::{Category, CategoryDescriptor, DecompositionTime, FiveR, TimeUnit, WasteType};
use std::collections::BTreeMap;

// ============================================================================
// CATEGORIES
// ============================================================================

pub(crate) const CATEGORY_DESCRIPTORS: [CategoryDescriptor; 8] = [
    CategoryDescriptor {
        id: Category::Organic,
        name: "Organic",
        description: "Food waste, plant material, and biodegradable items",
        default_limit: 5,
    },
    CategoryDescriptor {
        id: Category::Plastic,
        name: "Plastic",
        description: "Various plastic items that may take hundreds of years to decompose",
        default_limit: 3,
    },
    CategoryDescriptor {
        id: Category::Glass,
        name: "Glass",
        description: "Glass containers and items that are highly recyclable",
        default_limit: 2,
    },
    CategoryDescriptor {
        id: Category::Metal,
        name: "Metal",
        description: "Metal items that can often be recycled indefinitely",
        default_limit: 2,
    },
    CategoryDescriptor {
        id: Category::Paper,
        name: "Paper",
        description: "Paper products that are generally easy to recycle",
        default_limit: 5,
    },
    CategoryDescriptor {
        id: Category::Electronic,
        name: "Electronic",
        description: "E-waste containing both valuable and hazardous materials",
        default_limit: 1,
    },
    CategoryDescriptor {
        id: Category::Hazardous,
        name: "Hazardous",
        description: "Items containing toxic chemicals requiring special disposal",
        default_limit: 1,
    },
    CategoryDescriptor {
        id: Category::Other,
        name: "Other",
        description: "Miscellaneous waste items that don't fit other categories",
        default_limit: 3,
    },
];

// ============================================================================
// WASTE TYPES
// ============================================================================

struct WasteSeed {
    id: &'static str,
    name: &'static str,
    category: Category,
    time: (u32, u32, TimeUnit),
    description: &'static str,
    rs: &'static [FiveR],
    suggestions: &'static [&'static str],
    recycling: Option<&'static str>,
    hazardous: Option<&'static str>,
    image: &'static str,
}

impl WasteSeed {
    fn build(&self) -> WasteType {
        let (min, max, unit) = self.time;
        WasteType {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category,
            decomposition_time: DecompositionTime { min, max, unit },
            description: self.description.to_string(),
            applicable_rs: self.rs.to_vec(),
            reuse_suggestions: self.suggestions.iter().map(|s| s.to_string()).collect(),
            recycling_notes: self.recycling.map(str::to_string),
            hazardous_notes: self.hazardous.map(str::to_string),
            image_url: Some(self.image.to_string()),
        }
    }
}

use super::waste::FiveR::{Recycle, Reduce, Refuse, Repurpose, Reuse};

const WASTE_SEEDS: &[WasteSeed] = &[
    WasteSeed {
        id: "banana-peel",
        name: "Banana Peel",
        category: Category::Organic,
        time: (2, 5, TimeUnit::Weeks),
        description: "Banana peels are organic waste that decompose relatively quickly.",
        rs: &[Reduce, Reuse, Recycle],
        suggestions: &[
            "Compost it to create nutrient-rich soil",
            "Use as plant fertilizer by burying near plants",
            "Polish leather shoes or silverware",
            "Use to reduce itching from bug bites",
        ],
        recycling: Some("Excellent for composting"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1572453800999-e8d2d1589b7c?q=80&w=200",
    },
    WasteSeed {
        id: "plastic-bottle",
        name: "Plastic Bottle",
        category: Category::Plastic,
        time: (450, 1000, TimeUnit::Years),
        description: "Single-use plastic bottles are a significant environmental concern due to their extremely long decomposition time.",
        rs: &[Refuse, Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Reuse as a water bottle",
            "Create a planter for small plants",
            "Make a bird feeder",
            "Use as storage for small items",
            "Create DIY crafts and decorations",
        ],
        recycling: Some("Remove cap and label before recycling; check local guidelines"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1572964734607-0051976fac79?q=80&w=200",
    },
    WasteSeed {
        id: "glass-bottle",
        name: "Glass Bottle",
        category: Category::Glass,
        time: (1, 2, TimeUnit::Years),
        description: "Glass bottles can be recycled indefinitely without loss in quality or purity.",
        rs: &[Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Reuse as a water or beverage container",
            "Create a decorative vase",
            "Make a lamp base",
            "Use as a candle holder",
            "Create a terrarium",
        ],
        recycling: Some("Rinse before recycling; remove caps or corks"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1563699182-9df869e75d24?q=80&w=200",
    },
    WasteSeed {
        id: "newspaper",
        name: "Newspaper",
        category: Category::Paper,
        time: (2, 6, TimeUnit::Weeks),
        description: "Newspapers are biodegradable and can be easily recycled.",
        rs: &[Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Use as packaging material",
            "Create paper mache crafts",
            "Use as mulch in gardens",
            "Clean windows and mirrors",
            "Make fire starters",
        ],
        recycling: Some("Easily recyclable; keep dry and clean"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1566378246598-5b11a0d486cc?q=80&w=200",
    },
    WasteSeed {
        id: "aluminum-can",
        name: "Aluminum Can",
        category: Category::Metal,
        time: (80, 200, TimeUnit::Years),
        description: "Aluminum cans are 100% recyclable and can be recycled indefinitely.",
        rs: &[Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Create pen holders",
            "Make a DIY phone speaker",
            "Use as seed starters",
            "Create lanterns or candle holders",
            "Make wind chimes",
        ],
        recycling: Some("Rinse before recycling; high value in recycling programs"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1576398289164-c94fbdce9b73?q=80&w=200",
    },
    WasteSeed {
        id: "old-smartphone",
        name: "Old Smartphone",
        category: Category::Electronic,
        time: (500, 1000, TimeUnit::Years),
        description: "Electronic waste contains valuable materials but also hazardous components.",
        rs: &[Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Repurpose as a media player",
            "Use as a dedicated GPS device",
            "Create a home security camera",
            "Donate to charities",
            "Sell or trade-in for newer models",
        ],
        recycling: Some("Take to e-waste collection centers; contains valuable metals"),
        hazardous: Some("Contains batteries and other toxic materials"),
        image: "https://images.unsplash.com/photo-1585394732583-3fb4cd191fe5?q=80&w=200",
    },
    WasteSeed {
        id: "batteries",
        name: "Batteries",
        category: Category::Hazardous,
        time: (100, 500, TimeUnit::Years),
        description: "Batteries contain toxic chemicals and heavy metals that can pollute soil and waterways.",
        rs: &[Reduce, Reuse, Recycle],
        suggestions: &[
            "Use rechargeable batteries instead",
            "Return to manufacturer recycling programs",
            "Take to designated collection points",
        ],
        recycling: Some("Never dispose with regular trash; special recycling required"),
        hazardous: Some("Contains corrosive materials and heavy metals"),
        image: "https://images.unsplash.com/photo-1528901589426-6ac2ef3767b8?q=80&w=200",
    },
    WasteSeed {
        id: "fabric-scraps",
        name: "Fabric Scraps",
        category: Category::Other,
        time: (1, 5, TimeUnit::Years),
        description: "Fabric scraps can vary in composition from natural fibers to synthetics.",
        rs: &[Reduce, Reuse, Repurpose, Recycle],
        suggestions: &[
            "Create patchwork items",
            "Use as cleaning rags",
            "Make handkerchiefs",
            "Create pillow stuffing",
            "Make face masks or hair accessories",
        ],
        recycling: Some("Natural fibers can be composted; some textiles can be recycled"),
        hazardous: None,
        image: "https://images.unsplash.com/photo-1549989317-6f14743af1bf?q=80&w=200",
    },
];

pub(crate) fn builtin_waste_types() -> Vec<WasteType> {
    WASTE_SEEDS.iter().map(WasteSeed::build).collect()
}

// ============================================================================
// VENDORS
// ============================================================================

fn price(min: f64, max: f64, unit: &str) -> PriceRange {
    PriceRange { min, max, unit: unit.to_string() }
}

#[allow(clippy::too_many_arguments)]
fn vendor(
    id: &str,
    name: &str,
    description: &str,
    accepted: &[Category],
    pricing: Vec<(Category, PriceRange)>,
    location: &str,
    contact: &str,
    website: Option<&str>,
) -> VendorType {
    VendorType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        accepted_categories: accepted.to_vec(),
        pricing: pricing.into_iter().collect::<BTreeMap<_, _>>(),
        location: location.to_string(),
        contact: contact.to_string(),
        website: website.map(str::to_string),
    }
}

pub(crate) fn builtin_vendors() -> Vec<VendorType> {
    vec![
        vendor(
            "green-recyclers",
            "Green Recyclers",
            "Full-service recycling company specializing in paper, plastic, and metal waste.",
            &[Category::Plastic, Category::Metal, Category::Paper],
            vec![
                (Category::Plastic, price(0.05, 0.15, "$/kg")),
                (Category::Metal, price(0.20, 0.50, "$/kg")),
                (Category::Paper, price(0.02, 0.10, "$/kg")),
            ],
            "Downtown Area",
            "contact@greenrecyclers.example.com",
            None,
        ),
        vendor(
            "tech-recovery",
            "Tech Recovery Solutions",
            "Specializing in electronic waste recovery and data destruction services.",
            &[Category::Electronic],
            vec![(Category::Electronic, price(1.00, 10.00, "$/item"))],
            "Industrial District",
            "info@techrecovery.example.com",
            Some("https://techrecovery.example.com"),
        ),
        vendor(
            "compost-kings",
            "Compost Kings",
            "Organic waste collection service that turns food waste into premium compost.",
            &[Category::Organic],
            vec![(Category::Organic, price(0.00, 0.05, "$/kg"))],
            "City Outskirts",
            "hello@compostkings.example.com",
            None,
        ),
        vendor(
            "safe-disposal",
            "Safe Disposal Inc.",
            "Licensed hazardous waste disposal company with state-of-the-art facilities.",
            &[Category::Hazardous],
            vec![],
            "Industrial Zone",
            "disposal@safedisposal.example.com",
            None,
        ),
        vendor(
            "glass-works",
            "Glass Works Recycling",
            "Specialized in glass recycling and repurposing for art and construction.",
            &[Category::Glass],
            vec![(Category::Glass, price(0.03, 0.12, "$/kg"))],
            "Arts District",
            "recycle@glassworks.example.com",
            Some("https://glassworks-recycling.example.com"),
        ),
    ]
}
