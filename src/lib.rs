// Waste Wise - Core Library
// Waste identification, disposal tracking with daily limits, and vendor lookup.
// Exposes all modules for use in the CLI, the dashboard, and tests.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod identify;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogIssue, Category, CategoryDescriptor, DecompositionTime, FiveR,
    FiveRApplicability, ImpactLevel, PriceRange, TimeUnit, VendorType, WasteType,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, StorageBackend};
pub use error::{WasteError, WasteResult};
pub use evaluator::{CategoryStat, DisposalOutcome, LimitEvaluator};
pub use identify::{IdentificationStub, IdentifyBasis, InputDescriptor, SizeBand};
pub use session::{
    IdentificationTicket, Notification, Notifier, PendingIdentification, RecordingNotifier, Severity,
    TracingNotifier, WasteSession,
};
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, StoragePort, STORAGE_KEY};
pub use store::{DisposalEntry, UserWasteState, WasteLogStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
