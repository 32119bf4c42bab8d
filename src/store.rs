// 🗑️ Waste Log Store - Disposal entries + per-category daily limits
//
// The store owns one `UserWasteState`. Every mutation rewrites the whole state
// to the storage port before returning; nothing is batched. Loading never
// fails: missing or unparseable state falls back to the defaults.

use crate::catalog::{Catalog, Category};
use crate::clock::{is_same_local_day, Clock, SystemClock};
use crate::error::{WasteError, WasteResult};
use crate::storage::{StoragePort, STORAGE_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// STATE
// ============================================================================

/// Accumulated disposals of one waste type.
///
/// `id` is a weak reference into the catalog. `count >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalEntry {
    pub id: String,
    pub count: u32,
    pub timestamp: DateTime<Utc>,
}

/// Everything persisted under `STORAGE_KEY`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWasteState {
    /// At most one entry per waste id, in first-recorded order
    #[serde(default)]
    pub entries: Vec<DisposalEntry>,

    /// Keys that are not a known category are skipped on load
    #[serde(default, deserialize_with = "known_category_limits")]
    pub disposal_limits: BTreeMap<Category, u32>,
}

fn known_category_limits<'de, D>(deserializer: D) -> Result<BTreeMap<Category, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, limit)| match key.parse::<Category>() {
            Ok(category) => Some((category, limit)),
            Err(_) => {
                warn!(key = %key, "ignoring limit for unknown category");
                None
            }
        })
        .collect())
}

impl UserWasteState {
    /// Empty log with the catalog's default limits
    pub fn with_defaults(catalog: &Catalog) -> Self {
        UserWasteState {
            entries: Vec::new(),
            disposal_limits: catalog.default_limits(),
        }
    }

    pub fn entry(&self, waste_id: &str) -> Option<&DisposalEntry> {
        self.entries.iter().find(|e| e.id == waste_id)
    }

    /// Parse persisted JSON and restore the entry invariants.
    ///
    /// Zero counts and zero limits are dropped. Repeated ids are merged the
    /// same way `record_disposal` would have merged them.
    pub fn from_json(raw: &str) -> WasteResult<Self> {
        let parsed: UserWasteState = serde_json::from_str(raw)
            .map_err(|e| WasteError::PersistenceCorrupt(e.to_string()))?;

        let mut entries: Vec<DisposalEntry> = Vec::with_capacity(parsed.entries.len());
        for entry in parsed.entries.into_iter().filter(|e| e.count > 0) {
            match entries.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => {
                    existing.count = existing.count.saturating_add(entry.count);
                    existing.timestamp = existing.timestamp.max(entry.timestamp);
                }
                None => entries.push(entry),
            }
        }

        let disposal_limits = parsed
            .disposal_limits
            .into_iter()
            .filter(|(_, limit)| *limit > 0)
            .collect();

        Ok(UserWasteState { entries, disposal_limits })
    }

    pub fn to_json(&self) -> WasteResult<String> {
        serde_json::to_string(self).map_err(|e| WasteError::Storage(e.into()))
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct WasteLogStore {
    catalog: Arc<Catalog>,
    storage: Box<dyn StoragePort>,
    clock: Arc<dyn Clock>,
    state: UserWasteState,
}

impl WasteLogStore {
    /// Rehydrate from storage using the wall clock
    pub fn load(catalog: Arc<Catalog>, storage: Box<dyn StoragePort>) -> Self {
        Self::load_with_clock(catalog, storage, Arc::new(SystemClock))
    }

    pub fn load_with_clock(
        catalog: Arc<Catalog>,
        storage: Box<dyn StoragePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = read_state(&catalog, storage.as_ref());
        WasteLogStore {
            catalog,
            storage,
            clock,
            state,
        }
    }

    /// Discard in-memory state and read it back from storage
    pub fn reload(&mut self) {
        self.state = read_state(&self.catalog, self.storage.as_ref());
    }

    // ========================================================================
    // MUTATIONS (each ends with exactly one persist)
    // ========================================================================

    /// Add `quantity` units of a waste type to the log.
    ///
    /// An existing entry accumulates the count and takes the current time as
    /// its timestamp; a new id gets a fresh entry.
    pub fn record_disposal(&mut self, waste_id: &str, quantity: u32) -> WasteResult<()> {
        if waste_id.trim().is_empty() {
            return Err(WasteError::InvalidInput("waste id is empty".to_string()));
        }
        if quantity == 0 {
            return Err(WasteError::InvalidInput(
                "quantity must be a positive integer".to_string(),
            ));
        }
        if self.catalog.lookup_by_id(waste_id).is_none() {
            warn!(waste_id, "recording disposal for id missing from catalog");
        }

        let now = self.clock.now();
        let count = match self.state.entries.iter_mut().find(|e| e.id == waste_id) {
            Some(entry) => {
                entry.count = entry.count.saturating_add(quantity);
                entry.timestamp = now;
                entry.count
            }
            None => {
                self.state.entries.push(DisposalEntry {
                    id: waste_id.to_string(),
                    count: quantity,
                    timestamp: now,
                });
                quantity
            }
        };

        info!(waste_id, quantity, total = count, "disposal recorded");
        self.persist()
    }

    /// Drop the entry for `waste_id`. Absent ids are not an error.
    pub fn remove_entry(&mut self, waste_id: &str) -> WasteResult<()> {
        let before = self.state.entries.len();
        self.state.entries.retain(|e| e.id != waste_id);
        debug!(waste_id, removed = before != self.state.entries.len(), "remove entry");
        self.persist()
    }

    /// Empty the log and restore default limits
    pub fn clear_all(&mut self) -> WasteResult<()> {
        self.state = UserWasteState::with_defaults(&self.catalog);
        info!("waste log cleared");
        self.persist()
    }

    /// Overwrite one category's daily limit. Zero is rejected and leaves the
    /// previous limit in place.
    pub fn set_limit(&mut self, category: Category, limit: u32) -> WasteResult<()> {
        if limit == 0 {
            return Err(WasteError::InvalidInput(format!(
                "limit for {} must be a positive integer",
                category
            )));
        }

        self.state.disposal_limits.insert(category, limit);
        debug!(%category, limit, "limit updated");
        self.persist()
    }

    fn persist(&self) -> WasteResult<()> {
        let json = self.state.to_json()?;
        self.storage.write(STORAGE_KEY, &json)?;
        debug!(bytes = json.len(), entries = self.state.entries.len(), "state persisted");
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Units disposed today (local calendar day) for a category.
    ///
    /// Entries whose id no longer resolves in the catalog are skipped.
    pub fn count_today(&self, category: Category) -> u32 {
        let now = self.clock.now();
        self.state
            .entries
            .iter()
            .filter(|entry| {
                self.catalog
                    .lookup_by_id(&entry.id)
                    .map(|waste| waste.category == category)
                    .unwrap_or(false)
            })
            .filter(|entry| is_same_local_day(entry.timestamp, now))
            .fold(0u32, |total, entry| total.saturating_add(entry.count))
    }

    /// User limit if set, else the catalog default
    pub fn limit_for(&self, category: Category) -> u32 {
        self.state
            .disposal_limits
            .get(&category)
            .copied()
            .filter(|limit| *limit > 0)
            .unwrap_or_else(|| self.catalog.default_limit(category))
    }

    /// Strictly greater than the limit; reaching it exactly is fine
    pub fn is_over_limit(&self, category: Category) -> bool {
        self.count_today(category) > self.limit_for(category)
    }

    pub fn state(&self) -> &UserWasteState {
        &self.state
    }

    pub fn entries(&self) -> &[DisposalEntry] {
        &self.state.entries
    }

    pub fn entry(&self, waste_id: &str) -> Option<&DisposalEntry> {
        self.state.entry(waste_id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

fn read_state(catalog: &Catalog, storage: &dyn StoragePort) -> UserWasteState {
    let raw = match storage.read(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no persisted waste log, starting fresh");
            return UserWasteState::with_defaults(catalog);
        }
        Err(e) => {
            warn!(error = %e, "failed to read persisted waste log, using defaults");
            return UserWasteState::with_defaults(catalog);
        }
    };

    match UserWasteState::from_json(&raw) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding persisted waste log");
            UserWasteState::with_defaults(catalog)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
