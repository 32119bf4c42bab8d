// 📊 Limit Evaluator - Per-category view of today's disposals
// Read-only projection over the store; used for display.

use crate::catalog::Category;
use crate::store::WasteLogStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub name: &'static str,
    pub count: u32,
    pub limit: u32,
    pub is_over_limit: bool,
    /// `max(0, count - limit)`
    pub over_by: u32,
}

impl CategoryStat {
    /// Fill level of the daily allowance, capped at 100
    pub fn progress_percent(&self) -> u16 {
        if self.limit == 0 {
            return if self.count > 0 { 100 } else { 0 };
        }
        let percent = u64::from(self.count) * 100 / u64::from(self.limit);
        percent.min(100) as u16
    }
}

/// Result handed back to the caller after recording a disposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisposalOutcome {
    pub success: bool,
    pub is_over_limit: bool,
    pub current_count: u32,
}

pub struct LimitEvaluator<'a> {
    store: &'a WasteLogStore,
}

impl<'a> LimitEvaluator<'a> {
    pub fn new(store: &'a WasteLogStore) -> Self {
        LimitEvaluator { store }
    }

    pub fn stat_for(&self, category: Category) -> CategoryStat {
        let count = self.store.count_today(category);
        let limit = self.store.limit_for(category);

        CategoryStat {
            category,
            name: self.store.catalog().category(category).name,
            count,
            limit,
            is_over_limit: count > limit,
            over_by: count.saturating_sub(limit),
        }
    }

    /// One stat per category, in catalog order
    pub fn stats(&self) -> Vec<CategoryStat> {
        self.store
            .catalog()
            .categories()
            .iter()
            .map(|descriptor| self.stat_for(descriptor.id))
            .collect()
    }

    pub fn over_limit(&self) -> Vec<CategoryStat> {
        self.stats().into_iter().filter(|s| s.is_over_limit).collect()
    }

    pub fn outcome_for(&self, category: Category) -> DisposalOutcome {
        let stat = self.stat_for(category);
        DisposalOutcome {
            success: true,
            is_over_limit: stat.is_over_limit,
            current_count: stat.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn fresh_store() -> WasteLogStore {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()));
        WasteLogStore::load_with_clock(
            Arc::new(Catalog::builtin()),
            Box::new(MemoryStorage::new()),
            clock,
        )
    }

    #[test]
    fn test_stats_cover_every_category() {
        let store = fresh_store();
        let stats = LimitEvaluator::new(&store).stats();

        assert_eq!(stats.len(), 8);
        assert!(stats.iter().all(|s| s.count == 0 && !s.is_over_limit && s.over_by == 0));
        assert_eq!(stats[1].category, Category::Plastic);
        assert_eq!(stats[1].limit, 3);
        assert_eq!(stats[1].name, "Plastic");
    }

    #[test]
    fn test_over_by_scenario() {
        let mut store = fresh_store();
        store.record_disposal("plastic-bottle", 2).unwrap();
        store.record_disposal("plastic-bottle", 2).unwrap();

        let evaluator = LimitEvaluator::new(&store);
        let plastic = evaluator.stat_for(Category::Plastic);
        assert_eq!(plastic.count, 4);
        assert!(plastic.is_over_limit);
        assert_eq!(plastic.over_by, 1);
        assert_eq!(plastic.progress_percent(), 100);

        let over: Vec<Category> = evaluator.over_limit().iter().map(|s| s.category).collect();
        assert_eq!(over, vec![Category::Plastic]);
    }

    #[test]
    fn test_outcome_at_limit_is_not_over() {
        let mut store = fresh_store();
        store.record_disposal("glass-bottle", 2).unwrap();

        let outcome = LimitEvaluator::new(&store).outcome_for(Category::Glass);
        assert_eq!(
            outcome,
            DisposalOutcome { success: true, is_over_limit: false, current_count: 2 }
        );
    }

    #[test]
    fn test_progress_percent() {
        let mut store = fresh_store();
        store.record_disposal("banana-peel", 2).unwrap();

        let stat = LimitEvaluator::new(&store).stat_for(Category::Organic);
        assert_eq!(stat.progress_percent(), 40);
    }
}
