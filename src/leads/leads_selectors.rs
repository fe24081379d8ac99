//! Derived lead views.
//!
//! Selectors are pure over (store contents, filter criteria). The filtered
//! view is memoized: as long as the lead store version and the filters are
//! unchanged, the selector hands back the identical `Arc`, so downstream
//! consumers can compare by reference and skip their own recomputation.

use std::sync::Arc;

use crate::store::EntityStore;

use super::leads_model::{Lead, LeadFilters};

struct CachedSelection {
    store_version: u64,
    filters: LeadFilters,
    result: Arc<Vec<Lead>>,
}

/// Memoized filtered-leads selector.
#[derive(Default)]
pub struct FilteredLeadsSelector {
    cached: Option<CachedSelection>,
}

impl FilteredLeadsSelector {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Returns leads matching all active predicates, in store order
    /// (descending score).
    ///
    /// Recomputes only when the lead collection or the filters changed since
    /// the previous call; otherwise returns the cached `Arc` unchanged.
    pub fn select(&mut self, leads: &EntityStore<Lead>, filters: &LeadFilters) -> Arc<Vec<Lead>> {
        if let Some(cached) = &self.cached {
            if cached.store_version == leads.version() && &cached.filters == filters {
                return Arc::clone(&cached.result);
            }
        }

        let result: Arc<Vec<Lead>> =
            Arc::new(leads.iter().filter(|lead| filters.matches(lead)).cloned().collect());
        self.cached = Some(CachedSelection {
            store_version: leads.version(),
            filters: filters.clone(),
            result: Arc::clone(&result),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::leads_model::{by_score_desc, LeadStatus};

    fn lead(id: &str, score: f64, status: LeadStatus) -> Lead {
        Lead {
            id: id.to_string(),
            property_id: "P42".to_string(),
            applicant_name: None,
            email: None,
            status,
            score,
            source: None,
            created_at: None,
            ai_data: None,
            dossier_data: None,
        }
    }

    fn store_with(leads: Vec<Lead>) -> EntityStore<Lead> {
        let mut store = EntityStore::with_comparator(by_score_desc);
        store.set_all(leads);
        store
    }

    #[test]
    fn test_unchanged_inputs_return_same_arc() {
        let store = store_with(vec![
            lead("L1", 90.0, LeadStatus::Qualified),
            lead("L2", 40.0, LeadStatus::ViewingRequested),
        ]);
        let filters = LeadFilters::default();
        let mut selector = FilteredLeadsSelector::new();

        let first = selector.select(&store, &filters);
        let second = selector.select(&store, &filters);
        assert!(
            Arc::ptr_eq(&first, &second),
            "unchanged inputs must return the identical Arc"
        );
    }

    #[test]
    fn test_filter_change_recomputes() {
        let store = store_with(vec![
            lead("L1", 90.0, LeadStatus::Qualified),
            lead("L2", 40.0, LeadStatus::ViewingRequested),
        ]);
        let mut selector = FilteredLeadsSelector::new();

        let all = selector.select(&store, &LeadFilters::default());
        assert_eq!(all.len(), 2);

        let filters = LeadFilters {
            status: Some(LeadStatus::Qualified),
            ..Default::default()
        };
        let qualified = selector.select(&store, &filters);
        assert!(!Arc::ptr_eq(&all, &qualified));
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].id, "L1");
    }

    #[test]
    fn test_store_mutation_recomputes() {
        let mut store = store_with(vec![lead("L1", 90.0, LeadStatus::Qualified)]);
        let filters = LeadFilters::default();
        let mut selector = FilteredLeadsSelector::new();

        let before = selector.select(&store, &filters);
        assert_eq!(before.len(), 1);

        store.upsert_one(lead("L2", 95.0, LeadStatus::ViewingRequested));
        let after = selector.select(&store, &filters);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].id, "L2", "store order is descending score");
    }
}
