//! Normalized, identifier-keyed entity store.
//!
//! One store instance holds one entity type. Records are keyed by a string
//! identifier; upserts are idempotent by identifier. An optional comparator
//! fixes iteration order (leads sort by descending score); stores without one
//! iterate in insertion order.
//!
//! Every mutation bumps a version counter. Memoized selectors key their cache
//! on that counter, so a selector recomputes only when the collection actually
//! changed.

use std::cmp::Ordering;
use std::collections::HashMap;

/// An entity that can live in an [`EntityStore`].
pub trait Entity: Clone {
    /// Unique identifier within the store.
    fn id(&self) -> &str;
}

/// Comparator deciding iteration order between two records.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Normalized in-memory collection with defined insert/update/replace
/// semantics.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    records: HashMap<String, T>,
    /// Identifier list in iteration order.
    ids: Vec<String>,
    comparator: Option<Comparator<T>>,
    version: u64,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates an empty store iterating in insertion order.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            ids: Vec::new(),
            comparator: None,
            version: 0,
        }
    }

    /// Creates an empty store whose iteration order is fixed by `comparator`.
    pub fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            records: HashMap::new(),
            ids: Vec::new(),
            comparator: Some(comparator),
            version: 0,
        }
    }

    /// Monotonic counter bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Returns the record at `id`, if present.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    /// Inserts `entity` if its identifier is new, otherwise replaces the
    /// stored record. Idempotent by identifier.
    pub fn upsert_one(&mut self, entity: T) {
        let id = entity.id().to_string();
        if self.records.insert(id.clone(), entity).is_none() {
            self.ids.push(id);
        }
        self.resort();
        self.version += 1;
    }

    /// Applies [`upsert_one`](Self::upsert_one) semantics for a batch.
    /// Identifiers already present are replaced, never duplicated.
    pub fn upsert_many(&mut self, entities: Vec<T>) {
        for entity in entities {
            let id = entity.id().to_string();
            if self.records.insert(id.clone(), entity).is_none() {
                self.ids.push(id);
            }
        }
        self.resort();
        self.version += 1;
    }

    /// Replaces the entire store contents. Used exactly once per fresh
    /// (offset-zero) fetch, never for incremental pages.
    pub fn set_all(&mut self, entities: Vec<T>) {
        self.records.clear();
        self.ids.clear();
        for entity in entities {
            let id = entity.id().to_string();
            if self.records.insert(id.clone(), entity).is_none() {
                self.ids.push(id);
            }
        }
        self.resort();
        self.version += 1;
    }

    /// Mutates the record at `id` in place. Returns `false` (a no-op) when
    /// the identifier is absent.
    pub fn update_one(&mut self, id: &str, mutate: impl FnOnce(&mut T)) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                mutate(record);
                self.resort();
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the record at `id`. Only the viewing-slot store
    /// deletes; leads, configs, and decisions are never removed locally.
    pub fn remove_one(&mut self, id: &str) -> Option<T> {
        let removed = self.records.remove(id)?;
        self.ids.retain(|existing| existing != id);
        self.version += 1;
        Some(removed)
    }

    /// All records in iteration order.
    pub fn all(&self) -> Vec<T> {
        self.ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    /// Iterates records in iteration order without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter().filter_map(|id| self.records.get(id))
    }

    fn resort(&mut self) {
        if let Some(cmp) = self.comparator {
            let records = &self.records;
            self.ids.sort_by(|a, b| match (records.get(a), records.get(b)) {
                (Some(ra), Some(rb)) => cmp(ra, rb),
                _ => Ordering::Equal,
            });
        }
    }
}
