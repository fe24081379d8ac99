//! Shared client state: the normalized store set and per-request bookkeeping.
//!
//! One `RwLock` guards the whole store set, so every mutation runs to
//! completion before the next one starts. In particular the
//! decision-plus-lead-status pair commits inside one write lock.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::configs::SelectionConfig;
use crate::decisions::Decision;
use crate::errors::Error;
use crate::leads::{by_score_desc, Lead, LeadStats};
use crate::store::EntityStore;
use crate::viewings::{by_start_asc, ViewingSlot};

/// Pagination bookkeeping for the lead list.
///
/// `offset` equals the cumulative count of raw rows the server has served for
/// the current filter set; rows dropped by validation still advanced the
/// server cursor. `has_more` is an approximation: true until a page comes
/// back short of the page size requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub has_more: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            has_more: true,
        }
    }
}

impl Pagination {
    /// Fresh top-level fetch: back to the first page.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.has_more = true;
    }
}

/// The four normalized entity stores plus derived aggregates.
pub struct StoreSet {
    pub configs: EntityStore<SelectionConfig>,
    pub leads: EntityStore<Lead>,
    pub decisions: EntityStore<Decision>,
    pub viewings: EntityStore<ViewingSlot>,
    pub stats: LeadStats,
    pub pagination: Pagination,
}

impl Default for StoreSet {
    fn default() -> Self {
        Self {
            configs: EntityStore::new(),
            leads: EntityStore::with_comparator(by_score_desc),
            decisions: EntityStore::new(),
            viewings: EntityStore::with_comparator(by_start_asc),
            stats: LeadStats::default(),
            pagination: Pagination::default(),
        }
    }
}

impl StoreSet {
    /// Recomputes lead aggregates after a non-fetch mutation (status change,
    /// realtime ingest). A previously server-reported total larger than the
    /// local count is preserved; otherwise the local count wins.
    pub fn recompute_stats(&mut self) {
        let leads = self.leads.all();
        let server_total = if self.stats.total > leads.len() {
            Some(self.stats.total)
        } else {
            None
        };
        self.stats = LeadStats::compute(&leads, server_total);
    }
}

/// Shared client state handed to every service.
#[derive(Default)]
pub struct SelectionState {
    stores: RwLock<StoreSet>,
    pub requests: RequestTracker,
}

impl SelectionState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&StoreSet) -> R) -> R {
        f(&self.stores.read().unwrap())
    }

    /// Runs `f` under the write lock. The closure is the mutation's atomic
    /// scope; keep network I/O out of it.
    pub fn write<R>(&self, f: impl FnOnce(&mut StoreSet) -> R) -> R {
        f(&mut self.stores.write().unwrap())
    }

    /// Runs `f` under the write lock only while `token` is still the latest
    /// generation for `key`; returns `None` without mutating otherwise.
    ///
    /// The token check happens inside the lock. Every completion commits
    /// through here, so a superseded response can never clobber state a newer
    /// dispatch already committed.
    pub fn commit_if_current<R>(
        &self,
        key: &str,
        token: u64,
        f: impl FnOnce(&mut StoreSet) -> R,
    ) -> Option<R> {
        let mut stores = self.stores.write().unwrap();
        if !self.requests.is_current(key, token) {
            return None;
        }
        Some(f(&mut stores))
    }
}

/// Lifecycle status of an async request category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Structured failure surfaced to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    pub message: String,
    pub status: Option<u16>,
    /// Set for transport timeouts and HTTP 408, so the view can offer a
    /// distinct retry affordance.
    pub timeout: bool,
}

impl RequestError {
    pub fn from_error(err: &Error) -> Self {
        let message = match err {
            Error::Api(api) => api.message().to_string(),
            other => other.to_string(),
        };
        Self {
            message,
            status: err.status(),
            timeout: err.is_timeout(),
        }
    }
}

/// Status snapshot for one request key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestState {
    pub status: RequestStatus,
    pub error: Option<RequestError>,
}

/// Generation counter plus status for one request key.
#[derive(Default)]
struct TrackedRequest {
    generation: u64,
    state: RequestState,
}

/// Per-key request status and generation bookkeeping.
///
/// Every dispatch for a key takes a fresh generation token. A completion is
/// applied only while its token is still the latest for that key, so stale
/// and out-of-order responses are discarded instead of winning by arrival
/// order, and a fresh fetch invalidates any in-flight fetch-more sharing its
/// key. Generation and status live in one map entry, so a stale completion
/// can never overwrite the status a newer dispatch owns.
#[derive(Default)]
pub struct RequestTracker {
    requests: DashMap<String, TrackedRequest>,
}

impl RequestTracker {
    /// Marks `key` loading, clears its previous error, and returns the
    /// generation token for this dispatch.
    pub fn begin(&self, key: &str) -> u64 {
        let mut entry = self.requests.entry(key.to_string()).or_default();
        entry.generation += 1;
        entry.state = RequestState {
            status: RequestStatus::Loading,
            error: None,
        };
        entry.generation
    }

    /// True while `token` is the latest dispatched generation for `key`.
    pub fn is_current(&self, key: &str, token: u64) -> bool {
        self.requests
            .get(key)
            .map(|entry| entry.generation == token)
            .unwrap_or(false)
    }

    /// Marks `key` succeeded, unless a newer dispatch superseded `token`.
    pub fn succeed(&self, key: &str, token: u64) {
        if let Some(mut entry) = self.requests.get_mut(key) {
            if entry.generation == token {
                entry.state = RequestState {
                    status: RequestStatus::Succeeded,
                    error: None,
                };
            }
        }
    }

    /// Marks `key` failed, unless a newer dispatch superseded `token`.
    pub fn fail(&self, key: &str, token: u64, err: &Error) {
        if let Some(mut entry) = self.requests.get_mut(key) {
            if entry.generation == token {
                entry.state = RequestState {
                    status: RequestStatus::Failed,
                    error: Some(RequestError::from_error(err)),
                };
            }
        }
    }

    /// Current state for `key`; idle when the key has never been dispatched.
    pub fn state(&self, key: &str) -> RequestState {
        self.requests
            .get(key)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.state(key).status == RequestStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;

    #[test]
    fn test_begin_marks_loading_and_clears_error() {
        let tracker = RequestTracker::default();
        let token = tracker.begin("leads");
        tracker.fail(
            "leads",
            token,
            &Error::Api(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(tracker.state("leads").status, RequestStatus::Failed);

        tracker.begin("leads");
        let state = tracker.state("leads");
        assert_eq!(state.status, RequestStatus::Loading);
        assert!(state.error.is_none(), "entering loading clears the previous error");
    }

    #[test]
    fn test_stale_completion_does_not_overwrite_newer_dispatch() {
        let tracker = RequestTracker::default();
        let first = tracker.begin("leads");
        let second = tracker.begin("leads");

        tracker.succeed("leads", first);
        assert_eq!(
            tracker.state("leads").status,
            RequestStatus::Loading,
            "a superseded completion must leave the newer dispatch loading"
        );

        tracker.fail(
            "leads",
            first,
            &Error::Api(ApiError::Network("gone".to_string())),
        );
        assert_eq!(tracker.state("leads").status, RequestStatus::Loading);

        tracker.succeed("leads", second);
        assert_eq!(tracker.state("leads").status, RequestStatus::Succeeded);
    }

    #[test]
    fn test_generation_tokens_invalidate_older_dispatches() {
        let tracker = RequestTracker::default();
        let first = tracker.begin("leads");
        let second = tracker.begin("leads");

        assert!(!tracker.is_current("leads", first));
        assert!(tracker.is_current("leads", second));
    }

    #[test]
    fn test_keys_are_independent() {
        let tracker = RequestTracker::default();
        let leads = tracker.begin("leads");
        let decision = tracker.begin("decision_L1");

        assert!(tracker.is_current("leads", leads));
        assert!(tracker.is_current("decision_L1", decision));
        assert_eq!(tracker.state("config").status, RequestStatus::Idle);
    }

    #[test]
    fn test_request_error_carries_timeout_flag_and_status() {
        let err = Error::Api(ApiError::Timeout("deadline exceeded".to_string()));
        let request_error = RequestError::from_error(&err);
        assert!(request_error.timeout);
        assert_eq!(request_error.status, Some(408));

        let err = Error::Api(ApiError::Server {
            status: 422,
            message: "Lead not found".to_string(),
        });
        let request_error = RequestError::from_error(&err);
        assert!(!request_error.timeout);
        assert_eq!(request_error.status, Some(422));
        assert_eq!(request_error.message, "Lead not found");
    }

    #[test]
    fn test_commit_if_current_discards_superseded_token() {
        let state = SelectionState::new();
        let first = state.requests.begin("leads");
        let second = state.requests.begin("leads");

        let applied = state.commit_if_current("leads", first, |s| s.stats.total = 99);
        assert!(applied.is_none());
        state.read(|s| {
            assert_eq!(s.stats.total, 0, "a superseded commit must not mutate the stores")
        });

        let applied = state.commit_if_current("leads", second, |s| s.stats.total = 1);
        assert!(applied.is_some());
        state.read(|s| assert_eq!(s.stats.total, 1));
    }

    #[test]
    fn test_store_set_recompute_preserves_larger_server_total() {
        let mut stores = StoreSet::default();
        stores.stats.total = 250;
        stores.recompute_stats();
        assert_eq!(stores.stats.total, 250);

        stores.stats.total = 0;
        stores.recompute_stats();
        assert_eq!(stores.stats.total, 0);
    }
}
