//! Lead fetch and update workflows.

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::api::{LeadQuery, SelectionApi};
use crate::constants::{
    DEFAULT_PAGE_SIZE, LEADS_REQUEST_KEY, LEAD_KEY_PREFIX, UPDATE_LEAD_KEY_PREFIX,
};
use crate::errors::{Result, ValidationError};
use crate::logging::AppLogger;
use crate::state::SelectionState;

use super::leads_model::{Lead, LeadFilters, LeadStats, LeadUpdate};

const COMPONENT: &str = "LeadService";

/// Whether a completed fetch was applied to the store or discarded because a
/// newer request for the same category superseded it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The response was ingested; carries the validated rows.
    Applied(Vec<Lead>),
    /// A newer dispatch took over the category; nothing was mutated.
    Superseded,
}

/// Service for fetching and updating leads.
pub struct LeadService {
    api: Arc<dyn SelectionApi>,
    state: Arc<SelectionState>,
    logger: Arc<AppLogger>,
    page_size: usize,
}

impl LeadService {
    pub fn new(
        api: Arc<dyn SelectionApi>,
        state: Arc<SelectionState>,
        logger: Arc<AppLogger>,
    ) -> Self {
        Self {
            api,
            state,
            logger,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fresh top-level fetch for the current filter set.
    ///
    /// Resets pagination, **replaces** the lead store, and recomputes the
    /// aggregate statistics. A filter change must come through here, never
    /// through [`fetch_more_leads`](Self::fetch_more_leads); beginning a
    /// fresh fetch invalidates any in-flight fetch-more for the category.
    pub async fn fetch_leads(&self, filters: &LeadFilters) -> Result<FetchOutcome> {
        let token = self.state.requests.begin(LEADS_REQUEST_KEY);
        self.state
            .commit_if_current(LEADS_REQUEST_KEY, token, |s| s.pagination.reset());

        let query = LeadQuery::from_filters(filters, 0, self.page_size);
        debug!("Fetching leads, limit={}", self.page_size);

        match self.api.list_leads(&query).await {
            Ok(page) => {
                // The server cursor consumed every raw row, including ones
                // validation drops, so pagination counts raw rows.
                let raw_count = page.rows.len();
                let leads = self.validate_rows(page.rows);
                let page_size = self.page_size;
                let applied = self.state.commit_if_current(LEADS_REQUEST_KEY, token, |s| {
                    s.leads.set_all(leads.clone());
                    s.pagination.offset = raw_count;
                    s.pagination.has_more = raw_count == page_size;
                    s.stats = LeadStats::compute(&s.leads.all(), page.total);
                });
                if applied.is_none() {
                    debug!("Discarding superseded lead fetch");
                    return Ok(FetchOutcome::Superseded);
                }
                self.state.requests.succeed(LEADS_REQUEST_KEY, token);
                self.logger.debug(
                    COMPONENT,
                    &format!("ingested {} leads (fresh fetch)", leads.len()),
                );
                Ok(FetchOutcome::Applied(leads))
            }
            Err(err) => {
                self.state.requests.fail(LEADS_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// Fetches the next page for the current filter set and **merges** it
    /// into the store, advancing the offset by the raw rows received.
    pub async fn fetch_more_leads(&self, filters: &LeadFilters) -> Result<FetchOutcome> {
        let token = self.state.requests.begin(LEADS_REQUEST_KEY);
        let offset = self.state.read(|s| s.pagination.offset);

        let query = LeadQuery::from_filters(filters, offset, self.page_size);
        debug!("Fetching more leads, offset={} limit={}", offset, self.page_size);

        match self.api.list_leads(&query).await {
            Ok(page) => {
                let raw_count = page.rows.len();
                let leads = self.validate_rows(page.rows);
                let page_size = self.page_size;
                let applied = self.state.commit_if_current(LEADS_REQUEST_KEY, token, |s| {
                    s.leads.upsert_many(leads.clone());
                    s.pagination.offset = offset + raw_count;
                    s.pagination.has_more = raw_count == page_size;
                    s.stats = LeadStats::compute(&s.leads.all(), page.total);
                });
                if applied.is_none() {
                    debug!("Discarding superseded fetch-more (offset={})", offset);
                    return Ok(FetchOutcome::Superseded);
                }
                self.state.requests.succeed(LEADS_REQUEST_KEY, token);
                self.logger.debug(
                    COMPONENT,
                    &format!("appended {} leads (fetch more)", leads.len()),
                );
                Ok(FetchOutcome::Applied(leads))
            }
            Err(err) => {
                self.state.requests.fail(LEADS_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// Retrieves a single lead and refreshes its store record. Tracked under
    /// a per-lead key.
    pub async fn get_lead(&self, lead_id: &str) -> Result<Lead> {
        let key = format!("{}{}", LEAD_KEY_PREFIX, lead_id);
        let token = self.state.requests.begin(&key);

        match self.api.get_lead(lead_id).await {
            Ok(lead) => {
                self.state.commit_if_current(&key, token, |s| {
                    s.leads.upsert_one(lead.clone());
                    s.recompute_stats();
                });
                self.state.requests.succeed(&key, token);
                Ok(lead)
            }
            Err(err) => {
                self.state.requests.fail(&key, token, &err);
                Err(err)
            }
        }
    }

    /// Updates a lead on the server and upserts the returned record.
    ///
    /// Tracked under a per-lead key so concurrent updates to different leads
    /// stay independent.
    pub async fn update_lead(&self, lead_id: &str, changes: &LeadUpdate) -> Result<Lead> {
        let key = format!("{}{}", UPDATE_LEAD_KEY_PREFIX, lead_id);
        let token = self.state.requests.begin(&key);

        match self.api.update_lead(lead_id, changes).await {
            Ok(lead) => {
                self.state.commit_if_current(&key, token, |s| {
                    s.leads.upsert_one(lead.clone());
                    s.recompute_stats();
                });
                self.state.requests.succeed(&key, token);
                Ok(lead)
            }
            Err(err) => {
                self.state.requests.fail(&key, token, &err);
                Err(err)
            }
        }
    }

    /// Validates raw listing rows: each must be an object bearing a non-empty
    /// identifier and must deserialize into a [`Lead`]. Offending rows are
    /// discarded with a diagnostic; the rest of the page is ingested.
    fn validate_rows(&self, rows: Vec<Value>) -> Vec<Lead> {
        let mut leads = Vec::with_capacity(rows.len());
        for row in rows {
            let id_ok = row
                .get("id")
                .and_then(Value::as_str)
                .map(|id| !id.trim().is_empty())
                .unwrap_or(false);
            if !id_ok {
                self.logger.warn_with_detail(
                    COMPONENT,
                    &format!("dropping lead row: {}", ValidationError::MissingIdentifier),
                    row.to_string(),
                );
                continue;
            }
            match serde_json::from_value::<Lead>(row.clone()) {
                Ok(lead) => leads.push(lead),
                Err(e) => {
                    self.logger.warn_with_detail(
                        COMPONENT,
                        &format!("dropping malformed lead row: {}", e),
                        row.to_string(),
                    );
                }
            }
        }
        leads
    }
}
