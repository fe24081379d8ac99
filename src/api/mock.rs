//! Mock API client for testing - serves queued responses and records calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::configs::{NewSelectionConfig, SelectionConfig, SelectionConfigUpdate};
use crate::decisions::{Decision, NewDecision};
use crate::documents::{DocumentExtraction, DocumentJob};
use crate::errors::{Error, Result};
use crate::leads::{Lead, LeadUpdate};
use crate::viewings::{NewViewingSlot, ViewingSlot, ViewingSlotUpdate};

use super::models::{LeadPage, LeadQuery};
use super::traits::SelectionApi;

type Queue<T> = Mutex<VecDeque<Result<T>>>;

fn pop<T>(queue: &Queue<T>, endpoint: &str) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(Error::Unexpected(format!("no mock response queued for {}", endpoint))))
}

/// Mock implementation of [`SelectionApi`].
///
/// Responses are queued per endpoint; a call without a queued response fails.
/// Listing calls are recorded so tests can assert on the dispatched query,
/// and can be delayed to exercise request supersession.
#[derive(Default)]
pub struct MockSelectionApi {
    pub config_responses: Queue<SelectionConfig>,
    pub list_leads_responses: Queue<LeadPage>,
    pub lead_responses: Queue<Lead>,
    pub decision_responses: Queue<Decision>,
    pub created_slots_responses: Queue<Vec<ViewingSlot>>,
    pub slot_responses: Queue<ViewingSlot>,
    pub delete_slot_responses: Queue<()>,
    pub document_job_responses: Queue<DocumentJob>,
    pub extraction_responses: Queue<DocumentExtraction>,
    pub export_responses: Queue<Vec<u8>>,

    /// Per-call delays applied before answering a listing request.
    pub list_leads_delays: Mutex<VecDeque<Duration>>,
    /// Every listing query this mock has served, in dispatch order.
    pub list_leads_calls: Mutex<Vec<LeadQuery>>,
}

impl MockSelectionApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_config(&self, response: Result<SelectionConfig>) {
        self.config_responses.lock().unwrap().push_back(response);
    }

    pub fn push_lead_page(&self, response: Result<LeadPage>) {
        self.list_leads_responses.lock().unwrap().push_back(response);
    }

    pub fn push_lead(&self, response: Result<Lead>) {
        self.lead_responses.lock().unwrap().push_back(response);
    }

    pub fn push_decision(&self, response: Result<Decision>) {
        self.decision_responses.lock().unwrap().push_back(response);
    }

    pub fn push_created_slots(&self, response: Result<Vec<ViewingSlot>>) {
        self.created_slots_responses.lock().unwrap().push_back(response);
    }

    pub fn push_slot(&self, response: Result<ViewingSlot>) {
        self.slot_responses.lock().unwrap().push_back(response);
    }

    pub fn push_delete_slot(&self, response: Result<()>) {
        self.delete_slot_responses.lock().unwrap().push_back(response);
    }

    pub fn push_document_job(&self, response: Result<DocumentJob>) {
        self.document_job_responses.lock().unwrap().push_back(response);
    }

    pub fn push_extraction(&self, response: Result<DocumentExtraction>) {
        self.extraction_responses.lock().unwrap().push_back(response);
    }

    pub fn push_export(&self, response: Result<Vec<u8>>) {
        self.export_responses.lock().unwrap().push_back(response);
    }

    pub fn push_list_delay(&self, delay: Duration) {
        self.list_leads_delays.lock().unwrap().push_back(delay);
    }

    pub fn list_leads_calls(&self) -> Vec<LeadQuery> {
        self.list_leads_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SelectionApi for MockSelectionApi {
    async fn get_config(&self, _property_id: &str) -> Result<SelectionConfig> {
        pop(&self.config_responses, "get_config")
    }

    async fn create_config(&self, config: &NewSelectionConfig) -> Result<SelectionConfig> {
        config.validate()?;
        pop(&self.config_responses, "create_config")
    }

    async fn update_config(
        &self,
        _property_id: &str,
        _changes: &SelectionConfigUpdate,
    ) -> Result<SelectionConfig> {
        pop(&self.config_responses, "update_config")
    }

    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage> {
        self.list_leads_calls.lock().unwrap().push(query.clone());
        let delay = self.list_leads_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        pop(&self.list_leads_responses, "list_leads")
    }

    async fn get_lead(&self, _lead_id: &str) -> Result<Lead> {
        pop(&self.lead_responses, "get_lead")
    }

    async fn update_lead(&self, _lead_id: &str, _changes: &LeadUpdate) -> Result<Lead> {
        pop(&self.lead_responses, "update_lead")
    }

    async fn submit_decision(&self, _lead_id: &str, _decision: &NewDecision) -> Result<Decision> {
        pop(&self.decision_responses, "submit_decision")
    }

    async fn create_viewing_slots(
        &self,
        _property_id: &str,
        _slots: &[NewViewingSlot],
    ) -> Result<Vec<ViewingSlot>> {
        pop(&self.created_slots_responses, "create_viewing_slots")
    }

    async fn update_viewing_slot(
        &self,
        _slot_id: &str,
        _changes: &ViewingSlotUpdate,
    ) -> Result<ViewingSlot> {
        pop(&self.slot_responses, "update_viewing_slot")
    }

    async fn delete_viewing_slot(&self, _slot_id: &str) -> Result<()> {
        pop(&self.delete_slot_responses, "delete_viewing_slot")
    }

    async fn trigger_document_processing(&self, _lead_id: &str) -> Result<DocumentJob> {
        pop(&self.document_job_responses, "trigger_document_processing")
    }

    async fn get_document_extraction(&self, _lead_id: &str) -> Result<DocumentExtraction> {
        pop(&self.extraction_responses, "get_document_extraction")
    }

    async fn export_leads_csv(&self, _property_id: &str) -> Result<Vec<u8>> {
        pop(&self.export_responses, "export_leads_csv")
    }
}
