//! Selection API seam.
//!
//! Services depend on this trait, not on the HTTP client, so tests can swap
//! in a mock and runtime adapters can decorate the transport.

use async_trait::async_trait;

use crate::configs::{NewSelectionConfig, SelectionConfig, SelectionConfigUpdate};
use crate::decisions::{Decision, NewDecision};
use crate::documents::{DocumentExtraction, DocumentJob};
use crate::errors::Result;
use crate::leads::{Lead, LeadUpdate};
use crate::viewings::{NewViewingSlot, ViewingSlot, ViewingSlotUpdate};

use super::models::{LeadPage, LeadQuery};

/// Outbound REST surface of the tenant-selection backend.
///
/// Pure request/response mapping; no business logic lives behind this trait.
#[async_trait]
pub trait SelectionApi: Send + Sync {
    // Configuration
    async fn get_config(&self, property_id: &str) -> Result<SelectionConfig>;
    async fn create_config(&self, config: &NewSelectionConfig) -> Result<SelectionConfig>;
    async fn update_config(
        &self,
        property_id: &str,
        changes: &SelectionConfigUpdate,
    ) -> Result<SelectionConfig>;

    // Leads
    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage>;
    async fn get_lead(&self, lead_id: &str) -> Result<Lead>;
    async fn update_lead(&self, lead_id: &str, changes: &LeadUpdate) -> Result<Lead>;

    // Decisions
    async fn submit_decision(&self, lead_id: &str, decision: &NewDecision) -> Result<Decision>;

    // Viewing slots
    async fn create_viewing_slots(
        &self,
        property_id: &str,
        slots: &[NewViewingSlot],
    ) -> Result<Vec<ViewingSlot>>;
    async fn update_viewing_slot(
        &self,
        slot_id: &str,
        changes: &ViewingSlotUpdate,
    ) -> Result<ViewingSlot>;
    async fn delete_viewing_slot(&self, slot_id: &str) -> Result<()>;

    // Documents
    async fn trigger_document_processing(&self, lead_id: &str) -> Result<DocumentJob>;
    async fn get_document_extraction(&self, lead_id: &str) -> Result<DocumentExtraction>;

    /// Downloads the lead CSV export for a property as raw bytes.
    async fn export_leads_csv(&self, property_id: &str) -> Result<Vec<u8>>;
}
