//! Document-processing and export workflows.
//!
//! Thin pass-throughs: extraction and CSV generation happen server-side.

use std::sync::Arc;

use log::debug;

use crate::api::SelectionApi;
use crate::errors::Result;
use crate::logging::AppLogger;

use super::documents_model::{DocumentExtraction, DocumentJob};

const COMPONENT: &str = "DocumentService";

pub struct DocumentService {
    api: Arc<dyn SelectionApi>,
    logger: Arc<AppLogger>,
}

impl DocumentService {
    pub fn new(api: Arc<dyn SelectionApi>, logger: Arc<AppLogger>) -> Self {
        Self { api, logger }
    }

    /// Starts server-side processing of a lead's dossier documents.
    pub async fn trigger_processing(&self, lead_id: &str) -> Result<DocumentJob> {
        debug!("Triggering document processing for lead {}", lead_id);
        let job = self.api.trigger_document_processing(lead_id).await?;
        self.logger.info(
            COMPONENT,
            &format!("processing job {} started for lead {}", job.id, lead_id),
        );
        Ok(job)
    }

    /// Retrieves the extraction result for a lead's documents. The payload
    /// is passed through untouched.
    pub async fn get_extraction(&self, lead_id: &str) -> Result<DocumentExtraction> {
        self.api.get_document_extraction(lead_id).await
    }

    /// Downloads the CSV export for a property as raw bytes. The caller is
    /// responsible for persisting or offering the download.
    pub async fn export_csv(&self, property_id: &str) -> Result<Vec<u8>> {
        let bytes = self.api.export_leads_csv(property_id).await?;
        debug!("Downloaded {} byte export for property {}", bytes.len(), property_id);
        Ok(bytes)
    }
}
