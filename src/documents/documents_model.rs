//! Document-processing models.
//!
//! Extraction happens server-side; this layer only triggers processing and
//! passes the extracted payload through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-side processing job started for a lead's dossier documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentJob {
    pub id: String,
    pub lead_id: String,
    /// Server-owned job status tag (e.g. 'queued', 'processing', 'done').
    pub status: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Extraction result for a lead's dossier documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExtraction {
    pub lead_id: String,
    /// Extracted fields, server-owned and opaque to this layer.
    #[serde(default)]
    pub extracted: Value,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub extracted_at: Option<DateTime<Utc>>,
}
