//! Tenant-selection configuration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, Result, ValidationError};
use crate::store::Entity;

/// Default viewing-slot parameters applied when scheduling viewings for a
/// property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingDefaults {
    pub slot_minutes: u32,
    pub capacity_per_slot: u32,
}

/// Per-property tenant-selection settings.
///
/// Criteria and scoring weights are server-defined and consumed opaquely by
/// this layer (hard = disqualifying, soft = score-contributing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfig {
    pub property_id: String,
    #[serde(default)]
    pub hard_criteria: Value,
    #[serde(default)]
    pub soft_criteria: Value,
    #[serde(default)]
    pub scoring_weights: Value,
    #[serde(default)]
    pub viewing_defaults: Option<ViewingDefaults>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for SelectionConfig {
    fn id(&self) -> &str {
        &self.property_id
    }
}

/// Input model for creating a property's selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSelectionConfig {
    pub property_id: String,
    #[serde(default)]
    pub hard_criteria: Value,
    #[serde(default)]
    pub soft_criteria: Value,
    #[serde(default)]
    pub scoring_weights: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewing_defaults: Option<ViewingDefaults>,
}

impl NewSelectionConfig {
    /// Validates the new configuration payload.
    pub fn validate(&self) -> Result<()> {
        if self.property_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "propertyId".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update payload for a property's selection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hard_criteria: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_criteria: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_weights: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewing_defaults: Option<ViewingDefaults>,
}
