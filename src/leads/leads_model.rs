//! Lead (application) domain models.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Entity;

/// Lifecycle status of a lead.
///
/// The tags mirror the backend's status vocabulary; values this client does
/// not know yet deserialize to [`LeadStatus::Unknown`] instead of failing the
/// whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    ViewingRequested,
    ViewingScheduled,
    ViewingAttended,
    DossierRequested,
    DossierSubmitted,
    Qualified,
    Selected,
    Rejected,
    ReviewRequired,
    #[serde(other)]
    #[default]
    Unknown,
}

impl LeadStatus {
    /// Statuses that count into the pending bucket (neither qualified nor
    /// rejected).
    pub fn is_pending(&self) -> bool {
        !matches!(self, LeadStatus::Qualified | LeadStatus::Rejected)
    }
}

/// A prospective tenant's application to a property.
///
/// The AI-derived and dossier-derived blobs are opaque to this layer; they are
/// passed through, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub property_id: String,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub score: f64,
    /// Portal the lead arrived from (e.g. 'IMMOSCOUT', 'HOMEGATE', 'DIRECT').
    #[serde(default)]
    pub source: Option<String>,
    /// Submission timestamp. Absent on some portal imports.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// AI-derived scoring payload, server-owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_data: Option<Value>,
    /// Dossier-derived extraction payload, server-owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dossier_data: Option<Value>,
}

impl Entity for Lead {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Iteration order for the lead store: descending score. Sorting is stable,
/// so equal scores keep their relative arrival order.
pub fn by_score_desc(a: &Lead, b: &Lead) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// Partial update payload for a lead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dossier_data: Option<Value>,
}

/// Transient filter criteria for the lead list.
///
/// `None` means "no constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilters {
    pub property_id: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl LeadFilters {
    /// Predicate conjunction, short-circuiting on the first failing clause:
    /// property, status, source, inclusive score range, inclusive created-at
    /// range (only applied when either bound is set).
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(property_id) = &self.property_id {
            if &lead.property_id != property_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if lead.source.as_deref() != Some(source.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if lead.score < min {
                return false;
            }
        }
        if let Some(max) = self.max_score {
            if lead.score > max {
                return false;
            }
        }
        if self.created_after.is_some() || self.created_before.is_some() {
            let created_at = match lead.created_at {
                Some(ts) => ts,
                None => return false,
            };
            if let Some(start) = self.created_after {
                if created_at < start {
                    return false;
                }
            }
            if let Some(end) = self.created_before {
                if created_at > end {
                    return false;
                }
            }
        }
        true
    }
}

/// Aggregate statistics over the fetched lead set.
///
/// Computed once at fetch time; the stats selector is a plain accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    /// Server-reported total when the listing response carried one,
    /// otherwise the local count.
    pub total: usize,
    pub qualified_count: usize,
    pub rejected_count: usize,
    pub pending_count: usize,
    /// Average score over the fetched set; 0 when the set is empty.
    pub average_score: f64,
}

impl LeadStats {
    /// Computes stats over `leads`, preferring `server_total` when present.
    pub fn compute(leads: &[Lead], server_total: Option<usize>) -> Self {
        let qualified_count = leads
            .iter()
            .filter(|l| l.status == LeadStatus::Qualified)
            .count();
        let rejected_count = leads
            .iter()
            .filter(|l| l.status == LeadStatus::Rejected)
            .count();
        let pending_count = leads.iter().filter(|l| l.status.is_pending()).count();
        let average_score = if leads.is_empty() {
            0.0
        } else {
            leads.iter().map(|l| l.score).sum::<f64>() / leads.len() as f64
        };
        Self {
            total: server_total.unwrap_or(leads.len()),
            qualified_count,
            rejected_count,
            pending_count,
            average_score,
        }
    }
}
