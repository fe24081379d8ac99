//! Wire-level request/response types for the selection API.

use serde_json::Value;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::leads::{LeadFilters, LeadStatus};

/// Query parameters for a lead listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadQuery {
    pub property_id: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub created_after: Option<chrono::DateTime<chrono::Utc>>,
    pub created_before: Option<chrono::DateTime<chrono::Utc>>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for LeadQuery {
    fn default() -> Self {
        Self {
            property_id: None,
            status: None,
            source: None,
            min_score: None,
            max_score: None,
            created_after: None,
            created_before: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl LeadQuery {
    /// Builds a query from active filters plus pagination bounds.
    pub fn from_filters(filters: &LeadFilters, offset: usize, limit: usize) -> Self {
        Self {
            property_id: filters.property_id.clone(),
            status: filters.status,
            source: filters.source.clone(),
            min_score: filters.min_score,
            max_score: filters.max_score,
            created_after: filters.created_after,
            created_before: filters.created_before,
            offset,
            limit,
        }
    }

    /// Serializes set parameters into a query string (without leading '?').
    /// Only active filters are sent; the backend treats absence as "all".
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(v) = &self.property_id {
            params.push(format!("propertyId={}", urlencoding::encode(v)));
        }
        if let Some(v) = self.status {
            // serde renders the snake_case wire tag
            if let Ok(tag) = serde_json::to_value(v) {
                if let Some(tag) = tag.as_str() {
                    params.push(format!("status={}", tag));
                }
            }
        }
        if let Some(v) = &self.source {
            params.push(format!("source={}", urlencoding::encode(v)));
        }
        if let Some(v) = self.min_score {
            params.push(format!("minScore={}", v));
        }
        if let Some(v) = self.max_score {
            params.push(format!("maxScore={}", v));
        }
        if let Some(v) = self.created_after {
            params.push(format!("createdAfter={}", urlencoding::encode(&v.to_rfc3339())));
        }
        if let Some(v) = self.created_before {
            params.push(format!("createdBefore={}", urlencoding::encode(&v.to_rfc3339())));
        }
        params.push(format!("offset={}", self.offset));
        params.push(format!("limit={}", self.limit));
        params.push("sort=score_desc".to_string());
        params.join("&")
    }
}

/// One page of raw lead rows.
///
/// Rows stay untyped here: the service layer owns row validation and decides
/// what to ingest and what to discard.
#[derive(Debug, Clone, Default)]
pub struct LeadPage {
    pub rows: Vec<Value>,
    /// Server-reported total across all pages, when the response carried one.
    pub total: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_includes_only_set_filters() {
        let query = LeadQuery {
            property_id: Some("P42".to_string()),
            status: Some(LeadStatus::Qualified),
            offset: 50,
            limit: 50,
            ..Default::default()
        };
        let qs = query.to_query_string();
        assert!(qs.contains("propertyId=P42"));
        assert!(qs.contains("status=qualified"));
        assert!(qs.contains("offset=50"));
        assert!(qs.contains("limit=50"));
        assert!(!qs.contains("source="));
        assert!(!qs.contains("minScore="));
    }

    #[test]
    fn test_query_string_encodes_values() {
        let query = LeadQuery {
            source: Some("portal one".to_string()),
            ..Default::default()
        };
        assert!(query.to_query_string().contains("source=portal%20one"));
    }
}
