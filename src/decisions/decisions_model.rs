//! Decision domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leads::LeadStatus;
use crate::store::Entity;

/// The outcome recorded for a lead. Keyed by the lead identifier: one
/// decision per lead, a decision upserts, it never appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub lead_id: String,
    /// 'accept', 'reject', or a custom recommendation value.
    pub recommendation: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl Entity for Decision {
    fn id(&self) -> &str {
        &self.lead_id
    }
}

/// Payload submitted when recording a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDecision {
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Lead status implied by a recommendation value.
///
/// Ambiguous or custom recommendation values land in an explicit
/// review-required bucket; they must never silently default to qualified.
/// Every code path that pairs a decision with a lead status transition goes
/// through this function.
pub fn map_recommendation(recommendation: &str) -> LeadStatus {
    match recommendation {
        "accept" => LeadStatus::Qualified,
        "reject" => LeadStatus::Rejected,
        _ => LeadStatus::ReviewRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_mapping() {
        assert_eq!(map_recommendation("accept"), LeadStatus::Qualified);
        assert_eq!(map_recommendation("reject"), LeadStatus::Rejected);
        assert_eq!(map_recommendation("waitlist"), LeadStatus::ReviewRequired);
        assert_eq!(map_recommendation(""), LeadStatus::ReviewRequired);
        assert_eq!(
            map_recommendation("Accept"),
            LeadStatus::ReviewRequired,
            "matching is exact, unexpected casing goes to review"
        );
    }

    #[test]
    fn test_decision_keyed_by_lead_id() {
        let decision = Decision {
            lead_id: "L9".to_string(),
            recommendation: "accept".to_string(),
            reasoning: Some("stable income".to_string()),
            decided_at: None,
        };
        assert_eq!(decision.id(), "L9");
    }
}
