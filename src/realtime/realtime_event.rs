//! Inbound push-event envelope.

use serde::{Deserialize, Serialize};

use crate::decisions::Decision;
use crate::leads::Lead;

/// Typed envelope delivered by the push transport (WebSocket or SSE; the
/// transport itself is an external collaborator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A lead arrived that this client may not know yet.
    NewLead { lead: Lead },

    /// An existing lead changed server-side.
    LeadUpdated { lead: Lead },

    /// A decision was recorded (possibly by another session).
    DecisionMade { decision: Decision },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::LeadStatus;

    #[test]
    fn test_envelope_round_trip() {
        let event = RealtimeEvent::DecisionMade {
            decision: Decision {
                lead_id: "L1".to_string(),
                recommendation: "accept".to_string(),
                reasoning: None,
                decided_at: None,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"decision_made\""));

        let deserialized: RealtimeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_new_lead_envelope_parses_wire_shape() {
        let event: RealtimeEvent = serde_json::from_str(
            r#"{"type":"new_lead","lead":{"id":"L7","score":55,"status":"viewing_requested"}}"#,
        )
        .unwrap();
        match event {
            RealtimeEvent::NewLead { lead } => {
                assert_eq!(lead.id, "L7");
                assert_eq!(lead.status, LeadStatus::ViewingRequested);
            }
            other => panic!("expected NewLead, got {:?}", other),
        }
    }
}
