//! Decision-making workflow.

use std::sync::Arc;

use log::debug;

use crate::api::SelectionApi;
use crate::constants::DECISION_KEY_PREFIX;
use crate::errors::Result;
use crate::logging::AppLogger;
use crate::state::SelectionState;

use super::decisions_model::{map_recommendation, Decision, NewDecision};

const COMPONENT: &str = "DecisionService";

/// Service for recording accept/reject decisions on leads.
pub struct DecisionService {
    api: Arc<dyn SelectionApi>,
    state: Arc<SelectionState>,
    logger: Arc<AppLogger>,
}

impl DecisionService {
    pub fn new(
        api: Arc<dyn SelectionApi>,
        state: Arc<SelectionState>,
        logger: Arc<AppLogger>,
    ) -> Self {
        Self { api, state, logger }
    }

    /// Records a decision for a lead.
    ///
    /// There is no optimistic mutation: the server confirms first, and only
    /// then the decision upsert and the paired lead status transition commit
    /// together inside one write lock. On failure both stores are untouched
    /// and the server's error message surfaces verbatim.
    pub async fn make_decision(
        &self,
        lead_id: &str,
        recommendation: &str,
        reasoning: Option<String>,
    ) -> Result<Decision> {
        let key = format!("{}{}", DECISION_KEY_PREFIX, lead_id);
        let token = self.state.requests.begin(&key);
        debug!("Submitting decision '{}' for lead {}", recommendation, lead_id);

        let payload = NewDecision {
            recommendation: recommendation.to_string(),
            reasoning,
        };

        match self.api.submit_decision(lead_id, &payload).await {
            Ok(decision) => {
                // Server-confirmed recommendation drives the transition.
                let status = map_recommendation(&decision.recommendation);
                let applied = self.state.commit_if_current(&key, token, |s| {
                    s.decisions.upsert_one(decision.clone());
                    s.leads.update_one(&decision.lead_id, |lead| lead.status = status);
                    s.recompute_stats();
                });
                if applied.is_some() {
                    self.state.requests.succeed(&key, token);
                    self.logger.info(
                        COMPONENT,
                        &format!("recorded '{}' for lead {}", decision.recommendation, lead_id),
                    );
                }
                Ok(decision)
            }
            Err(err) => {
                self.state.requests.fail(&key, token, &err);
                Err(err)
            }
        }
    }

    /// The recorded decision for a lead, if any.
    pub fn get_decision(&self, lead_id: &str) -> Option<Decision> {
        self.state.read(|s| s.decisions.get(lead_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSelectionApi;
    use crate::errors::{ApiError, Error};
    use crate::leads::{Lead, LeadStatus};
    use crate::state::RequestStatus;

    fn seeded_state(lead_id: &str) -> Arc<SelectionState> {
        let state = SelectionState::new();
        state.write(|s| {
            s.leads.upsert_one(Lead {
                id: lead_id.to_string(),
                property_id: "P42".to_string(),
                applicant_name: None,
                email: None,
                status: LeadStatus::DossierSubmitted,
                score: 70.0,
                source: None,
                created_at: None,
                ai_data: None,
                dossier_data: None,
            });
        });
        state
    }

    fn decision(lead_id: &str, recommendation: &str) -> Decision {
        Decision {
            lead_id: lead_id.to_string(),
            recommendation: recommendation.to_string(),
            reasoning: None,
            decided_at: None,
        }
    }

    async fn run_decision(
        recommendation: &str,
    ) -> (Arc<SelectionState>, Result<Decision>) {
        let api = MockSelectionApi::new();
        api.push_decision(Ok(decision("L1", recommendation)));
        let state = seeded_state("L1");
        let service =
            DecisionService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));
        let result = service.make_decision("L1", recommendation, None).await;
        (state, result)
    }

    #[tokio::test]
    async fn test_accept_pairs_qualified_status() {
        let (state, result) = run_decision("accept").await;
        assert!(result.is_ok());
        state.read(|s| {
            assert_eq!(s.leads.get("L1").unwrap().status, LeadStatus::Qualified);
            assert_eq!(s.decisions.get("L1").unwrap().recommendation, "accept");
            assert_eq!(s.stats.qualified_count, 1);
        });
    }

    #[tokio::test]
    async fn test_reject_pairs_rejected_status() {
        let (state, _) = run_decision("reject").await;
        state.read(|s| {
            assert_eq!(s.leads.get("L1").unwrap().status, LeadStatus::Rejected);
            assert_eq!(s.stats.rejected_count, 1);
        });
    }

    #[tokio::test]
    async fn test_custom_recommendation_pairs_review_required() {
        let (state, _) = run_decision("maybe_later").await;
        state.read(|s| {
            assert_eq!(s.leads.get("L1").unwrap().status, LeadStatus::ReviewRequired);
        });
    }

    #[tokio::test]
    async fn test_decision_upserts_instead_of_appending() {
        let api = MockSelectionApi::new();
        api.push_decision(Ok(decision("L1", "reject")));
        api.push_decision(Ok(decision("L1", "accept")));
        let state = seeded_state("L1");
        let service =
            DecisionService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));

        service.make_decision("L1", "reject", None).await.unwrap();
        service.make_decision("L1", "accept", None).await.unwrap();

        state.read(|s| {
            assert_eq!(s.decisions.len(), 1, "one decision per lead");
            assert_eq!(s.decisions.get("L1").unwrap().recommendation, "accept");
            assert_eq!(s.leads.get("L1").unwrap().status, LeadStatus::Qualified);
        });
    }

    #[tokio::test]
    async fn test_server_failure_leaves_both_stores_untouched() {
        let api = MockSelectionApi::new();
        api.push_decision(Err(Error::Api(ApiError::Server {
            status: 404,
            message: "Lead not found".to_string(),
        })));
        let state = seeded_state("L9");
        let service =
            DecisionService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));

        let err = service
            .make_decision("L9", "reject", Some("insufficient income".to_string()))
            .await
            .unwrap_err();

        match &err {
            Error::Api(ApiError::Server { message, .. }) => {
                assert_eq!(message, "Lead not found", "server message is verbatim");
            }
            other => panic!("expected server error, got {:?}", other),
        }
        state.read(|s| {
            assert!(s.decisions.get("L9").is_none());
            assert_eq!(
                s.leads.get("L9").unwrap().status,
                LeadStatus::DossierSubmitted,
                "lead status unchanged on failure"
            );
        });
        let request = state.requests.state("decision_L9");
        assert_eq!(request.status, RequestStatus::Failed);
        assert_eq!(request.error.unwrap().message, "Lead not found");
    }
}
