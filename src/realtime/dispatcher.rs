//! Realtime update ingestion.

use std::sync::Arc;

use log::debug;

use crate::decisions::map_recommendation;
use crate::logging::AppLogger;
use crate::state::SelectionState;

use super::realtime_event::RealtimeEvent;

const COMPONENT: &str = "RealtimeDispatcher";

/// Routes inbound push events to store mutations.
///
/// Ingestion is idempotent under redelivery: everything goes through upsert
/// semantics, so a duplicated `new_lead` for a known identifier resolves to
/// an update, never a duplicate entry.
pub struct RealtimeDispatcher {
    state: Arc<SelectionState>,
    logger: Arc<AppLogger>,
}

impl RealtimeDispatcher {
    pub fn new(state: Arc<SelectionState>, logger: Arc<AppLogger>) -> Self {
        Self { state, logger }
    }

    /// Applies one event. Best-effort: envelopes without a usable identifier
    /// are dropped with a diagnostic.
    pub fn apply(&self, event: RealtimeEvent) {
        match event {
            RealtimeEvent::NewLead { lead } | RealtimeEvent::LeadUpdated { lead } => {
                if lead.id.trim().is_empty() {
                    self.logger
                        .warn(COMPONENT, "dropping lead event without identifier");
                    return;
                }
                debug!("Ingesting realtime lead event for {}", lead.id);
                self.state.write(|s| {
                    s.leads.upsert_one(lead);
                    s.recompute_stats();
                });
            }
            RealtimeEvent::DecisionMade { decision } => {
                if decision.lead_id.trim().is_empty() {
                    self.logger
                        .warn(COMPONENT, "dropping decision event without lead identifier");
                    return;
                }
                debug!("Ingesting realtime decision for {}", decision.lead_id);
                let status = map_recommendation(&decision.recommendation);
                let lead_id = decision.lead_id.clone();
                let transitioned = self.state.write(|s| {
                    let transitioned = s
                        .leads
                        .update_one(&decision.lead_id, |lead| lead.status = status);
                    s.decisions.upsert_one(decision);
                    s.recompute_stats();
                    transitioned
                });
                if !transitioned {
                    self.logger.warn(
                        COMPONENT,
                        &format!(
                            "decision for lead {} recorded without status transition (lead not in store)",
                            lead_id
                        ),
                    );
                }
            }
        }
    }
}
