//! Viewing-slot workflows.

use std::sync::Arc;

use log::debug;

use crate::api::SelectionApi;
use crate::constants::SLOT_KEY_PREFIX;
use crate::errors::Result;
use crate::logging::AppLogger;
use crate::state::SelectionState;

use super::viewings_model::{NewViewingSlot, ViewingSlot, ViewingSlotUpdate};

const COMPONENT: &str = "ViewingService";

const VIEWINGS_REQUEST_KEY: &str = "viewings";

/// Service for scheduling property viewings.
pub struct ViewingService {
    api: Arc<dyn SelectionApi>,
    state: Arc<SelectionState>,
    logger: Arc<AppLogger>,
}

impl ViewingService {
    pub fn new(
        api: Arc<dyn SelectionApi>,
        state: Arc<SelectionState>,
        logger: Arc<AppLogger>,
    ) -> Self {
        Self { api, state, logger }
    }

    /// Creates a batch of slots for a property and ingests the server's
    /// records (which carry the generated identifiers).
    pub async fn bulk_create_slots(
        &self,
        property_id: &str,
        slots: Vec<NewViewingSlot>,
    ) -> Result<Vec<ViewingSlot>> {
        let token = self.state.requests.begin(VIEWINGS_REQUEST_KEY);
        debug!("Creating {} viewing slots for property {}", slots.len(), property_id);

        match self.api.create_viewing_slots(property_id, &slots).await {
            Ok(created) => {
                self.state.commit_if_current(VIEWINGS_REQUEST_KEY, token, |s| {
                    s.viewings.upsert_many(created.clone())
                });
                self.state.requests.succeed(VIEWINGS_REQUEST_KEY, token);
                self.logger.info(
                    COMPONENT,
                    &format!("created {} slots for property {}", created.len(), property_id),
                );
                Ok(created)
            }
            Err(err) => {
                self.state.requests.fail(VIEWINGS_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// Updates a slot and replaces its store record. Tracked under a per-slot
    /// key, so a superseded update cannot overwrite a newer one.
    pub async fn update_slot(
        &self,
        slot_id: &str,
        changes: ViewingSlotUpdate,
    ) -> Result<ViewingSlot> {
        let key = format!("{}{}", SLOT_KEY_PREFIX, slot_id);
        let token = self.state.requests.begin(&key);

        match self.api.update_viewing_slot(slot_id, &changes).await {
            Ok(updated) => {
                self.state
                    .commit_if_current(&key, token, |s| s.viewings.upsert_one(updated.clone()));
                self.state.requests.succeed(&key, token);
                Ok(updated)
            }
            Err(err) => {
                self.state.requests.fail(&key, token, &err);
                Err(err)
            }
        }
    }

    /// Deletes a slot server-side, then removes it locally. Shares the
    /// per-slot key with [`update_slot`](Self::update_slot).
    pub async fn delete_slot(&self, slot_id: &str) -> Result<()> {
        let key = format!("{}{}", SLOT_KEY_PREFIX, slot_id);
        let token = self.state.requests.begin(&key);

        match self.api.delete_viewing_slot(slot_id).await {
            Ok(()) => {
                self.state.commit_if_current(&key, token, |s| {
                    s.viewings.remove_one(slot_id);
                });
                self.state.requests.succeed(&key, token);
                Ok(())
            }
            Err(err) => {
                self.state.requests.fail(&key, token, &err);
                Err(err)
            }
        }
    }

    /// Slots for a property, chronological by start time.
    pub fn slots_for_property(&self, property_id: &str) -> Vec<ViewingSlot> {
        self.state.read(|s| {
            s.viewings
                .iter()
                .filter(|slot| slot.property_id == property_id)
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSelectionApi;
    use crate::state::RequestStatus;
    use chrono::{TimeZone, Utc};

    fn slot(id: &str, property_id: &str, hour: u32) -> ViewingSlot {
        ViewingSlot {
            id: id.to_string(),
            property_id: property_id.to_string(),
            starts_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 30, 0).unwrap(),
            capacity: 6,
            booked_count: 0,
        }
    }

    fn new_slot(hour: u32) -> NewViewingSlot {
        NewViewingSlot {
            starts_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 30, 0).unwrap(),
            capacity: 6,
        }
    }

    #[tokio::test]
    async fn test_bulk_create_normalizes_into_store() {
        let api = MockSelectionApi::new();
        api.push_created_slots(Ok(vec![slot("V2", "P42", 14), slot("V1", "P42", 9)]));
        let state = SelectionState::new();
        let service = ViewingService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));

        service
            .bulk_create_slots("P42", vec![new_slot(14), new_slot(9)])
            .await
            .unwrap();

        let slots = service.slots_for_property("P42");
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, "V1", "iteration is chronological");
        assert!(service.slots_for_property("P7").is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_record_by_id() {
        let api = MockSelectionApi::new();
        api.push_created_slots(Ok(vec![slot("V1", "P42", 9)]));
        let mut updated = slot("V1", "P42", 9);
        updated.booked_count = 4;
        api.push_slot(Ok(updated));
        let state = SelectionState::new();
        let service = ViewingService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));

        service.bulk_create_slots("P42", vec![new_slot(9)]).await.unwrap();
        service
            .update_slot("V1", ViewingSlotUpdate::default())
            .await
            .unwrap();

        state.read(|s| {
            assert_eq!(s.viewings.len(), 1);
            assert_eq!(s.viewings.get("V1").unwrap().booked_count, 4);
        });
        assert_eq!(state.requests.state("slot_V1").status, RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_slot_mutations_track_per_slot_request_state() {
        let api = MockSelectionApi::new();
        api.push_created_slots(Ok(vec![slot("V1", "P42", 9)]));
        let state = SelectionState::new();
        let service =
            ViewingService::new(
            Arc::clone(&api) as Arc<dyn SelectionApi>,
            Arc::clone(&state),
            Arc::new(AppLogger::new()),
        );

        service.bulk_create_slots("P42", vec![new_slot(9)]).await.unwrap();

        // No queued response: the update fails and the per-slot key records it.
        let result = service.update_slot("V1", ViewingSlotUpdate::default()).await;
        assert!(result.is_err());
        assert_eq!(state.requests.state("slot_V1").status, RequestStatus::Failed);
        state.read(|s| {
            assert_eq!(s.viewings.get("V1").unwrap().booked_count, 0, "store untouched on failure")
        });
        assert_eq!(state.requests.state("slot_V9").status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_delete_removes_locally_after_server_confirms() {
        let api = MockSelectionApi::new();
        api.push_created_slots(Ok(vec![slot("V1", "P42", 9)]));
        api.push_delete_slot(Ok(()));
        let state = SelectionState::new();
        let service = ViewingService::new(api, Arc::clone(&state), Arc::new(AppLogger::new()));

        service.bulk_create_slots("P42", vec![new_slot(9)]).await.unwrap();
        service.delete_slot("V1").await.unwrap();

        state.read(|s| assert!(s.viewings.is_empty()));
    }
}
