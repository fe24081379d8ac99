//! Viewing-slot domain models.
//!
//! Viewing slots live in the same normalized store contract as leads and
//! configs. This is the one store that also removes records (bulk delete).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// A scheduled viewing time window with capacity and current allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingSlot {
    pub id: String,
    pub property_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: u32,
    #[serde(default)]
    pub booked_count: u32,
}

impl ViewingSlot {
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }

    pub fn is_full(&self) -> bool {
        self.booked_count >= self.capacity
    }
}

impl Entity for ViewingSlot {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Iteration order for the viewing-slot store: chronological by start time.
pub fn by_start_asc(a: &ViewingSlot, b: &ViewingSlot) -> Ordering {
    a.starts_at.cmp(&b.starts_at)
}

/// Payload for bulk-creating viewing slots for a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewViewingSlot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: u32,
}

/// Partial update payload for a viewing slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingSlotUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(id: &str, hour: u32, capacity: u32, booked: u32) -> ViewingSlot {
        ViewingSlot {
            id: id.to_string(),
            property_id: "P42".to_string(),
            starts_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 30, 0).unwrap(),
            capacity,
            booked_count: booked,
        }
    }

    #[test]
    fn test_remaining_capacity_saturates() {
        assert_eq!(slot("V1", 10, 5, 2).remaining_capacity(), 3);
        assert_eq!(slot("V2", 10, 5, 7).remaining_capacity(), 0);
        assert!(slot("V2", 10, 5, 5).is_full());
    }

    #[test]
    fn test_chronological_order() {
        let earlier = slot("V1", 9, 5, 0);
        let later = slot("V2", 14, 5, 0);
        assert_eq!(by_start_asc(&earlier, &later), std::cmp::Ordering::Less);
    }
}
