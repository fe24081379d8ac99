pub(crate) mod viewings_model;
pub(crate) mod viewings_service;

// Re-export the public interface
pub use viewings_model::{by_start_asc, NewViewingSlot, ViewingSlot, ViewingSlotUpdate};
pub use viewings_service::ViewingService;
