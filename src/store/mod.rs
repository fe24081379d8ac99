pub(crate) mod entity_store;

pub use entity_store::{Entity, EntityStore};
