pub(crate) mod client;
pub(crate) mod mock;
pub(crate) mod models;
pub(crate) mod traits;

// Re-export the public interface
pub use client::SelectionApiClient;
pub use mock::MockSelectionApi;
pub use models::{LeadPage, LeadQuery};
pub use traits::SelectionApi;
