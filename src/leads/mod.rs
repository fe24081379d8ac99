pub(crate) mod leads_model;
pub(crate) mod leads_selectors;
pub(crate) mod leads_service;

// Re-export the public interface
pub use leads_model::{by_score_desc, Lead, LeadFilters, LeadStats, LeadStatus, LeadUpdate};
pub use leads_selectors::FilteredLeadsSelector;
pub use leads_service::{FetchOutcome, LeadService};
