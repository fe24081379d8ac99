pub(crate) mod decisions_model;
pub(crate) mod decisions_service;

// Re-export the public interface
pub use decisions_model::{map_recommendation, Decision, NewDecision};
pub use decisions_service::DecisionService;
