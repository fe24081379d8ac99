pub(crate) mod documents_model;
pub(crate) mod documents_service;

// Re-export the public interface
pub use documents_model::{DocumentExtraction, DocumentJob};
pub use documents_service::DocumentService;
