pub(crate) mod configs_model;
pub(crate) mod configs_service;

// Re-export the public interface
pub use configs_model::{
    NewSelectionConfig, SelectionConfig, SelectionConfigUpdate, ViewingDefaults,
};
pub use configs_service::ConfigService;
