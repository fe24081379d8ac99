//! Selection-configuration workflows.

use std::sync::Arc;

use log::debug;

use crate::api::SelectionApi;
use crate::constants::CONFIG_REQUEST_KEY;
use crate::errors::Result;
use crate::logging::AppLogger;
use crate::state::SelectionState;

use super::configs_model::{NewSelectionConfig, SelectionConfig, SelectionConfigUpdate};

const COMPONENT: &str = "ConfigService";

/// Service for per-property tenant-selection settings.
///
/// Configs are created once and updated in place; deletion is a backend
/// concern and never happens in this layer.
pub struct ConfigService {
    api: Arc<dyn SelectionApi>,
    state: Arc<SelectionState>,
    logger: Arc<AppLogger>,
}

impl ConfigService {
    pub fn new(
        api: Arc<dyn SelectionApi>,
        state: Arc<SelectionState>,
        logger: Arc<AppLogger>,
    ) -> Self {
        Self { api, state, logger }
    }

    /// Fetches a property's configuration and caches it in the store.
    pub async fn fetch_config(&self, property_id: &str) -> Result<SelectionConfig> {
        let token = self.state.requests.begin(CONFIG_REQUEST_KEY);
        debug!("Fetching selection config for property {}", property_id);

        match self.api.get_config(property_id).await {
            Ok(config) => {
                self.state.commit_if_current(CONFIG_REQUEST_KEY, token, |s| {
                    s.configs.upsert_one(config.clone())
                });
                self.state.requests.succeed(CONFIG_REQUEST_KEY, token);
                Ok(config)
            }
            Err(err) => {
                self.state.requests.fail(CONFIG_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// Creates a property's configuration. Shares the config request category
    /// with fetch and update, so the latest dispatch wins.
    pub async fn save_config(&self, config: NewSelectionConfig) -> Result<SelectionConfig> {
        config.validate()?;
        let token = self.state.requests.begin(CONFIG_REQUEST_KEY);

        match self.api.create_config(&config).await {
            Ok(created) => {
                self.state.commit_if_current(CONFIG_REQUEST_KEY, token, |s| {
                    s.configs.upsert_one(created.clone())
                });
                self.state.requests.succeed(CONFIG_REQUEST_KEY, token);
                self.logger.info(
                    COMPONENT,
                    &format!("created selection config for property {}", created.property_id),
                );
                Ok(created)
            }
            Err(err) => {
                self.state.requests.fail(CONFIG_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// Applies a partial update to a property's configuration.
    pub async fn update_config(
        &self,
        property_id: &str,
        changes: SelectionConfigUpdate,
    ) -> Result<SelectionConfig> {
        let token = self.state.requests.begin(CONFIG_REQUEST_KEY);

        match self.api.update_config(property_id, &changes).await {
            Ok(updated) => {
                self.state.commit_if_current(CONFIG_REQUEST_KEY, token, |s| {
                    s.configs.upsert_one(updated.clone())
                });
                self.state.requests.succeed(CONFIG_REQUEST_KEY, token);
                Ok(updated)
            }
            Err(err) => {
                self.state.requests.fail(CONFIG_REQUEST_KEY, token, &err);
                Err(err)
            }
        }
    }

    /// The cached configuration for a property, if one has been fetched.
    pub fn get_cached(&self, property_id: &str) -> Option<SelectionConfig> {
        self.state.read(|s| s.configs.get(property_id).cloned())
    }
}
