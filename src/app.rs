//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection:
//! the model adapter goes through an explicit ready/failed/disabled
//! lifecycle here and is then shared read-only with every handler.

use std::sync::Arc;

use crate::model::Config;
use crate::service::{AssistService, ModelState, RuntimeClient};

/// Application state injected into Actix-web handlers
pub struct AppState {
    pub assist: AssistService,
}

impl AppState {
    /// Initialize application state
    ///
    /// Probes the model runtime once; a failed probe leaves the service
    /// running in permanent fallback mode rather than aborting startup.
    pub async fn new(config: &Config) -> Self {
        let model = Self::init_model(config).await;
        Self::with_model(model)
    }

    /// Build state around an already-resolved model lifecycle
    pub fn with_model(model: ModelState) -> Self {
        Self {
            assist: AssistService::new(model),
        }
    }

    async fn init_model(config: &Config) -> ModelState {
        if !config.model.enabled {
            tracing::info!("Model adapter disabled by configuration, serving fallbacks only");
            return ModelState::Disabled;
        }

        let client = match RuntimeClient::new(&config.model) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to construct model runtime client");
                return ModelState::Failed(e.to_string());
            }
        };

        match client.probe().await {
            Ok(()) => {
                tracing::info!(
                    model = %config.model.model_name,
                    runtime_url = %config.model.runtime_url,
                    "Model runtime ready"
                );
                ModelState::Ready(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    runtime_url = %config.model.runtime_url,
                    "Model runtime unreachable, serving fallbacks only"
                );
                ModelState::Failed(e.to_string())
            }
        }
    }
}
