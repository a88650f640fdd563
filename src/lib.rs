pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    analysis_service::AnalysisService,
    completion_client::{CompletionClient, OpenRouterClient},
    generation_service::GenerationService,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub generation_service: GenerationService,
    pub analysis_service: AnalysisService,
    pub generation_enabled: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        let client = OpenRouterClient::from_config(config, http_client)?;
        let mut state = Self::with_client(Arc::new(client), config.model.clone());
        state.generation_enabled = config.openrouter_api_key.is_some();
        Ok(state)
    }

    /// State backed by an arbitrary completion client.
    pub fn with_client(client: Arc<dyn CompletionClient>, model: String) -> Self {
        Self {
            generation_service: GenerationService::new(client.clone(), model.clone()),
            analysis_service: AnalysisService::new(client, model),
            generation_enabled: true,
        }
    }
}
