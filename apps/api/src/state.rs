use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::generation::generator::GenerationSettings;
use crate::llm_client::{Completer, LlmClient};
use crate::news::{CurrentsClient, NewsSource};

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once from `Config` at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub news: Arc<dyn NewsSource>,
    pub llm: Arc<dyn Completer>,
    pub generation: GenerationSettings,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let news = CurrentsClient::from_config(config).context("Failed to build news client")?;
        let llm = LlmClient::from_config(config).context("Failed to build LLM client")?;

        Ok(Self {
            news: Arc::new(news),
            llm: Arc::new(llm),
            generation: GenerationSettings::from(config),
        })
    }
}
