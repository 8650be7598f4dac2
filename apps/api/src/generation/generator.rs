//! Post Generation: orchestrates the news fetch and the three completion calls.
//!
//! Flow: fetch_news (once) → title → meta description (from title) →
//!       body (from topic + digest) → validated GeneratedPost.
//!
//! Strictly sequential. The first failure aborts the remaining calls.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::errors::{AppError, GenerationError};
use crate::generation::prompts::{body_prompt, meta_prompt, title_prompt};
use crate::llm_client::{Completer, CompletionRequest};
use crate::news::{fetch_news, NewsSource};

/// Shared by all three completion calls.
pub const TEMPERATURE: f32 = 0.5;

const TITLE_MAX_TOKENS: u32 = 40;
const META_MAX_TOKENS: u32 = 120;
const BODY_MAX_TOKENS: u32 = 1500;
const BODY_REPETITION_PENALTY: f32 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A fully validated blog post. Only built once all three calls succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub title: String,
    pub meta_description: String,
    pub post_content: String,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    /// Bodies shorter than this many characters are rejected.
    pub min_post_chars: usize,
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_post_chars: config.min_post_chars,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Fetches the news digest for `topic` once, then generates the post from it.
pub async fn generate_post(
    news: &dyn NewsSource,
    llm: &dyn Completer,
    settings: GenerationSettings,
    topic: &str,
) -> Result<GeneratedPost, AppError> {
    let digest = fetch_news(news, topic).await?;
    generate_from_digest(llm, settings, topic, &digest).await
}

/// Runs title → meta description → body against an already fetched digest.
pub async fn generate_from_digest(
    llm: &dyn Completer,
    settings: GenerationSettings,
    topic: &str,
    digest: &str,
) -> Result<GeneratedPost, AppError> {
    info!("Generating content for topic: {topic}");

    let title = generate_title(llm, topic, digest).await?;
    info!("Generated title: {title}");

    let meta_description = generate_meta_description(llm, &title).await?;
    info!("Generated meta description: {meta_description}");

    let post_content = generate_body(llm, topic, digest, settings.min_post_chars).await?;
    info!(
        "Generated article with {} characters",
        post_content.chars().count()
    );

    Ok(GeneratedPost {
        title,
        meta_description,
        post_content,
    })
}

async fn generate_title(
    llm: &dyn Completer,
    topic: &str,
    digest: &str,
) -> Result<String, AppError> {
    let request = CompletionRequest {
        prompt: title_prompt(topic, digest),
        max_tokens: TITLE_MAX_TOKENS,
        temperature: TEMPERATURE,
        stop: Some("\n"),
        presence_penalty: None,
        frequency_penalty: None,
    };

    let title = llm.complete(&request).await?.trim().to_string();
    if title.is_empty() {
        return Err(GenerationError::EmptyTitle.into());
    }
    Ok(title)
}

async fn generate_meta_description(llm: &dyn Completer, title: &str) -> Result<String, AppError> {
    let request = CompletionRequest {
        prompt: meta_prompt(title),
        max_tokens: META_MAX_TOKENS,
        temperature: TEMPERATURE,
        stop: Some("."),
        presence_penalty: None,
        frequency_penalty: None,
    };

    let meta = llm.complete(&request).await?.trim().to_string();
    if meta.is_empty() {
        return Err(GenerationError::EmptyMetaDescription.into());
    }
    Ok(meta)
}

async fn generate_body(
    llm: &dyn Completer,
    topic: &str,
    digest: &str,
    min_chars: usize,
) -> Result<String, AppError> {
    let request = CompletionRequest {
        prompt: body_prompt(topic, digest, min_chars),
        max_tokens: BODY_MAX_TOKENS,
        temperature: TEMPERATURE,
        stop: None,
        presence_penalty: Some(BODY_REPETITION_PENALTY),
        frequency_penalty: Some(BODY_REPETITION_PENALTY),
    };

    let body = llm.complete(&request).await?.trim().to_string();
    let chars = body.chars().count();
    if body.is_empty() || chars < min_chars {
        return Err(GenerationError::ContentTooShort { chars, min_chars }.into());
    }
    Ok(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
