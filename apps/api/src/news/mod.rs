//! News Fetcher: pulls recent headlines for a topic and condenses them into a digest
//! that the generation prompts use as context.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

/// Maximum number of headlines carried into the digest.
pub const MAX_HEADLINES: usize = 5;
/// Digest used when the provider has nothing for the topic.
pub const NO_NEWS_SENTINEL: &str = "No recent news found.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Currents API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to fetch news: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Source of headline titles for a topic, in provider order.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn latest_titles(&self, topic: &str) -> Result<Vec<String>, NewsError>;
}

#[derive(Debug, Deserialize)]
struct LatestNewsResponse {
    #[serde(default)]
    news: Option<Vec<Article>>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
}

/// Client for the Currents `latest-news` endpoint.
#[derive(Clone)]
pub struct CurrentsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CurrentsClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, NewsError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NewsError> {
        Self::new(
            config.currents_api_key.clone(),
            config.currents_base_url.clone(),
        )
    }
}

#[async_trait]
impl NewsSource for CurrentsClient {
    async fn latest_titles(&self, topic: &str) -> Result<Vec<String>, NewsError> {
        let response = self
            .client
            .get(format!("{}/latest-news", self.base_url))
            .query(&[
                ("language", "en"),
                ("keywords", topic),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: LatestNewsResponse = response.json().await?;
        Ok(payload
            .news
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.title)
            .collect())
    }
}

/// Joins the first `MAX_HEADLINES` titles with newlines, or returns the sentinel.
pub fn build_digest(titles: &[String]) -> String {
    if titles.is_empty() {
        return NO_NEWS_SENTINEL.to_string();
    }
    titles
        .iter()
        .take(MAX_HEADLINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetches headlines for `topic` and returns the digest.
pub async fn fetch_news(source: &dyn NewsSource, topic: &str) -> Result<String, NewsError> {
    info!("Fetching news for topic: {topic}");

    let titles = source.latest_titles(topic).await?;

    if titles.is_empty() {
        warn!("No news found for topic: {topic}");
    } else {
        info!(
            "Found {} news articles for topic: {topic}",
            titles.len().min(MAX_HEADLINES)
        );
    }

    Ok(build_digest(&titles))
}
