//! Agricultural news lookup against gnews.io
//!
//! Feeds are cached for 5 hours per query. Degrades to an empty article
//! list with an `error` field when the key is unconfigured or the
//! upstream call fails - the dashboard still renders.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const DEFAULT_NEWS_BASE_URL: &str = "https://gnews.io";
const DEFAULT_CACHE_TTL_SECS: u64 = 18_000; // 5 hours
const MAX_ARTICLES: u32 = 10;

/// Configuration for the news lookup
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// gnews.io API key; `None` degrades every lookup
    pub api_key: Option<String>,
    pub base_url: String,
    pub cache_ttl: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_NEWS_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// A single article in the feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    /// First selected crop mentioned in the title or description
    pub matched_crop: Option<String>,
}

/// News feed payload; `error` is set when the lookup degraded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub articles: Vec<NewsArticle>,
    pub query: String,
    pub crops_searched: Vec<String>,
    pub count: usize,
    pub source: String,
    pub cached_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Upstream response shapes, only the fields consumed

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    articles: Vec<UpstreamArticle>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<UpstreamSource>,
}

#[derive(Debug, Deserialize)]
struct UpstreamSource {
    name: Option<String>,
}

/// News lookup service with a TTL cache
#[derive(Debug)]
pub struct NewsService {
    client: reqwest::Client,
    config: NewsConfig,
    cache: MokaCache<String, NewsFeed>,
}

impl NewsService {
    pub fn new(config: NewsConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(1_000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            client: reqwest::Client::new(),
            config,
            cache,
        }
    }

    /// Fetch a bounded article feed for the given crop terms and state
    ///
    /// `crops` is the raw query value, crop names joined by " OR ".
    pub async fn feed(
        &self,
        crops: &str,
        state: &str,
        bypass_cache: bool,
    ) -> Result<NewsFeed, DomainError> {
        let crop_list: Vec<String> = crops
            .split(" OR ")
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let query = if !crop_list.is_empty() {
            format!("{} agriculture India", crop_list.join(" OR "))
        } else if !state.trim().is_empty() {
            format!("{} agriculture farming", state.trim())
        } else {
            "India agriculture farming news".to_string()
        };

        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(degraded_feed(query, crop_list, "News API key not configured"));
        };

        if bypass_cache {
            self.cache.invalidate(&query).await;
        } else if let Some(feed) = self.cache.get(&query).await {
            return Ok(feed);
        }

        match self.fetch(api_key, &query, &crop_list).await {
            Ok(feed) => {
                self.cache.insert(query, feed.clone()).await;
                Ok(feed)
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "news lookup failed");
                Ok(degraded_feed(query, crop_list, &e.to_string()))
            }
        }
    }

    async fn fetch(
        &self,
        api_key: &str,
        query: &str,
        crop_list: &[String],
    ) -> Result<NewsFeed, DomainError> {
        let url = format!(
            "{}/api/v4/search",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("country", "in"),
                ("lang", "en"),
                ("max", &MAX_ARTICLES.to_string()),
                ("token", api_key),
            ])
            .send()
            .await
            .map_err(|e| DomainError::upstream("gnews", e.to_string()))?;

        let status = response.status();
        let data: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream("gnews", e.to_string()))?;

        if !status.is_success() {
            let message = data
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| "GNews API error".to_string());
            return Err(DomainError::upstream("gnews", message));
        }

        let articles: Vec<NewsArticle> = data
            .articles
            .into_iter()
            .map(|a| {
                let matched_crop = crop_list
                    .iter()
                    .find(|crop| {
                        let crop = crop.to_lowercase();
                        a.title
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&crop))
                            || a.description
                                .as_deref()
                                .is_some_and(|d| d.to_lowercase().contains(&crop))
                    })
                    .cloned();

                NewsArticle {
                    title: a.title,
                    description: a.description,
                    source: a.source.and_then(|s| s.name),
                    url: a.url,
                    image_url: a.image,
                    published_at: a.published_at,
                    matched_crop,
                }
            })
            .collect();

        Ok(NewsFeed {
            count: articles.len(),
            articles,
            query: query.to_string(),
            crops_searched: crop_list.to_vec(),
            source: "GNews".to_string(),
            cached_at: chrono::Utc::now().to_rfc3339(),
            error: None,
        })
    }
}

fn degraded_feed(query: String, crops_searched: Vec<String>, error: &str) -> NewsFeed {
    NewsFeed {
        articles: Vec::new(),
        query,
        crops_searched,
        count: 0,
        source: "GNews".to_string(),
        cached_at: chrono::Utc::now().to_rfc3339(),
        error: Some(error.to_string()),
    }
}
