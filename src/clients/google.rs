use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;
use crate::services::search_cache::{ProviderError, SearchHit, SearchProvider};

/// The Custom Search API accepts at most 10 results per request.
const MAX_RESULTS_PER_REQUEST: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(rename = "displayLink", default)]
    display_link: String,
    #[serde(default)]
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    metatags: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl SearchItem {
    fn published_time(&self) -> Option<String> {
        self.pagemap
            .as_ref()?
            .metatags
            .first()?
            .get("article:published_time")?
            .as_str()
            .map(str::to_string)
    }

    fn into_hit(self) -> SearchHit {
        let date = self.published_time();
        SearchHit {
            title: self.title,
            link: self.link,
            snippet: self.snippet,
            source: self.display_link,
            date,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Google Programmable Search (Custom Search JSON API) client.
#[derive(Clone)]
pub struct GoogleSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    search_engine_id: String,
}

impl GoogleSearchClient {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("StudyHub/1.0")
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build search HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, config: &SearchConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            search_engine_id: config.search_engine_id.clone(),
        }
    }

    fn request_url(&self, query: &str, limit: usize) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Transport(Box::new(e)))?;

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("cx", &self.search_engine_id)
            .append_pair("q", query)
            .append_pair("num", &limit.clamp(1, MAX_RESULTS_PER_REQUEST).to_string());

        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(Box::new(err))
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("search.api_key"));
        }
        if self.search_engine_id.is_empty() {
            return Err(ProviderError::NotConfigured("search.search_engine_id"));
        }

        let url = self.request_url(query, limit)?;

        debug!("Searching Google for '{}' (num={})", query, limit);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let hits: Vec<SearchHit> = parsed
            .items
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(SearchItem::into_hit)
            .collect();

        debug!("Google returned {} results for '{}'", hits.len(), query);

        Ok(hits)
    }
}
