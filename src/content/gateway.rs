//! HTTP content gateway.
//!
//! # Responsibilities
//! - List posts with optional `pagination.limit` / `pagination.offset`
//! - Fetch a single post
//! - Search transactions sent by an address
//!
//! # Design Decisions
//! - Pure read path: no caching, no retry
//! - Pagination parameters are appended only when present and nonzero

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ContentConfig;
use crate::content::types::{
    ContentError, ContentResult, Pagination, Post, PostPage, PostResponse, PostsResponse,
    TxSearchResponse, TxSummary,
};
use crate::observability::metrics;

/// Read-only source of posts and transaction history.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_posts(&self, pagination: Pagination) -> ContentResult<PostPage>;

    async fn get_post(&self, id: &str) -> ContentResult<Post>;

    /// Most recent transactions sent by `address`, newest first.
    async fn transaction_history(&self, address: &str, limit: u32) -> ContentResult<Vec<TxSummary>>;
}

/// [`ContentSource`] over the chain's HTTP query surface.
#[derive(Debug, Clone)]
pub struct ContentGateway {
    client: Client,
    api_url: String,
    module_path: String,
}

impl ContentGateway {
    pub fn new(config: &ContentConfig, timeout: Duration) -> ContentResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Transport {
                url: config.api_url.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            module_path: config.module_path.trim_matches('/').to_string(),
        })
    }

    /// URL of the post listing for `pagination`.
    pub fn posts_url(&self, pagination: Pagination) -> ContentResult<Url> {
        let mut url = self.parse(&format!("{}/{}/posts", self.api_url, self.module_path))?;

        // Zero means "unset", as on the query endpoint.
        let mut params = Vec::new();
        if let Some(limit) = pagination.limit.filter(|&limit| limit > 0) {
            params.push(("pagination.limit", limit.to_string()));
        }
        if let Some(offset) = pagination.offset.filter(|&offset| offset > 0) {
            params.push(("pagination.offset", offset.to_string()));
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// URL of a single post.
    ///
    /// The id is a single escaped path segment.
    pub fn post_url(&self, id: &str) -> ContentResult<Url> {
        let mut url = self.parse(&format!("{}/{}/posts", self.api_url, self.module_path))?;
        url.path_segments_mut()
            .map_err(|_| ContentError::InvalidUrl(format!("{} cannot carry a path", self.api_url)))?
            .push(id.trim());
        Ok(url)
    }

    /// URL of the transaction search for `address`.
    pub fn history_url(&self, address: &str, limit: u32) -> ContentResult<Url> {
        let mut url = self.parse(&format!("{}/cosmos/tx/v1beta1/txs", self.api_url))?;
        url.query_pairs_mut()
            .append_pair("events", &format!("message.sender='{}'", address))
            .append_pair("order_by", "ORDER_BY_DESC")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    fn parse(&self, raw: &str) -> ContentResult<Url> {
        Url::parse(raw).map_err(|e| ContentError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> ContentResult<T> {
        let url_str = url.to_string();
        tracing::debug!(url = %url_str, "Content query");

        let result = async {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ContentError::Transport {
                    url: url_str.clone(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ContentError::Status {
                    url: url_str.clone(),
                    status: status.as_u16(),
                });
            }

            resp.json::<T>().await.map_err(|e| ContentError::Decode {
                url: url_str.clone(),
                message: e.to_string(),
            })
        }
        .await;

        metrics::record_query(endpoint, result.is_ok());
        result
    }
}

#[async_trait]
impl ContentSource for ContentGateway {
    async fn list_posts(&self, pagination: Pagination) -> ContentResult<PostPage> {
        let url = self.posts_url(pagination)?;
        let response: PostsResponse = self.get_json("posts", url).await?;
        Ok(response.into_page(pagination))
    }

    async fn get_post(&self, id: &str) -> ContentResult<Post> {
        let url = self.post_url(id)?;
        let response: PostResponse = self.get_json("post", url).await?;
        Ok(response.into_post())
    }

    async fn transaction_history(&self, address: &str, limit: u32) -> ContentResult<Vec<TxSummary>> {
        let url = self.history_url(address, limit)?;
        let response: TxSearchResponse = self.get_json("tx_history", url).await?;
        Ok(response.tx_responses.unwrap_or_default())
    }
}
