//! Content types and error definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorKind;

/// A blog post as stored on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    /// Bech32 address of the author.
    #[serde(default)]
    pub creator: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Block time of creation, seconds since epoch.
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_i64")]
    pub created_at: i64,

    /// Like count, string-encoded.
    #[serde(default = "zero", deserialize_with = "lenient_string")]
    pub likes: String,
}

fn zero() -> String {
    "0".to_string()
}

/// Accept a JSON string or number and keep it as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(zero()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {}", other))),
    }
}

/// Accept a JSON string or number holding an i64.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("{} is not an i64", n))),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("expected integer, got {}", other))),
    }
}

/// Optional page window for post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// One page of posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Offset of the next page, when more posts exist.
    pub next_offset: Option<u64>,
}

/// Page metadata as returned by the query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PageResponse {
    #[serde(default)]
    pub next_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub total: Option<u64>,
}

fn lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        Value::Number(n) => Ok(n.as_u64()),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

impl PostsResponse {
    /// Turn a response into a page, deciding whether another page follows.
    pub(crate) fn into_page(self, request: Pagination) -> PostPage {
        let offset = request.offset.unwrap_or(0);
        let count = self.posts.len() as u64;
        let page = self.pagination.unwrap_or_default();

        let has_more = match page.total {
            Some(total) if total > 0 => offset + count < total,
            _ => match page.next_key.as_deref() {
                Some(key) if !key.is_empty() => true,
                _ => matches!(request.limit, Some(limit) if count > 0 && count >= limit),
            },
        };

        PostPage {
            posts: self.posts,
            next_offset: has_more.then_some(offset + count),
        }
    }
}

/// `GET /posts/<id>` answers either `{ "post": {...} }` or the bare post.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PostResponse {
    Wrapped { post: Post },
    Bare(Post),
}

impl PostResponse {
    pub(crate) fn into_post(self) -> Post {
        match self {
            PostResponse::Wrapped { post } => post,
            PostResponse::Bare(post) => post,
        }
    }
}

/// Summary of a past transaction sent by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSummary {
    #[serde(default)]
    pub txhash: String,
    #[serde(default = "zero", deserialize_with = "lenient_string")]
    pub height: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TxSearchResponse {
    #[serde(default)]
    pub tx_responses: Option<Vec<TxSummary>>,
}

/// Errors raised by the content gateway.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::InvalidUrl(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::TransportFailure,
        }
    }
}

/// Result type for content queries.
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_accepts_chain_json() {
        let post: Post = serde_json::from_value(json!({
            "id": "1",
            "creator": "blogchain1test",
            "title": "Test Post",
            "body": "Body",
            "tags": ["vue", "test", "test"],
            "created_at": "1703001600",
            "likes": "5",
            "deleted": false
        }))
        .unwrap();

        assert_eq!(post.id, "1");
        assert_eq!(post.created_at, 1703001600);
        assert_eq!(post.likes, "5");
        assert_eq!(post.tags.len(), 2);
    }

    #[test]
    fn test_post_accepts_numbers_and_camel_case() {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "title": "Numeric",
            "createdAt": 1703001600,
            "likes": 12
        }))
        .unwrap();

        assert_eq!(post.id, "7");
        assert_eq!(post.created_at, 1703001600);
        assert_eq!(post.likes, "12");
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_missing_likes_defaults_to_zero() {
        let post: Post = serde_json::from_value(json!({ "id": "2" })).unwrap();
        assert_eq!(post.likes, "0");
    }

    #[test]
    fn test_next_offset_from_total() {
        let response: PostsResponse = serde_json::from_value(json!({
            "posts": [{ "id": "1" }, { "id": "2" }],
            "pagination": { "next_key": null, "total": "5" }
        }))
        .unwrap();
        let page = response.into_page(Pagination::limit(2).with_offset(2));
        assert_eq!(page.next_offset, Some(4));
    }

    #[test]
    fn test_last_page_has_no_next_offset() {
        let response: PostsResponse = serde_json::from_value(json!({
            "posts": [{ "id": "1" }],
            "pagination": { "next_key": null, "total": "0" }
        }))
        .unwrap();
        let page = response.into_page(Pagination::limit(10));
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn test_post_response_shapes() {
        let wrapped: PostResponse = serde_json::from_value(json!({ "post": { "id": "3" } })).unwrap();
        let bare: PostResponse = serde_json::from_value(json!({ "id": "3", "title": "x" })).unwrap();
        assert_eq!(wrapped.into_post().id, "3");
        assert_eq!(bare.into_post().title, "x");
    }
}
