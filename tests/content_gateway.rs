//! Content gateway against a raw TCP backend.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use blogchain_client::config::ContentConfig;
use blogchain_client::content::types::ContentError;
use blogchain_client::content::{ContentGateway, ContentSource, Pagination};
use blogchain_client::error::ErrorKind;

use common::start_programmable_backend;

fn gateway_for(addr: std::net::SocketAddr) -> ContentGateway {
    let config = ContentConfig {
        api_url: format!("http://{}", addr),
        ..ContentConfig::default()
    };
    ContentGateway::new(&config, Duration::from_secs(5)).unwrap()
}

/// Backend answering every request with `body`, recording request lines.
async fn recording_backend(status: u16, body: &'static str) -> (std::net::SocketAddr, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let addr = start_programmable_backend(move |request_line| {
        log.lock().unwrap().push(request_line);
        async move { (status, body.to_string()) }
    })
    .await;
    (addr, seen)
}

const POSTS: &str = r#"{
    "posts": [
        {"id": "1", "creator": "blogchain1a", "title": "One", "body": "b", "tags": ["x"], "created_at": "1703001600", "likes": "5"},
        {"id": 2, "creator": "blogchain1b", "title": "Two", "body": "b", "tags": [], "createdAt": 1703001700, "likes": 0}
    ],
    "pagination": {"next_key": null, "total": "5"}
}"#;

#[tokio::test]
async fn test_list_posts_sends_pagination() {
    let (addr, seen) = recording_backend(200, POSTS).await;
    let gateway = gateway_for(addr);

    let page = gateway
        .list_posts(Pagination::limit(2).with_offset(2))
        .await
        .unwrap();

    assert_eq!(page.posts.len(), 2);
    assert_eq!(page.posts[1].id, "2");
    assert_eq!(page.posts[1].created_at, 1_703_001_700);
    assert_eq!(page.next_offset, Some(4));

    let requests = seen.lock().unwrap();
    assert_eq!(
        requests[0],
        "GET /blogchain/blog/v1/posts?pagination.limit=2&pagination.offset=2 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_zero_offset_is_not_sent() {
    let (addr, seen) = recording_backend(200, r#"{"posts": []}"#).await;
    gateway_for(addr)
        .list_posts(Pagination::limit(10).with_offset(0))
        .await
        .unwrap();

    assert_eq!(seen.lock().unwrap()[0], "GET /blogchain/blog/v1/posts?pagination.limit=10 HTTP/1.1");
}

#[tokio::test]
async fn test_list_posts_without_pagination() {
    let (addr, seen) = recording_backend(200, r#"{"posts": []}"#).await;
    let page = gateway_for(addr).list_posts(Pagination::default()).await.unwrap();

    assert!(page.posts.is_empty());
    assert_eq!(page.next_offset, None);
    assert_eq!(seen.lock().unwrap()[0], "GET /blogchain/blog/v1/posts HTTP/1.1");
}

#[tokio::test]
async fn test_get_post_accepts_wrapped_and_bare() {
    let (addr, seen) = recording_backend(
        200,
        r#"{"post": {"id": "7", "creator": "blogchain1a", "title": "Seven", "body": "", "tags": [], "created_at": "0", "likes": "1"}}"#,
    )
    .await;
    let post = gateway_for(addr).get_post("7").await.unwrap();
    assert_eq!(post.title, "Seven");
    assert_eq!(seen.lock().unwrap()[0], "GET /blogchain/blog/v1/posts/7 HTTP/1.1");

    let (addr, seen) = recording_backend(200, r#"{"id": "9"}"#).await;
    gateway_for(addr).get_post("9?admin=1").await.unwrap();
    assert_eq!(seen.lock().unwrap()[0], "GET /blogchain/blog/v1/posts/9%3Fadmin=1 HTTP/1.1");

    let (addr, _) = recording_backend(200, r#"{"id": "8", "title": "Eight"}"#).await;
    let post = gateway_for(addr).get_post("8").await.unwrap();
    assert_eq!(post.title, "Eight");
    assert_eq!(post.likes, "0");
}

#[tokio::test]
async fn test_history_defaults_to_empty() {
    let (addr, seen) = recording_backend(200, r#"{"txs": [], "tx_responses": null}"#).await;
    let txs = gateway_for(addr)
        .transaction_history("blogchain1abc", 5)
        .await
        .unwrap();
    assert!(txs.is_empty());

    let request = seen.lock().unwrap()[0].clone();
    assert!(request.starts_with("GET /cosmos/tx/v1beta1/txs?events=message.sender%3D%27blogchain1abc%27"));
    assert!(request.contains("order_by=ORDER_BY_DESC"));
    assert!(request.contains("limit=5"));
}

#[tokio::test]
async fn test_history_parses_responses() {
    let (addr, _) = recording_backend(
        200,
        r#"{"tx_responses": [{"txhash": "ABC", "height": "12", "code": 0, "timestamp": "2023-12-19T16:00:00Z"}]}"#,
    )
    .await;
    let txs = gateway_for(addr).transaction_history("blogchain1abc", 5).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].txhash, "ABC");
    assert_eq!(txs[0].height, "12");
}

#[tokio::test]
async fn test_error_status_is_transport_failure() {
    let (addr, _) = recording_backend(500, "boom").await;
    let err = gateway_for(addr).list_posts(Pagination::limit(10)).await.unwrap_err();

    assert!(matches!(err, ContentError::Status { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_malformed_body_is_transport_failure() {
    let (addr, _) = recording_backend(200, "not json").await;
    let err = gateway_for(addr).get_post("1").await.unwrap_err();

    assert!(matches!(err, ContentError::Decode { .. }));
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let config = ContentConfig {
        api_url: "http://127.0.0.1:1".to_string(),
        ..ContentConfig::default()
    };
    let gateway = ContentGateway::new(&config, Duration::from_secs(2)).unwrap();
    let err = gateway.list_posts(Pagination::default()).await.unwrap_err();
    assert!(matches!(err, ContentError::Transport { .. }));
}
