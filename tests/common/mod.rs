//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use cosmrs::tx::{Raw, SignDoc};
use tokio::sync::Notify;

use blogchain_client::chain::types::{AccountInfo, BroadcastResponse, ChainError, ChainResult, Coin, TxResult};
use blogchain_client::chain::wallet::MnemonicSigner;
use blogchain_client::chain::{ChainClient, ChainRpc};
use blogchain_client::config::schema::TimeoutConfig;
use blogchain_client::config::ClientConfig;
use blogchain_client::content::types::{ContentError, ContentResult, Pagination, Post, PostPage, TxSummary};
use blogchain_client::content::ContentSource;
use blogchain_client::session::{SessionSettings, SessionStore};
use blogchain_client::wallet::types::{AccountData, ChainInfo, WalletError, WalletKey, WalletResult};
use blogchain_client::wallet::{OfflineSigner, WalletExtension, WalletGateway};

// Well-known BIP-39 test vector phrase
pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Start a programmable HTTP backend on an ephemeral port.
///
/// The handler receives the request line (e.g. `GET /posts?x=1 HTTP/1.1`)
/// and returns the status code and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }
                        let request = String::from_utf8_lossy(&buf);
                        let request_line = request.lines().next().unwrap_or_default().to_string();

                        let (status, body) = f(request_line).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        creator: "blogchain1author".to_string(),
        title: title.to_string(),
        body: format!("Body of {}", title),
        tags: Default::default(),
        created_at: 1_703_001_600,
        likes: "0".to_string(),
    }
}

/// In-memory chain node with call counters; `gate` holds `broadcast_tx` until notified.
pub struct MockChain {
    pub balances: Mutex<Vec<Coin>>,
    pub check_code: AtomicU32,
    pub delivery_code: AtomicU32,
    pub node_down: AtomicBool,
    pub broadcast_down: AtomicBool,
    pub gate: Option<Arc<Notify>>,
    pub node_info_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
    pub broadcast_calls: AtomicUsize,
    pub get_tx_calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(vec![Coin::new("stake", "1000000")]),
            check_code: AtomicU32::new(0),
            delivery_code: AtomicU32::new(0),
            node_down: AtomicBool::new(false),
            broadcast_down: AtomicBool::new(false),
            gate: None,
            node_info_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            account_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            get_tx_calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn broadcasts(&self) -> usize {
        self.broadcast_calls.load(Ordering::SeqCst)
    }

    pub fn balance_queries(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.node_info_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
            + self.account_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.get_tx_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn node_network(&self) -> ChainResult<String> {
        self.node_info_calls.fetch_add(1, Ordering::SeqCst);
        if self.node_down.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok("blogchain".to_string())
    }

    async fn all_balances(&self, _address: &str) -> ChainResult<Vec<Coin>> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balances.lock().unwrap().clone())
    }

    async fn account(&self, _address: &str) -> ChainResult<AccountInfo> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccountInfo {
            account_number: 7,
            sequence: 3,
        })
    }

    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastResponse> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        assert!(!tx_bytes.is_empty());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.broadcast_down.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("Broadcast failed: connection reset".to_string()));
        }
        Ok(BroadcastResponse {
            tx_hash: "ABC123".to_string(),
            code: self.check_code.load(Ordering::SeqCst),
            raw_log: String::new(),
        })
    }

    async fn get_tx(&self, tx_hash: &str) -> ChainResult<Option<TxResult>> {
        self.get_tx_calls.fetch_add(1, Ordering::SeqCst);
        let code = self.delivery_code.load(Ordering::SeqCst);
        Ok(Some(TxResult {
            code,
            tx_hash: tx_hash.to_string(),
            height: 42,
            gas_used: 80_000,
            raw_log: if code == 0 { String::new() } else { "user has already liked this post".to_string() },
        }))
    }
}

/// In-memory content source; `gate` holds `list_posts` until notified.
pub struct MockContent {
    pub posts: Mutex<Vec<Post>>,
    pub list_calls: AtomicUsize,
    pub last_pagination: Mutex<Option<Pagination>>,
    pub fail: AtomicBool,
    pub gate: Option<Arc<Notify>>,
}

impl MockContent {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            list_calls: AtomicUsize::new(0),
            last_pagination: Mutex::new(None),
            fail: AtomicBool::new(false),
            gate: None,
        }
    }

    pub fn gated(posts: Vec<Post>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(posts)
        }
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for MockContent {
    async fn list_posts(&self, pagination: Pagination) -> ContentResult<PostPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_pagination.lock().unwrap() = Some(pagination);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ContentError::Status {
                url: "http://mock/posts".to_string(),
                status: 503,
            });
        }
        Ok(PostPage {
            posts: self.posts.lock().unwrap().clone(),
            next_offset: None,
        })
    }

    async fn get_post(&self, id: &str) -> ContentResult<Post> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ContentError::Status {
                url: format!("http://mock/posts/{}", id),
                status: 404,
            })
    }

    async fn transaction_history(&self, _address: &str, limit: u32) -> ContentResult<Vec<TxSummary>> {
        Ok((0..limit.min(2))
            .map(|i| TxSummary {
                txhash: format!("TX{}", i),
                height: (100 + i).to_string(),
                code: 0,
                timestamp: "2023-12-19T16:00:00Z".to_string(),
            })
            .collect())
    }
}

/// Mnemonic signer that counts account lookups.
pub struct CountingSigner {
    pub inner: MnemonicSigner,
    pub accounts_calls: AtomicUsize,
}

impl CountingSigner {
    pub fn new() -> Self {
        Self {
            inner: MnemonicSigner::from_mnemonic(TEST_MNEMONIC, "blogchain", 118).unwrap(),
            accounts_calls: AtomicUsize::new(0),
        }
    }

    pub fn address(&self) -> &str {
        self.inner.address()
    }

    pub fn account_lookups(&self) -> usize {
        self.accounts_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfflineSigner for CountingSigner {
    async fn accounts(&self) -> WalletResult<Vec<AccountData>> {
        self.accounts_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.accounts().await
    }

    async fn sign_direct(&self, signer_address: &str, sign_doc: SignDoc) -> WalletResult<Raw> {
        self.inner.sign_direct(signer_address, sign_doc).await
    }
}

/// Wallet extension backed by a mnemonic signer.
pub struct MockExtension {
    pub signer: Arc<CountingSigner>,
    pub reject: bool,
}

impl MockExtension {
    pub fn new(reject: bool) -> Self {
        Self {
            signer: Arc::new(CountingSigner::new()),
            reject,
        }
    }
}

#[async_trait]
impl WalletExtension for MockExtension {
    async fn suggest_chain(&self, _chain_info: &ChainInfo) -> WalletResult<()> {
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> WalletResult<()> {
        if self.reject {
            return Err(WalletError::Rejected("Request rejected".to_string()));
        }
        Ok(())
    }

    fn offline_signer(&self, _chain_id: &str) -> WalletResult<Arc<dyn OfflineSigner>> {
        Ok(self.signer.clone())
    }

    async fn get_key(&self, _chain_id: &str) -> WalletResult<WalletKey> {
        Ok(WalletKey {
            name: "mock".to_string(),
            algo: "secp256k1".to_string(),
            pub_key: Vec::new(),
            bech32_address: self.signer.address().to_string(),
            is_hardware: false,
        })
    }
}

/// A store over the given mocks with fast polling.
pub fn store_with(
    chain: Arc<MockChain>,
    content: Arc<MockContent>,
    extension: Option<Arc<dyn WalletExtension>>,
) -> SessionStore {
    let config = ClientConfig::default();
    let timeouts = TimeoutConfig {
        request_secs: 5,
        confirmation_secs: 2,
        poll_interval_ms: 10,
    };
    let client = ChainClient::new(chain, &config.chain, config.fees.clone(), &timeouts);
    let wallet = WalletGateway::new(ChainInfo::from_config(&config.chain), extension);

    SessionStore::new(Arc::new(client), wallet, content, SessionSettings::from_config(&config))
}

/// Balance after paying a 0.01 STAKE fee from 1 STAKE.
pub fn post_balance() -> Coin {
    Coin::new("stake", "990000")
}
