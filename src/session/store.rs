//! Session store: the single owner of UI-visible state.
//!
//! # Responsibilities
//! - Sequence connect, query and transaction calls across the gateways
//! - Hold the session snapshot and publish every change to subscribers
//! - Guard against overlapping operations
//! - Refresh posts and balance after every accepted transaction
//!
//! # Design Decisions
//! - One operation at a time; a second call while busy fails with `Busy`
//!   and leaves the snapshot untouched
//! - `loading` is raised on entry and lowered by a drop guard, so every
//!   exit path clears it
//! - Errors are both returned and recorded in the snapshot as text
//! - A failed transaction leaves posts and balance as they were

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::chain::rpc::RestChainRpc;
use crate::chain::types::{ChainError, TxResult};
use crate::chain::wallet::MnemonicSigner;
use crate::chain::ChainClient;
use crate::config::schema::CurrencyConfig;
use crate::config::{ClientConfig, FeeSchedule};
use crate::content::gateway::{ContentGateway, ContentSource};
use crate::content::types::{ContentError, Pagination, Post, TxSummary};
use crate::error::ErrorKind;
use crate::observability::metrics;
use crate::session::format::format_balance;
use crate::session::state::{Operation, Phase, Session};
use crate::wallet::gateway::{WalletExtension, WalletGateway};
use crate::wallet::types::{ChainInfo, WalletError, WalletResult};

/// Message recorded when a state-changing call has no connected address.
pub const NOT_CONNECTED_MESSAGE: &str = "Please connect your wallet first";

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Another operation is in progress: {0}")]
    Busy(Operation),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NotConnected => ErrorKind::SignerNotInitialized,
            SessionError::Busy(_) => ErrorKind::Busy,
            SessionError::Wallet(e) => e.kind(),
            SessionError::Chain(e) => e.kind(),
            SessionError::Content(e) => e.kind(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Settings the store needs beyond its gateways.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub bech32_prefix: String,
    pub coin_type: u32,
    /// Currency shown by [`SessionStore::formatted_balance`].
    pub display_currency: CurrencyConfig,
    pub fees: FeeSchedule,
    /// Page size for post refreshes.
    pub posts_limit: u32,
}

impl SessionSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            bech32_prefix: config.chain.bech32_prefix.clone(),
            coin_type: config.chain.coin_type,
            display_currency: config.chain.stake_currency.clone(),
            fees: config.fees.clone(),
            posts_limit: config.session.posts_limit,
        }
    }
}

/// Marks an operation in flight; lowers `loading` when dropped.
struct InFlight<'a> {
    store: &'a SessionStore,
    operation: Operation,
    id: Uuid,
    started: Instant,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.store.update(|s| {
            s.loading = false;
            s.in_flight = None;
        });
        tracing::debug!(
            operation = %self.operation,
            op_id = %self.id,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Session operation finished"
        );
    }
}

/// Orchestrates the gateways and owns the session snapshot.
pub struct SessionStore {
    chain: Arc<ChainClient>,
    wallet: WalletGateway,
    content: Arc<dyn ContentSource>,
    settings: SessionSettings,
    state: Mutex<Session>,
    updates: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(
        chain: Arc<ChainClient>,
        wallet: WalletGateway,
        content: Arc<dyn ContentSource>,
        settings: SessionSettings,
    ) -> Self {
        let (updates, _) = watch::channel(Session::default());
        Self {
            chain,
            wallet,
            content,
            settings,
            state: Mutex::new(Session::default()),
            updates,
        }
    }

    /// Wire the REST gateways described by `config`.
    ///
    /// `extension` is the injected wallet extension, if any.
    pub fn from_config(
        config: &ClientConfig,
        extension: Option<Arc<dyn WalletExtension>>,
    ) -> SessionResult<Self> {
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        let rpc = RestChainRpc::new(&config.chain.rest_url, request_timeout)?;
        let chain = ChainClient::new(Arc::new(rpc), &config.chain, config.fees.clone(), &config.timeouts);
        let content = ContentGateway::new(&config.content, request_timeout)?;
        let wallet = WalletGateway::new(ChainInfo::from_config(&config.chain), extension);

        Ok(Self::new(
            Arc::new(chain),
            wallet,
            Arc::new(content),
            SessionSettings::from_config(config),
        ))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Receiver that observes every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.updates.subscribe()
    }

    /// The chain adapter this store drives.
    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    /// Stake balance for display, e.g. `"1.00 STAKE"`.
    pub fn formatted_balance(&self) -> String {
        format_balance(&self.lock().balance, &self.settings.display_currency)
    }

    /// Connect read-only.
    pub async fn connect(&self) -> SessionResult<()> {
        let op = Operation::Connect;
        let _guard = self.begin(op)?;
        let previous = self.enter_connecting();

        let result = self.chain.connect_read_only().await.map(|_| ()).map_err(SessionError::from);
        let phase = match result {
            Ok(()) => Phase::after_read_only_connect(previous),
            Err(_) => previous,
        };

        self.update(|s| s.phase = phase);
        self.settle(op, "Failed to connect", result)
    }

    /// Connect a signer derived from a recovery phrase.
    pub async fn connect_wallet(&self, phrase: &str) -> SessionResult<String> {
        let signer = MnemonicSigner::from_mnemonic(phrase, &self.settings.bech32_prefix, self.settings.coin_type);
        self.connect_signing(Operation::ConnectWallet, "Failed to connect wallet", self.install_signer(signer))
            .await
    }

    /// Connect a signer derived from the phrase in `BLOGCHAIN_MNEMONIC`.
    pub async fn connect_wallet_from_env(&self) -> SessionResult<String> {
        let signer = MnemonicSigner::from_env(&self.settings.bech32_prefix, self.settings.coin_type);
        self.connect_signing(Operation::ConnectWallet, "Failed to connect wallet", self.install_signer(signer))
            .await
    }

    /// Connect through the injected wallet extension.
    pub async fn connect_with_wallet_extension(&self) -> SessionResult<String> {
        self.connect_signing(
            Operation::ConnectWalletExtension,
            "Failed to connect wallet extension",
            self.install_extension_signer(),
        )
        .await
    }

    /// Refresh the balance of the connected address.
    ///
    /// Failures are logged and leave the previous balance in place.
    pub async fn update_balance(&self) {
        let address = self.lock().address.clone();
        if address.is_empty() {
            return;
        }

        match self.chain.get_balance(&address).await {
            Ok(balance) => self.update(|s| s.balance = balance),
            Err(e) => tracing::warn!(address = %address, error = %e, "Failed to update balance"),
        }
    }

    /// Replace the post list with the first page.
    pub async fn fetch_posts(&self) -> SessionResult<Vec<Post>> {
        let op = Operation::FetchPosts;
        let _guard = self.begin(op)?;

        let result = self.load_posts().await;
        if let Ok(posts) = &result {
            self.update(|s| s.posts = posts.clone());
        }
        self.settle(op, "Failed to fetch posts", result)
    }

    /// Publish a post from the connected address.
    pub async fn create_post(&self, title: &str, body: &str, tags: &[String]) -> SessionResult<TxResult> {
        let op = Operation::CreatePost;
        let address = self.require_address()?;
        self.run_transaction(op, "Failed to create post", self.chain.create_post(&address, title, body, tags))
            .await
    }

    /// Like a post from the connected address.
    pub async fn like_post(&self, post_id: &str) -> SessionResult<TxResult> {
        let op = Operation::LikePost;
        let address = self.require_address()?;
        self.run_transaction(op, "Failed to like post", self.chain.like_post(&address, post_id))
            .await
    }

    /// Transfer tokens from the connected address.
    pub async fn send_tokens(&self, to_address: &str, amount: &str, denom: &str) -> SessionResult<TxResult> {
        let op = Operation::SendTokens;
        let address = self.require_address()?;
        self.run_transaction(
            op,
            "Failed to send tokens",
            self.chain.send_tokens(&address, to_address, amount, denom),
        )
        .await
    }

    /// Recent transactions sent by the connected address.
    pub async fn transaction_history(&self, limit: u32) -> SessionResult<Vec<TxSummary>> {
        let op = Operation::TransactionHistory;
        let address = self.require_address()?;
        let _guard = self.begin(op)?;

        let result = self
            .content
            .transaction_history(&address, limit)
            .await
            .map_err(SessionError::from);
        self.settle(op, "Failed to fetch transaction history", result)
    }

    async fn run_transaction<F>(&self, op: Operation, context: &str, submit: F) -> SessionResult<TxResult>
    where
        F: Future<Output = Result<TxResult, ChainError>>,
    {
        let _guard = self.begin(op)?;

        let tx = match submit.await {
            Ok(tx) => tx,
            Err(e) => return self.settle(op, context, Err(e.into())),
        };
        tracing::info!(operation = %op, tx_hash = %tx.tx_hash, height = tx.height, "Transaction included");

        // The transaction landed: refresh failures are recorded, never returned.
        match self.load_posts().await {
            Ok(posts) => self.update(|s| s.posts = posts),
            Err(e) => {
                tracing::warn!(operation = %op, tx_hash = %tx.tx_hash, error = %e, "Post refresh failed");
                let message = format!("Transaction {} succeeded but refreshing posts failed: {}", tx.tx_hash, e);
                self.update(|s| s.error = message);
            }
        }
        self.update_balance().await;

        self.settle(op, context, Ok(tx))
    }

    async fn load_posts(&self) -> SessionResult<Vec<Post>> {
        let page = self
            .content
            .list_posts(Pagination::limit(u64::from(self.settings.posts_limit)))
            .await?;
        Ok(page.posts)
    }

    async fn connect_signing<F>(&self, op: Operation, context: &str, connect: F) -> SessionResult<String>
    where
        F: Future<Output = SessionResult<String>>,
    {
        let _guard = self.begin(op)?;
        let previous = self.enter_connecting();

        let result = connect.await;

        self.finish_connect(previous, &result).await;
        self.settle(op, context, result)
    }

    async fn install_signer(&self, signer: WalletResult<MnemonicSigner>) -> SessionResult<String> {
        let (_, address) = self
            .chain
            .connect_with_signer(Arc::new(signer?), self.settings.fees.clone())
            .await?;
        Ok(address)
    }

    async fn install_extension_signer(&self) -> SessionResult<String> {
        let connection = self.wallet.connect().await?;
        // The gateway already resolved the accounts; do not ask the extension again.
        let account = connection
            .accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Rejected("Wallet exposed no accounts".to_string()))?;
        let (_, address) = self
            .chain
            .connect_with_account(connection.signer, account, self.settings.fees.clone());
        Ok(address)
    }

    async fn finish_connect(&self, previous: Phase, result: &SessionResult<String>) {
        match result {
            Ok(address) => {
                self.update(|s| {
                    s.phase = Phase::Signing;
                    s.address = address.clone();
                });
                self.update_balance().await;
            }
            Err(_) => self.update(|s| s.phase = previous),
        }
    }

    fn enter_connecting(&self) -> Phase {
        self.update(|s| std::mem::replace(&mut s.phase, Phase::Connecting))
    }

    /// Address to sign with, or record the not-connected error.
    fn require_address(&self) -> SessionResult<String> {
        let mut state = self.lock();
        if let Some(current) = state.in_flight {
            return Err(SessionError::Busy(current));
        }
        if state.address.is_empty() {
            state.error = NOT_CONNECTED_MESSAGE.to_string();
            self.updates.send_replace(state.clone());
            return Err(SessionError::NotConnected);
        }
        Ok(state.address.clone())
    }

    fn begin(&self, operation: Operation) -> SessionResult<InFlight<'_>> {
        {
            let mut state = self.lock();
            if let Some(current) = state.in_flight {
                tracing::debug!(requested = %operation, current = %current, "Session busy");
                return Err(SessionError::Busy(current));
            }
            state.in_flight = Some(operation);
            state.loading = true;
            state.error.clear();
            self.updates.send_replace(state.clone());
        }

        let id = Uuid::new_v4();
        tracing::debug!(operation = %operation, op_id = %id, "Session operation started");
        Ok(InFlight {
            store: self,
            operation,
            id,
            started: Instant::now(),
        })
    }

    /// Record the outcome of `op` and hand the result back.
    fn settle<T>(&self, op: Operation, context: &str, result: SessionResult<T>) -> SessionResult<T> {
        match &result {
            Ok(_) => metrics::record_session_operation(op.as_str(), "ok"),
            Err(e) => {
                let message = format!("{}: {}", context, e);
                tracing::warn!(operation = %op, kind = %e.kind(), error = %e, "{}", context);
                self.update(|s| s.error = message);
                metrics::record_session_operation(op.as_str(), e.kind().as_str());
            }
        }
        result
    }

    fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut state = self.lock();
        let out = f(&mut *state);
        self.updates.send_replace(state.clone());
        out
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // State stays consistent across a panicking writer; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("chain", &self.chain)
            .field("wallet", &self.wallet)
            .field("session", &*self.lock())
            .finish()
    }
}
