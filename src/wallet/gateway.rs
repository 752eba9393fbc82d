//! Wallet extension gateway.
//!
//! # Responsibilities
//! - Report whether a wallet extension is injected
//! - Register chain metadata with the extension once per gateway
//! - Ask for account access and hand back an offline signer
//!
//! # Design Decisions
//! - Extension rejections are propagated untranslated and never retried
//! - Availability checks have no side effects

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::wallet::signer::OfflineSigner;
use crate::wallet::types::{AccountData, ChainInfo, WalletError, WalletKey, WalletResult};

/// Capability surface of an injected wallet extension.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// Register chain metadata so the extension can serve this chain.
    async fn suggest_chain(&self, chain_info: &ChainInfo) -> WalletResult<()>;

    /// Ask the user to expose accounts for `chain_id`.
    async fn enable(&self, chain_id: &str) -> WalletResult<()>;

    /// Signer for `chain_id`. Only valid after [`WalletExtension::enable`].
    fn offline_signer(&self, chain_id: &str) -> WalletResult<Arc<dyn OfflineSigner>>;

    /// Key information of the active account.
    async fn get_key(&self, chain_id: &str) -> WalletResult<WalletKey>;
}

/// Result of a successful extension connection.
#[derive(Clone)]
pub struct WalletConnection {
    pub signer: Arc<dyn OfflineSigner>,
    pub accounts: Vec<AccountData>,
    /// Address of the primary (first) account.
    pub address: String,
}

impl std::fmt::Debug for WalletConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConnection")
            .field("address", &self.address)
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

/// Gateway over an optional wallet extension.
pub struct WalletGateway {
    extension: Option<Arc<dyn WalletExtension>>,
    chain_info: ChainInfo,
    registered: AtomicBool,
}

impl WalletGateway {
    /// Create a gateway; `extension` is `None` when nothing is injected.
    pub fn new(chain_info: ChainInfo, extension: Option<Arc<dyn WalletExtension>>) -> Self {
        Self {
            extension,
            chain_info,
            registered: AtomicBool::new(false),
        }
    }

    /// Whether a wallet extension is injected.
    pub fn is_available(&self) -> bool {
        self.extension.is_some()
    }

    fn extension(&self) -> WalletResult<&Arc<dyn WalletExtension>> {
        self.extension.as_ref().ok_or(WalletError::Unavailable)
    }

    /// Register the chain (first call only), enable it and return its signer.
    pub async fn connect(&self) -> WalletResult<WalletConnection> {
        let extension = self.extension()?;
        let chain_id = &self.chain_info.chain_id;

        let result = async {
            if !self.registered.load(Ordering::SeqCst) {
                extension.suggest_chain(&self.chain_info).await?;
                self.registered.store(true, Ordering::SeqCst);
                tracing::debug!(chain_id = %chain_id, "Chain registered with wallet extension");
            }

            extension.enable(chain_id).await?;
            let signer = extension.offline_signer(chain_id)?;
            let accounts = signer.accounts().await?;
            let address = accounts
                .first()
                .map(|a| a.address.clone())
                .ok_or_else(|| WalletError::Rejected("Wallet exposed no accounts".to_string()))?;

            Ok(WalletConnection {
                signer,
                accounts,
                address,
            })
        }
        .await;

        match &result {
            Ok(conn) => tracing::info!(address = %conn.address, "Wallet extension connected"),
            Err(e) => tracing::warn!(error = %e, "Failed to connect to wallet extension"),
        }
        result
    }

    /// Key information of the active extension account.
    pub async fn key(&self) -> WalletResult<WalletKey> {
        self.extension()?.get_key(&self.chain_info.chain_id).await
    }
}

impl std::fmt::Debug for WalletGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletGateway")
            .field("chain_id", &self.chain_info.chain_id)
            .field("available", &self.is_available())
            .finish()
    }
}
