//! Offline signer abstraction.
//!
//! A signer exposes accounts and signs `SIGN_MODE_DIRECT` sign documents
//! without any network access. Key material never leaves the implementation.

use async_trait::async_trait;
use cosmrs::tx::{Raw, SignDoc};

use crate::wallet::types::{AccountData, WalletResult};

/// Signs transactions for one or more accounts.
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// Accounts this signer can sign for; the first one is the primary.
    async fn accounts(&self) -> WalletResult<Vec<AccountData>>;

    /// Sign a direct-mode sign document on behalf of `signer_address`.
    async fn sign_direct(&self, signer_address: &str, sign_doc: SignDoc) -> WalletResult<Raw>;
}
