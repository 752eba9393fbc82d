//! Chain client adapter with signer guard and inclusion polling.
//!
//! # Responsibilities
//! - Connect read-only and verify the node serves the configured chain
//! - Install a signing client from any offline signer
//! - Query balances
//! - Build, sign, broadcast and await transactions with the fixed fee schedule
//! - Keep "transport failed" and "chain rejected" apart

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use cosmrs::crypto::PublicKey;
use cosmrs::tendermint::chain;
use cosmrs::tx::{Body, Fee, SignDoc, SignerInfo};
use tokio::time::{interval, timeout};

use crate::chain::messages::TxMessage;
use crate::chain::rpc::ChainRpc;
use crate::chain::types::{ChainError, ChainResult, Coin, TxResult};
use crate::config::{ChainConfig, FeeConfig, FeeSchedule};
use crate::config::schema::TimeoutConfig;
use crate::observability::metrics;
use crate::wallet::signer::OfflineSigner;
use crate::wallet::types::AccountData;

/// Handle returned by a read-only connection.
#[derive(Debug, Clone)]
pub struct ReadClient {
    /// Network the node reported.
    pub network: String,
}

/// Signing-capable client bound to one account.
#[derive(Clone)]
pub struct SignClient {
    signer: Arc<dyn OfflineSigner>,
    address: String,
    public_key: PublicKey,
    fees: FeeSchedule,
}

impl std::fmt::Debug for SignClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignClient")
            .field("address", &self.address)
            .finish()
    }
}

/// Chain client adapter over a [`ChainRpc`] transport.
pub struct ChainClient {
    rpc: Arc<dyn ChainRpc>,
    chain_id: String,
    fees: FeeSchedule,
    confirmation_timeout: Duration,
    poll_interval: Duration,
    read: ArcSwapOption<ReadClient>,
    signing: ArcSwapOption<SignClient>,
}

impl ChainClient {
    /// Create a new adapter. No network call is made until first use.
    pub fn new(rpc: Arc<dyn ChainRpc>, chain: &ChainConfig, fees: FeeSchedule, timeouts: &TimeoutConfig) -> Self {
        Self {
            rpc,
            chain_id: chain.chain_id.clone(),
            fees,
            confirmation_timeout: Duration::from_secs(timeouts.confirmation_secs),
            poll_interval: Duration::from_millis(timeouts.poll_interval_ms),
            read: ArcSwapOption::empty(),
            signing: ArcSwapOption::empty(),
        }
    }

    /// Connect read-only.
    ///
    /// A node reporting a different network is logged but not rejected, so
    /// queries keep working against renamed local nets.
    pub async fn connect_read_only(&self) -> ChainResult<Arc<ReadClient>> {
        let network = self.rpc.node_network().await?;
        if network != self.chain_id {
            tracing::warn!(
                expected = %self.chain_id,
                actual = %network,
                "Connected node serves a different chain"
            );
        } else {
            tracing::info!(chain_id = %self.chain_id, "Read-only chain client connected");
        }

        let client = Arc::new(ReadClient { network });
        self.read.store(Some(client.clone()));
        Ok(client)
    }

    /// Install a signing client for the signer's primary account.
    pub async fn connect_with_signer(
        &self,
        signer: Arc<dyn OfflineSigner>,
        fee_policy: FeeSchedule,
    ) -> ChainResult<(Arc<SignClient>, String)> {
        let accounts = signer
            .accounts()
            .await
            .map_err(|e| ChainError::Signing(e.to_string()))?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::Signing("Signer exposes no accounts".to_string()))?;

        Ok(self.connect_with_account(signer, account, fee_policy))
    }

    /// Install a signing client for an account the caller already resolved.
    pub fn connect_with_account(
        &self,
        signer: Arc<dyn OfflineSigner>,
        account: AccountData,
        fee_policy: FeeSchedule,
    ) -> (Arc<SignClient>, String) {
        let client = Arc::new(SignClient {
            signer,
            address: account.address.clone(),
            public_key: account.public_key,
            fees: fee_policy,
        });
        self.signing.store(Some(client.clone()));

        tracing::info!(address = %account.address, "Signing client connected");
        (client, account.address)
    }

    /// Whether a signing client is installed.
    pub fn has_signer(&self) -> bool {
        self.signing.load().is_some()
    }

    /// Get all balances of an address, connecting read-only first if needed.
    pub async fn get_balance(&self, address: &str) -> ChainResult<Vec<Coin>> {
        if self.read.load().is_none() {
            self.connect_read_only().await?;
        }
        self.rpc.all_balances(address).await
    }

    /// Sign and broadcast `messages`, then wait for inclusion.
    ///
    /// Fails with [`ChainError::SignerNotInitialized`] before any network
    /// call when no signing client is installed. A nonzero result code is
    /// returned in the [`TxResult`], not as an error.
    pub async fn sign_and_broadcast(
        &self,
        sender: &str,
        messages: &[TxMessage],
        fee: &FeeConfig,
        memo: &str,
    ) -> ChainResult<TxResult> {
        let client = self
            .signing
            .load_full()
            .ok_or(ChainError::SignerNotInitialized)?;

        if sender != client.address {
            return Err(ChainError::Signing(format!(
                "Signing client is bound to {}, not {}",
                client.address, sender
            )));
        }

        let anys = messages
            .iter()
            .map(TxMessage::to_any)
            .collect::<ChainResult<Vec<_>>>()?;

        let account = self.rpc.account(sender).await?;

        let chain_id: chain::Id = self
            .chain_id
            .parse()
            .map_err(|e| ChainError::InvalidInput(format!("Invalid chain id '{}': {}", self.chain_id, e)))?;
        let fee_coin = cosmrs::Coin::new(fee.amount as u128, &fee.denom)
            .map_err(|e| ChainError::InvalidInput(format!("Invalid fee denom '{}': {}", fee.denom, e)))?;

        let body = Body::new(anys, memo, 0u32);
        let auth_info = SignerInfo::single_direct(Some(client.public_key.clone()), account.sequence)
            .auth_info(Fee::from_amount_and_gas(fee_coin, fee.gas));
        let sign_doc = SignDoc::new(&body, &auth_info, &chain_id, account.account_number)
            .map_err(|e| ChainError::Signing(e.to_string()))?;

        let raw = client
            .signer
            .sign_direct(sender, sign_doc)
            .await
            .map_err(|e| ChainError::Signing(e.to_string()))?;
        let tx_bytes = raw.to_bytes().map_err(|e| ChainError::Signing(e.to_string()))?;

        let broadcast = self.rpc.broadcast_tx(tx_bytes).await?;
        tracing::info!(
            tx_hash = %broadcast.tx_hash,
            code = broadcast.code,
            sequence = account.sequence,
            "Transaction broadcast"
        );

        if broadcast.code != 0 {
            // Rejected at mempool admission; it will never be included.
            return Ok(TxResult {
                code: broadcast.code,
                tx_hash: broadcast.tx_hash,
                height: 0,
                gas_used: 0,
                raw_log: broadcast.raw_log,
            });
        }

        self.wait_for_inclusion(&broadcast.tx_hash).await
    }

    /// Poll until the transaction is included or the confirmation window ends.
    async fn wait_for_inclusion(&self, tx_hash: &str) -> ChainResult<TxResult> {
        let result = timeout(self.confirmation_timeout, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                match self.rpc.get_tx(tx_hash).await? {
                    Some(tx) => return Ok(tx),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(ChainError::ConfirmationTimeout {
                tx_hash: tx_hash.to_string(),
                secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }

    async fn submit(&self, message: TxMessage) -> ChainResult<TxResult> {
        let kind = message.kind();
        let sender = message.signer().to_string();
        let fees = match self.signing.load_full() {
            Some(client) => client.fees.clone(),
            None => self.fees.clone(),
        };

        let result = self
            .sign_and_broadcast(&sender, std::slice::from_ref(&message), kind.fee(&fees), kind.memo())
            .await
            .and_then(TxResult::into_accepted);

        let outcome = match &result {
            Ok(_) => "accepted",
            Err(ChainError::Rejected { .. }) => "rejected",
            Err(_) => "failed",
        };
        metrics::record_broadcast(kind.as_str(), outcome);
        result
    }

    /// Create a post authored by `creator`.
    pub async fn create_post(
        &self,
        creator: &str,
        title: &str,
        body: &str,
        tags: &[String],
    ) -> ChainResult<TxResult> {
        self.submit(TxMessage::CreatePost {
            creator: creator.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            tags: tags.to_vec(),
        })
        .await
    }

    /// Like post `post_id` as `liker`.
    pub async fn like_post(&self, liker: &str, post_id: &str) -> ChainResult<TxResult> {
        self.submit(TxMessage::LikePost {
            liker: liker.to_string(),
            post_id: post_id.to_string(),
        })
        .await
    }

    /// Transfer `amount` of `denom` between accounts.
    pub async fn send_tokens(
        &self,
        from_address: &str,
        to_address: &str,
        amount: &str,
        denom: &str,
    ) -> ChainResult<TxResult> {
        self.submit(TxMessage::Send {
            from_address: from_address.to_string(),
            to_address: to_address.to_string(),
            amount: vec![Coin::new(denom, amount)],
        })
        .await
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("chain_id", &self.chain_id)
            .field("signing", &self.has_signer())
            .field("confirmation_timeout_secs", &self.confirmation_timeout.as_secs())
            .finish()
    }
}
