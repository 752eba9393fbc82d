//! Remote chain endpoint.
//!
//! # Responsibilities
//! - Define the calls the adapter makes against a chain node
//! - Implement them over the Cosmos REST gateway with per-request timeouts
//! - Decode the gateway's JSON (integers arrive as strings) into chain types

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::chain::types::{AccountInfo, BroadcastResponse, ChainError, ChainResult, Coin, TxResult};
use crate::observability::metrics;

/// Calls the chain client adapter needs from a node.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Network (chain ID) the node reports.
    async fn node_network(&self) -> ChainResult<String>;

    /// All balances held by an address.
    async fn all_balances(&self, address: &str) -> ChainResult<Vec<Coin>>;

    /// Account number and sequence of an address.
    async fn account(&self, address: &str) -> ChainResult<AccountInfo>;

    /// Submit signed transaction bytes; returns the mempool check result.
    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastResponse>;

    /// Look up an included transaction. `None` while it is still pending.
    async fn get_tx(&self, tx_hash: &str) -> ChainResult<Option<TxResult>>;
}

/// [`ChainRpc`] over the Cosmos REST gateway.
#[derive(Debug, Clone)]
pub struct RestChainRpc {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<Coin>,
}

#[derive(Deserialize)]
struct TxResponseEnvelope {
    tx_response: Value,
}

impl RestChainRpc {
    /// Create a REST transport for `rest_url` with the given request timeout.
    pub fn new(rest_url: &str, timeout: Duration) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: rest_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, endpoint: &'static str, path: &str) -> ChainResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let result = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ChainError::Rpc(format!("GET {} failed: {}", url, e)))?;
            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(ChainError::Rpc(format!("GET {} returned {}: {}", url, status, text)));
            }
            resp.json::<Value>()
                .await
                .map_err(|e| ChainError::Rpc(format!("Invalid JSON from {}: {}", url, e)))
        }
        .await;

        metrics::record_query(endpoint, result.is_ok());
        result
    }
}

#[async_trait]
impl ChainRpc for RestChainRpc {
    async fn node_network(&self) -> ChainResult<String> {
        let body = self
            .get_json("node_info", "/cosmos/base/tendermint/v1beta1/node_info")
            .await?;
        body.pointer("/default_node_info/network")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ChainError::Rpc("node_info response has no network".to_string()))
    }

    async fn all_balances(&self, address: &str) -> ChainResult<Vec<Coin>> {
        let body = self
            .get_json("balances", &format!("/cosmos/bank/v1beta1/balances/{}", address))
            .await?;
        let parsed: BalancesResponse = serde_json::from_value(body)
            .map_err(|e| ChainError::Rpc(format!("Invalid balances response: {}", e)))?;
        Ok(parsed.balances)
    }

    async fn account(&self, address: &str) -> ChainResult<AccountInfo> {
        let body = self
            .get_json("account", &format!("/cosmos/auth/v1beta1/accounts/{}", address))
            .await?;
        let account = body
            .get("account")
            .ok_or_else(|| ChainError::Rpc(format!("Account {} not found", address)))?;
        parse_account(account)
            .ok_or_else(|| ChainError::Rpc(format!("Unrecognized account shape for {}", address)))
    }

    async fn broadcast_tx(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastResponse> {
        let url = format!("{}/cosmos/tx/v1beta1/txs", self.base_url);
        let payload = json!({
            "tx_bytes": STANDARD.encode(tx_bytes),
            "mode": "BROADCAST_MODE_SYNC",
        });

        let result = async {
            let resp = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| ChainError::Rpc(format!("Broadcast failed: {}", e)))?;
            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(ChainError::Rpc(format!("Broadcast returned {}: {}", status, text)));
            }
            let envelope: TxResponseEnvelope = resp
                .json()
                .await
                .map_err(|e| ChainError::Rpc(format!("Invalid broadcast response: {}", e)))?;
            let tx = parse_tx_response(&envelope.tx_response);
            Ok(BroadcastResponse {
                tx_hash: tx.tx_hash,
                code: tx.code,
                raw_log: tx.raw_log,
            })
        }
        .await;

        metrics::record_query("broadcast", result.is_ok());
        result
    }

    async fn get_tx(&self, tx_hash: &str) -> ChainResult<Option<TxResult>> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.base_url, tx_hash);
        let result = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ChainError::Rpc(format!("GET {} failed: {}", url, e)))?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let text = resp.text().await.unwrap_or_default();
            if !status.is_success() {
                // The gateway maps a gRPC NotFound to 400/500 depending on version.
                if text.contains("not found") {
                    return Ok(None);
                }
                return Err(ChainError::Rpc(format!("GET {} returned {}: {}", url, status, text)));
            }

            let envelope: TxResponseEnvelope = serde_json::from_str(&text)
                .map_err(|e| ChainError::Rpc(format!("Invalid tx response: {}", e)))?;
            Ok(Some(parse_tx_response(&envelope.tx_response)))
        }
        .await;

        metrics::record_query("get_tx", result.is_ok());
        result
    }
}

/// Read an integer that the gateway may encode as a string or a number.
fn int_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn parse_account(account: &Value) -> Option<AccountInfo> {
    // Vesting and module accounts nest the base account.
    let base = if account.get("account_number").is_some() {
        account
    } else if let Some(base) = account.get("base_account") {
        base
    } else {
        account.pointer("/base_vesting_account/base_account")?
    };

    Some(AccountInfo {
        account_number: int_field(base, "account_number")?,
        sequence: int_field(base, "sequence").unwrap_or(0),
    })
}

fn parse_tx_response(tx: &Value) -> TxResult {
    TxResult {
        code: int_field(tx, "code").unwrap_or(0) as u32,
        tx_hash: tx
            .get("txhash")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        height: int_field(tx, "height").unwrap_or(0),
        gas_used: int_field(tx, "gas_used").unwrap_or(0),
        raw_log: tx
            .get("raw_log")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}
