//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the blogchain client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Chain metadata and endpoints.
    pub chain: ChainConfig,

    /// Content query endpoint.
    pub content: ContentConfig,

    /// Flat fee per message kind.
    pub fees: FeeSchedule,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Session store settings.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Theme preference settings.
    pub appearance: AppearanceConfig,
}

/// A currency as registered with wallets and used for display.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CurrencyConfig {
    /// Display denomination (e.g., "STAKE").
    pub coin_denom: String,

    /// On-chain base denomination (e.g., "stake").
    pub coin_minimal_denom: String,

    /// Decimal places between base and display denomination.
    pub coin_decimals: u32,
}

impl CurrencyConfig {
    fn new(display: &str, minimal: &str) -> Self {
        Self {
            coin_denom: display.to_string(),
            coin_minimal_denom: minimal.to_string(),
            coin_decimals: 6,
        }
    }
}

/// Gas price steps advertised to wallet extensions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl Default for GasPriceStep {
    fn default() -> Self {
        Self {
            low: 0.01,
            average: 0.025,
            high: 0.04,
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain ID (e.g., "blogchain").
    pub chain_id: String,

    /// Human readable chain name shown by wallets.
    pub chain_name: String,

    /// Tendermint RPC endpoint (advertised to wallet extensions).
    pub rpc_url: String,

    /// Cosmos REST gateway used for queries and broadcasts.
    pub rest_url: String,

    /// Bech32 account prefix.
    pub bech32_prefix: String,

    /// BIP-44 coin type used for key derivation.
    pub coin_type: u32,

    /// Staking and fee currency.
    pub stake_currency: CurrencyConfig,

    /// All currencies known to the chain.
    pub currencies: Vec<CurrencyConfig>,

    /// Gas price steps for the fee currency.
    pub gas_price_step: GasPriceStep,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "blogchain".to_string(),
            chain_name: "BlogChain".to_string(),
            rpc_url: "http://localhost:26657".to_string(),
            rest_url: "http://localhost:1317".to_string(),
            bech32_prefix: "blogchain".to_string(),
            coin_type: 118,
            stake_currency: CurrencyConfig::new("STAKE", "stake"),
            currencies: vec![
                CurrencyConfig::new("STAKE", "stake"),
                CurrencyConfig::new("TOKEN", "token"),
            ],
            gas_price_step: GasPriceStep::default(),
        }
    }
}

/// Content (post) query endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL of the HTTP query surface.
    pub api_url: String,

    /// Path of the blog module below the base URL.
    pub module_path: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:1317".to_string(),
            module_path: "blogchain/blog/v1".to_string(),
        }
    }
}

/// A flat fee: amount of one denomination plus a gas limit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FeeConfig {
    pub denom: String,
    pub amount: u64,
    pub gas: u64,
}

impl FeeConfig {
    fn stake(amount: u64, gas: u64) -> Self {
        Self {
            denom: "stake".to_string(),
            amount,
            gas,
        }
    }
}

/// Fixed fee schedule, one entry per message kind.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeeSchedule {
    pub create_post: FeeConfig,
    pub like_post: FeeConfig,
    pub send_tokens: FeeConfig,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            create_post: FeeConfig::stake(5000, 200_000),
            like_post: FeeConfig::stake(2500, 100_000),
            send_tokens: FeeConfig::stake(5000, 200_000),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per HTTP request timeout in seconds.
    pub request_secs: u64,

    /// How long to wait for a broadcast transaction to be included.
    pub confirmation_secs: u64,

    /// Interval between inclusion polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            confirmation_secs: 60,
            poll_interval_ms: 3000,
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Page size used when (re)fetching the post list.
    pub posts_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { posts_limit: 50 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Appearance (dark mode) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// File holding the stored dark-mode preference.
    pub preferences_path: String,

    /// The system colour-scheme preference, when known.
    pub system_dark_mode: Option<bool>,

    /// Fallback when neither a stored nor a system preference exists.
    pub default_dark_mode: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            preferences_path: ".blogchain-preferences.json".to_string(),
            system_dark_mode: None,
            default_dark_mode: false,
        }
    }
}
