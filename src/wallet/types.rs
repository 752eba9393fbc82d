//! Wallet-facing types and error definitions.

use cosmrs::crypto::PublicKey;
use serde::Serialize;
use thiserror::Error;

use crate::config::ChainConfig;
use crate::error::ErrorKind;

/// An account exposed by a signer.
#[derive(Debug, Clone)]
pub struct AccountData {
    /// Bech32 address.
    pub address: String,
    pub public_key: PublicKey,
}

/// Key information reported by a wallet extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletKey {
    pub name: String,
    pub algo: String,
    pub pub_key: Vec<u8>,
    pub bech32_address: String,
    pub is_hardware: bool,
}

/// Errors raised by wallets and signers.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet extension is injected in this context.
    #[error("Wallet extension not found. Please install a wallet extension.")]
    Unavailable,

    /// The extension refused a request (user rejection or internal failure).
    #[error("{0}")]
    Rejected(String),

    /// The recovery phrase or derivation path is unusable.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// A secret that must come from the environment is missing.
    #[error("Environment variable {0} not set")]
    MissingSecret(String),

    /// Producing a signature failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Unavailable => ErrorKind::WalletUnavailable,
            WalletError::Rejected(_) | WalletError::Signing(_) => ErrorKind::TransportFailure,
            WalletError::InvalidMnemonic(_) | WalletError::MissingSecret(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// A currency entry in the chain registration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u32,
    pub gas_price_step: GasPriceStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GasPriceStep {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// Standard Cosmos prefix family derived from the account prefix.
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{}pub", prefix),
            bech32_prefix_val_addr: format!("{}valoper", prefix),
            bech32_prefix_val_pub: format!("{}valoperpub", prefix),
            bech32_prefix_cons_addr: format!("{}valcons", prefix),
            bech32_prefix_cons_pub: format!("{}valconspub", prefix),
        }
    }
}

/// Chain metadata registered with a wallet extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub stake_currency: Currency,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<FeeCurrency>,
}

impl ChainInfo {
    pub fn from_config(config: &ChainConfig) -> Self {
        let stake = &config.stake_currency;
        let step = config.gas_price_step;
        Self {
            chain_id: config.chain_id.clone(),
            chain_name: config.chain_name.clone(),
            rpc: config.rpc_url.clone(),
            rest: config.rest_url.clone(),
            stake_currency: Currency {
                coin_denom: stake.coin_denom.clone(),
                coin_minimal_denom: stake.coin_minimal_denom.clone(),
                coin_decimals: stake.coin_decimals,
            },
            bip44: Bip44 { coin_type: config.coin_type },
            bech32_config: Bech32Config::from_prefix(&config.bech32_prefix),
            currencies: config
                .currencies
                .iter()
                .map(|c| Currency {
                    coin_denom: c.coin_denom.clone(),
                    coin_minimal_denom: c.coin_minimal_denom.clone(),
                    coin_decimals: c.coin_decimals,
                })
                .collect(),
            fee_currencies: vec![FeeCurrency {
                coin_denom: stake.coin_denom.clone(),
                coin_minimal_denom: stake.coin_minimal_denom.clone(),
                coin_decimals: stake.coin_decimals,
                gas_price_step: GasPriceStep {
                    low: step.low,
                    average: step.average,
                    high: step.high,
                },
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_info_serializes_in_extension_shape() {
        let info = ChainInfo::from_config(&ChainConfig::default());
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["chainId"], "blogchain");
        assert_eq!(json["stakeCurrency"]["coinMinimalDenom"], "stake");
        assert_eq!(json["bip44"]["coinType"], 118);
        assert_eq!(json["bech32Config"]["bech32PrefixValAddr"], "blogchainvaloper");
        assert_eq!(json["feeCurrencies"][0]["gasPriceStep"]["average"], 0.025);
        assert_eq!(json["currencies"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(WalletError::Unavailable.kind(), ErrorKind::WalletUnavailable);
        assert_eq!(WalletError::Rejected("Request rejected".into()).kind(), ErrorKind::TransportFailure);
        assert_eq!(WalletError::InvalidMnemonic("bad".into()).kind(), ErrorKind::InvalidInput);
    }
}
