//! Mnemonic-derived signer.
//!
//! # Security
//! - Recovery phrases are loaded ONLY from environment variables or caller input
//! - Keys are never logged or serialized

use async_trait::async_trait;
use cosmrs::bip32::{DerivationPath, XPrv};
use cosmrs::crypto::{secp256k1, PublicKey};
use cosmrs::tx::{Raw, SignDoc};

use crate::wallet::signer::OfflineSigner;
use crate::wallet::types::{AccountData, WalletError, WalletResult};

/// Environment variable name for the recovery phrase.
pub const MNEMONIC_ENV_VAR: &str = "BLOGCHAIN_MNEMONIC";

/// Signer holding a single secp256k1 key derived from a BIP-39 phrase.
pub struct MnemonicSigner {
    signing_key: secp256k1::SigningKey,
    public_key: PublicKey,
    address: String,
}

impl MnemonicSigner {
    /// Derive the key at `m/44'/<coin_type>'/0'/0/0` from a recovery phrase.
    ///
    /// # Arguments
    /// * `phrase` - BIP-39 mnemonic (12 or 24 words)
    /// * `prefix` - Bech32 account prefix for the derived address
    /// * `coin_type` - BIP-44 coin type (118 for Cosmos chains)
    pub fn from_mnemonic(phrase: &str, prefix: &str, coin_type: u32) -> WalletResult<Self> {
        let mnemonic = bip39::Mnemonic::parse_normalized(phrase.trim())
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        let seed = mnemonic.to_seed("");

        let path: DerivationPath = format!("m/44'/{}'/0'/0/0", coin_type)
            .parse()
            .map_err(|e| WalletError::InvalidMnemonic(format!("Invalid derivation path: {}", e)))?;
        let xprv = XPrv::derive_from_path(seed, &path)
            .map_err(|e| WalletError::InvalidMnemonic(format!("Key derivation failed: {}", e)))?;

        let signing_key = secp256k1::SigningKey::from_slice(&xprv.private_key().to_bytes())
            .map_err(|e| WalletError::InvalidMnemonic(format!("Invalid derived key: {}", e)))?;
        let public_key = signing_key.public_key();
        let address = public_key
            .account_id(prefix)
            .map_err(|e| WalletError::InvalidMnemonic(format!("Invalid address prefix '{}': {}", prefix, e)))?
            .to_string();

        tracing::info!(address = %address, "Mnemonic signer initialized");

        Ok(Self {
            signing_key,
            public_key,
            address,
        })
    }

    /// Load the phrase from environment variable.
    ///
    /// Reads `BLOGCHAIN_MNEMONIC` from environment.
    pub fn from_env(prefix: &str, coin_type: u32) -> WalletResult<Self> {
        let phrase = std::env::var(MNEMONIC_ENV_VAR)
            .map_err(|_| WalletError::MissingSecret(MNEMONIC_ENV_VAR.to_string()))?;

        Self::from_mnemonic(&phrase, prefix, coin_type)
    }

    /// Get the signer's address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl OfflineSigner for MnemonicSigner {
    async fn accounts(&self) -> WalletResult<Vec<AccountData>> {
        Ok(vec![AccountData {
            address: self.address.clone(),
            public_key: self.public_key.clone(),
        }])
    }

    async fn sign_direct(&self, signer_address: &str, sign_doc: SignDoc) -> WalletResult<Raw> {
        if signer_address != self.address {
            return Err(WalletError::Signing(format!(
                "No key for address {}",
                signer_address
            )));
        }

        sign_doc
            .sign(&self.signing_key)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for MnemonicSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MnemonicSigner")
            .field("address", &self.address)
            .finish()
    }
}
