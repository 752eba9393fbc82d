//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorKind;

/// An amount of one denomination. Amounts stay string-encoded integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Account number and sequence needed to sign for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Immediate answer of the node to a broadcast (mempool check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResponse {
    pub tx_hash: String,
    pub code: u32,
    pub raw_log: String,
}

/// Outcome of a broadcast transaction once included in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxResult {
    /// 0 means accepted; anything else is a chain-side rejection.
    pub code: u32,
    pub tx_hash: String,
    pub height: u64,
    pub gas_used: u64,
    pub raw_log: String,
}

impl TxResult {
    pub fn is_accepted(&self) -> bool {
        self.code == 0
    }

    /// Convert a nonzero result code into a domain error.
    pub fn into_accepted(self) -> ChainResult<Self> {
        if self.is_accepted() {
            Ok(self)
        } else {
            Err(ChainError::Rejected {
                code: self.code,
                tx_hash: self.tx_hash,
                log: self.raw_log,
            })
        }
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A state-changing call was made before any signer was installed.
    #[error("Signing client not initialized")]
    SignerNotInitialized,

    /// REST connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was not included within expected time.
    #[error("Transaction {tx_hash} not included after {secs} seconds")]
    ConfirmationTimeout { tx_hash: String, secs: u64 },

    /// The chain rejected the transaction.
    #[error("Transaction rejected with code {code}: {log}")]
    Rejected { code: u32, tx_hash: String, log: String },

    /// Building or signing the transaction failed locally.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A caller supplied value could not be encoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ChainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::SignerNotInitialized => ErrorKind::SignerNotInitialized,
            ChainError::Rpc(_) | ChainError::ConfirmationTimeout { .. } => ErrorKind::TransportFailure,
            ChainError::Rejected { .. } => ErrorKind::ChainRejection,
            ChainError::Signing(_) => ErrorKind::TransportFailure,
            ChainError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_code_is_rejection() {
        let result = TxResult {
            code: 5,
            tx_hash: "ABC".into(),
            height: 10,
            gas_used: 1,
            raw_log: "insufficient funds".into(),
        };
        let err = result.into_accepted().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChainRejection);
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::SignerNotInitialized;
        assert_eq!(err.to_string(), "Signing client not initialized");

        let err = ChainError::ConfirmationTimeout { tx_hash: "ABC".into(), secs: 60 };
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("60 seconds"));
    }
}
