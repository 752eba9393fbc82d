//! Failure classification shared by every gateway.

use std::fmt;

use serde::Serialize;

/// The kind of a failure, independent of which gateway produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// No wallet extension is injected.
    WalletUnavailable,
    /// A state-changing call was attempted before a signer exists.
    SignerNotInitialized,
    /// A network or extension call failed, was rejected or timed out.
    TransportFailure,
    /// The chain answered with a nonzero result code.
    ChainRejection,
    /// Local input could not be used (bad phrase, bad id, bad amount).
    InvalidInput,
    /// Another session operation is still in flight.
    Busy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::WalletUnavailable => "wallet_unavailable",
            ErrorKind::SignerNotInitialized => "signer_not_initialized",
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::ChainRejection => "chain_rejection",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Busy => "busy",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
