//! Session state machine.
//!
//! # States
//! - Disconnected: nothing connected yet
//! - Connecting: a connect call is in flight
//! - ReadOnly: queries work, no signer
//! - Signing: signer installed, address populated
//!
//! # State Transitions
//! ```text
//! Disconnected → Connecting → ReadOnly | Signing   (on success)
//! Connecting → previous phase                        (on failure)
//! ReadOnly | Signing: busy while `in_flight` is set
//! ```
//!
//! There is no disconnect; a fresh session starts Disconnected.

use std::fmt;

use serde::Serialize;

use crate::chain::types::Coin;
use crate::content::types::Post;

/// Connection phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Disconnected,
    Connecting,
    ReadOnly,
    Signing,
}

impl Phase {
    /// Phase after a successful read-only connect; never downgrades signing.
    pub fn after_read_only_connect(previous: Phase) -> Phase {
        match previous {
            Phase::Signing => Phase::Signing,
            _ => Phase::ReadOnly,
        }
    }
}

/// Orchestration operations a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    Connect,
    ConnectWallet,
    ConnectWalletExtension,
    FetchPosts,
    CreatePost,
    LikePost,
    SendTokens,
    TransactionHistory,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::ConnectWallet => "connect_wallet",
            Operation::ConnectWalletExtension => "connect_wallet_extension",
            Operation::FetchPosts => "fetch_posts",
            Operation::CreatePost => "create_post",
            Operation::LikePost => "like_post",
            Operation::SendTokens => "send_tokens",
            Operation::TransactionHistory => "transaction_history",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub phase: Phase,
    /// Active address; empty while no signer is connected.
    pub address: String,
    pub balance: Vec<Coin>,
    pub posts: Vec<Post>,
    pub loading: bool,
    /// Last error message; empty when the last operation succeeded.
    pub error: String,
    pub in_flight: Option<Operation>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        matches!(self.phase, Phase::ReadOnly | Phase::Signing)
    }

    /// Connected with an address, so state-changing calls are allowed.
    pub fn can_sign(&self) -> bool {
        self.phase == Phase::Signing && !self.address.is_empty()
    }
}
