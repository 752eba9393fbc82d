//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Signer (mnemonic from environment, or wallet extension)
//!     → client.rs (signer guard, fee schedule, sign doc)
//!     → messages.rs (typed envelopes)
//!     → rpc.rs (REST transport with timeouts)
//!     → client.rs (poll until included, classify result code)
//! ```
//!
//! # Security Constraints
//! - Recovery phrases ONLY from environment variables or explicit input
//! - Never log key material
//! - All REST calls have configurable timeouts

pub mod client;
pub mod messages;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, ReadClient, SignClient};
pub use messages::{MessageKind, TxMessage};
pub use rpc::{ChainRpc, RestChainRpc};
pub use types::{AccountInfo, BroadcastResponse, ChainError, ChainResult, Coin, TxResult};
pub use wallet::MnemonicSigner;
