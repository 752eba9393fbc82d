//! Wallet subsystem.
//!
//! # Data Flow
//! ```text
//! WalletExtension (injected capability, optional)
//!     → gateway.rs (register chain, enable, hand out signer)
//!     → signer.rs (OfflineSigner trait object)
//!     → chain adapter (sign and broadcast)
//! ```
//!
//! # Security Constraints
//! - Signers never expose key material
//! - Extension prompts are never retried on rejection

pub mod gateway;
pub mod signer;
pub mod types;

pub use gateway::{WalletConnection, WalletExtension, WalletGateway};
pub use signer::OfflineSigner;
pub use types::{AccountData, ChainInfo, WalletError, WalletKey, WalletResult};
