//! Session orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! Presentation (CLI, views)
//!     → store.rs (busy guard, phase transitions, error recording)
//!     → wallet / chain / content gateways
//!     → store.rs (snapshot update, watch broadcast)
//!     → format.rs (balance for display)
//! ```
//!
//! # Design Decisions
//! - Only the store mutates the session; everything else reads snapshots
//! - Refreshes after a transaction happen once, in a fixed order: posts, then balance

pub mod format;
pub mod state;
pub mod store;

pub use format::{format_amount, format_balance};
pub use state::{Operation, Phase, Session};
pub use store::{SessionError, SessionResult, SessionSettings, SessionStore, NOT_CONNECTED_MESSAGE};
