//! Content (post) query subsystem.
//!
//! # Data Flow
//! ```text
//! Session store
//!     → gateway.rs (URL building, HTTP GET with timeout)
//!     → types.rs (lenient JSON decoding into Post / PostPage / TxSummary)
//! ```

pub mod gateway;
pub mod types;

pub use gateway::{ContentGateway, ContentSource};
pub use types::{ContentError, ContentResult, Pagination, Post, PostPage, TxSummary};
