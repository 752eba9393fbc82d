//! Blogchain client library.
//!
//! Wallet, chain and content gateways behind a session store, with text
//! views for a terminal front end.

pub mod chain;
pub mod config;
pub mod content;
pub mod error;
pub mod observability;
pub mod preferences;
pub mod session;
pub mod view;
pub mod wallet;

pub use config::schema::ClientConfig;
pub use error::ErrorKind;
pub use session::{Session, SessionStore};
