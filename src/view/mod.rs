//! Text presentation of posts and session state.
//!
//! # Data Flow
//! ```text
//! Session snapshot / Post
//!     → palette.rs (colours for the injected Theme)
//!     → post_card.rs, status.rs (plain text with ANSI colour)
//! PostCard::like → session store (only when connected)
//! ```

pub mod palette;
pub mod post_card;
pub mod status;

pub use palette::Palette;
pub use post_card::{LikeOutcome, PostCard, BODY_PREVIEW_CHARS};
pub use status::StatusLine;
