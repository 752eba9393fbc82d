//! Post card rendering and the like intent.

use std::fmt;

use chrono::DateTime;

use crate::chain::types::TxResult;
use crate::content::types::Post;
use crate::session::{SessionError, SessionStore};
use crate::view::palette::Palette;

/// Characters of body shown before truncation.
pub const BODY_PREVIEW_CHARS: usize = 150;

/// Outcome of pressing "like" on a card.
#[derive(Debug)]
pub enum LikeOutcome {
    Submitted(TxResult),
    /// No connected address; the store was not called.
    NotConnected,
    Failed(SessionError),
}

impl fmt::Display for LikeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeOutcome::Submitted(tx) => write!(f, "Liked (tx {})", tx.tx_hash),
            LikeOutcome::NotConnected => f.write_str("Please connect your wallet to like posts"),
            LikeOutcome::Failed(e) => write!(f, "Like failed: {}", e),
        }
    }
}

/// Summary card of one post.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    post: &'a Post,
    palette: Palette,
}

impl<'a> PostCard<'a> {
    pub fn new(post: &'a Post, palette: Palette) -> Self {
        Self { post, palette }
    }

    pub fn post(&self) -> &Post {
        self.post
    }

    /// Creation date as `M/D/YYYY` (UTC). Empty when the timestamp is out of range.
    pub fn date(&self) -> String {
        DateTime::from_timestamp(self.post.created_at, 0)
            .map(|dt| dt.format("%-m/%-d/%Y").to_string())
            .unwrap_or_default()
    }

    /// Body cut to [`BODY_PREVIEW_CHARS`] characters plus `...`.
    pub fn excerpt(&self) -> String {
        let body = self.post.body.trim();
        if body.chars().count() <= BODY_PREVIEW_CHARS {
            return body.to_string();
        }
        let cut: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }

    pub fn likes_label(&self) -> String {
        format!("{} likes", self.post.likes)
    }

    pub fn render(&self) -> String {
        let p = &self.palette;
        let mut out = String::new();

        out.push_str(&p.paint(p.title, &self.post.title));
        out.push('\n');
        out.push_str(&p.paint(
            p.muted,
            &format!("#{} by {} on {}", self.post.id, self.post.creator, self.date()),
        ));
        out.push('\n');
        out.push_str(&self.excerpt());
        out.push('\n');

        if !self.post.tags.is_empty() {
            let tags: Vec<String> = self.post.tags.iter().map(|t| format!("#{}", t)).collect();
            out.push_str(&p.paint(p.accent, &tags.join(" ")));
            out.push('\n');
        }
        out.push_str(&p.paint(p.muted, &self.likes_label()));
        out
    }

    /// Like this post through `store`, only when a wallet is connected.
    pub async fn like(&self, store: &SessionStore) -> LikeOutcome {
        if !store.snapshot().can_sign() {
            return LikeOutcome::NotConnected;
        }
        match store.like_post(&self.post.id).await {
            Ok(tx) => LikeOutcome::Submitted(tx),
            Err(e) => LikeOutcome::Failed(e),
        }
    }
}

impl fmt::Display for PostCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
