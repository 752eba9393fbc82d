//! Session status line.

use std::fmt;

use crate::session::{Phase, Session};
use crate::view::palette::Palette;

/// One-line summary of a session snapshot.
#[derive(Debug, Clone)]
pub struct StatusLine<'a> {
    session: &'a Session,
    balance: String,
    palette: Palette,
}

impl<'a> StatusLine<'a> {
    /// `balance` is the already formatted stake balance.
    pub fn new(session: &'a Session, balance: String, palette: Palette) -> Self {
        Self {
            session,
            balance,
            palette,
        }
    }

    pub fn render(&self) -> String {
        let p = &self.palette;
        let s = self.session;

        let mut parts = vec![match s.phase {
            Phase::Disconnected => p.paint(p.muted, "disconnected"),
            Phase::Connecting => p.paint(p.muted, "connecting..."),
            Phase::ReadOnly => p.paint(p.accent, "read-only"),
            Phase::Signing => p.paint(p.accent, &s.address),
        }];

        if s.phase == Phase::Signing {
            parts.push(self.balance.clone());
        }
        if s.loading {
            parts.push(p.paint(p.muted, "loading..."));
        }
        if !s.error.is_empty() {
            parts.push(p.paint(p.error, &s.error));
        }
        parts.join(" | ")
    }
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
