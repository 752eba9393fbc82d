//! ANSI colours per theme.

use crate::preferences::Theme;

const RESET: &str = "\x1b[0m";

/// Escape sequences used by the text views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub error: &'static str,
    enabled: bool,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                title: "\x1b[1;30m",
                muted: "\x1b[90m",
                accent: "\x1b[34m",
                error: "\x1b[31m",
                enabled: true,
            },
            Theme::Dark => Self {
                title: "\x1b[1;97m",
                muted: "\x1b[37m",
                accent: "\x1b[96m",
                error: "\x1b[91m",
                enabled: true,
            },
        }
    }

    /// Palette that emits no escape sequences.
    pub fn plain() -> Self {
        Self {
            title: "",
            muted: "",
            accent: "",
            error: "",
            enabled: false,
        }
    }

    /// Wrap `text` in `colour`, resetting afterwards.
    pub fn paint(&self, colour: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", colour, text, RESET)
        } else {
            text.to_string()
        }
    }
}
