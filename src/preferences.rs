//! Dark-mode preference.
//!
//! # Precedence
//! stored preference > system preference > configured default
//!
//! # Design Decisions
//! - The resolved theme is a plain value handed to the view layer
//! - A missing or unreadable file means "no stored preference"

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::schema::AppearanceConfig;

/// Colour theme of the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    pub fn toggled(&self) -> Self {
        Theme::from_dark_mode(!self.is_dark())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Inputs the theme is resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeSettings {
    pub system_dark_mode: Option<bool>,
    pub default_dark_mode: bool,
}

impl ThemeSettings {
    pub fn from_config(config: &AppearanceConfig) -> Self {
        Self {
            system_dark_mode: config.system_dark_mode,
            default_dark_mode: config.default_dark_mode,
        }
    }

    /// Effective theme given the stored preference.
    pub fn resolve(&self, stored: Option<bool>) -> Theme {
        Theme::from_dark_mode(
            stored
                .or(self.system_dark_mode)
                .unwrap_or(self.default_dark_mode),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreferences {
    dark_mode: bool,
}

/// JSON file holding `{"dark_mode": bool}`.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    settings: ThemeSettings,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>, settings: ThemeSettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    pub fn from_config(config: &AppearanceConfig) -> Self {
        Self::new(&config.preferences_path, ThemeSettings::from_config(config))
    }

    /// Stored preference, if any.
    pub fn stored(&self) -> Option<bool> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read preferences");
                return None;
            }
        };

        match serde_json::from_str::<StoredPreferences>(&content) {
            Ok(prefs) => Some(prefs.dark_mode),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed preferences");
                None
            }
        }
    }

    /// Effective theme.
    pub fn theme(&self) -> Theme {
        self.settings.resolve(self.stored())
    }

    /// Persist an explicit preference.
    pub fn save(&self, theme: Theme) -> io::Result<()> {
        let prefs = StoredPreferences {
            dark_mode: theme.is_dark(),
        };
        let json = serde_json::to_string(&prefs).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }

    /// Flip the effective theme, persist and return it.
    pub fn toggle(&self) -> io::Result<Theme> {
        let theme = self.theme().toggled();
        self.save(theme)?;
        tracing::debug!(theme = theme.as_str(), "Theme preference saved");
        Ok(theme)
    }
}
