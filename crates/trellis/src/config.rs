//! Scene configuration.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    id::MAX_PLAYERS,
};

/// Viewport size used before the host reports one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Tunables for a scene. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of local players tracked for focus and per-player states.
    pub max_players: usize,
    /// Fallback extent for viewport-relative values.
    pub default_viewport: ViewportSize,
    /// Generate spatial navigation links from resolved bounds.
    pub auto_navigation: bool,
    /// Activating the Active state also focuses the widget.
    pub focus_on_active: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_players: 1,
            default_viewport: ViewportSize::default(),
            auto_navigation: true,
            focus_on_active: false,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values are in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(Error::Config(format!(
                "max_players must be in 1..={MAX_PLAYERS}, got {}",
                self.max_players
            )));
        }
        let ViewportSize { width, height } = self.default_viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::Config(format!(
                "default_viewport must be positive, got {width}x{height}"
            )));
        }
        Ok(())
    }
}
