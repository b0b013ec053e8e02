//! 24-bit RGB color theme for plain-text output.
//!
//! Used by the headless simulation report. The interactive widgets use the
//! matching ratatui palette in [`crate::ui::widgets`].

use owo_colors::{OwoColorize, Rgb};

/// 24-bit RGB color theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Liquid color - blue (59, 130, 246)
    pub liquid: Rgb,
    /// Voice-over message color - yellow (234, 179, 8)
    pub message: Rgb,
    /// Tilt readout color - cyan (34, 211, 238)
    pub tilt: Rgb,
    /// Muted/secondary text color - gray (107, 114, 128)
    pub muted: Rgb,
    /// Whether colors are emitted at all
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            liquid: Rgb(59, 130, 246),
            message: Rgb(234, 179, 8),
            tilt: Rgb(34, 211, 238),
            muted: Rgb(107, 114, 128),
            enabled: true,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme that leaves text unstyled.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Pick a theme from the configured flag, respecting `NO_COLOR`.
    pub fn detect(colors: bool) -> Self {
        if colors && std::env::var_os("NO_COLOR").is_none() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Paint `text` with `color` when colors are enabled.
    pub fn paint(&self, text: &str, color: Rgb) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}
