//! Widget settings loaded from TOML with environment overrides.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock widget: gravity factor 0.5, threshold 80%, 60 frames per second.

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TiltbarError};
use crate::vessel::physics::{GRAVITY_FACTOR, REST_DEADZONE_DEG};
use crate::vessel::{Physics, DEFAULT_THRESHOLD};

/// Upper bound on the frame loop rate.
pub const MAX_FPS: u32 = 240;

/// Physics tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Scales drag-to-angle and angle-to-fill conversions
    pub gravity_factor: f64,
    /// Tilt band (degrees) treated as resting
    pub rest_deadzone: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity_factor: GRAVITY_FACTOR,
            rest_deadzone: REST_DEADZONE_DEG,
        }
    }
}

/// Voice-over behaviour.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VoiceoverSettings {
    /// Switch the mode on when the widget mounts
    pub enabled: bool,
    /// Fill level that triggers a response
    pub threshold: f64,
}

impl Default for VoiceoverSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Terminal presentation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Frame loop rate
    pub fps: u32,
    /// Virtual pixels per terminal row, used to turn mouse rows into drag distance
    pub row_height: f64,
    /// Whether to use colors
    pub colors: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fps: 60,
            row_height: 8.0,
            colors: true,
        }
    }
}

/// Root settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub voiceover: VoiceoverSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings from a TOML file plus `TILTBAR__SECTION__KEY`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or
    /// holds values rejected by [`Settings::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TiltbarError::ConfigNotFound(path.display().to_string()));
        }

        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(env_overrides())
            .build()?;
        Self::finish(config)
    }

    /// Load from `path` if given, otherwise from defaults and the
    /// environment only.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Config::builder().add_source(env_overrides()).build()?;
                Self::finish(config)
            }
        }
    }

    /// Parse settings from a TOML string, without environment overrides.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        if !physics.gravity_factor.is_finite() || physics.gravity_factor <= 0.0 {
            return Err(invalid(format!(
                "physics.gravity_factor must be a positive number, got {}",
                physics.gravity_factor
            )));
        }
        if !physics.rest_deadzone.is_finite() || physics.rest_deadzone < 0.0 {
            return Err(invalid(format!(
                "physics.rest_deadzone must be zero or more, got {}",
                physics.rest_deadzone
            )));
        }
        let threshold = self.voiceover.threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(invalid(format!(
                "voiceover.threshold must be within 0..=100, got {}",
                threshold
            )));
        }
        if self.display.fps == 0 || self.display.fps > MAX_FPS {
            return Err(invalid(format!(
                "display.fps must be between 1 and {}, got {}",
                MAX_FPS, self.display.fps
            )));
        }
        if !self.display.row_height.is_finite() || self.display.row_height <= 0.0 {
            return Err(invalid(format!(
                "display.row_height must be a positive number, got {}",
                self.display.row_height
            )));
        }
        Ok(())
    }

    /// Physics model for these settings.
    pub fn physics(&self) -> Physics {
        Physics::new(self.physics.gravity_factor, self.physics.rest_deadzone)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn env_overrides() -> Environment {
    Environment::with_prefix("TILTBAR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn invalid(reason: String) -> TiltbarError {
    TiltbarError::InvalidConfig(reason)
}
