//! Configuration system
//!
//! Engine and UI tuning values, loadable from TOML or RON files.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        log::debug!("Loading configuration from {}", path);
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from the path extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tuning values for interactive widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Fraction of scroll velocity kept each frame
    pub scroll_damping: f32,

    /// Fraction of the overshoot pulled back each frame
    pub scroll_elastic_strength: f32,

    /// Velocity added per unit of wheel delta
    pub scroll_wheel_factor: f32,

    /// Multiplier applied when integrating scroll velocity
    pub scroll_speed: f32,

    /// Seconds a key must be held before it repeats
    pub key_repeat_delay: f32,

    /// Seconds between repeats once repeating
    pub key_repeat_rate: f32,

    /// Seconds between caret visibility toggles
    pub caret_blink_interval: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            scroll_damping: 0.9,
            scroll_elastic_strength: 0.25,
            scroll_wheel_factor: 0.25,
            scroll_speed: 1.5,
            key_repeat_delay: 0.4,
            key_repeat_rate: 0.05,
            caret_blink_interval: 0.5,
        }
    }
}

impl Config for UiConfig {}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title reported to the host
    pub title: String,

    /// Width of the virtual drawing surface in pixels
    pub virtual_width: u32,

    /// Height of the virtual drawing surface in pixels
    pub virtual_height: u32,

    /// Widget tuning
    pub ui: UiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Lantern Application".to_string(),
            virtual_width: 1280,
            virtual_height: 720,
            ui: UiConfig::default(),
        }
    }
}

impl Config for EngineConfig {}
