//! Configuration file support for ecosort.
//!
//! Settings are stored as versioned JSON. Every field has a default, so partial
//! files and files from older versions load cleanly.

use serde::{Deserialize, Serialize};

use crate::capture::FacingMode;
use crate::constants::{
    CHAT_REPLY_DELAY_MS, CLASSIFICATION_DELAY_MS, DEFAULT_JPEG_QUALITY, IDEAL_CAPTURE_HEIGHT,
    IDEAL_CAPTURE_WIDTH, MAX_CAPTURE_DIMENSION,
};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Camera and encoding settings
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Simulated service latency
    #[serde(default)]
    pub timing: TimingSettings,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Camera used when the camera view opens
    #[serde(default)]
    pub default_facing: FacingMode,

    /// Seed for the simulated services; random when absent
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Camera and encoding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Preferred capture width
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    /// Preferred capture height
    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// JPEG quality for captured and uploaded images (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_ideal_width() -> u32 {
    IDEAL_CAPTURE_WIDTH
}

fn default_ideal_height() -> u32 {
    IDEAL_CAPTURE_HEIGHT
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl CaptureSettings {
    /// Requested resolution, each side clamped to `1..=MAX_CAPTURE_DIMENSION`.
    pub fn resolution(&self) -> (u32, u32) {
        (
            self.ideal_width.clamp(1, MAX_CAPTURE_DIMENSION),
            self.ideal_height.clamp(1, MAX_CAPTURE_DIMENSION),
        )
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// Simulated latency of the stand-in services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Delay before a classification resolves
    #[serde(default = "default_classification_delay")]
    pub classification_delay_ms: u64,

    /// Delay before a chat reply arrives
    #[serde(default = "default_chat_delay")]
    pub chat_reply_delay_ms: u64,
}

fn default_classification_delay() -> u64 {
    CLASSIFICATION_DELAY_MS
}

fn default_chat_delay() -> u64 {
    CHAT_REPLY_DELAY_MS
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            classification_delay_ms: default_classification_delay(),
            chat_reply_delay_ms: default_chat_delay(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            capture: CaptureSettings::default(),
            timing: TimingSettings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default config filename.
    pub fn default_filename() -> &'static str {
        "ecosort-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("ecosort").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("ecosort")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories if needed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        /// Version found in the file
        file_version: u32,
        /// Newest version this build understands
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
