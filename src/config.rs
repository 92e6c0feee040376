use crate::defaults;
use crate::error::{Result, VoxturnError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub pipeline: PipelineConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Trailing silence in milliseconds before an utterance is considered
    /// ended.
    pub trailing_silence_ms: u64,
}

/// Response pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// How many synthesized segments may wait between production and
    /// playback.
    pub segment_buffer: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            trailing_silence_ms: defaults::TRAILING_SILENCE_MS,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment_buffer: defaults::SEGMENT_BUFFER,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VoxturnError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                VoxturnError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default configuration path
    ///
    /// Returns ~/.config/voxturn/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voxturn").join("config.toml"))
    }

    /// Check configuration values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.capture.trailing_silence_ms == 0 {
            return Err(VoxturnError::ConfigInvalidValue {
                key: "capture.trailing_silence_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.pipeline.segment_buffer == 0 {
            return Err(VoxturnError::ConfigInvalidValue {
                key: "pipeline.segment_buffer".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
