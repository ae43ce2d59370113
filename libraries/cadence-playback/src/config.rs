//! Playback configuration
use crate::error::{PlaybackError, Result};
use crate::options::PlaybackOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix (`CADENCE_REPEAT=true`, ...)
pub const ENV_PREFIX: &str = "CADENCE";

/// Configuration for the playback controller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial consume/random/repeat/single flags
    #[serde(flatten)]
    pub options: PlaybackOptions,

    /// Fallback volume (0-100) used when no mixer is attached
    pub volume: Option<u8>,

    /// Seed for the shuffle order; entropy when unset
    pub shuffle_seed: Option<u64>,
}

impl PlaybackConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables win over the file. A missing file is not an
    /// error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(false));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(volume) = self.volume {
            if volume > 100 {
                return Err(PlaybackError::Config(format!(
                    "volume must be between 0 and 100, got {}",
                    volume
                )));
            }
        }
        Ok(())
    }
}
