//! Runtime configuration
//!
//! Stored as a compact postcard blob so it can sit next to the app on flash
//! or be handed to the simulator with `--config`.

use alloc::vec::Vec;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::metrics::STALE_AFTER_MINUTES;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to deserialize configuration")]
    Deserialize,

    #[error("Failed to serialize configuration")]
    Serialize,

    #[error("Configuration version mismatch (found {found}, expected {expected})")]
    VersionMismatch { found: u8, expected: u8 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlanceConfig {
    pub version: u8,
    /// Minutes after which the display turns stale
    pub stale_after_minutes: u16,
    /// Offset from UTC applied to the clock label
    pub utc_offset_minutes: i16,
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            stale_after_minutes: STALE_AFTER_MINUTES as u16,
            utc_offset_minutes: 0,
        }
    }
}

impl GlanceConfig {
    /// Decode a postcard blob, rejecting other format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version, CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch {
                found: config.version,
                expected: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Serialize)
    }

    pub fn stale_after(&self) -> i64 {
        self.stale_after_minutes as i64
    }

    pub fn utc_offset(&self) -> i32 {
        self.utc_offset_minutes as i32
    }
}
