//! Engine-level configuration shared by the host harnesses.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_BLOCK_SIZE;

/// Static settings chosen when the voice pool is built.
///
/// Everything here is fixed for the lifetime of the allocated voices; only
/// `sample_rate` may change later through `Voice::set_sample_rate`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f64,
    pub channels: usize,
    pub max_block_size: usize,
    pub voices: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            channels: 2,
            max_block_size: 512,
            voices: 4,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.channels == 0 {
            return Err(ConfigError::NoChannels);
        }
        if self.max_block_size == 0 || self.max_block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::InvalidBlockSize(self.max_block_size));
        }
        if self.voices == 0 {
            return Err(ConfigError::NoVoices);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidSampleRate(f64),
    NoChannels,
    InvalidBlockSize(usize),
    NoVoices,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be positive and finite, got {rate}")
            }
            ConfigError::NoChannels => write!(f, "at least one output channel is required"),
            ConfigError::InvalidBlockSize(size) => write!(
                f,
                "block size must be between 1 and {MAX_BLOCK_SIZE}, got {size}"
            ),
            ConfigError::NoVoices => write!(f, "at least one voice is required"),
        }
    }
}

impl std::error::Error for ConfigError {}
