//! Filter options.
//!
//! Options are fixed once the filter is configured. Defaults match the
//! conventional `static_mask` settings: 20-pixel chunks, threshold 20 and
//! a one-frame lag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest chunk side whose `size² / 10` normalization is non-zero.
pub const MIN_CHUNK_SIZE: u32 = 4;
/// Largest accepted chunk side.
pub const MAX_CHUNK_SIZE: u32 = 600;
/// Largest accepted threshold.
pub const MAX_THRESHOLD: f64 = 1000.0;
/// Largest accepted history depth.
pub const MAX_FRAME_BACK: u32 = 100;

/// Detection options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Chunk side length in luma samples.
    pub size: u32,
    /// Normalized-delta cutoff below which a chunk is masked.
    pub threshold: f64,
    /// History depth, i.e. how many frames back each chunk is compared.
    pub frame_back: u32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            size: 20,
            threshold: 20.0,
            frame_back: 1,
        }
    }
}

impl MaskConfig {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_frame_back(mut self, frame_back: u32) -> Self {
        self.frame_back = frame_back;
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_CHUNK_SIZE {
            return Err(ConfigError::ChunkTooSmall(self.size));
        }
        if self.size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkTooLarge(self.size));
        }
        if !self.threshold.is_finite() || !(0.0..=MAX_THRESHOLD).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.frame_back == 0 || self.frame_back > MAX_FRAME_BACK {
            return Err(ConfigError::InvalidFrameBack(self.frame_back));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("chunk size {0} is below the minimum of 4")]
    ChunkTooSmall(u32),
    #[error("chunk size {0} exceeds the maximum of 600")]
    ChunkTooLarge(u32),
    #[error("threshold {0} outside 0-1000")]
    InvalidThreshold(f64),
    #[error("frame_back {0} outside 1-100")]
    InvalidFrameBack(u32),
    #[error("invalid input geometry: {0}")]
    InvalidInput(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = MaskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.size, 20);
        assert_eq!(config.frame_back, 1);
    }

    #[test]
    fn test_small_chunk_rejected() {
        for size in 0..MIN_CHUNK_SIZE {
            assert_eq!(
                MaskConfig::default().with_size(size).validate(),
                Err(ConfigError::ChunkTooSmall(size))
            );
        }
        assert!(MaskConfig::default().with_size(4).validate().is_ok());
    }

    #[test]
    fn test_ranges_enforced() {
        let base = MaskConfig::default();
        assert!(base.with_size(601).validate().is_err());
        assert!(base.with_size(600).validate().is_ok());
        assert!(base.with_threshold(-0.5).validate().is_err());
        assert!(base.with_threshold(1000.5).validate().is_err());
        assert!(base.with_threshold(f64::NAN).validate().is_err());
        assert!(base.with_threshold(0.0).validate().is_ok());
        assert!(base.with_frame_back(0).validate().is_err());
        assert!(base.with_frame_back(101).validate().is_err());
        assert!(base.with_frame_back(100).validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MaskConfig = toml::from_str("threshold = 5.0").unwrap();
        assert_eq!(config.threshold, 5.0);
        assert_eq!(config.size, 20);
    }
}
