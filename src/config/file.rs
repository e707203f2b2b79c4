//! TOML configuration file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ConfigError, MaskConfig};
use crate::frame::{FrameGeometry, PixelFormat};

/// Full configuration file format.
///
/// ```toml
/// [mask]
/// size = 32
/// threshold = 5.0
/// frame_back = 2
///
/// [input]
/// width = 1280
/// height = 720
/// pixel_format = "yuv420p"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub mask: MaskConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Geometry of the rawvideo stream being filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Sample layout of every frame.
    pub pixel_format: PixelFormat,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            pixel_format: PixelFormat::Yuv420p,
        }
    }
}

impl InputConfig {
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height, self.pixel_format)
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    /// Write Prometheus text metrics here on exit.
    pub metrics_path: Option<PathBuf>,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mask.validate()?;
        self.input
            .geometry()
            .validate()
            .map_err(|e| ConfigError::InvalidInput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.mask, MaskConfig::default());
        assert_eq!(config.input.pixel_format, PixelFormat::Yuv420p);
        assert!(config.output.max_frames.is_none());
    }

    #[test]
    fn test_full_file() {
        let config = FileConfig::from_toml(
            r#"
            [mask]
            size = 32
            threshold = 5.0
            frame_back = 2

            [input]
            width = 1280
            height = 720
            pixel_format = "yuv444p"

            [output]
            max_frames = 10
            metrics_path = "metrics.prom"
            "#,
        )
        .unwrap();

        assert_eq!(config.mask.size, 32);
        assert_eq!(config.mask.frame_back, 2);
        assert_eq!(config.input.geometry().format, PixelFormat::Yuv444p);
        assert_eq!(config.output.max_frames, Some(10));
        assert_eq!(
            config.output.metrics_path.as_deref(),
            Some(Path::new("metrics.prom"))
        );
    }

    #[test]
    fn test_invalid_mask_section_rejected() {
        let result = FileConfig::from_toml("[mask]\nsize = 2\n");
        assert_eq!(result.unwrap_err(), ConfigError::ChunkTooSmall(2));
    }

    #[test]
    fn test_unknown_format_is_parse_error() {
        let result = FileConfig::from_toml("[input]\nwidth = 4\nheight = 4\npixel_format = \"nv12\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = FileConfig::from_file("/nonexistent/static-mask.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }
}
