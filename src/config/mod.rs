//! Filter options and the configuration file that carries them.

mod file;
mod options;

pub use file::{FileConfig, InputConfig, OutputConfig};
pub use options::{
    ConfigError, MaskConfig, MAX_CHUNK_SIZE, MAX_FRAME_BACK, MAX_THRESHOLD, MIN_CHUNK_SIZE,
};
