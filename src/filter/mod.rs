//! The filter entry points: configure, process, release.

mod report;
mod static_mask;

pub use report::{FilterStats, FrameReport};
pub use static_mask::StaticMask;

use crate::config::ConfigError;
use crate::detection::HistoryError;
use crate::frame::{FrameError, FrameGeometry};
use thiserror::Error;

/// Errors returned by [`StaticMask`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid frame: {0}")]
    Frame(#[from] FrameError),
    #[error("history allocation failed: {0}")]
    History(#[from] HistoryError),
    #[error("filter is not configured")]
    NotConfigured,
    #[error("frame geometry {got} differs from configured {expected}")]
    GeometryMismatch {
        expected: FrameGeometry,
        got: FrameGeometry,
    },
}
