//! Planar video frames and the formats the filter understands.
//!
//! Frames are owned by the surrounding pipeline. The filter only ever sees
//! a [`FrameMut`], a validated set of mutable plane borrows, so the
//! exclusive-write requirement is carried by the type system instead of
//! being assumed.

mod buffer;
mod format;
mod plane;

pub use buffer::{Frame, FrameGeometry, FrameMut, MAX_PLANES};
pub use format::{ChromaSampling, FrameLayout, PixelFormat};
pub use plane::{Plane, PlaneMut};

use thiserror::Error;

/// Errors describing frames that do not match their declared geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),
    #[error("{format} frames carry {expected} planes, got {got}")]
    PlaneCount {
        format: PixelFormat,
        expected: usize,
        got: usize,
    },
    #[error("plane {plane}: stride {stride} is narrower than a row ({row_bytes} bytes)")]
    StrideTooSmall {
        plane: usize,
        stride: usize,
        row_bytes: usize,
    },
    #[error("plane {plane}: buffer holds {len} bytes, need {required}")]
    BufferTooSmall {
        plane: usize,
        len: usize,
        required: usize,
    },
}
