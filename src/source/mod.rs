//! Frame input and output.
//!
//! Sources hand out owned frames one at a time; the filter never cares
//! where they came from. [`RawVideoSource`] and [`RawVideoSink`] speak
//! headerless rawvideo (planes back to back, no row padding), and
//! [`PatternSource`] synthesizes frames for demos and tests.

mod pattern;
mod rawvideo;

pub use pattern::PatternSource;
pub use rawvideo::{RawVideoSink, RawVideoSource};

use crate::frame::{Frame, FrameError, FrameGeometry};
use thiserror::Error;

/// Errors that can occur while reading or writing frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source not opened")]
    NotOpen,
    #[error("invalid stream geometry: {0}")]
    InvalidGeometry(#[from] FrameError),
    #[error("truncated frame: read {read} of {expected} bytes")]
    TruncatedFrame { read: usize, expected: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for anything that yields frames of a fixed geometry.
pub trait FrameSource {
    /// Prepares the source to produce frames of `geometry`.
    fn open(&mut self, geometry: FrameGeometry) -> Result<(), SourceError>;

    /// Returns the next frame, or `None` at the end of the stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}
