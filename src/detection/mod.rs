//! Temporal chunk-difference detection.
//!
//! A frame is cut into a grid of square chunks. Each chunk is reduced to a
//! single sum of its samples, compared against the sum recorded for the
//! same chunk `frame_back` frames earlier, and blanked when the change is
//! below the threshold.
//!
//! ```text
//! grid → signature ─┬→ classify against history → mask
//!                   └→ record into history
//! ```

mod grid;
mod history;
mod mask;
mod signature;

pub use grid::{ChunkGrid, ChunkRect, Chunks};
pub use history::{HistoryBuffer, HistoryError};
pub use mask::{mask_chunk, NEUTRAL_CHROMA, NEUTRAL_LUMA, NEUTRAL_RGB};
pub use signature::{chunk_sum, ChunkClassifier};
