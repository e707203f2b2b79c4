//! Static Mask Library
//!
//! Detects spatially static regions across a sliding window of video
//! frames and overwrites them with a neutral color. The result is a
//! "motion mask": only regions that changed over the last `frame_back`
//! frames keep their content, which makes the output a useful pre-filter
//! for encoders and other motion-sensitive stages.
//!
//! # Architecture
//!
//! ```text
//! source → StaticMask::process → sink
//!              │
//!              ├─ grid       (chunk partition)
//!              ├─ signature  (per-chunk sums, static test)
//!              ├─ history    (frame_back slots of sums)
//!              └─ mask       (neutral fill)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use static_mask::{
//!     config::MaskConfig,
//!     filter::StaticMask,
//!     frame::{FrameGeometry, PixelFormat},
//!     source::{FrameSource, PatternSource},
//! };
//!
//! let geometry = FrameGeometry::new(320, 240, PixelFormat::Yuv420p);
//! let config = MaskConfig::default().with_size(16).with_threshold(5.0);
//!
//! let mut source = PatternSource::default().with_limit(30);
//! source.open(geometry).unwrap();
//!
//! let mut filter = StaticMask::new(config).unwrap();
//! filter.configure(geometry).unwrap();
//!
//! while let Some(mut frame) = source.next_frame().unwrap() {
//!     let report = filter.process_frame(&mut frame).unwrap();
//!     println!("frame {}: {} of {} chunks masked", report.frame_index, report.masked, report.chunks);
//! }
//!
//! filter.release();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod detection;
pub mod filter;
pub mod frame;
pub mod metrics;
pub mod source;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig, MaskConfig};
pub use detection::{ChunkGrid, ChunkRect, HistoryBuffer};
pub use filter::{FilterError, FilterStats, FrameReport, StaticMask};
pub use frame::{Frame, FrameGeometry, FrameMut, PixelFormat, PlaneMut};
pub use source::{FrameSource, PatternSource, RawVideoSink, RawVideoSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
