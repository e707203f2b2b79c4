//! Prometheus metrics for the masking filter.
//!
//! # Metrics Exposed
//!
//! - `static_mask_frames_total` - Frames processed
//! - `static_mask_chunks_total` - Chunks classified
//! - `static_mask_chunks_masked_total` - Chunks classified static and blanked
//! - `static_mask_masked_ratio` - Fraction of chunks masked in the latest frame
//! - `static_mask_history_depth` - Configured comparison lag in frames
//!
//! # Example
//!
//! ```no_run
//! use static_mask::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames: 120,
//!     chunks: 120 * 48,
//!     masked: 4000,
//!     last_masked_ratio: 0.75,
//!     history_depth: 2,
//! };
//!
//! registry.update(&snapshot);
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
