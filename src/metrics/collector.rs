//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

use crate::filter::StaticMask;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of filter state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames processed since configuration.
    pub frames: u64,
    /// Chunks visited since configuration.
    pub chunks: u64,
    /// Chunks masked since configuration.
    pub masked: u64,
    /// Masked ratio of the latest frame.
    pub last_masked_ratio: f64,
    /// Configured history depth (0 when unconfigured).
    pub history_depth: usize,
}

impl MetricsSnapshot {
    /// Captures the current state of a filter.
    pub fn from_filter(filter: &StaticMask) -> Self {
        let stats = filter.stats();
        Self {
            frames: stats.frames,
            chunks: stats.chunks,
            masked: stats.masked,
            last_masked_ratio: stats.last_masked_ratio,
            history_depth: filter.history().map_or(0, |h| h.depth()),
        }
    }
}

/// Prometheus metrics registry for the filter.
pub struct MetricsRegistry {
    registry: Registry,
    frames_total: IntCounter,
    chunks_total: IntCounter,
    chunks_masked_total: IntCounter,
    masked_ratio: Gauge,
    history_depth: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with every filter metric registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_total = IntCounter::new(
            "static_mask_frames_total",
            "Total number of frames processed",
        )?;
        let chunks_total = IntCounter::new(
            "static_mask_chunks_total",
            "Total number of chunks classified",
        )?;
        let chunks_masked_total = IntCounter::new(
            "static_mask_chunks_masked_total",
            "Total number of chunks classified static and masked",
        )?;
        let masked_ratio = Gauge::new(
            "static_mask_masked_ratio",
            "Fraction of chunks masked in the latest frame",
        )?;
        let history_depth = IntGauge::new(
            "static_mask_history_depth",
            "Configured history depth in frames",
        )?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(chunks_total.clone()))?;
        registry.register(Box::new(chunks_masked_total.clone()))?;
        registry.register(Box::new(masked_ratio.clone()))?;
        registry.register(Box::new(history_depth.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            chunks_total,
            chunks_masked_total,
            masked_ratio,
            history_depth,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward; add the difference.
        advance(&self.frames_total, snapshot.frames);
        advance(&self.chunks_total, snapshot.chunks);
        advance(&self.chunks_masked_total, snapshot.masked);

        self.masked_ratio.set(snapshot.last_masked_ratio);
        self.history_depth.set(snapshot.history_depth as i64);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaskConfig;
    use crate::frame::{Frame, FrameGeometry, PixelFormat};

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        registry.update(&MetricsSnapshot {
            frames: 10,
            chunks: 40,
            masked: 25,
            last_masked_ratio: 0.5,
            history_depth: 2,
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("static_mask_frames_total 10"));
        assert!(output.contains("static_mask_chunks_masked_total 25"));
        assert!(output.contains("static_mask_masked_ratio 0.5"));
        assert!(output.contains("static_mask_history_depth 2"));
    }

    #[test]
    fn test_counters_never_decrease() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            frames: 5,
            ..Default::default()
        });
        registry.update(&MetricsSnapshot {
            frames: 3,
            ..Default::default()
        });

        assert!(registry.encode().unwrap().contains("static_mask_frames_total 5"));
    }

    #[test]
    fn test_snapshot_from_filter() {
        let geometry = FrameGeometry::new(64, 64, PixelFormat::Yuv420p);
        let config = MaskConfig::default().with_size(32).with_threshold(5.0);
        let mut filter = StaticMask::new(config).unwrap();
        filter.configure(geometry).unwrap();

        let mut frame = Frame::filled(geometry, 0, 0).unwrap();
        filter.process_frame(&mut frame).unwrap();

        let snapshot = MetricsSnapshot::from_filter(&filter);
        assert_eq!(snapshot.frames, 1);
        assert_eq!(snapshot.chunks, 4);
        assert_eq!(snapshot.masked, 4);
        assert_eq!(snapshot.last_masked_ratio, 1.0);
        assert_eq!(snapshot.history_depth, 1);
    }
}
