//! Per-frame and cumulative filter results.

use serde::{Deserialize, Serialize};

/// Outcome of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Zero-based index of the frame since configuration.
    pub frame_index: u64,
    /// History slot compared against and overwritten.
    pub slot: usize,
    /// Chunks visited.
    pub chunks: usize,
    /// Chunks classified static and blanked.
    pub masked: usize,
}

impl FrameReport {
    /// Fraction of chunks masked, in `[0, 1]`.
    pub fn masked_ratio(&self) -> f64 {
        if self.chunks == 0 {
            return 0.0;
        }
        self.masked as f64 / self.chunks as f64
    }

    /// Returns true when every chunk was masked.
    pub fn fully_masked(&self) -> bool {
        self.masked == self.chunks
    }
}

/// Totals across every processed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Frames processed.
    pub frames: u64,
    /// Chunks visited.
    pub chunks: u64,
    /// Chunks masked.
    pub masked: u64,
    /// Masked ratio of the most recent frame.
    pub last_masked_ratio: f64,
}

impl FilterStats {
    pub(crate) fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        self.chunks += report.chunks as u64;
        self.masked += report.masked as u64;
        self.last_masked_ratio = report.masked_ratio();
    }

    /// Fraction of all visited chunks that were masked.
    pub fn masked_ratio(&self) -> f64 {
        if self.chunks == 0 {
            return 0.0;
        }
        self.masked as f64 / self.chunks as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_of_empty_report() {
        let report = FrameReport {
            frame_index: 0,
            slot: 0,
            chunks: 0,
            masked: 0,
        };
        assert_eq!(report.masked_ratio(), 0.0);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut stats = FilterStats::default();
        stats.record(&FrameReport {
            frame_index: 0,
            slot: 0,
            chunks: 4,
            masked: 4,
        });
        stats.record(&FrameReport {
            frame_index: 1,
            slot: 0,
            chunks: 4,
            masked: 0,
        });

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.masked, 4);
        assert_eq!(stats.masked_ratio(), 0.5);
        assert_eq!(stats.last_masked_ratio, 0.0);
    }
}
