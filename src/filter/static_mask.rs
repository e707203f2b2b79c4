//! The static-region masking filter.

use tracing::{debug, info, trace, warn};

use super::{FilterError, FilterStats, FrameReport};
use crate::config::MaskConfig;
use crate::detection::{
    chunk_sum, mask_chunk, ChunkClassifier, ChunkGrid, HistoryBuffer, HistoryError,
};
use crate::frame::{Frame, FrameGeometry, FrameMut};

/// State that exists only between `configure` and `release`.
#[derive(Debug)]
struct Configured {
    geometry: FrameGeometry,
    grid: ChunkGrid,
    history: HistoryBuffer,
    /// Classification of the most recent frame, one flag per chunk.
    static_chunks: Vec<bool>,
}

/// Masks chunks that have not changed over the last `frame_back` frames.
///
/// Lifecycle: [`configure`](Self::configure) once the stream geometry is
/// known, [`process`](Self::process) for every frame, then
/// [`release`](Self::release). Each instance owns its history; separate
/// streams need separate instances.
#[derive(Debug)]
pub struct StaticMask {
    config: MaskConfig,
    classifier: ChunkClassifier,
    state: Option<Configured>,
    stats: FilterStats,
}

impl StaticMask {
    /// Creates an unconfigured filter.
    pub fn new(config: MaskConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: ChunkClassifier::new(config.size as usize, config.threshold),
            state: None,
            stats: FilterStats::default(),
        })
    }

    /// Sizes the grid for `geometry` and allocates zeroed history.
    ///
    /// On failure the filter stays unconfigured and nothing stays allocated.
    /// Configuring again discards the previous history.
    pub fn configure(&mut self, geometry: FrameGeometry) -> Result<(), FilterError> {
        geometry.validate()?;
        self.release();

        let grid = ChunkGrid::new(geometry.width, geometry.height, self.config.size as usize);
        let history = HistoryBuffer::allocate(self.config.frame_back as usize, grid.len())?;

        let mut static_chunks = Vec::new();
        static_chunks
            .try_reserve_exact(grid.len())
            .map_err(|_| HistoryError::OutOfMemory {
                slots: 1,
                chunks: grid.len(),
            })?;
        static_chunks.resize(grid.len(), false);

        info!(
            geometry = %geometry,
            cols = grid.cols(),
            rows = grid.rows(),
            size = grid.size(),
            frame_back = history.depth(),
            threshold = self.config.threshold,
            "Static mask configured"
        );

        self.state = Some(Configured {
            geometry,
            grid,
            history,
            static_chunks,
        });
        self.stats = FilterStats::default();
        Ok(())
    }

    /// Classifies every chunk of `frame`, blanks the static ones in place
    /// and records this frame's sums.
    ///
    /// All sums are taken from the frame as received; blanking happens
    /// only after the whole grid has been classified.
    pub fn process(&mut self, frame: &mut FrameMut<'_>) -> Result<FrameReport, FilterError> {
        let state = self.state.as_mut().ok_or(FilterError::NotConfigured)?;

        let geometry = frame.geometry();
        if geometry != state.geometry {
            warn!(expected = %state.geometry, got = %geometry, "Rejecting frame");
            return Err(FilterError::GeometryMismatch {
                expected: state.geometry,
                got: geometry,
            });
        }

        let frame_index = state.history.frame_count();
        let slot_index = state.history.active_index();
        let slot = state.history.active_slot_mut();
        for rect in state.grid.chunks() {
            let sum = chunk_sum(frame, &rect);
            state.static_chunks[rect.index] = self.classifier.is_static(sum, slot[rect.index]);
            slot[rect.index] = sum;
        }

        let mut masked = 0;
        for rect in state.grid.chunks() {
            if state.static_chunks[rect.index] {
                trace!(chunk = rect.index, x = rect.x, y = rect.y, "Masking static chunk");
                mask_chunk(frame, &rect);
                masked += 1;
            }
        }
        state.history.advance();

        let report = FrameReport {
            frame_index,
            slot: slot_index,
            chunks: state.grid.len(),
            masked,
        };
        self.stats.record(&report);

        debug!(
            frame = report.frame_index,
            slot = report.slot,
            masked = report.masked,
            chunks = report.chunks,
            "Frame processed"
        );
        Ok(report)
    }

    /// Processes an owned frame.
    pub fn process_frame(&mut self, frame: &mut Frame) -> Result<FrameReport, FilterError> {
        self.process(&mut frame.as_frame_mut())
    }

    /// Frees the history. Harmless when never configured or already released.
    pub fn release(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.history.release();
            info!(
                frames = self.stats.frames,
                masked = self.stats.masked,
                "Static mask released"
            );
        }
    }

    /// Returns true between a successful `configure` and `release`.
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ChunkClassifier {
        &self.classifier
    }

    /// Geometry the filter was configured for.
    pub fn geometry(&self) -> Option<FrameGeometry> {
        self.state.as_ref().map(|s| s.geometry)
    }

    pub fn grid(&self) -> Option<&ChunkGrid> {
        self.state.as_ref().map(|s| &s.grid)
    }

    pub fn history(&self) -> Option<&HistoryBuffer> {
        self.state.as_ref().map(|s| &s.history)
    }

    /// Per-chunk classification of the most recent frame.
    pub fn static_chunks(&self) -> Option<&[bool]> {
        self.state.as_ref().map(|s| &s.static_chunks[..])
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }
}

impl Drop for StaticMask {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{NEUTRAL_CHROMA, NEUTRAL_LUMA};
    use crate::frame::PixelFormat;

    fn geometry(width: usize, height: usize) -> FrameGeometry {
        FrameGeometry::new(width, height, PixelFormat::Yuv420p)
    }

    fn filter(size: u32, threshold: f64, frame_back: u32) -> StaticMask {
        let config = MaskConfig::default()
            .with_size(size)
            .with_threshold(threshold)
            .with_frame_back(frame_back);
        StaticMask::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MaskConfig::default().with_size(3);
        assert!(matches!(
            StaticMask::new(config),
            Err(FilterError::Config(_))
        ));
    }

    #[test]
    fn test_process_before_configure() {
        let mut mask = filter(32, 5.0, 1);
        let mut frame = Frame::filled(geometry(64, 64), 0, 0).unwrap();
        assert!(matches!(
            mask.process_frame(&mut frame),
            Err(FilterError::NotConfigured)
        ));
    }

    #[test]
    fn test_configure_sizes_grid_and_history() {
        let mut mask = filter(32, 5.0, 3);
        mask.configure(geometry(70, 70)).unwrap();

        let grid = mask.grid().unwrap();
        assert_eq!((grid.cols(), grid.rows()), (3, 3));
        let history = mask.history().unwrap();
        assert_eq!(history.depth(), 3);
        assert_eq!(history.chunks(), 9);
        assert_eq!(history.frame_count(), 0);
    }

    #[test]
    fn test_geometry_mismatch_rejected() {
        let mut mask = filter(32, 5.0, 1);
        mask.configure(geometry(64, 64)).unwrap();

        let mut frame = Frame::filled(geometry(64, 32), 0, 0).unwrap();
        assert!(matches!(
            mask.process_frame(&mut frame),
            Err(FilterError::GeometryMismatch { .. })
        ));
        assert_eq!(mask.history().unwrap().frame_count(), 0);
    }

    #[test]
    fn test_zero_frame_masked_against_zero_history() {
        let mut mask = filter(32, 5.0, 1);
        mask.configure(geometry(64, 64)).unwrap();

        let mut frame = Frame::filled(geometry(64, 64), 0, 0).unwrap();
        let report = mask.process_frame(&mut frame).unwrap();

        assert_eq!(report.masked, 4);
        assert!(report.fully_masked());
        assert_eq!(frame.sample(0, 63, 63), Some(NEUTRAL_LUMA));
        assert_eq!(frame.sample(1, 0, 0), Some(NEUTRAL_CHROMA));
        // Sums recorded before masking.
        assert_eq!(mask.history().unwrap().slot(0).unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut mask = filter(32, 5.0, 1);
        mask.release();
        mask.configure(geometry(64, 64)).unwrap();
        mask.release();
        mask.release();

        assert!(!mask.is_configured());
        let mut frame = Frame::filled(geometry(64, 64), 0, 0).unwrap();
        assert!(matches!(
            mask.process_frame(&mut frame),
            Err(FilterError::NotConfigured)
        ));
    }

    #[test]
    fn test_reconfigure_resets_history() {
        let mut mask = filter(16, 5.0, 2);
        mask.configure(geometry(32, 32)).unwrap();
        let mut frame = Frame::filled(geometry(32, 32), 90, 0).unwrap();
        mask.process_frame(&mut frame).unwrap();

        mask.configure(geometry(32, 32)).unwrap();
        assert_eq!(mask.history().unwrap().frame_count(), 0);
        assert_eq!(mask.stats().frames, 0);
        assert!(mask
            .history()
            .unwrap()
            .slot(0)
            .unwrap()
            .iter()
            .all(|&sum| sum == 0));
    }

    #[test]
    fn test_odd_chunks_sum_unmasked_chroma() {
        // Chunks of 5 share chroma column 2 with yuv420p.
        let mut mask = filter(5, 1.0, 1);
        mask.configure(geometry(10, 10)).unwrap();

        let mut first = Frame::filled(geometry(10, 10), 100, 0).unwrap();
        mask.process_frame(&mut first).unwrap();

        let mut second = Frame::filled(geometry(10, 10), 100, 1).unwrap();
        let report = mask.process_frame(&mut second).unwrap();
        assert_eq!(report.masked, 4);

        let expected = 5 * 5 * 100 * 3;
        assert!(mask
            .history()
            .unwrap()
            .slot(0)
            .unwrap()
            .iter()
            .all(|&sum| sum == expected));
    }
}
