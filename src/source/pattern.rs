//! Synthetic frame source.

use super::{FrameSource, SourceError};
use crate::frame::{Frame, FrameGeometry, FrameLayout, Plane};

/// Generates a static gradient with a bright block sliding across it.
///
/// Everything outside the block's path is identical from frame to frame,
/// which makes the output easy to reason about: once the history fills,
/// only chunks the block touched recently survive masking.
#[derive(Debug)]
pub struct PatternSource {
    geometry: Option<FrameGeometry>,
    block: usize,
    step: usize,
    limit: Option<u64>,
    sequence: u64,
}

impl PatternSource {
    /// A `block × block` square moving `step` pixels right per frame.
    pub fn new(block: usize, step: usize) -> Self {
        Self {
            geometry: None,
            block: block.max(1),
            step,
            limit: None,
            sequence: 0,
        }
    }

    /// Ends the stream after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Top-left corner of the block in frame `sequence`.
    pub fn block_origin(&self, geometry: &FrameGeometry, sequence: u64) -> (usize, usize) {
        let travel = (sequence as usize).wrapping_mul(self.step);
        let x = travel % geometry.width;
        let y = geometry.height.saturating_sub(self.block) / 2;
        (x, y)
    }

    fn render(&self, geometry: FrameGeometry) -> Result<Frame, SourceError> {
        let (bx, by) = self.block_origin(&geometry, self.sequence);
        let in_block = |x: usize, y: usize| {
            (bx..bx + self.block).contains(&x) && (by..by + self.block).contains(&y)
        };
        let background = |x: usize, y: usize| ((x + y) % 200 + 16) as u8;

        let layout = geometry.format.layout();
        let planes = (0..layout.plane_count())
            .map(|index| {
                let (row_bytes, rows) = layout.plane_extent(index, geometry.width, geometry.height);
                let mut data = Vec::with_capacity(row_bytes * rows);
                for py in 0..rows {
                    for px in 0..row_bytes {
                        let value = match (layout, index) {
                            (FrameLayout::Planar { .. }, 0) if in_block(px, py) => 235,
                            (FrameLayout::Planar { .. }, 0) => background(px, py),
                            (FrameLayout::Planar { chroma, .. }, 1 | 2) => {
                                let (x, y) = (px << chroma.x_shift, py << chroma.y_shift);
                                if in_block(x, y) {
                                    90
                                } else {
                                    128
                                }
                            }
                            (FrameLayout::Planar { .. }, _) => 255,
                            (FrameLayout::Packed { bytes_per_pixel, .. }, _) => {
                                let x = px / bytes_per_pixel;
                                if in_block(x, py) {
                                    235
                                } else {
                                    background(x, py)
                                }
                            }
                        };
                        data.push(value);
                    }
                }
                Plane::new(data, row_bytes)
            })
            .collect();

        Ok(Frame::new(geometry, planes, self.sequence)?)
    }
}

impl Default for PatternSource {
    fn default() -> Self {
        Self::new(32, 8)
    }
}

impl FrameSource for PatternSource {
    fn open(&mut self, geometry: FrameGeometry) -> Result<(), SourceError> {
        geometry.validate()?;
        self.geometry = Some(geometry);
        self.sequence = 0;
        tracing::info!(geometry = %geometry, block = self.block, step = self.step, "Pattern source opened");
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let geometry = self.geometry.ok_or(SourceError::NotOpen)?;
        if self.limit.is_some_and(|limit| self.sequence >= limit) {
            return Ok(None);
        }

        let frame = self.render(geometry)?;
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn is_open(&self) -> bool {
        self.geometry.is_some()
    }

    fn close(&mut self) {
        self.geometry = None;
        tracing::info!("Pattern source closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;

    #[test]
    fn test_pattern_source_lifecycle() {
        let mut source = PatternSource::new(8, 4).with_limit(2);
        assert!(!source.is_open());

        source
            .open(FrameGeometry::new(32, 16, PixelFormat::Yuv420p))
            .unwrap();
        assert!(source.is_open());

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.sequence(), 0);
        assert_eq!(frame.sample(0, 0, 4), Some(235));
        assert_eq!(frame.sample(1, 0, 2), Some(90));

        let frame2 = source.next_frame().unwrap().unwrap();
        assert_eq!(frame2.sample(0, 0, 4), Some(background_at(0, 4)));
        assert_eq!(frame2.sample(0, 4, 4), Some(235));

        assert!(source.next_frame().unwrap().is_none());

        source.close();
        assert!(!source.is_open());
    }

    fn background_at(x: usize, y: usize) -> u8 {
        ((x + y) % 200 + 16) as u8
    }

    #[test]
    fn test_next_frame_without_open() {
        let mut source = PatternSource::default();
        assert!(matches!(source.next_frame(), Err(SourceError::NotOpen)));
    }

    #[test]
    fn test_every_format_renders() {
        for format in PixelFormat::ALL {
            let mut source = PatternSource::new(4, 2).with_limit(1);
            source.open(FrameGeometry::new(9, 7, format)).unwrap();
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.format(), format);
        }
    }
}
