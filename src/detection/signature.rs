//! Chunk signatures and the static/changed test.

use crate::frame::{FrameLayout, FrameMut};

use super::ChunkRect;

/// Sum of every sample co-located with the luma samples of `rect`.
///
/// For planar formats each luma sample contributes itself plus the two
/// chroma samples at its decimated coordinates, so chroma is weighted by
/// the number of luma samples sharing it. Packed RGB contributes the three
/// color components of each pixel. Alpha never contributes.
pub fn chunk_sum(frame: &FrameMut<'_>, rect: &ChunkRect) -> u64 {
    let planes = frame.planes();
    match frame.layout() {
        FrameLayout::Planar { chroma, .. } => {
            let (luma, cb, cr) = (&planes[0], &planes[1], &planes[2]);
            let mut sum = 0u64;
            for y in rect.y..rect.y_end() {
                let luma_row = &luma.row(y)[rect.x..rect.x_end()];
                let cy = chroma.chroma_y(y);
                let (cb_row, cr_row) = (cb.row(cy), cr.row(cy));

                sum += luma_row.iter().map(|&v| u64::from(v)).sum::<u64>();
                for x in rect.x..rect.x_end() {
                    let cx = chroma.chroma_x(x);
                    sum += u64::from(cb_row[cx]) + u64::from(cr_row[cx]);
                }
            }
            sum
        }
        FrameLayout::Packed {
            bytes_per_pixel,
            rgb_offsets,
        } => {
            let plane = &planes[0];
            let mut sum = 0u64;
            for y in rect.y..rect.y_end() {
                let row = &plane.row(y)[rect.x * bytes_per_pixel..rect.x_end() * bytes_per_pixel];
                for pixel in row.chunks_exact(bytes_per_pixel) {
                    sum += rgb_offsets
                        .iter()
                        .map(|&offset| u64::from(pixel[offset]))
                        .sum::<u64>();
                }
            }
            sum
        }
    }
}

/// Decides whether a chunk changed enough since its recorded sum.
///
/// The absolute sum difference is divided by `size² / 10`, where the
/// denominator itself uses integer division, and compared against the
/// threshold. A chunk whose normalized delta is strictly below the
/// threshold is static.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkClassifier {
    threshold: f64,
    denominator: u64,
}

impl ChunkClassifier {
    /// Builds a classifier for `size × size` chunks.
    ///
    /// The denominator is clamped to 1 so chunk sizes below 4 never divide
    /// by zero; configuration rejects such sizes before they get here.
    pub fn new(size: usize, threshold: f64) -> Self {
        let area = (size as u64).saturating_mul(size as u64);
        Self {
            threshold,
            denominator: (area / 10).max(1),
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `|current - previous| / denominator`.
    #[inline]
    pub fn normalized_delta(&self, current: u64, previous: u64) -> f64 {
        current.abs_diff(previous) as f64 / self.denominator as f64
    }

    /// Returns true when the chunk is static.
    #[inline]
    pub fn is_static(&self, current: u64, previous: u64) -> bool {
        self.normalized_delta(current, previous) < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ChunkGrid;
    use crate::frame::{Frame, FrameGeometry, PixelFormat};

    #[test]
    fn test_uniform_yuv420_sum() {
        let geometry = FrameGeometry::new(64, 64, PixelFormat::Yuv420p);
        let mut frame = Frame::filled(geometry, 50, 0).unwrap();
        let view = frame.as_frame_mut();
        let grid = ChunkGrid::new(64, 64, 32);

        for rect in grid.chunks() {
            assert_eq!(chunk_sum(&view, &rect), 32 * 32 * 50 * 3);
        }
    }

    #[test]
    fn test_chroma_weighted_per_luma_sample() {
        let geometry = FrameGeometry::new(4, 4, PixelFormat::Yuv420p);
        let mut frame = Frame::with_plane_values(geometry, [0, 0, 0, 0], 0).unwrap();
        // One chroma sample shared by the top-left 2x2 luma block.
        frame.plane_mut(1).unwrap().data_mut()[0] = 10;
        let view = frame.as_frame_mut();

        let grid = ChunkGrid::new(4, 4, 4);
        let rect = grid.chunk(0).unwrap();
        assert_eq!(chunk_sum(&view, &rect), 40);
    }

    #[test]
    fn test_yuv444_addresses_chroma_without_halving() {
        let geometry = FrameGeometry::new(4, 4, PixelFormat::Yuv444p);
        let mut frame = Frame::with_plane_values(geometry, [0, 0, 0, 0], 0).unwrap();
        // Chroma at (3, 3) belongs to the bottom-right 2x2 chunk only.
        frame.plane_mut(2).unwrap().data_mut()[3 * 4 + 3] = 7;
        let view = frame.as_frame_mut();

        let grid = ChunkGrid::new(4, 4, 2);
        let sums: Vec<u64> = grid.chunks().map(|r| chunk_sum(&view, &r)).collect();
        assert_eq!(sums, vec![0, 0, 0, 7]);
    }

    #[test]
    fn test_packed_rgb_skips_alpha() {
        let geometry = FrameGeometry::new(2, 2, PixelFormat::Argb);
        let mut frame = Frame::filled(geometry, 0, 0).unwrap();
        for pixel in frame.plane_mut(0).unwrap().data_mut().chunks_exact_mut(4) {
            pixel.copy_from_slice(&[255, 1, 2, 3]);
        }
        let view = frame.as_frame_mut();

        let rect = ChunkGrid::new(2, 2, 2).chunk(0).unwrap();
        assert_eq!(chunk_sum(&view, &rect), 4 * 6);
    }

    #[test]
    fn test_alpha_plane_ignored() {
        let geometry = FrameGeometry::new(4, 4, PixelFormat::Yuva420p);
        let mut a = Frame::with_plane_values(geometry, [1, 2, 3, 0], 0).unwrap();
        let mut b = Frame::with_plane_values(geometry, [1, 2, 3, 255], 0).unwrap();
        let rect = ChunkGrid::new(4, 4, 4).chunk(0).unwrap();

        assert_eq!(
            chunk_sum(&a.as_frame_mut(), &rect),
            chunk_sum(&b.as_frame_mut(), &rect)
        );
    }

    #[test]
    fn test_classifier_denominator() {
        assert_eq!(ChunkClassifier::new(20, 20.0).denominator(), 40);
        assert_eq!(ChunkClassifier::new(32, 5.0).denominator(), 102);
        assert_eq!(ChunkClassifier::new(3, 5.0).denominator(), 1);
        assert_eq!(ChunkClassifier::new(1, 5.0).denominator(), 1);
    }

    #[test]
    fn test_classifier_threshold_is_strict() {
        let classifier = ChunkClassifier::new(20, 2.0);

        // 79 / 40 = 1.975 < 2
        assert!(classifier.is_static(1000, 1079));
        // 80 / 40 = 2, not < 2
        assert!(!classifier.is_static(1000, 1080));
        assert!(!classifier.is_static(1080, 1000));
    }

    #[test]
    fn test_zero_threshold_never_static() {
        let classifier = ChunkClassifier::new(20, 0.0);
        assert!(!classifier.is_static(5, 5));
    }
}
