//! Blanking of static chunks.

use crate::frame::{FrameLayout, FrameMut};

use super::ChunkRect;

/// Limited-range black luma.
pub const NEUTRAL_LUMA: u8 = 16;
/// Neutral (zero color difference) chroma.
pub const NEUTRAL_CHROMA: u8 = 128;
/// Limited-range black for each RGB component.
pub const NEUTRAL_RGB: u8 = 16;

/// Overwrites `rect` and its co-located chroma with the neutral color.
///
/// Only samples inside the frame are touched. Alpha planes and the
/// alpha/padding byte of packed pixels are left alone.
pub fn mask_chunk(frame: &mut FrameMut<'_>, rect: &ChunkRect) {
    let layout = frame.layout();
    let planes = frame.planes_mut();
    match layout {
        FrameLayout::Planar { chroma, .. } => {
            let luma = &mut planes[0];
            for y in rect.y..rect.y_end() {
                luma.row_mut(y)[rect.x..rect.x_end()].fill(NEUTRAL_LUMA);
            }

            let cx = chroma.chroma_x(rect.x)..=chroma.chroma_x(rect.x_end() - 1);
            let cy = chroma.chroma_y(rect.y)..=chroma.chroma_y(rect.y_end() - 1);
            for plane in &mut planes[1..3] {
                for y in cy.clone() {
                    plane.row_mut(y)[cx.clone()].fill(NEUTRAL_CHROMA);
                }
            }
        }
        FrameLayout::Packed {
            bytes_per_pixel,
            rgb_offsets,
        } => {
            let plane = &mut planes[0];
            for y in rect.y..rect.y_end() {
                let row =
                    &mut plane.row_mut(y)[rect.x * bytes_per_pixel..rect.x_end() * bytes_per_pixel];
                for pixel in row.chunks_exact_mut(bytes_per_pixel) {
                    for &offset in &rgb_offsets {
                        pixel[offset] = NEUTRAL_RGB;
                    }
                }
            }
        }
    }
}
