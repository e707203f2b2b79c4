//! Pixel formats accepted by the filter and their memory layouts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::FrameError;

/// Chroma decimation of a planar format, as log2 factors relative to luma.
///
/// The chroma sample co-located with luma `(x, y)` lives at
/// `(x >> x_shift, y >> y_shift)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromaSampling {
    /// Horizontal decimation (log2).
    pub x_shift: u8,
    /// Vertical decimation (log2).
    pub y_shift: u8,
}

impl ChromaSampling {
    /// 4:4:4, no decimation.
    pub const YUV444: Self = Self::new(0, 0);
    /// 4:2:2, half horizontal resolution.
    pub const YUV422: Self = Self::new(1, 0);
    /// 4:2:0, half resolution in both axes.
    pub const YUV420: Self = Self::new(1, 1);
    /// 4:1:1, quarter horizontal resolution.
    pub const YUV411: Self = Self::new(2, 0);
    /// 4:1:0, quarter resolution in both axes.
    pub const YUV410: Self = Self::new(2, 2);
    /// 4:4:0, half vertical resolution.
    pub const YUV440: Self = Self::new(0, 1);

    pub const fn new(x_shift: u8, y_shift: u8) -> Self {
        Self { x_shift, y_shift }
    }

    /// Chroma plane dimensions for a luma plane of `width × height`.
    #[inline]
    pub fn plane_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (
            shift_ceil(width, self.x_shift),
            shift_ceil(height, self.y_shift),
        )
    }

    /// Maps a luma column to its chroma column.
    #[inline]
    pub fn chroma_x(&self, x: usize) -> usize {
        x >> self.x_shift
    }

    /// Maps a luma row to its chroma row.
    #[inline]
    pub fn chroma_y(&self, y: usize) -> usize {
        y >> self.y_shift
    }
}

fn shift_ceil(value: usize, shift: u8) -> usize {
    let step = 1usize << shift;
    value.div_ceil(step)
}

/// How samples of a format are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// Luma plane, two chroma planes, optional alpha plane.
    Planar {
        chroma: ChromaSampling,
        alpha: bool,
    },
    /// A single interleaved plane.
    Packed {
        bytes_per_pixel: usize,
        /// Byte offsets of the red, green and blue components within a pixel.
        rgb_offsets: [usize; 3],
    },
}

impl FrameLayout {
    /// Number of planes a frame of this layout carries.
    pub fn plane_count(&self) -> usize {
        match self {
            FrameLayout::Planar { alpha: true, .. } => 4,
            FrameLayout::Planar { alpha: false, .. } => 3,
            FrameLayout::Packed { .. } => 1,
        }
    }

    /// `(row_bytes, rows)` of plane `index` for a `width × height` frame.
    pub fn plane_extent(&self, index: usize, width: usize, height: usize) -> (usize, usize) {
        match self {
            FrameLayout::Planar { chroma, .. } if index == 1 || index == 2 => {
                chroma.plane_dimensions(width, height)
            }
            FrameLayout::Planar { .. } => (width, height),
            FrameLayout::Packed {
                bytes_per_pixel, ..
            } => (width * bytes_per_pixel, height),
        }
    }
}

/// Pixel formats the filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Yuv444p,
    Yuv422p,
    Yuv420p,
    Yuv411p,
    Yuv410p,
    Yuvj444p,
    Yuvj422p,
    Yuvj420p,
    Yuv440p,
    Yuvj440p,
    Yuva420p,
    Yuva422p,
    Yuva444p,
    Rgb24,
    Bgr24,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    #[serde(rename = "0rgb")]
    Xrgb,
    #[serde(rename = "0bgr")]
    Xbgr,
    #[serde(rename = "rgb0")]
    Rgbx,
    #[serde(rename = "bgr0")]
    Bgrx,
}

impl PixelFormat {
    /// Every supported format.
    pub const ALL: [PixelFormat; 23] = [
        PixelFormat::Yuv444p,
        PixelFormat::Yuv422p,
        PixelFormat::Yuv420p,
        PixelFormat::Yuv411p,
        PixelFormat::Yuv410p,
        PixelFormat::Yuvj444p,
        PixelFormat::Yuvj422p,
        PixelFormat::Yuvj420p,
        PixelFormat::Yuv440p,
        PixelFormat::Yuvj440p,
        PixelFormat::Yuva420p,
        PixelFormat::Yuva422p,
        PixelFormat::Yuva444p,
        PixelFormat::Rgb24,
        PixelFormat::Bgr24,
        PixelFormat::Rgba,
        PixelFormat::Bgra,
        PixelFormat::Argb,
        PixelFormat::Abgr,
        PixelFormat::Xrgb,
        PixelFormat::Xbgr,
        PixelFormat::Rgbx,
        PixelFormat::Bgrx,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Yuv444p => "yuv444p",
            PixelFormat::Yuv422p => "yuv422p",
            PixelFormat::Yuv420p => "yuv420p",
            PixelFormat::Yuv411p => "yuv411p",
            PixelFormat::Yuv410p => "yuv410p",
            PixelFormat::Yuvj444p => "yuvj444p",
            PixelFormat::Yuvj422p => "yuvj422p",
            PixelFormat::Yuvj420p => "yuvj420p",
            PixelFormat::Yuv440p => "yuv440p",
            PixelFormat::Yuvj440p => "yuvj440p",
            PixelFormat::Yuva420p => "yuva420p",
            PixelFormat::Yuva422p => "yuva422p",
            PixelFormat::Yuva444p => "yuva444p",
            PixelFormat::Rgb24 => "rgb24",
            PixelFormat::Bgr24 => "bgr24",
            PixelFormat::Rgba => "rgba",
            PixelFormat::Bgra => "bgra",
            PixelFormat::Argb => "argb",
            PixelFormat::Abgr => "abgr",
            PixelFormat::Xrgb => "0rgb",
            PixelFormat::Xbgr => "0bgr",
            PixelFormat::Rgbx => "rgb0",
            PixelFormat::Bgrx => "bgr0",
        }
    }

    /// Memory layout of this format.
    pub fn layout(&self) -> FrameLayout {
        use PixelFormat::*;

        let planar = |chroma, alpha| FrameLayout::Planar { chroma, alpha };
        let packed = |bytes_per_pixel, rgb_offsets| FrameLayout::Packed {
            bytes_per_pixel,
            rgb_offsets,
        };

        match self {
            Yuv444p | Yuvj444p => planar(ChromaSampling::YUV444, false),
            Yuv422p | Yuvj422p => planar(ChromaSampling::YUV422, false),
            Yuv420p | Yuvj420p => planar(ChromaSampling::YUV420, false),
            Yuv411p => planar(ChromaSampling::YUV411, false),
            Yuv410p => planar(ChromaSampling::YUV410, false),
            Yuv440p | Yuvj440p => planar(ChromaSampling::YUV440, false),
            Yuva420p => planar(ChromaSampling::YUV420, true),
            Yuva422p => planar(ChromaSampling::YUV422, true),
            Yuva444p => planar(ChromaSampling::YUV444, true),
            Rgb24 => packed(3, [0, 1, 2]),
            Bgr24 => packed(3, [2, 1, 0]),
            Rgba | Rgbx => packed(4, [0, 1, 2]),
            Bgra | Bgrx => packed(4, [2, 1, 0]),
            Argb | Xrgb => packed(4, [1, 2, 3]),
            Abgr | Xbgr => packed(4, [3, 2, 1]),
        }
    }

    /// Returns true for planar YUV formats.
    pub fn is_planar(&self) -> bool {
        matches!(self.layout(), FrameLayout::Planar { .. })
    }

    /// Size in bytes of one tightly packed `width × height` frame.
    pub fn frame_size(&self, width: usize, height: usize) -> usize {
        let layout = self.layout();
        (0..layout.plane_count())
            .map(|index| {
                let (row_bytes, rows) = layout.plane_extent(index, width, height);
                row_bytes * rows
            })
            .sum()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PixelFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| FrameError::UnsupportedFormat(s.to_string()))
    }
}
