//! Frame types: an owned planar frame and a borrowed writable view.

use serde::{Deserialize, Serialize};

use super::{FrameError, FrameLayout, PixelFormat, Plane, PlaneMut};

/// Upper bound on planes per frame (luma, two chroma, alpha).
pub const MAX_PLANES: usize = 4;

/// Width, height and pixel format of a frame stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    /// Luma width in pixels.
    pub width: usize,
    /// Luma height in pixels.
    pub height: usize,
    /// Sample layout.
    pub format: PixelFormat,
}

impl FrameGeometry {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Rejects empty frames.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Size in bytes of one tightly packed frame.
    pub fn frame_size(&self) -> usize {
        self.format.frame_size(self.width, self.height)
    }

    /// Checks `(stride, len)` of every plane against this geometry.
    fn check_planes(
        &self,
        planes: impl ExactSizeIterator<Item = (usize, usize)>,
    ) -> Result<(), FrameError> {
        self.validate()?;
        let layout = self.format.layout();
        let expected = layout.plane_count();
        if planes.len() != expected {
            return Err(FrameError::PlaneCount {
                format: self.format,
                expected,
                got: planes.len(),
            });
        }

        for (index, (stride, len)) in planes.enumerate() {
            let (row_bytes, rows) = layout.plane_extent(index, self.width, self.height);
            if stride < row_bytes {
                return Err(FrameError::StrideTooSmall {
                    plane: index,
                    stride,
                    row_bytes,
                });
            }
            let required = PlaneMut::required_len(stride, row_bytes, rows);
            if len < required {
                return Err(FrameError::BufferTooSmall {
                    plane: index,
                    len,
                    required,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}

/// A writable frame whose sample memory belongs to the caller.
///
/// Construction validates that every plane is large enough for the
/// declared geometry, so code holding a `FrameMut` may address any sample
/// inside `width × height` (and the co-located chroma) without further
/// bounds reasoning. The mutable borrows guarantee exclusive access for the
/// lifetime of the view.
#[derive(Debug)]
pub struct FrameMut<'a> {
    geometry: FrameGeometry,
    planes: [PlaneMut<'a>; MAX_PLANES],
    plane_count: usize,
}

impl<'a> FrameMut<'a> {
    /// Builds a view over caller-owned planes.
    ///
    /// Planes are given in order: luma, first chroma, second chroma, alpha
    /// (planar formats) or the single interleaved plane (packed formats).
    pub fn new<I>(geometry: FrameGeometry, planes: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = PlaneMut<'a>>,
    {
        let mut slots: [PlaneMut<'a>; MAX_PLANES] = Default::default();
        let mut plane_count = 0;
        for plane in planes {
            if plane_count < MAX_PLANES {
                slots[plane_count] = plane;
            }
            plane_count += 1;
        }

        if plane_count > MAX_PLANES {
            return Err(FrameError::PlaneCount {
                format: geometry.format,
                expected: geometry.format.layout().plane_count(),
                got: plane_count,
            });
        }

        geometry.check_planes(slots[..plane_count].iter().map(|p| (p.stride(), p.len())))?;

        Ok(Self {
            geometry,
            planes: slots,
            plane_count,
        })
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.geometry.format
    }

    #[inline]
    pub fn layout(&self) -> FrameLayout {
        self.geometry.format.layout()
    }

    /// Planes in order.
    #[inline]
    pub fn planes(&self) -> &[PlaneMut<'a>] {
        &self.planes[..self.plane_count]
    }

    /// Planes in order, mutably.
    #[inline]
    pub fn planes_mut(&mut self) -> &mut [PlaneMut<'a>] {
        &mut self.planes[..self.plane_count]
    }
}

/// An owned frame with tightly packed planes.
#[derive(Clone)]
pub struct Frame {
    geometry: FrameGeometry,
    planes: Vec<Plane>,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl Frame {
    /// Assembles a frame from owned planes, validating their sizes.
    pub fn new(geometry: FrameGeometry, planes: Vec<Plane>, sequence: u64) -> Result<Self, FrameError> {
        geometry.check_planes(planes.iter().map(|p| (p.stride(), p.data().len())))?;
        Ok(Self {
            geometry,
            planes,
            sequence,
        })
    }

    /// A frame with every byte of every plane set to `value`.
    pub fn filled(geometry: FrameGeometry, value: u8, sequence: u64) -> Result<Self, FrameError> {
        Self::with_plane_values(geometry, [value; MAX_PLANES], sequence)
    }

    /// A frame whose plane `i` is filled with `values[i]`.
    pub fn with_plane_values(
        geometry: FrameGeometry,
        values: [u8; MAX_PLANES],
        sequence: u64,
    ) -> Result<Self, FrameError> {
        geometry.validate()?;
        let layout = geometry.format.layout();
        let planes = (0..layout.plane_count())
            .map(|index| {
                let (row_bytes, rows) = layout.plane_extent(index, geometry.width, geometry.height);
                Plane::filled(row_bytes, rows, values[index])
            })
            .collect();
        Self::new(geometry, planes, sequence)
    }

    /// Splits one tightly packed rawvideo frame into planes.
    pub fn from_packed_bytes(
        geometry: FrameGeometry,
        bytes: &[u8],
        sequence: u64,
    ) -> Result<Self, FrameError> {
        geometry.validate()?;
        let required = geometry.frame_size();
        if bytes.len() != required {
            return Err(FrameError::BufferTooSmall {
                plane: 0,
                len: bytes.len(),
                required,
            });
        }

        let layout = geometry.format.layout();
        let mut offset = 0;
        let mut planes = Vec::with_capacity(layout.plane_count());
        for index in 0..layout.plane_count() {
            let (row_bytes, rows) = layout.plane_extent(index, geometry.width, geometry.height);
            let len = row_bytes * rows;
            planes.push(Plane::new(bytes[offset..offset + len].to_vec(), row_bytes));
            offset += len;
        }
        Self::new(geometry, planes, sequence)
    }

    /// Appends the visible samples of every plane to `out`, tightly packed.
    pub fn write_packed_bytes(&self, out: &mut Vec<u8>) {
        let layout = self.geometry.format.layout();
        for (index, plane) in self.planes.iter().enumerate() {
            let (row_bytes, rows) =
                layout.plane_extent(index, self.geometry.width, self.geometry.height);
            for y in 0..rows {
                out.extend_from_slice(&plane.row(y)[..row_bytes]);
            }
        }
    }

    /// Lends a writable view of this frame.
    pub fn as_frame_mut(&mut self) -> FrameMut<'_> {
        let mut planes: [PlaneMut<'_>; MAX_PLANES] = Default::default();
        let plane_count = self.planes.len();
        for (slot, plane) in planes.iter_mut().zip(self.planes.iter_mut()) {
            *slot = plane.as_mut();
        }
        // Sizes were validated when this frame was built.
        FrameMut {
            geometry: self.geometry,
            planes,
            plane_count,
        }
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.geometry.format
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    #[inline]
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    #[inline]
    pub fn plane_mut(&mut self, index: usize) -> Option<&mut Plane> {
        self.planes.get_mut(index)
    }

    /// Sample at `(x, y)` of plane `index`, in that plane's own coordinates.
    pub fn sample(&self, index: usize, x: usize, y: usize) -> Option<u8> {
        let plane = self.planes.get(index)?;
        plane.data().get(y * plane.stride() + x).copied()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("geometry", &self.geometry)
            .field("sequence", &self.sequence)
            .field("planes", &self.planes.len())
            .finish()
    }
}
