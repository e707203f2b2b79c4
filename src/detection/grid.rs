//! Chunk grid sizing and traversal.

/// A `size × size` tile of the luma plane, clipped at the frame edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRect {
    /// Row-major position in the grid.
    pub index: usize,
    /// Left luma column.
    pub x: usize,
    /// Top luma row.
    pub y: usize,
    /// Width after clipping.
    pub width: usize,
    /// Height after clipping.
    pub height: usize,
}

impl ChunkRect {
    /// One past the right-most luma column.
    #[inline]
    pub fn x_end(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom luma row.
    #[inline]
    pub fn y_end(&self) -> usize {
        self.y + self.height
    }

    /// Number of luma samples covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Partition of a `width × height` frame into square chunks.
///
/// Chunks tile the frame from `(0, 0)`; the last column and row are
/// truncated rather than padded, so `cols = ceil(width / size)` and
/// `rows = ceil(height / size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGrid {
    width: usize,
    height: usize,
    size: usize,
    cols: usize,
    rows: usize,
}

impl ChunkGrid {
    /// Creates a grid. A `size` of zero is treated as one.
    pub fn new(width: usize, height: usize, size: usize) -> Self {
        let size = size.max(1);
        Self {
            width,
            height,
            size,
            cols: width.div_ceil(size),
            rows: height.div_ceil(size),
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total chunks, `cols * rows`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chunk at row-major `index`, if inside the grid.
    pub fn chunk(&self, index: usize) -> Option<ChunkRect> {
        if index >= self.len() {
            return None;
        }
        let x = (index % self.cols) * self.size;
        let y = (index / self.cols) * self.size;
        Some(ChunkRect {
            index,
            x,
            y,
            width: self.size.min(self.width - x),
            height: self.size.min(self.height - y),
        })
    }

    /// Visits every chunk origin in row-major order.
    pub fn chunks(&self) -> Chunks {
        Chunks {
            grid: *self,
            next: 0,
        }
    }
}

/// Row-major iterator over a [`ChunkGrid`].
#[derive(Debug, Clone)]
pub struct Chunks {
    grid: ChunkGrid,
    next: usize,
}

impl Iterator for Chunks {
    type Item = ChunkRect;

    fn next(&mut self) -> Option<Self::Item> {
        let rect = self.grid.chunk(self.next)?;
        self.next += 1;
        Some(rect)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks {}
