//! Single image planes, owned and borrowed.

/// An owned, row-strided plane of 8-bit samples.
#[derive(Clone, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    stride: usize,
}

impl Plane {
    /// Wraps a buffer whose rows start every `stride` bytes.
    pub fn new(data: Vec<u8>, stride: usize) -> Self {
        Self { data, stride }
    }

    /// A plane of `rows` rows, `row_bytes` wide, every sample set to `value`.
    pub fn filled(row_bytes: usize, rows: usize, value: u8) -> Self {
        Self {
            data: vec![value; row_bytes * rows],
            stride: row_bytes,
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns row `y`, starting at its first byte.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..]
    }

    /// Borrows this plane mutably.
    pub fn as_mut(&mut self) -> PlaneMut<'_> {
        PlaneMut::new(&mut self.data, self.stride)
    }
}

impl std::fmt::Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plane")
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A mutable view of a plane owned by someone else.
///
/// Holding a `PlaneMut` is the exclusive-write guarantee: nothing else can
/// read or write the samples while the view is alive.
#[derive(Default)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    stride: usize,
}

impl<'a> PlaneMut<'a> {
    pub fn new(data: &'a mut [u8], stride: usize) -> Self {
        Self { data, stride }
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns row `y`, starting at its first byte.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..]
    }

    /// Returns row `y` mutably, starting at its first byte.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..]
    }

    /// Minimum buffer length holding `rows` rows of `row_bytes` bytes.
    pub(crate) fn required_len(stride: usize, row_bytes: usize, rows: usize) -> usize {
        match rows {
            0 => 0,
            rows => stride * (rows - 1) + row_bytes,
        }
    }
}

impl std::fmt::Debug for PlaneMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaneMut")
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}
