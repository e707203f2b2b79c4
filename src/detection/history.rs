//! Rolling history of chunk-sum grids.
//!
//! The buffer holds `depth` slots, one per frame of lag. Frame `t` reads
//! and then overwrites slot `t mod depth`, so the value it reads is the
//! one written at frame `t - depth`.

use thiserror::Error;

/// Errors raised while allocating the history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("out of memory allocating {slots} history slots of {chunks} chunks")]
    OutOfMemory { slots: usize, chunks: usize },
    #[error("history depth must be at least 1")]
    ZeroDepth,
}

/// Fixed-depth circular buffer of per-chunk sums.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    slots: Vec<Box<[u64]>>,
    chunks: usize,
    frame_count: u64,
}

impl HistoryBuffer {
    /// Allocates `depth` zeroed slots of `chunks` counters each.
    ///
    /// Allocation is fallible; on failure every slot allocated so far is
    /// dropped before the error is returned.
    pub fn allocate(depth: usize, chunks: usize) -> Result<Self, HistoryError> {
        if depth == 0 {
            return Err(HistoryError::ZeroDepth);
        }
        let oom = || HistoryError::OutOfMemory {
            slots: depth,
            chunks,
        };

        let mut slots = Vec::new();
        slots.try_reserve_exact(depth).map_err(|_| oom())?;
        for _ in 0..depth {
            let mut slot = Vec::new();
            slot.try_reserve_exact(chunks).map_err(|_| oom())?;
            slot.resize(chunks, 0u64);
            slots.push(slot.into_boxed_slice());
        }

        Ok(Self {
            slots,
            chunks,
            frame_count: 0,
        })
    }

    /// Number of slots (the comparison lag in frames).
    #[inline]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Counters per slot.
    #[inline]
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Frames recorded so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns true once slots have been allocated and not released.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Slot read and written by the current frame.
    #[inline]
    pub fn active_index(&self) -> usize {
        match self.slots.len() {
            0 => 0,
            depth => (self.frame_count % depth as u64) as usize,
        }
    }

    /// The active slot, mutably. Empty once released.
    pub fn active_slot_mut(&mut self) -> &mut [u64] {
        let index = self.active_index();
        match self.slots.get_mut(index) {
            Some(slot) => slot,
            None => &mut [],
        }
    }

    /// Slot `index`, for inspection.
    pub fn slot(&self, index: usize) -> Option<&[u64]> {
        self.slots.get(index).map(|slot| &slot[..])
    }

    /// Moves on to the next frame.
    #[inline]
    pub fn advance(&mut self) {
        self.frame_count += 1;
    }

    /// Frees every slot. Safe to call repeatedly or on a default buffer.
    pub fn release(&mut self) {
        self.slots = Vec::new();
        self.chunks = 0;
        self.frame_count = 0;
    }
}
