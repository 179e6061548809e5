//! The StreamBuffer type - a fixed-capacity view into borrowed memory.

/// A fixed-capacity byte region with a write position.
///
/// `StreamBuffer` does not own its backing memory. It is a view into a
/// region allocated and owned by the orchestrator, bound once at channel
/// setup; the `'a` lifetime guarantees the allocation outlives every
/// operation on the view. Capacity is fixed for the binding's lifetime.
///
/// The position tracks how many bytes at the front of the region are
/// currently valid. It never exceeds capacity: every mutation that advances
/// it is bounds-checked by the channel before bytes are copied.
///
/// This is a value holder. All writes go through the channel's buffered
/// write helpers, which maintain the position directly; the only standalone
/// behavior is rewinding to empty after a drain.
#[derive(Debug)]
pub struct StreamBuffer<'a> {
    data: &'a mut [u8],
    position: usize,
}

impl<'a> StreamBuffer<'a> {
    /// Binds a view over the given region with position 0.
    pub(crate) fn bind(data: &'a mut [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Returns the fixed capacity of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of valid bytes at the front of the region.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Returns true if no bytes are currently valid.
    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Rewinds the position to 0. The backing bytes are left as-is.
    pub(crate) fn clear(&mut self) {
        self.position = 0;
    }

    /// Marks the first `position` bytes of the region as valid.
    ///
    /// Caller must have checked `position <= capacity`.
    pub(crate) fn set_position(&mut self, position: usize) {
        debug_assert!(position <= self.data.len());
        self.position = position;
    }

    /// Returns the currently valid prefix of the region.
    pub(crate) fn filled(&self) -> &[u8] {
        &self.data[..self.position]
    }

    /// Appends bytes at the current position.
    ///
    /// Caller must have checked that `bytes` fits in the remaining space.
    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.remaining());
        self.data[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
    }

    /// Returns the whole region mutably, so the orchestrator can fill it.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data
    }
}
