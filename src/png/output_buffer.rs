use alloc::vec::Vec;

/// The least amount that an [`OutputBuffer`] grows by when it has to grow.
pub const MIN_GROWTH: usize = 1024;

/// A byte buffer that tracks how much of itself holds real data.
///
/// The buffer has a physical capacity (bytes that exist and can be written)
/// and a logical length, the high-water mark of everything written so far.
/// Writes can land anywhere, including back over earlier bytes, which is how
/// chunk lengths get filled in after their payload.
///
/// Growth never fails: running out of memory is treated the way the global
/// allocator treats it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OutputBuffer {
  /// Physical storage, `bytes.len()` is the capacity.
  bytes: Vec<u8>,
  high_water: usize,
}
impl OutputBuffer {
  /// An empty buffer with no capacity.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { bytes: Vec::new(), high_water: 0 }
  }

  /// An empty buffer with `capacity` bytes ready to go.
  #[inline]
  #[must_use]
  pub fn with_capacity(capacity: usize) -> Self {
    let mut bytes = Vec::new();
    bytes.resize(capacity, 0);
    Self { bytes, high_water: 0 }
  }

  /// Number of valid bytes (the high-water mark).
  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.high_water
  }

  /// If nothing has been written yet.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.high_water == 0
  }

  /// Number of bytes that can be held before the next growth.
  #[inline]
  #[must_use]
  pub fn capacity(&self) -> usize {
    self.bytes.len()
  }

  /// The valid bytes.
  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    &self.bytes[..self.high_water]
  }

  /// Writes `bytes` starting at `offset`, returning the offset just past them.
  ///
  /// The high-water mark becomes `max(mark, offset + bytes.len())`, so
  /// overwriting earlier data doesn't shrink the buffer. Writing past the
  /// mark leaves any gap zeroed.
  pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> usize {
    let end = offset + bytes.len();
    self.reserve_to(end);
    self.bytes[offset..end].copy_from_slice(bytes);
    self.high_water = self.high_water.max(end);
    end
  }

  /// Appends `bytes` at the high-water mark, returning the new length.
  #[inline]
  pub fn write(&mut self, bytes: &[u8]) -> usize {
    self.write_at(self.high_water, bytes)
  }

  /// Appends the first `n` bytes of `bytes`, returning the new length.
  ///
  /// If `n` is more than `bytes.len()` then all of `bytes` is written.
  #[inline]
  pub fn write_prefix(&mut self, bytes: &[u8], n: usize) -> usize {
    self.write(&bytes[..n.min(bytes.len())])
  }

  /// Writes a big-endian `u32` at `offset`, returning the offset after it.
  #[inline]
  pub fn write_u32_be_at(&mut self, offset: usize, u: u32) -> usize {
    self.write_at(offset, &u.to_be_bytes())
  }

  /// Appends a big-endian `u32`, returning the new length.
  #[inline]
  pub fn write_u32_be(&mut self, u: u32) -> usize {
    self.write(&u.to_be_bytes())
  }

  /// Cuts the storage down to the high-water mark and hands it over.
  #[inline]
  #[must_use]
  pub fn finish(mut self) -> Vec<u8> {
    self.bytes.truncate(self.high_water);
    self.bytes
  }

  /// Grows geometrically, but always by at least [`MIN_GROWTH`] and at least
  /// enough to reach `end`.
  fn reserve_to(&mut self, end: usize) {
    let capacity = self.bytes.len();
    if end <= capacity {
      return;
    }
    let grow_by = (end - capacity).max(MIN_GROWTH).max(capacity / 2);
    self.bytes.resize(capacity + grow_by, 0);
  }
}
