use crate::PngResult;

use super::{Crc32, OutputBuffer};

/// The 4 byte ascii tag at the start of a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkTy(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkTy {
  /// Image header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Physical pixel dimensions
  pub const pHYs: Self = Self(*b"pHYs");
  /// Image data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image end
  pub const IEND: Self = Self(*b"IEND");

  /// The tag bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; 4] {
    &self.0
  }
}
impl core::fmt::Debug for PngChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Debug::fmt(core::str::from_utf8(self.0.as_slice()).unwrap_or("?"), f)
  }
}

/// Writes one whole chunk to the end of `out`, returning the new length.
///
/// The `payload` closure appends the chunk's payload to the buffer it's
/// given. The length field is written as a placeholder first and then filled
/// in once the payload is done, and the CRC is computed by reading back the
/// tag and payload bytes out of the buffer.
///
/// ## Failure
/// * If the payload is longer than `u32::MAX` bytes.
pub fn write_chunk<F>(out: &mut OutputBuffer, ty: PngChunkTy, payload: F) -> PngResult<usize>
where
  F: FnOnce(&mut OutputBuffer),
{
  let length_at = out.len();
  let tag_at = out.write_u32_be(0);
  let payload_at = out.write(ty.as_bytes());
  payload(out);
  let payload_end = out.len();
  let payload_len = u32::try_from(payload_end - payload_at)?;
  out.write_u32_be_at(length_at, payload_len);
  let mut crc = Crc32::new();
  crc.update(&out.as_slice()[tag_at..payload_end]);
  Ok(out.write_u32_be(crc.finalize()))
}
