use bytemuck::{Pod, Zeroable};

use crate::U32BE;

use super::{OutputBuffer, PngColorType};

/// Image Header payload, laid out exactly as it appears in the chunk.
///
/// This encoder always writes 8 bits per channel, compression method 0,
/// filter method 0, and no interlacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct IHDR {
  width: U32BE,
  height: U32BE,
  bit_depth: u8,
  color_type: u8,
  compression_method: u8,
  filter_method: u8,
  interlace_method: u8,
}
impl IHDR {
  /// Size of the payload in bytes.
  pub const PAYLOAD_LEN: usize = 13;

  /// Makes a header for an 8-bit image of the given color type.
  #[inline]
  #[must_use]
  pub const fn new(width: u32, height: u32, color_type: PngColorType) -> Self {
    Self {
      width: U32BE::from_u32(width),
      height: U32BE::from_u32(height),
      bit_depth: 8,
      color_type: color_type as u8,
      compression_method: 0,
      filter_method: 0,
      interlace_method: 0,
    }
  }

  /// width in pixels
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width.to_u32()
  }

  /// height in pixels
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height.to_u32()
  }

  /// The raw color type byte.
  #[inline]
  #[must_use]
  pub const fn color_type(&self) -> u8 {
    self.color_type
  }

  /// Appends the payload bytes.
  #[inline]
  pub fn write_payload(&self, out: &mut OutputBuffer) {
    out.write(bytemuck::bytes_of(self));
  }
}

#[test]
fn test_ihdr_payload_layout() {
  assert_eq!(core::mem::size_of::<IHDR>(), IHDR::PAYLOAD_LEN);
  let ihdr = IHDR::new(0x0102_0304, 7, PngColorType::RGBA);
  assert_eq!(bytemuck::bytes_of(&ihdr), &[1, 2, 3, 4, 0, 0, 0, 7, 8, 6, 0, 0, 0]);
  assert_eq!(IHDR::new(1, 1, PngColorType::RGB).color_type(), 2);
}
