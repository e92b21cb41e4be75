use bytemuck::{Pod, Zeroable};

use crate::U32BE;

use super::OutputBuffer;

/// Converts dots per inch to pixels per meter, rounded to nearest.
///
/// One inch is exactly 0.0254 meters, so this is `dpi / 0.0254` worked out in
/// integers. Gives `None` if the result doesn't fit in a `u32`.
#[inline]
#[must_use]
pub fn dpi_to_pixels_per_meter(dpi: u32) -> Option<u32> {
  // dpi * 10_000 / 254, plus half a unit before the division to round
  let ppm = (u64::from(dpi) * 20_000 + 254) / 508;
  u32::try_from(ppm).ok()
}

/// Physical pixel dimensions payload.
///
/// The unit is always meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
#[allow(nonstandard_style)]
pub struct pHYs {
  pixels_per_x: U32BE,
  pixels_per_y: U32BE,
  unit: u8,
}
impl pHYs {
  /// Size of the payload in bytes.
  pub const PAYLOAD_LEN: usize = 9;

  /// The unit specifier for "meter".
  pub const UNIT_METER: u8 = 1;

  /// Densities in pixels per meter.
  #[inline]
  #[must_use]
  pub const fn per_meter(pixels_per_x: u32, pixels_per_y: u32) -> Self {
    Self {
      pixels_per_x: U32BE::from_u32(pixels_per_x),
      pixels_per_y: U32BE::from_u32(pixels_per_y),
      unit: Self::UNIT_METER,
    }
  }

  /// Horizontal pixels per meter.
  #[inline]
  #[must_use]
  pub const fn pixels_per_x(&self) -> u32 {
    self.pixels_per_x.to_u32()
  }

  /// Vertical pixels per meter.
  #[inline]
  #[must_use]
  pub const fn pixels_per_y(&self) -> u32 {
    self.pixels_per_y.to_u32()
  }

  /// Appends the payload bytes.
  #[inline]
  pub fn write_payload(&self, out: &mut OutputBuffer) {
    out.write(bytemuck::bytes_of(self));
  }
}

#[test]
fn test_dpi_to_pixels_per_meter() {
  assert_eq!(dpi_to_pixels_per_meter(300), Some(11811));
  assert_eq!(dpi_to_pixels_per_meter(72), Some(2835));
  assert_eq!(dpi_to_pixels_per_meter(96), Some(3780));
  assert_eq!(dpi_to_pixels_per_meter(1), Some(39));
  assert_eq!(dpi_to_pixels_per_meter(u32::MAX), None);
}

#[test]
fn test_phys_payload_layout() {
  assert_eq!(core::mem::size_of::<pHYs>(), pHYs::PAYLOAD_LEN);
  let phys = pHYs::per_meter(11811, 2835);
  assert_eq!(bytemuck::bytes_of(&phys), &[0, 0, 0x2E, 0x23, 0, 0, 0x0B, 0x13, 1]);
}
