//! Module for pixel formats.
//!
//! Pixel sources hand over pixels as packed `u32` values in ARGB order:
//!
//! ```text
//! bits: 31..24 23..16 15..8 7..0
//!       alpha  red    green blue
//! ```
//!
//! PNG wants the channels as separate bytes, red first. The types here are
//! those byte layouts, and they're [`Pod`] so that a pixel can be viewed as
//! its raw bytes with [`bytemuck::bytes_of`].

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl RGB8 {
  /// Unpacks an ARGB value, discarding the alpha channel.
  #[inline]
  #[must_use]
  pub const fn from_argb(argb: u32) -> Self {
    let [_a, r, g, b] = argb.to_be_bytes();
    Self { r, g, b }
  }
}
impl From<RGB8> for u32 {
  /// Packs as ARGB with full opacity.
  #[inline]
  #[must_use]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    u32::from_be_bytes([u8::MAX, r, g, b])
  }
}

/// An 8-bits per channel RGBA pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8 {
  /// Unpacks an ARGB value.
  #[inline]
  #[must_use]
  pub const fn from_argb(argb: u32) -> Self {
    let [a, r, g, b] = argb.to_be_bytes();
    Self { r, g, b, a }
  }
}
impl From<RGBA8> for u32 {
  /// Packs as ARGB.
  #[inline]
  #[must_use]
  fn from(RGBA8 { r, g, b, a }: RGBA8) -> Self {
    u32::from_be_bytes([a, r, g, b])
  }
}

#[test]
fn test_argb_channel_positions() {
  let argb = 0x80_11_22_33_u32;
  assert_eq!(RGBA8::from_argb(argb), RGBA8 { r: 0x11, g: 0x22, b: 0x33, a: 0x80 });
  assert_eq!(RGB8::from_argb(argb), RGB8 { r: 0x11, g: 0x22, b: 0x33 });
  assert_eq!(bytemuck::bytes_of(&RGBA8::from_argb(argb)), &[0x11, 0x22, 0x33, 0x80]);
  assert_eq!(u32::from(RGBA8::from_argb(argb)), argb);
  assert_eq!(u32::from(RGB8::from_argb(argb)), 0xFF_11_22_33);
}
