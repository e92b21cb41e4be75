//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.
//!
//! Each filter predicts a byte from bytes that the decoder will already have
//! reconstructed, and stores the difference (wrapping, mod 256).

use alloc::{vec, vec::Vec};

/// The per-row filter types that the encoder can apply.
///
/// The same filter is used for every row of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngFilter {
  /// Bytes are stored as-is.
  #[default]
  None = 0,
  /// Each byte minus the corresponding byte of the pixel to the left.
  Sub = 1,
  /// Each byte minus the byte at the same position in the row above.
  Up = 2,
}
impl PngFilter {
  /// The filter type byte that starts each scanline.
  #[inline]
  #[must_use]
  pub const fn to_u8(self) -> u8 {
    self as u8
  }

  /// Gets the filter for a filter type byte, if this encoder supports it.
  #[inline]
  #[must_use]
  pub const fn from_u8(u: u8) -> Option<Self> {
    match u {
      0 => Some(Self::None),
      1 => Some(Self::Sub),
      2 => Some(Self::Up),
      _ => None,
    }
  }
}

/// Scratch state for filtering the rows of one image, top to bottom.
///
/// * **Sub** remembers the last `bytes_per_pixel` original bytes in a small
///   ring, one slot per channel lane, so it never has to look back at bytes
///   it already overwrote.
/// * **Up** keeps a copy of the previous row's original bytes. Before the
///   first row that's all zeroes.
///
/// Make a new one for each image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanlineFilter {
  mode: PngFilter,
  history: Vec<u8>,
  prior_row: Vec<u8>,
}
impl ScanlineFilter {
  /// Makes a filter for rows of `row_len` pixel bytes.
  ///
  /// `row_len` doesn't count the filter type byte.
  #[must_use]
  pub fn new(mode: PngFilter, bytes_per_pixel: usize, row_len: usize) -> Self {
    let history = match mode {
      PngFilter::Sub => vec![0; bytes_per_pixel.max(1)],
      _ => Vec::new(),
    };
    let prior_row = match mode {
      PngFilter::Up => vec![0; row_len],
      _ => Vec::new(),
    };
    Self { mode, history, prior_row }
  }

  /// The filter this applies.
  #[inline]
  #[must_use]
  pub const fn mode(&self) -> PngFilter {
    self.mode
  }

  /// Filters one scanline in place.
  ///
  /// The first byte is the filter type byte, and gets set to this filter's
  /// type. Everything after that is pixel bytes.
  pub fn filter_scanline(&mut self, scanline: &mut [u8]) {
    if let Some((filter_byte, pixels)) = scanline.split_first_mut() {
      *filter_byte = self.mode.to_u8();
      match self.mode {
        PngFilter::None => (),
        PngFilter::Sub => self.sub(pixels),
        PngFilter::Up => self.up(pixels),
      }
    }
  }

  fn sub(&mut self, pixels: &mut [u8]) {
    let bpp = self.history.len();
    for (i, x) in pixels.iter_mut().enumerate() {
      let lane = i % bpp;
      let original = *x;
      // the leftmost pixel has no `a` and stays as it is
      if i >= bpp {
        *x = original.wrapping_sub(self.history[lane]);
      }
      self.history[lane] = original;
    }
  }

  fn up(&mut self, pixels: &mut [u8]) {
    debug_assert_eq!(pixels.len(), self.prior_row.len());
    for (x, b) in pixels.iter_mut().zip(self.prior_row.iter_mut()) {
      let original = *x;
      *x = original.wrapping_sub(*b);
      *b = original;
    }
  }
}
