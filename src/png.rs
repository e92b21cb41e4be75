#![forbid(unsafe_code)]

//! Module for writing PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Automatic Encoding
//!
//! Make a [`PngEncoder`], adjust whatever settings you care about, and call
//! [`encode`](PngEncoder::encode) with your [`PixelSource`](crate::image::PixelSource).
//!
//! ## What Gets Written
//!
//! A PNG is an 8 byte signature followed by a series of "chunks". Each chunk
//! is a big-endian `u32` payload length, a 4 byte ascii tag, the payload, and
//! a CRC32 of the tag and payload. This encoder always writes:
//!
//! * **`IHDR`** - The image header: dimensions, 8 bits per channel, and either
//!   truecolor (`RGB`) or truecolor with alpha (`RGBA`). Never interlaced.
//! * **`pHYs`** - Only when both DPI values are configured. This records the
//!   physical pixel density in pixels per meter.
//! * **`IDAT`** - Exactly one, holding the entire zlib stream.
//! * **`IEND`** - The empty end marker.
//!
//! ## The Pipeline
//!
//! The image data goes through a few stages on its way into the `IDAT` chunk:
//!
//! 1) [`RowBatchExtractor`] pulls a bounded number of rows at a time from the
//!    pixel source and unpacks the ARGB values into R, G, B (and A) bytes, with
//!    a filter type byte at the front of each row.
//! 2) [`ScanlineFilter`] runs the selected [`PngFilter`] over each row. Filters
//!    are applied to **bytes**, not to pixels.
//! 3) [`IdatCompressor`] feeds every filtered row into one zlib stream.
//!
//! Then [`write_chunk`] puts the compressed bytes into the [`OutputBuffer`].

mod chunk;
pub use chunk::*;

mod compress;
pub use compress::*;

mod crc32;
pub use crc32::*;

mod encoder;
pub use encoder::*;

mod extract;
pub use extract::*;

mod filter;
pub use filter::*;

mod ihdr;
pub use ihdr::*;

mod output_buffer;
pub use output_buffer::*;

mod phys;
pub use phys::*;


/// The first 8 bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// The types of color that this encoder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Red, Green, Blue
  RGB = 2,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// Picks the color type for the alpha setting.
  #[inline]
  #[must_use]
  pub const fn for_alpha(encode_alpha: bool) -> Self {
    if encode_alpha {
      Self::RGBA
    } else {
      Self::RGB
    }
  }

  /// The number of channels in this type of color.
  ///
  /// At 8 bits per channel this is also the bytes per pixel.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::RGB => 3,
      Self::RGBA => 4,
    }
  }
}
