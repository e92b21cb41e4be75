use core::num::TryFromIntError;

use crate::image::PixelFetchError;

/// Shorthand for results with a [`PngEncodeError`].
pub type PngResult<T> = Result<T, PngEncodeError>;

/// An error from the `rasterpng` crate.
///
/// Having no image to encode is *not* an error, the encoder reports that as
/// `Ok(None)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngEncodeError {
  /// The pixel source couldn't deliver some of the rows we asked for.
  ///
  /// The encode is abandoned at that point and no bytes are returned.
  PixelAccess,

  /// The zlib compressor reported a failure.
  Compression,

  /// Writing the finished PNG to the destination failed.
  #[cfg(feature = "std")]
  Io(std::io::ErrorKind),

  /// The pixel source claims a width or height of 0.
  WidthOrHeightZero,

  /// A checked math operation failed.
  ///
  /// This happens when a scanline or chunk would be too big to describe.
  CheckedMath,
}

impl From<PixelFetchError> for PngEncodeError {
  #[inline]
  fn from(_: PixelFetchError) -> Self {
    Self::PixelAccess
  }
}
impl From<TryFromIntError> for PngEncodeError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::CheckedMath
  }
}
#[cfg(feature = "std")]
impl From<std::io::Error> for PngEncodeError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e.kind())
  }
}

impl core::fmt::Display for PngEncodeError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::PixelAccess => f.write_str("the pixel source failed to provide pixel data"),
      Self::Compression => f.write_str("zlib compression of the image data failed"),
      #[cfg(feature = "std")]
      Self::Io(kind) => write!(f, "writing the PNG data failed: {kind}"),
      Self::WidthOrHeightZero => f.write_str("the image has a width or height of 0"),
      Self::CheckedMath => f.write_str("the image is too large to encode"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngEncodeError {}
