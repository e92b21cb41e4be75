#![forbid(unsafe_code)]

//! Where the pixels come from.
//!
//! The encoder never needs the whole image at once. It asks a
//! [`PixelSource`] for a few rows at a time, as packed ARGB `u32` values, and
//! converts those into PNG scanlines as it goes.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A pixel source couldn't provide the requested pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFetchError {
  /// The requested rectangle isn't entirely inside the image, or the output
  /// slice is too small for it.
  OutOfBounds,
  /// The source gave up partway, for whatever reason it has.
  Aborted,
}

/// Anything that can hand out rectangles of packed ARGB pixels.
///
/// The encoder borrows the source for one encode call and only ever asks for
/// full-width row blocks, top to bottom, but implementations should accept
/// any rectangle that fits inside the image.
pub trait PixelSource {
  /// Width of the image in pixels.
  fn width(&self) -> u32;

  /// Height of the image in pixels.
  fn height(&self) -> u32;

  /// Writes the pixels of the `width` by `height` rectangle with its top left
  /// corner at `(x, y)` into `out`, in row-major order.
  ///
  /// Each pixel is packed as `0xAARRGGBB`. Only the first `width * height`
  /// elements of `out` are written.
  fn fetch_argb(
    &self, x: u32, y: u32, width: u32, height: u32, out: &mut [u32],
  ) -> Result<(), PixelFetchError>;
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
  #[inline]
  fn width(&self) -> u32 {
    (**self).width()
  }
  #[inline]
  fn height(&self) -> u32 {
    (**self).height()
  }
  #[inline]
  fn fetch_argb(
    &self, x: u32, y: u32, width: u32, height: u32, out: &mut [u32],
  ) -> Result<(), PixelFetchError> {
    (**self).fetch_argb(x, y, width, height, out)
  }
}

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A direct-color image held in memory.
///
/// Any pixel type that packs into ARGB (`u32` itself, [`RGBA8`](crate::RGBA8),
/// [`RGB8`](crate::RGB8)) makes this a [`PixelSource`].
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
#[cfg(feature = "alloc")]
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }
}
#[cfg(feature = "alloc")]
impl<P> PixelSource for Bitmap<P>
where
  P: Copy,
  u32: From<P>,
{
  #[inline]
  fn width(&self) -> u32 {
    self.width
  }
  #[inline]
  fn height(&self) -> u32 {
    self.height
  }
  fn fetch_argb(
    &self, x: u32, y: u32, width: u32, height: u32, out: &mut [u32],
  ) -> Result<(), PixelFetchError> {
    if width == 0 || height == 0 {
      return Ok(());
    }
    let fits =
      |start: u32, len: u32, limit: u32| start.checked_add(len).is_some_and(|end| end <= limit);
    if !fits(x, width, self.width) || !fits(y, height, self.height) {
      return Err(PixelFetchError::OutOfBounds);
    }
    let w = width as usize;
    let out = out.get_mut(..w * (height as usize)).ok_or(PixelFetchError::OutOfBounds)?;
    for (row_y, out_row) in (y..y + height).zip(out.chunks_exact_mut(w)) {
      let start = xy_width_to_index(x, row_y, self.width);
      let src = self.pixels.get(start..start + w).ok_or(PixelFetchError::OutOfBounds)?;
      out_row.iter_mut().zip(src.iter().copied()).for_each(|(o, p)| *o = u32::from(p));
    }
    Ok(())
  }
}
