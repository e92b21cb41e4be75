use alloc::vec::Vec;

use log::{trace, warn};

use crate::{image::PixelSource, PngEncodeError, PngResult, RGB8, RGBA8};

use super::{PngColorType, PngFilter};

/// Default byte budget for one batch of rows.
///
/// This only bounds how much scratch memory one batch uses, any value gives
/// the same PNG bytes.
pub const DEFAULT_BATCH_BYTE_LIMIT: usize = 256 * 1024;

/// Pulls rows out of a [`PixelSource`] a batch at a time and unpacks them
/// into unfiltered PNG scanlines.
///
/// Every scanline in a batch is the filter type byte followed by the R, G, B
/// (and A, for [`PngColorType::RGBA`]) bytes of each pixel. The pixel bytes
/// are still unfiltered, that's the [`ScanlineFilter`](super::ScanlineFilter)'s
/// job.
#[derive(Debug)]
pub struct RowBatchExtractor<'s, S: PixelSource + ?Sized> {
  source: &'s S,
  width: u32,
  height: u32,
  color_type: PngColorType,
  filter_byte: u8,
  bytes_per_scanline: usize,
  pixel_budget_per_row: usize,
  batch_byte_limit: usize,
  next_row: u32,
  argb: Vec<u32>,
  scanlines: Vec<u8>,
}
impl<'s, S: PixelSource + ?Sized> RowBatchExtractor<'s, S> {
  /// Prepares to read all rows of `source`.
  ///
  /// ## Failure
  /// * The source has a width or height of 0.
  /// * A scanline's length doesn't fit in `usize`.
  pub fn new(
    source: &'s S, color_type: PngColorType, filter: PngFilter, batch_byte_limit: usize,
  ) -> PngResult<Self> {
    let width = source.width();
    let height = source.height();
    if width == 0 || height == 0 {
      return Err(PngEncodeError::WidthOrHeightZero);
    }
    let w = usize::try_from(width)?;
    let bpp = color_type.channel_count();
    let bytes_per_scanline =
      w.checked_mul(bpp).and_then(|b| b.checked_add(1)).ok_or(PngEncodeError::CheckedMath)?;
    let pixel_budget_per_row = w.checked_mul(bpp + 1).ok_or(PngEncodeError::CheckedMath)?;
    Ok(Self {
      source,
      width,
      height,
      color_type,
      filter_byte: filter.to_u8(),
      bytes_per_scanline,
      pixel_budget_per_row,
      batch_byte_limit,
      next_row: 0,
      argb: Vec::new(),
      scanlines: Vec::new(),
    })
  }

  /// Length of one scanline, including the filter type byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self) -> usize {
    self.bytes_per_scanline
  }

  /// Rows that haven't been handed out yet.
  #[inline]
  #[must_use]
  pub const fn rows_remaining(&self) -> u32 {
    self.height - self.next_row
  }

  /// How many rows the next call to [`next_batch`](Self::next_batch) reads.
  ///
  /// This is as many rows as fit in the byte limit (counting a byte of
  /// overhead per pixel), but never less than 1 and never more than remain.
  #[inline]
  #[must_use]
  pub fn rows_in_next_batch(&self) -> u32 {
    let fit = self.batch_byte_limit / self.pixel_budget_per_row;
    u32::try_from(fit).unwrap_or(u32::MAX).min(self.rows_remaining()).max(1)
  }

  /// Fetches and unpacks the next batch of rows.
  ///
  /// Gives `Ok(None)` once every row has been read. The returned slice holds
  /// a whole number of scanlines, each [`bytes_per_scanline`] long.
  ///
  /// ## Failure
  /// * The pixel source couldn't provide the rows.
  ///
  /// [`bytes_per_scanline`]: Self::bytes_per_scanline
  pub fn next_batch(&mut self) -> PngResult<Option<&mut [u8]>> {
    if self.next_row >= self.height {
      return Ok(None);
    }
    let y = self.next_row;
    let rows = self.rows_in_next_batch();
    let w = self.width as usize;
    let pixel_count = w.checked_mul(rows as usize).ok_or(PngEncodeError::CheckedMath)?;
    let byte_count =
      self.bytes_per_scanline.checked_mul(rows as usize).ok_or(PngEncodeError::CheckedMath)?;
    trace!("fetching rows {y}..{} ({byte_count} scanline bytes)", y + rows);

    self.argb.resize(pixel_count, 0);
    if let Err(e) = self.source.fetch_argb(0, y, self.width, rows, &mut self.argb) {
      warn!("pixel fetch of rows {y}..{} failed: {e:?}", y + rows);
      return Err(PngEncodeError::from(e));
    }

    self.scanlines.resize(byte_count, 0);
    let lines = self.scanlines.chunks_exact_mut(self.bytes_per_scanline);
    for (argb_row, line) in self.argb.chunks_exact(w).zip(lines) {
      let (filter_byte, pixels) = line.split_at_mut(1);
      filter_byte[0] = self.filter_byte;
      match self.color_type {
        PngColorType::RGB => {
          for (argb, out) in argb_row.iter().copied().zip(pixels.chunks_exact_mut(3)) {
            out.copy_from_slice(bytemuck::bytes_of(&RGB8::from_argb(argb)));
          }
        }
        PngColorType::RGBA => {
          for (argb, out) in argb_row.iter().copied().zip(pixels.chunks_exact_mut(4)) {
            out.copy_from_slice(bytemuck::bytes_of(&RGBA8::from_argb(argb)));
          }
        }
      }
    }
    self.next_row += rows;
    Ok(Some(&mut self.scanlines[..byte_count]))
  }
}
