use alloc::vec::Vec;

use log::debug;

use crate::{image::PixelSource, PngEncodeError, PngResult};

use super::{
  dpi_to_pixels_per_meter, pHYs, write_chunk, IdatCompressor, OutputBuffer, PngChunkTy,
  PngColorType, PngFilter, RowBatchExtractor, ScanlineFilter, DEFAULT_BATCH_BYTE_LIMIT, IHDR,
  PNG_SIGNATURE,
};

/// Settings for turning images into PNG bytes.
///
/// The settings can be changed between calls to
/// [`encode`](PngEncoder::encode), but each call reads them once at the start
/// and owns all of its working memory, so one encoder can be shared by any
/// number of threads that only encode.
///
/// ```
/// # use rasterpng::{image::Bitmap, png::{PngEncoder, PngFilter}};
/// let mut encoder = PngEncoder::new();
/// encoder.set_filter(PngFilter::Sub);
/// encoder.set_compression_level(9);
/// encoder.set_dpi(300, 300);
/// let image = Bitmap { width: 2, height: 1, pixels: vec![0xFF_000000_u32, 0xFF_FFFFFF] };
/// let png = encoder.encode(Some(&image)).unwrap().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PngEncoder {
  encode_alpha: bool,
  filter: PngFilter,
  compression_level: u8,
  pixels_per_meter_x: Option<u32>,
  pixels_per_meter_y: Option<u32>,
  batch_byte_limit: usize,
}
impl Default for PngEncoder {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self::new()
  }
}
impl PngEncoder {
  /// The default compression level.
  pub const DEFAULT_COMPRESSION_LEVEL: u8 = 9;

  /// No alpha, no filtering, maximum compression, no DPI.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      encode_alpha: false,
      filter: PngFilter::None,
      compression_level: Self::DEFAULT_COMPRESSION_LEVEL,
      pixels_per_meter_x: None,
      pixels_per_meter_y: None,
      batch_byte_limit: DEFAULT_BATCH_BYTE_LIMIT,
    }
  }

  /// If the alpha channel is written.
  #[inline]
  #[must_use]
  pub const fn encode_alpha(&self) -> bool {
    self.encode_alpha
  }

  /// Sets if the alpha channel is written.
  ///
  /// With alpha the image is written as [`PngColorType::RGBA`], otherwise
  /// as [`PngColorType::RGB`] and the alpha bits of each pixel are ignored.
  #[inline]
  pub fn set_encode_alpha(&mut self, encode_alpha: bool) {
    self.encode_alpha = encode_alpha;
  }

  /// The filter applied to every scanline.
  #[inline]
  #[must_use]
  pub const fn filter(&self) -> PngFilter {
    self.filter
  }

  /// Sets the filter applied to every scanline.
  #[inline]
  pub fn set_filter(&mut self, filter: PngFilter) {
    self.filter = filter;
  }

  /// The zlib compression level, 0 through 9.
  #[inline]
  #[must_use]
  pub const fn compression_level(&self) -> u8 {
    self.compression_level
  }

  /// Sets the zlib compression level.
  ///
  /// Values outside of `0..=9` are ignored and the level stays as it was.
  #[inline]
  pub fn set_compression_level(&mut self, level: i32) {
    if let Ok(level @ 0..=9) = u8::try_from(level) {
      self.compression_level = level;
    }
  }

  /// Sets the horizontal resolution in dots per inch.
  ///
  /// 0 clears it. A value too large to express in pixels per meter is
  /// ignored.
  #[inline]
  pub fn set_dpi_x(&mut self, dpi: u32) {
    if dpi == 0 {
      self.pixels_per_meter_x = None;
    } else if let Some(ppm) = dpi_to_pixels_per_meter(dpi) {
      self.pixels_per_meter_x = Some(ppm);
    }
  }

  /// Sets the vertical resolution in dots per inch.
  ///
  /// 0 clears it. A value too large to express in pixels per meter is
  /// ignored.
  #[inline]
  pub fn set_dpi_y(&mut self, dpi: u32) {
    if dpi == 0 {
      self.pixels_per_meter_y = None;
    } else if let Some(ppm) = dpi_to_pixels_per_meter(dpi) {
      self.pixels_per_meter_y = Some(ppm);
    }
  }

  /// Sets both resolutions in dots per inch.
  #[inline]
  pub fn set_dpi(&mut self, dpi_x: u32, dpi_y: u32) {
    self.set_dpi_x(dpi_x);
    self.set_dpi_y(dpi_y);
  }

  /// The physical density, in pixels per meter, if both directions are set.
  ///
  /// The `pHYs` chunk is only written when this is `Some`.
  #[inline]
  #[must_use]
  pub const fn pixels_per_meter(&self) -> Option<(u32, u32)> {
    match (self.pixels_per_meter_x, self.pixels_per_meter_y) {
      (Some(x), Some(y)) => Some((x, y)),
      _ => None,
    }
  }

  /// Byte budget for each batch of rows read from the pixel source.
  #[inline]
  #[must_use]
  pub const fn batch_byte_limit(&self) -> usize {
    self.batch_byte_limit
  }

  /// Sets the byte budget for each batch of rows read from the pixel source.
  ///
  /// This only affects memory use and how often the pixel source is called,
  /// not the output. 0 is ignored.
  #[inline]
  pub fn set_batch_byte_limit(&mut self, limit: usize) {
    if limit > 0 {
      self.batch_byte_limit = limit;
    }
  }

  /// Encodes an image using the configured alpha setting.
  ///
  /// * `Ok(Some(bytes))` is a complete PNG file.
  /// * `Ok(None)` means there was no image to encode.
  ///
  /// ## Failure
  /// * The pixel source failed to provide some pixels.
  /// * The image has a width or height of 0, or is too large to encode.
  /// * The compressor failed.
  ///
  /// Failures never give partial output.
  #[inline]
  pub fn encode<S: PixelSource + ?Sized>(&self, image: Option<&S>) -> PngResult<Option<Vec<u8>>> {
    self.encode_with_alpha(image, self.encode_alpha)
  }

  /// Like [`encode`](Self::encode), but with the alpha setting given for this
  /// call only.
  pub fn encode_with_alpha<S: PixelSource + ?Sized>(
    &self, image: Option<&S>, encode_alpha: bool,
  ) -> PngResult<Option<Vec<u8>>> {
    match image {
      Some(image) => self.encode_image(image, encode_alpha).map(Some),
      None => {
        debug!("no image given, nothing to encode");
        Ok(None)
      }
    }
  }

  /// Encodes an image into a [`Write`](std::io::Write) destination.
  ///
  /// Gives the number of bytes written, or `None` if there was no image. The
  /// whole PNG is built before anything is written, so an encode failure
  /// leaves the destination untouched.
  ///
  /// ## Failure
  /// * Same as [`encode`](Self::encode).
  /// * Writing to `dest` failed.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  pub fn encode_to_writer<S, W>(&self, image: Option<&S>, mut dest: W) -> PngResult<Option<usize>>
  where
    S: PixelSource + ?Sized,
    W: std::io::Write,
  {
    match self.encode(image)? {
      Some(png) => {
        dest.write_all(&png)?;
        dest.flush()?;
        Ok(Some(png.len()))
      }
      None => Ok(None),
    }
  }

  fn encode_image<S: PixelSource + ?Sized>(
    &self, image: &S, encode_alpha: bool,
  ) -> PngResult<Vec<u8>> {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
      return Err(PngEncodeError::WidthOrHeightZero);
    }
    let color_type = PngColorType::for_alpha(encode_alpha);
    let filter = self.filter;
    let level = self.compression_level;
    debug!("encoding {width}x{height} {color_type:?}, filter {filter:?}, level {level}");

    let idat = compress_image_data(image, color_type, filter, level, self.batch_byte_limit)?;

    let mut out = OutputBuffer::with_capacity(idat.len() + 128);
    out.write(&PNG_SIGNATURE);
    let ihdr = IHDR::new(width, height, color_type);
    write_chunk(&mut out, PngChunkTy::IHDR, |o| ihdr.write_payload(o))?;
    if let Some((x, y)) = self.pixels_per_meter() {
      let phys = pHYs::per_meter(x, y);
      write_chunk(&mut out, PngChunkTy::pHYs, |o| phys.write_payload(o))?;
    }
    write_chunk(&mut out, PngChunkTy::IDAT, |o| {
      o.write(&idat);
    })?;
    write_chunk(&mut out, PngChunkTy::IEND, |_| {})?;

    let png = out.finish();
    debug!("encoded {width}x{height} as {} bytes ({} bytes of IDAT)", png.len(), idat.len());
    Ok(png)
  }
}

/// Runs every row of the image through extraction, filtering, and
/// compression, giving the `IDAT` payload.
fn compress_image_data<S: PixelSource + ?Sized>(
  image: &S, color_type: PngColorType, filter: PngFilter, level: u8, batch_byte_limit: usize,
) -> PngResult<Vec<u8>> {
  let mut extractor = RowBatchExtractor::new(image, color_type, filter, batch_byte_limit)?;
  let bytes_per_scanline = extractor.bytes_per_scanline();
  let mut scanline_filter =
    ScanlineFilter::new(filter, color_type.channel_count(), bytes_per_scanline - 1);
  let mut compressor = IdatCompressor::new(level);
  while let Some(batch) = extractor.next_batch()? {
    if filter != PngFilter::None {
      for scanline in batch.chunks_exact_mut(bytes_per_scanline) {
        scanline_filter.filter_scanline(scanline);
      }
    }
    compressor.write(batch)?;
  }
  compressor.finish()
}
