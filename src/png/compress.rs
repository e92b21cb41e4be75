use alloc::{boxed::Box, vec, vec::Vec};

use miniz_oxide::deflate::core::{
  compress, create_comp_flags_from_zip_params, CompressorOxide, TDEFLFlush, TDEFLStatus,
};

use crate::{PngEncodeError, PngResult};

/// Bytes of compressor output moved into the result per step.
const STAGING_LEN: usize = 32 * 1024;

/// zlib window size as a power of two, and positive so a zlib header is
/// written.
const ZLIB_WINDOW_BITS: i32 = 15;

/// Default strategy.
const STRATEGY: i32 = 0;

/// One zlib stream that collects the filtered scanlines of an image.
///
/// Scanlines go in with [`write`](Self::write) as they're produced, in row
/// order, and [`finish`](Self::finish) ends the stream and gives back the
/// complete `IDAT` payload.
pub struct IdatCompressor {
  compressor: Box<CompressorOxide>,
  staging: Vec<u8>,
  compressed: Vec<u8>,
  level: u8,
  total_in: usize,
}
impl core::fmt::Debug for IdatCompressor {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("IdatCompressor")
      .field("level", &self.level)
      .field("total_in", &self.total_in)
      .field("compressed", &self.compressed.len())
      .finish()
  }
}
impl IdatCompressor {
  /// Starts a stream at the given level.
  ///
  /// Level 0 writes stored (uncompressed) deflate blocks, 9 is the slowest
  /// and smallest. Levels above 9 act like 9.
  #[must_use]
  pub fn new(level: u8) -> Self {
    let level = level.min(9);
    let flags = create_comp_flags_from_zip_params(i32::from(level), ZLIB_WINDOW_BITS, STRATEGY);
    Self {
      compressor: Box::new(CompressorOxide::new(flags)),
      staging: vec![0; STAGING_LEN],
      compressed: Vec::new(),
      level,
      total_in: 0,
    }
  }

  /// The compression level of this stream.
  #[inline]
  #[must_use]
  pub const fn level(&self) -> u8 {
    self.level
  }

  /// Number of uncompressed bytes taken in so far.
  #[inline]
  #[must_use]
  pub const fn total_in(&self) -> usize {
    self.total_in
  }

  /// Adds more bytes to the stream.
  ///
  /// ## Failure
  /// * The compressor reported an error status.
  pub fn write(&mut self, bytes: &[u8]) -> PngResult<()> {
    self.total_in += bytes.len();
    self.pump(bytes, TDEFLFlush::None)
  }

  /// Ends the stream, giving the whole zlib stream.
  ///
  /// ## Failure
  /// * The compressor reported an error status.
  pub fn finish(mut self) -> PngResult<Vec<u8>> {
    self.pump(&[], TDEFLFlush::Finish)?;
    Ok(self.compressed)
  }

  fn pump(&mut self, mut input: &[u8], flush: TDEFLFlush) -> PngResult<()> {
    let finishing = matches!(flush, TDEFLFlush::Finish);
    loop {
      let (status, consumed, written) =
        compress(&mut self.compressor, input, &mut self.staging, flush);
      self.compressed.extend_from_slice(&self.staging[..written]);
      input = &input[consumed..];
      match status {
        TDEFLStatus::Done => return Ok(()),
        TDEFLStatus::Okay => {
          // a full staging buffer means there might be more output waiting
          let staging_full = written == self.staging.len();
          if input.is_empty() && !staging_full && !finishing {
            return Ok(());
          }
        }
        _ => return Err(PngEncodeError::Compression),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use miniz_oxide::inflate::decompress_to_vec_zlib;

  fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 ^ (i / 7) as u8).collect()
  }

  #[test]
  fn test_pieces_make_one_stream() {
    let data = sample(200_000);
    for level in [0, 1, 6, 9] {
      let mut c = IdatCompressor::new(level);
      for piece in data.chunks(7919) {
        c.write(piece).unwrap();
      }
      assert_eq!(c.total_in(), data.len());
      let zlib = c.finish().unwrap();
      assert_eq!(zlib[0] & 0x0F, 8, "deflate method, level {level}");
      assert_eq!(u16::from_be_bytes([zlib[0], zlib[1]]) % 31, 0, "header check, level {level}");
      assert_eq!(decompress_to_vec_zlib(&zlib).unwrap(), data, "level {level}");
    }
  }

  #[test]
  fn test_piece_sizes_do_not_change_output() {
    let data = sample(50_000);
    let mut whole = IdatCompressor::new(9);
    whole.write(&data).unwrap();
    let mut split = IdatCompressor::new(9);
    for piece in data.chunks(333) {
      split.write(piece).unwrap();
    }
    assert_eq!(whole.finish().unwrap(), split.finish().unwrap());
  }

  #[test]
  fn test_level_zero_is_stored() {
    let data = sample(1000);
    let mut c = IdatCompressor::new(0);
    c.write(&data).unwrap();
    let zlib = c.finish().unwrap();
    // stored blocks can't be smaller than the input
    assert!(zlib.len() > data.len());
    assert_eq!(decompress_to_vec_zlib(&zlib).unwrap(), data);
  }

  #[test]
  fn test_empty_stream() {
    let zlib = IdatCompressor::new(6).finish().unwrap();
    assert!(decompress_to_vec_zlib(&zlib).unwrap().is_empty());
  }

  #[test]
  fn test_level_is_clamped() {
    assert_eq!(IdatCompressor::new(200).level(), 9);
  }
}
