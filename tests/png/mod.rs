use png_decoder::{BitDepth, ColorType, Decoder, Unit};
use rasterpng::{
  image::{Bitmap, PixelFetchError, PixelSource},
  png::{png_crc, PngEncoder, PngFilter, PNG_SIGNATURE},
  PngEncodeError, RGB8, RGBA8,
};

/// A chunk as it sits in the file.
struct RawChunk<'b> {
  ty: [u8; 4],
  data: &'b [u8],
  declared_crc: u32,
}

/// Walks the chunks that follow the PNG signature.
struct RawChunkIter<'b>(&'b [u8]);
impl<'b> RawChunkIter<'b> {
  fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = RawChunk<'b>;
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = self.0.split_first_chunk::<4>()?;
    let len = u32::from_be_bytes(*len_bytes) as usize;
    let (ty, rest) = rest.split_first_chunk::<4>()?;
    if rest.len() < len {
      return None;
    }
    let (data, rest) = rest.split_at(len);
    let (crc_bytes, rest) = rest.split_first_chunk::<4>()?;
    self.0 = rest;
    Some(RawChunk { ty: *ty, data, declared_crc: u32::from_be_bytes(*crc_bytes) })
  }
}

/// Checks the overall layout and every CRC, giving the chunk tags in order.
fn check_structure(png: &[u8]) -> Vec<[u8; 4]> {
  assert_eq!(&png[..8], &PNG_SIGNATURE);
  let mut tags = Vec::new();
  let mut total = 8;
  for chunk in RawChunkIter::new(png) {
    let mut tagged = chunk.ty.to_vec();
    tagged.extend_from_slice(chunk.data);
    assert_eq!(png_crc(&tagged), chunk.declared_crc, "{:?}", chunk.ty);
    total += 12 + chunk.data.len();
    tags.push(chunk.ty);
  }
  assert_eq!(total, png.len(), "trailing bytes after the last chunk");
  assert_eq!(tags.first(), Some(b"IHDR"));
  assert_eq!(tags.last(), Some(b"IEND"));
  assert_eq!(tags.iter().filter(|t| *t == b"IDAT").count(), 1);
  tags
}

/// Decodes with an independent decoder, giving the 8-bit channel bytes.
fn decode(png: &[u8]) -> (u32, u32, ColorType, Vec<u8>) {
  let decoder = Decoder::new(png);
  let mut reader = decoder.read_info().unwrap();
  let mut buf = vec![0; reader.output_buffer_size()];
  let info = reader.next_frame(&mut buf).unwrap();
  assert_eq!(info.bit_depth, BitDepth::Eight);
  buf.truncate(info.buffer_size());
  (info.width, info.height, info.color_type, buf)
}

fn expected_bytes(pixels: &[u32], alpha: bool) -> Vec<u8> {
  let mut out = Vec::new();
  for &argb in pixels {
    if alpha {
      out.extend_from_slice(bytemuck::bytes_of(&RGBA8::from_argb(argb)));
    } else {
      out.extend_from_slice(bytemuck::bytes_of(&RGB8::from_argb(argb)));
    }
  }
  out
}

#[test]
fn test_two_by_two_scenario() {
  let image = Bitmap {
    width: 2,
    height: 2,
    pixels: vec![0xFFFF0000_u32, 0xFF00FF00, 0xFF0000FF, 0x80FFFFFF],
  };
  let mut encoder = PngEncoder::new();
  encoder.set_encode_alpha(true);
  encoder.set_filter(PngFilter::Sub);
  let png = encoder.encode(Some(&image)).unwrap().unwrap();
  assert_eq!(check_structure(&png), vec![*b"IHDR", *b"IDAT", *b"IEND"]);
  let (w, h, color_type, bytes) = decode(&png);
  assert_eq!((w, h, color_type), (2, 2, ColorType::Rgba));
  assert_eq!(
    bytes,
    vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 128]
  );
}

#[test]
fn test_two_by_two_stored_without_alpha() {
  let image = Bitmap {
    width: 2,
    height: 2,
    pixels: vec![
      RGB8 { r: 255, g: 0, b: 0 },
      RGB8 { r: 0, g: 255, b: 0 },
      RGB8 { r: 0, g: 0, b: 255 },
      RGB8 { r: 255, g: 255, b: 255 },
    ],
  };
  let mut encoder = PngEncoder::new();
  encoder.set_compression_level(0);
  let png = encoder.encode(Some(&image)).unwrap().unwrap();
  check_structure(&png);
  let (w, h, color_type, bytes) = decode(&png);
  assert_eq!((w, h, color_type), (2, 2, ColorType::Rgb));
  assert_eq!(bytes, vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);
}

#[test]
fn test_single_pixel() {
  let image = Bitmap { width: 1, height: 1, pixels: vec![0x12_345678_u32] };
  for filter in [PngFilter::None, PngFilter::Sub, PngFilter::Up] {
    let mut encoder = PngEncoder::new();
    encoder.set_filter(filter);
    let png = encoder.encode(Some(&image)).unwrap().unwrap();
    check_structure(&png);
    let (w, h, color_type, bytes) = decode(&png);
    assert_eq!((w, h, color_type), (1, 1, ColorType::Rgb));
    assert_eq!(bytes, vec![0x34, 0x56, 0x78], "{filter:?}");
  }
}

#[test]
fn test_random_images_round_trip() {
  for (width, height) in [(1, 7), (13, 1), (37, 29), (300, 5)] {
    let pixels = super::rand_argb((width * height) as usize);
    let image = Bitmap { width, height, pixels };
    for filter in [PngFilter::None, PngFilter::Sub, PngFilter::Up] {
      for level in [0, 6, 9] {
        for alpha in [false, true] {
          let mut encoder = PngEncoder::new();
          encoder.set_filter(filter);
          encoder.set_compression_level(level);
          encoder.set_encode_alpha(alpha);
          encoder.set_batch_byte_limit(512);
          let png = encoder.encode(Some(&image)).unwrap().unwrap();
          check_structure(&png);
          let (w, h, color_type, bytes) = decode(&png);
          let what = format!("{width}x{height} {filter:?} level:{level} alpha:{alpha}");
          assert_eq!((w, h), (width, height), "{what}");
          assert_eq!(color_type, if alpha { ColorType::Rgba } else { ColorType::Rgb }, "{what}");
          assert_eq!(bytes, expected_bytes(&image.pixels, alpha), "{what}");
        }
      }
    }
  }
}

#[test]
fn test_rgba8_bitmap_source() {
  let pixels: Vec<RGBA8> = super::rand_bytes(4 * 6 * 4)
    .chunks_exact(4)
    .map(|c| RGBA8 { r: c[0], g: c[1], b: c[2], a: c[3] })
    .collect();
  let image = Bitmap { width: 6, height: 4, pixels };
  let mut encoder = PngEncoder::new();
  encoder.set_filter(PngFilter::Up);
  let png = encoder.encode_with_alpha(Some(&image), true).unwrap().unwrap();
  let (_, _, _, bytes) = decode(&png);
  assert_eq!(bytes, bytemuck::cast_slice::<RGBA8, u8>(&image.pixels));
}

#[test]
fn test_physical_dimensions_reach_the_decoder() {
  let image = Bitmap { width: 3, height: 3, pixels: vec![0xFF_000000_u32; 9] };
  let mut encoder = PngEncoder::new();
  encoder.set_dpi(300, 72);
  let png = encoder.encode(Some(&image)).unwrap().unwrap();
  assert_eq!(check_structure(&png), vec![*b"IHDR", *b"pHYs", *b"IDAT", *b"IEND"]);
  let reader = Decoder::new(png.as_slice()).read_info().unwrap();
  let dims = reader.info().pixel_dims.unwrap();
  assert_eq!((dims.xppu, dims.yppu), (11811, 2835));
  assert_eq!(dims.unit, Unit::Meter);

  encoder.set_dpi(0, 0);
  let png = encoder.encode(Some(&image)).unwrap().unwrap();
  let reader = Decoder::new(png.as_slice()).read_info().unwrap();
  assert!(reader.info().pixel_dims.is_none());
}

#[test]
fn test_large_image_spans_many_batches() {
  let (width, height) = (1000, 300);
  let pixels = super::rand_argb(width * height);
  let image = Bitmap { width: width as u32, height: height as u32, pixels };
  let mut encoder = PngEncoder::new();
  encoder.set_filter(PngFilter::Up);
  encoder.set_compression_level(1);
  let png = encoder.encode(Some(&image)).unwrap().unwrap();
  let (_, _, _, bytes) = decode(&png);
  assert_eq!(bytes, expected_bytes(&image.pixels, false));
}

/// A source that computes its pixels instead of storing them.
struct Checkerboard {
  size: u32,
}
impl PixelSource for Checkerboard {
  fn width(&self) -> u32 {
    self.size
  }
  fn height(&self) -> u32 {
    self.size
  }
  fn fetch_argb(
    &self, x: u32, y: u32, width: u32, height: u32, out: &mut [u32],
  ) -> Result<(), PixelFetchError> {
    if x + width > self.size || y + height > self.size {
      return Err(PixelFetchError::OutOfBounds);
    }
    let coords = (y..y + height).flat_map(|py| (x..x + width).map(move |px| (px, py)));
    for ((px, py), o) in coords.zip(out.iter_mut()) {
      *o = if (px / 4 + py / 4) % 2 == 0 { 0xFF_FFFFFF } else { 0xFF_000000 };
    }
    Ok(())
  }
}

#[test]
fn test_custom_pixel_source() {
  let board = Checkerboard { size: 16 };
  let png = PngEncoder::new().encode(Some(&board)).unwrap().unwrap();
  let (w, h, _, bytes) = decode(&png);
  assert_eq!((w, h), (16, 16));
  assert_eq!(&bytes[..3], &[255, 255, 255]);
  assert_eq!(&bytes[4 * 3..4 * 3 + 3], &[0, 0, 0]);
}

#[test]
fn test_failed_source_is_an_error() {
  struct Refuses;
  impl PixelSource for Refuses {
    fn width(&self) -> u32 {
      10
    }
    fn height(&self) -> u32 {
      10
    }
    fn fetch_argb(
      &self, _: u32, _: u32, _: u32, _: u32, _: &mut [u32],
    ) -> Result<(), PixelFetchError> {
      Err(PixelFetchError::Aborted)
    }
  }
  let mut dest = Vec::new();
  let res = PngEncoder::new().encode_to_writer(Some(&Refuses), &mut dest);
  assert_eq!(res, Err(PngEncodeError::PixelAccess));
  assert!(dest.is_empty());
}

#[test]
fn test_encode_to_file() {
  let image = Bitmap { width: 4, height: 4, pixels: super::rand_argb(16) };
  let path = std::env::temp_dir().join(format!("rasterpng_test_{}.png", std::process::id()));
  let file = std::fs::File::create(&path).unwrap();
  let written = PngEncoder::new().encode_to_writer(Some(&image), file).unwrap().unwrap();
  let on_disk = std::fs::read(&path).unwrap();
  std::fs::remove_file(&path).ok();
  assert_eq!(written, on_disk.len());
  let (_, _, _, bytes) = decode(&on_disk);
  assert_eq!(bytes, expected_bytes(&image.pixels, false));
}

#[test]
fn test_chunk_iter_no_panics() {
  // random data should never panic the walker
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in RawChunkIter::new(&v) {}
  }
}
