const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

/// A running CRC32 (the ISO-HDLC / IEEE one that PNG uses).
///
/// ```
/// # use rasterpng::png::Crc32;
/// let mut crc = Crc32::new();
/// crc.update(b"IEND");
/// assert_eq!(crc.finalize(), 0xAE42_6082);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32(u32);
impl Default for Crc32 {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self::new()
  }
}
impl Crc32 {
  /// A fresh accumulator.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self(u32::MAX)
  }

  /// Puts the accumulator back to the fresh state.
  #[inline]
  pub fn reset(&mut self) {
    self.0 = u32::MAX;
  }

  /// Runs more bytes through the checksum.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) {
    let mut crc = self.0;
    for byte in bytes.iter().copied() {
      let i = (crc ^ u32::from(byte)) as u8 as usize;
      crc = CRC_TABLE[i] ^ (crc >> 8);
    }
    self.0 = crc;
  }

  /// The checksum of all bytes seen since creation or the last reset.
  ///
  /// This doesn't consume or alter the accumulator.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.0 ^ u32::MAX
  }
}

/// The CRC32 of a single byte slice.
#[inline]
#[must_use]
pub fn png_crc(bytes: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(bytes);
  crc.finalize()
}

#[test]
fn test_crc32_check_value() {
  assert_eq!(png_crc(b"123456789"), 0xCBF4_3926);
  assert_eq!(png_crc(&[]), 0);
}

#[test]
fn test_crc32_update_in_pieces_and_reset() {
  let mut crc = Crc32::new();
  crc.update(b"1234");
  crc.update(b"");
  crc.update(b"56789");
  assert_eq!(crc.finalize(), 0xCBF4_3926);
  crc.reset();
  assert_eq!(crc, Crc32::default());
  crc.update(b"IEND");
  assert_eq!(crc.finalize(), 0xAE42_6082);
}
