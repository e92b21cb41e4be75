#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for turning packed ARGB rasters into PNG data.
//!
//! You describe your image with the [`PixelSource`](image::PixelSource)
//! trait (or just put the pixels in a [`Bitmap`](image::Bitmap)), pick some
//! settings on a [`PngEncoder`](png::PngEncoder), and get back the bytes of a
//! complete PNG file.
//!
//! ```
//! # #[cfg(feature = "png")] {
//! use rasterpng::{image::Bitmap, png::PngEncoder};
//! let red_dot = Bitmap { width: 1, height: 1, pixels: vec![0xFF_FF0000_u32] };
//! let png: Vec<u8> = PngEncoder::new().encode(Some(&red_dot)).unwrap().unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! # }
//! ```
//!
//! The encoder only ever writes 8-bit truecolor data (with or without alpha),
//! which covers what you'd expect from any in-memory framebuffer.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod int_endian;
pub use int_endian::*;

pub mod image;

#[cfg(feature = "png")]
#[cfg_attr(docs_rs, doc(cfg(feature = "png")))]
pub mod png;
