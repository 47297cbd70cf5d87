//! # Baseline JPEG encoder
//!
//! Streaming encoder for 8 bit grayscale and RGB images producing baseline sequential
//! JFIF files with the standard Huffman tables.
//!
//! ## Feeding scanlines
//! ```
//! # use baseline_jpeg_encoder::EncodingError;
//! # pub fn main() -> Result<(), EncodingError> {
//! use baseline_jpeg_encoder::{Encoder, EncoderParams, Subsampling};
//!
//! // A 2x2 RGB image
//! let rows: [&[u8]; 2] = [&[255, 0, 0, 0, 255, 0], &[0, 0, 255, 255, 255, 255]];
//!
//! let params = EncoderParams {
//!     quality: 90,
//!     subsampling: Subsampling::R_4_4_4,
//!     no_chroma_discrimination: false,
//! };
//!
//! let mut output = Vec::new();
//! let mut encoder = Encoder::new();
//! encoder.init(&mut output, 2, 2, 3, params)?;
//!
//! for row in rows {
//!     encoder.feed(Some(row))?;
//! }
//! encoder.feed(None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Whole images
//! ```no_run
//! # use baseline_jpeg_encoder::EncodingError;
//! # pub fn main() -> Result<(), EncodingError> {
//! use baseline_jpeg_encoder::{compress_image_to_jpeg_file, EncoderParams};
//!
//! let data = [128u8; 16 * 16];
//! compress_image_to_jpeg_file("gray.jpeg", 16, 16, 1, &data, EncoderParams::new(75))?;
//! # Ok(())
//! # }
//! ```

#![no_std]
#![forbid(unsafe_code)]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;
extern crate core;

mod color_transform;
mod compress;
mod encoder;
mod error;
mod fdct;
mod huffman;
mod image_buffer;
mod marker;
mod quantization;
mod writer;

#[cfg(test)]
mod tests;

pub use compress::{compress_image_to_jpeg_memory, MemorySink};
pub use encoder::{ColorType, Encoder, EncoderParams, EncoderState, Subsampling};
pub use error::{EncoderResult, EncodingError};
pub use writer::JfifWrite;

#[cfg(feature = "std")]
pub use compress::compress_image_to_jpeg_file;

#[cfg(feature = "benchmark")]
pub use fdct::fdct;
