use alloc::format;

use crate::encoder::{Encoder, EncoderParams};
use crate::error::{EncoderResult, EncodingError};
use crate::writer::JfifWrite;

#[cfg(feature = "std")]
use crate::encoder::validate_image;
#[cfg(feature = "std")]
use std::fs::File;
#[cfg(feature = "std")]
use std::io::BufWriter;
#[cfg(feature = "std")]
use std::path::Path;

/// Sink writing into a caller provided buffer
///
/// A write that does not fit into the remaining space is rejected as a whole.
pub struct MemorySink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> MemorySink<'a> {
    pub fn new(buf: &'a mut [u8]) -> MemorySink<'a> {
        MemorySink { buf, len: 0 }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The written part of the buffer
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl JfifWrite for MemorySink<'_> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), EncodingError> {
        let end = self.len + buf.len();

        if end > self.buf.len() {
            return Err(EncodingError::Write(format!(
                "Memory buffer too small: {} bytes needed, {} available",
                end,
                self.buf.len()
            )));
        }

        self.buf[self.len..end].copy_from_slice(buf);
        self.len = end;

        Ok(())
    }
}

/// Compresses a tightly packed image into `buf`
///
/// Returns the number of bytes used.
///
/// # Errors
///
/// Fails on invalid parameters, if `data` is too small for the dimensions, or if the
/// stream does not fit into `buf`.
pub fn compress_image_to_jpeg_memory(
    buf: &mut [u8],
    width: u16,
    height: u16,
    channels: u8,
    data: &[u8],
    params: EncoderParams,
) -> EncoderResult<usize> {
    let mut encoder = Encoder::new();
    encoder.init(MemorySink::new(buf), width, height, channels, params)?;
    encoder.encode(data)?;

    Ok(encoder.deinit().map_or(0, |sink| sink.len()))
}

/// Compresses a tightly packed image into a new file at `path`
///
/// # Errors
///
/// Parameters are checked before the file is created. File creation, write and
/// flush errors are returned as `IoError`.
#[cfg(feature = "std")]
pub fn compress_image_to_jpeg_file<P: AsRef<Path>>(
    path: P,
    width: u16,
    height: u16,
    channels: u8,
    data: &[u8],
    params: EncoderParams,
) -> EncoderResult<()> {
    validate_image(width, height, channels, &params)?;

    let file = File::create(path)?;

    let mut encoder = Encoder::new();
    encoder.init(BufWriter::new(file), width, height, channels, params)?;
    encoder.encode(data)?;

    if let Some(writer) = encoder.deinit() {
        let file = writer.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()?;
    }

    Ok(())
}
