use alloc::collections::TryReserveError;
use alloc::string::String;
use core::fmt::Display;

/// # The error type for encoding
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodingError {
    /// Width or height is zero
    ZeroImageDimensions { width: u16, height: u16 },

    /// Source images must have 1 (grayscale) or 3 (RGB) channels
    InvalidChannelCount(u8),

    /// Quality must be between 1 and 100
    InvalidQuality(u8),

    /// Scanline or image data is shorter than the declared dimensions require
    BadImageData { length: usize, required: usize },

    /// More scanlines were fed than the declared image height
    TooManyScanlines { height: u16 },

    /// Huffman bit-length specification does not describe a valid code
    InvalidHuffmanTable,

    /// A per-image buffer or table could not be allocated
    AllocationFailure,

    /// The encoder has not been initialized with an image
    NotInitialized,

    /// The image was already finished
    AlreadyFinished,

    /// A previous sink write failed and the stream was abandoned
    StreamFailed,

    /// The sink rejected a write
    Write(String),

    #[cfg(feature = "std")]
    IoError(std::io::Error),
}

/// Result alias used throughout the encoder
pub type EncoderResult<T> = Result<T, EncodingError>;

impl EncodingError {
    /// True for errors that abandon the current stream
    pub fn is_sink_failure(&self) -> bool {
        match self {
            EncodingError::Write(_) | EncodingError::StreamFailed => true,
            #[cfg(feature = "std")]
            EncodingError::IoError(_) => true,
            _ => false,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for EncodingError {
    fn from(err: std::io::Error) -> EncodingError {
        EncodingError::IoError(err)
    }
}

impl From<TryReserveError> for EncodingError {
    fn from(_: TryReserveError) -> EncodingError {
        EncodingError::AllocationFailure
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use EncodingError::*;
        match self {
            ZeroImageDimensions { width, height } => {
                write!(f, "Image dimensions must be non zero, got {}x{}", width, height)
            }
            InvalidChannelCount(channels) => {
                write!(f, "Invalid channel count: {} (must be 1 or 3)", channels)
            }
            InvalidQuality(quality) => write!(f, "Invalid quality: {} (must be 1-100)", quality),
            BadImageData { length, required } => write!(
                f,
                "Image data too small for dimensions and color_type ({} need at least {})",
                length, required
            ),
            TooManyScanlines { height } => {
                write!(f, "More than {} scanlines fed to encoder", height)
            }
            InvalidHuffmanTable => write!(f, "Invalid Huffman table specification"),
            AllocationFailure => write!(f, "Memory allocation failed"),
            NotInitialized => write!(f, "Encoder is not initialized"),
            AlreadyFinished => write!(f, "Image was already finished"),
            StreamFailed => write!(f, "Stream abandoned after an earlier write failure"),
            Write(err) => write!(f, "{}", err),
            #[cfg(feature = "std")]
            IoError(err) => err.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodingError::IoError(err) => Some(err),
            _ => None,
        }
    }
}
