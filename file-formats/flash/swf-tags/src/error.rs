//! Error types for the SWF tag codec

use std::io;
use thiserror::Error;

/// Result type alias for SWF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or patching an SWF container
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The envelope signature is not one of `FWS`, `CWS` or `ZWS`
    #[error("Unknown SWF signature: {}", String::from_utf8_lossy(found))]
    MalformedContainer {
        /// The three signature bytes found at the start of the input
        found: [u8; 3],
    },

    /// LZMA compressed container (`ZWS`)
    #[error("LZMA compression (ZWS) detected. This is not yet supported.")]
    UnsupportedEnvelope,

    /// Ran out of bytes in the middle of a structure
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        /// Offset into the buffer where the read started
        offset: usize,
        /// Number of bytes the structure requires
        needed: u64,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// The tag stream already contains an EnableTelemetry record
    #[error("SWF already has an EnableTelemetry tag")]
    AlreadyPatched,

    /// The tag stream is signed and cannot be modified
    #[error("Signed SWF files are not supported")]
    UnsupportedSigned,

    /// The stream ended without a FileAttributes record to insert after
    #[error("No FileAttributes tag found; telemetry tag was not inserted")]
    AnchorNotFound,

    /// The compressed body could not be inflated
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// The frame header preceding the tag stream is inconsistent
    #[error("Invalid frame header: {0}")]
    InvalidFrameHeader(String),

    /// The patched container does not fit the 32-bit length field
    #[error("Output size {0} exceeds the 32-bit SWF length field")]
    LengthOverflow(u64),
}

impl Error {
    /// Create a truncated stream error
    pub fn truncated(offset: usize, needed: u64, available: usize) -> Self {
        Error::TruncatedStream {
            offset,
            needed,
            available,
        }
    }

    /// Create a new Decompression error
    pub fn decompression<S: Into<String>>(msg: S) -> Self {
        Error::Decompression(msg.into())
    }

    /// Create a new InvalidFrameHeader error
    pub fn invalid_frame_header<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFrameHeader(msg.into())
    }

    /// Whether the error is a clean refusal rather than a failure.
    ///
    /// The caller should stop processing and leave the input untouched, but
    /// there is nothing wrong with the file itself.
    pub fn is_clean_abort(&self) -> bool {
        matches!(self, Error::UnsupportedEnvelope)
    }
}
