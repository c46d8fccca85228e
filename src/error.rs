use core::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use thiserror::Error;

/// Result type for wav_clip_io operations
#[allow(clippy::result_large_err)]
pub type WavClipResult<T> = Result<T, WavClipError>;

/// Header triple compared when appending one clip to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipShape {
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
}

impl Display for ClipShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} ch, {}-bit, {} Hz",
            self.channel_count, self.bits_per_sample, self.sample_rate
        )
    }
}

/// Error type for decoding, encoding and appending WAV clips
#[derive(Debug, Error)]
pub enum WavClipError {
    /// The buffer is not a RIFF/WAVE container, or lacks a required chunk
    #[error("Invalid container at {position}: {details}")]
    InvalidContainer {
        details: String,
        position: ErrorPosition,
    },

    /// Format tag other than PCM (0x0001) or WAVE_FORMAT_EXTENSIBLE (0xFFFE)
    #[error("Unsupported format tag 0x{0:04X}")]
    UnsupportedFormat(u16),

    #[error("Clips are not compatible: expected {expected}, found {found}")]
    IncompatibleClips { expected: ClipShape, found: ClipShape },

    /// The buffer ends before a header field or the payload
    #[error("Truncated input at {position}: needed {needed} bytes, only {available} available")]
    Truncated {
        needed: usize,
        available: usize,
        position: ErrorPosition,
    },

    #[error("Declared data length {declared} does not match payload length {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("Payload of {len} bytes does not fit a 32-bit RIFF size field")]
    PayloadTooLarge { len: u64 },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Reader/writer errors from the `std::io` adapters
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Position information for errors that occur during parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Byte offset in the buffer where the error occurred
    pub offset: usize,
    /// Human-readable description of the position
    pub description: String,
}

impl ErrorPosition {
    /// Create a new error position at the given byte offset
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            description: format!("byte offset {}", offset),
        }
    }

    /// Set a custom description for the error position
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Display for ErrorPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.description)
    }
}

impl WavClipError {
    /// Create an InvalidContainer error with position information
    pub fn invalid_container(details: impl Into<String>, position: ErrorPosition) -> Self {
        WavClipError::InvalidContainer {
            details: details.into(),
            position,
        }
    }

    pub fn truncated(needed: usize, available: usize, position: ErrorPosition) -> Self {
        WavClipError::Truncated {
            needed,
            available,
            position,
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        WavClipError::InvalidFormat(message.into())
    }
}
