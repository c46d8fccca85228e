pub mod chunks;
pub mod clip;
pub mod codec;
pub mod fmt;
use core::fmt::{Display, Formatter, Result as FmtResult};
pub use clip::AudioClip;
pub use codec::{decode, decode_with_options, encode, encode_into};

use crate::error::WavClipError;

/// Size of the `RIFF <size> WAVE` preamble
pub const RIFF_PREAMBLE_SIZE: usize = 12;

/// fmt chunk body size for plain PCM
pub const PCM_FMT_SIZE: u32 = 16;
/// fmt chunk body size for WAVE_FORMAT_EXTENSIBLE
pub const EXTENSIBLE_FMT_SIZE: u32 = 40;
/// cbSize of the WAVE_FORMAT_EXTENSIBLE extension
pub const EXTENSIBLE_EXT_SIZE: u16 = 22;
/// Body size of the fact chunk (one u32 frame count)
pub const FACT_CHUNK_SIZE: u32 = 4;

/// Offset of the `data` chunk size field in a canonical PCM file
pub const PCM_DATA_LENGTH_OFFSET: usize = 40;
/// Offset of the `data` chunk size field in a canonical Extensible file
pub const EXTENSIBLE_DATA_LENGTH_OFFSET: usize = 76;

/// KSDATAFORMAT_SUBTYPE_PCM, written byte for byte
pub const PCM_SUBFORMAT_GUID: [u8; 16] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
];

/// WAV format codes (wFormatTag) understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// PCM (uncompressed)
    Pcm,
    /// WAVE_FORMAT_EXTENSIBLE
    Extensible,
}

impl FormatTag {
    /// Canonical numeric WAV format tag
    pub const fn as_u16(self) -> u16 {
        match self {
            FormatTag::Pcm => 0x0001,
            FormatTag::Extensible => 0xFFFE,
        }
    }

    pub const fn const_from(code: u16) -> Option<Self> {
        match code {
            0x0001 => Some(FormatTag::Pcm),
            0xFFFE => Some(FormatTag::Extensible),
            _ => None,
        }
    }

    /// Short symbolic name
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatTag::Pcm => "PCM",
            FormatTag::Extensible => "EXTENSIBLE",
        }
    }

    /// Human-readable description
    pub const fn description(self) -> &'static str {
        match self {
            FormatTag::Pcm => "Uncompressed PCM",
            FormatTag::Extensible => "WAVE_FORMAT_EXTENSIBLE container",
        }
    }

    /// Size of the fmt chunk body this codec writes for the tag
    pub const fn fmt_chunk_size(self) -> u32 {
        match self {
            FormatTag::Pcm => PCM_FMT_SIZE,
            FormatTag::Extensible => EXTENSIBLE_FMT_SIZE,
        }
    }

    /// Bytes between the RIFF size field and the payload, excluding the payload itself.
    ///
    /// This is the value added to `data_length` in the RIFF size field.
    pub const fn riff_overhead(self) -> u32 {
        match self {
            FormatTag::Pcm => 36,
            FormatTag::Extensible => 72,
        }
    }

    /// Offset of the `data` size field in the canonical layout
    pub const fn data_length_offset(self) -> usize {
        match self {
            FormatTag::Pcm => PCM_DATA_LENGTH_OFFSET,
            FormatTag::Extensible => EXTENSIBLE_DATA_LENGTH_OFFSET,
        }
    }

    /// Offset of the first payload byte in the canonical layout
    pub const fn payload_offset(self) -> usize {
        self.data_length_offset() + 4
    }
}

impl TryFrom<u16> for FormatTag {
    type Error = WavClipError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        FormatTag::const_from(code).ok_or(WavClipError::UnsupportedFormat(code))
    }
}

impl From<FormatTag> for u16 {
    fn from(val: FormatTag) -> Self {
        val.as_u16()
    }
}

impl Display for FormatTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            write!(f, "{}", self.description())
        } else {
            write!(f, "{}", self.as_str())
        }
    }
}

/// Standard speaker-position mask for a channel count.
///
/// Counts without a standard layout map to 0.
pub const fn channel_mask(channels: u16) -> u32 {
    match channels {
        1 => 0x4,
        2 => 0x3,
        4 => 0x33,
        6 => 0x3F,
        8 => 0x63F,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag_codes() {
        assert_eq!(FormatTag::Pcm.as_u16(), 0x0001);
        assert_eq!(FormatTag::Extensible.as_u16(), 0xFFFE);
        assert_eq!(FormatTag::try_from(0x0001).unwrap(), FormatTag::Pcm);
        assert_eq!(FormatTag::try_from(0xFFFE).unwrap(), FormatTag::Extensible);
    }

    #[test]
    fn test_format_tag_rejects_float() {
        let err = FormatTag::try_from(0x0003).unwrap_err();
        assert!(matches!(err, WavClipError::UnsupportedFormat(0x0003)));
    }

    #[test]
    fn test_format_tag_display() {
        assert_eq!(format!("{}", FormatTag::Extensible), "EXTENSIBLE");
        assert_eq!(format!("{:#}", FormatTag::Pcm), "Uncompressed PCM");
    }

    #[test]
    fn test_canonical_offsets() {
        assert_eq!(FormatTag::Pcm.payload_offset(), 44);
        assert_eq!(FormatTag::Extensible.payload_offset(), 80);
        // RIFF size = file length - 8
        assert_eq!(FormatTag::Pcm.riff_overhead() as usize, 44 - 8);
        assert_eq!(FormatTag::Extensible.riff_overhead() as usize, 80 - 8);
    }

    #[test]
    fn test_channel_mask_table() {
        assert_eq!(channel_mask(1), 0x4);
        assert_eq!(channel_mask(2), 0x3);
        assert_eq!(channel_mask(4), 0x33);
        assert_eq!(channel_mask(6), 0x3F);
        assert_eq!(channel_mask(8), 0x63F);
        assert_eq!(channel_mask(3), 0);
        assert_eq!(channel_mask(0), 0);
    }
}
