use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    error::{ClipShape, WavClipError, WavClipResult},
    traits::ClipMetadata,
    wav::{FormatTag, codec::decode, fmt::FmtHeader},
};

/// A decoded WAV clip: fmt fields plus the raw, uninterpreted sample payload.
///
/// Fields are public so a clip can be built directly; `data_length` must
/// equal `data.len()` for [`crate::encode`] and [`AudioClip::append`] to
/// accept it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub format_tag: FormatTag,
    pub channel_count: u16,
    pub sample_rate: u32,
    /// Average bytes per second, carried verbatim
    pub byte_rate: u32,
    /// Bytes per sample frame across all channels
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_length: u32,
    pub data: Vec<u8>,
}

impl AudioClip {
    /// Build a PCM clip, deriving block align and byte rate.
    ///
    /// Fails with [`WavClipError::PayloadTooLarge`] if `data` is longer than
    /// `u32::MAX` bytes.
    pub fn pcm(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        data: Vec<u8>,
    ) -> WavClipResult<Self> {
        Self::with_tag(FormatTag::Pcm, channels, sample_rate, bits_per_sample, data)
    }

    /// Build a WAVE_FORMAT_EXTENSIBLE clip, deriving block align and byte rate.
    pub fn extensible(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        data: Vec<u8>,
    ) -> WavClipResult<Self> {
        Self::with_tag(
            FormatTag::Extensible,
            channels,
            sample_rate,
            bits_per_sample,
            data,
        )
    }

    fn with_tag(
        format_tag: FormatTag,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        data: Vec<u8>,
    ) -> WavClipResult<Self> {
        let block_align = channels.saturating_mul(bits_per_sample.div_ceil(8));
        let data_length = payload_length(data.len())?;
        Ok(AudioClip {
            format_tag,
            channel_count: channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            data_length,
            data,
        })
    }

    pub(crate) fn from_parts(fmt: FmtHeader, data: Vec<u8>) -> Self {
        AudioClip {
            format_tag: fmt.format_tag,
            channel_count: fmt.channel_count,
            sample_rate: fmt.sample_rate,
            byte_rate: fmt.byte_rate,
            block_align: fmt.block_align,
            bits_per_sample: fmt.bits_per_sample,
            // Payload ranges come from a u32 size field
            data_length: data.len() as u32,
            data,
        }
    }

    /// The fmt fields of this clip
    pub const fn fmt_header(&self) -> FmtHeader {
        FmtHeader {
            format_tag: self.format_tag,
            channel_count: self.channel_count,
            sample_rate: self.sample_rate,
            byte_rate: self.byte_rate,
            block_align: self.block_align,
            bits_per_sample: self.bits_per_sample,
        }
    }

    /// Fields compared by [`AudioClip::is_compatible_with`]
    pub const fn shape(&self) -> ClipShape {
        ClipShape {
            channel_count: self.channel_count,
            bits_per_sample: self.bits_per_sample,
            sample_rate: self.sample_rate,
        }
    }

    /// True if `other` has the same channel count, bit depth and sample rate.
    ///
    /// The format tag is not compared: a PCM clip accepts an Extensible one.
    pub const fn is_compatible_with(&self, other: &AudioClip) -> bool {
        self.channel_count == other.channel_count
            && self.bits_per_sample == other.bits_per_sample
            && self.sample_rate == other.sample_rate
    }

    /// Size of the buffer [`crate::encode`] produces for this clip
    pub fn encoded_len(&self) -> usize {
        8 + self.format_tag.riff_overhead() as usize + self.data.len()
    }

    pub(crate) fn check_length(&self) -> WavClipResult<()> {
        payload_length(self.data.len())?;
        if self.data_length as usize != self.data.len() {
            return Err(WavClipError::LengthMismatch {
                declared: self.data_length,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Opt-in check that block align and byte rate agree with the other fmt fields
    pub fn validate_format_consistency(&self) -> WavClipResult<()> {
        self.fmt_header().validate_format_consistency()
    }

    /// Append the payload of `other` to this clip.
    ///
    /// Only `data` and `data_length` change; every other header field of
    /// `self` is left as it was. On error `self` is untouched.
    ///
    /// # Errors
    ///
    /// - [`WavClipError::IncompatibleClips`] if channel count, bit depth or sample rate differ
    /// - [`WavClipError::LengthMismatch`] if `other.data_length != other.data.len()`
    /// - [`WavClipError::PayloadTooLarge`] if the combined length overflows `u32`
    pub fn append(&mut self, other: &AudioClip) -> WavClipResult<()> {
        if !self.is_compatible_with(other) {
            return Err(WavClipError::IncompatibleClips {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        other.check_length()?;

        let data_length = self
            .data_length
            .checked_add(other.data_length)
            .ok_or(WavClipError::PayloadTooLarge {
                len: self.data_length as u64 + other.data_length as u64,
            })?;

        self.data.extend_from_slice(&other.data);
        self.data_length = data_length;

        log::debug!(
            "appended {} bytes, clip now holds {} bytes",
            other.data_length,
            self.data_length
        );
        Ok(())
    }

    /// Decode `bytes` and append the result; decode errors are returned unchanged.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> WavClipResult<()> {
        let other = decode(bytes)?;
        self.append(&other)
    }
}

/// Payload length as stored in the 32-bit size fields
fn payload_length(len: usize) -> WavClipResult<u32> {
    u32::try_from(len).map_err(|_| WavClipError::PayloadTooLarge { len: len as u64 })
}

impl ClipMetadata for AudioClip {
    fn fmt_header(&self) -> FmtHeader {
        AudioClip::fmt_header(self)
    }

    fn data_length(&self) -> u32 {
        self.data_length
    }
}

impl Display for AudioClip {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            writeln!(f, "AudioClip:")?;
            writeln!(f, "├─ Format: {:#}", self.format_tag)?;
            writeln!(f, "├─ Channels: {}", self.channel_count)?;
            writeln!(f, "├─ Sample Rate: {} Hz", self.sample_rate)?;
            writeln!(f, "├─ Bits per Sample: {}-bit", self.bits_per_sample)?;
            writeln!(f, "├─ Total Frames: {}", self.total_frames())?;
            write!(f, "└─ Payload: {} bytes", self.data_length)
        } else {
            write!(
                f,
                "AudioClip({}, {} ch, {} Hz, {}-bit, {} bytes)",
                self.format_tag,
                self.channel_count,
                self.sample_rate,
                self.bits_per_sample,
                self.data_length
            )
        }
    }
}
