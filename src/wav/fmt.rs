use std::io::Write;

use crate::{
    error::{WavClipError, WavClipResult},
    wav::{
        EXTENSIBLE_EXT_SIZE, FACT_CHUNK_SIZE, FormatTag, PCM_SUBFORMAT_GUID,
        chunks::{FACT_CHUNK, FMT_CHUNK},
        channel_mask,
        codec::read_field,
    },
};

/// The sixteen bytes shared by every fmt chunk body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtHeader {
    pub format_tag: FormatTag,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtHeader {
    /// Length of the base fmt body
    pub const SIZE: usize = 16;

    /// Parse a fmt body that starts at `base` within `bytes`.
    ///
    /// The format tag is read and checked before any other field, so an
    /// unknown tag is reported even when the rest of the header is missing.
    pub fn read_at(bytes: &[u8], base: usize) -> WavClipResult<Self> {
        let format_tag =
            FormatTag::try_from(u16::from_le_bytes(read_field(bytes, base, "format tag")?))?;

        Ok(FmtHeader {
            format_tag,
            channel_count: u16::from_le_bytes(read_field(bytes, base + 2, "channel count")?),
            sample_rate: u32::from_le_bytes(read_field(bytes, base + 4, "sample rate")?),
            byte_rate: u32::from_le_bytes(read_field(bytes, base + 8, "byte rate")?),
            block_align: u16::from_le_bytes(read_field(bytes, base + 12, "block align")?),
            bits_per_sample: u16::from_le_bytes(read_field(bytes, base + 14, "bits per sample")?),
        })
    }

    pub const fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    /// Frames in a payload of `data_length` bytes; zero when block align is zero
    pub const fn frames_for(&self, data_length: u32) -> u32 {
        match self.block_align {
            0 => 0,
            align => data_length / align as u32,
        }
    }

    /// Write the `fmt ` chunk, and for Extensible the extension plus `fact` chunk.
    pub fn write_chunks<W: Write>(&self, writer: &mut W, data_length: u32) -> WavClipResult<()> {
        writer.write_all(FMT_CHUNK.as_bytes())?;
        writer.write_all(&self.format_tag.fmt_chunk_size().to_le_bytes())?;
        writer.write_all(&self.format_tag.as_u16().to_le_bytes())?;
        writer.write_all(&self.channel_count.to_le_bytes())?;
        writer.write_all(&self.sample_rate.to_le_bytes())?;
        writer.write_all(&self.byte_rate.to_le_bytes())?;
        writer.write_all(&self.block_align.to_le_bytes())?;
        writer.write_all(&self.bits_per_sample.to_le_bytes())?;

        if self.format_tag == FormatTag::Extensible {
            let mask = channel_mask(self.channel_count);
            if mask == 0 {
                log::warn!(
                    "no standard speaker mask for {} channels, writing 0",
                    self.channel_count
                );
            }

            writer.write_all(&EXTENSIBLE_EXT_SIZE.to_le_bytes())?;
            writer.write_all(&self.bits_per_sample.to_le_bytes())?; // Valid bits per sample
            writer.write_all(&mask.to_le_bytes())?;
            writer.write_all(&PCM_SUBFORMAT_GUID)?;

            writer.write_all(FACT_CHUNK.as_bytes())?;
            writer.write_all(&FACT_CHUNK_SIZE.to_le_bytes())?;
            writer.write_all(&self.frames_for(data_length).to_le_bytes())?;
        }
        Ok(())
    }

    /// Validate the consistency of fmt fields
    ///
    /// Checks that:
    /// - no field is zero
    /// - bits_per_sample is byte-aligned
    /// - block_align = channels * bytes_per_sample
    /// - byte_rate = sample_rate * block_align
    pub fn validate_format_consistency(&self) -> WavClipResult<()> {
        let channels = self.channel_count;
        let sample_rate = self.sample_rate;
        let byte_rate = self.byte_rate;
        let block_align = self.block_align;
        let bits_per_sample = self.bits_per_sample;

        if channels == 0 {
            return Err(WavClipError::invalid_format("Channels cannot be zero"));
        }
        if sample_rate == 0 {
            return Err(WavClipError::invalid_format("Sample rate cannot be zero"));
        }
        if block_align == 0 {
            return Err(WavClipError::invalid_format("Block align cannot be zero"));
        }
        if bits_per_sample == 0 {
            return Err(WavClipError::invalid_format("Bits per sample cannot be zero"));
        }

        if !bits_per_sample.is_multiple_of(8) {
            return Err(WavClipError::invalid_format(format!(
                "Bits per sample {} is not byte-aligned",
                bits_per_sample
            )));
        }

        let expected_block_align = channels as u32 * (bits_per_sample / 8) as u32;
        if block_align as u32 != expected_block_align {
            return Err(WavClipError::invalid_format(format!(
                "Block align {} does not match expected {} (channels {} * bytes_per_sample {})",
                block_align,
                expected_block_align,
                channels,
                bits_per_sample / 8
            )));
        }

        let expected_byte_rate = sample_rate as u64 * block_align as u64;
        if byte_rate as u64 != expected_byte_rate {
            return Err(WavClipError::invalid_format(format!(
                "Byte rate {} does not match expected {} (sample_rate {} * block_align {})",
                byte_rate, expected_byte_rate, sample_rate, block_align
            )));
        }

        Ok(())
    }
}
