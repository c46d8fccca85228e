use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    traits::ClipMetadata,
    wav::{chunks::ChunkID, fmt::FmtHeader},
};

/// How header fields are located in an input buffer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Fixed byte offsets of the layout this crate writes.
    ///
    /// Extra or reordered chunks are not detected and yield wrong fields.
    #[default]
    Canonical,
    /// Walk the RIFF sub-chunks and read `fmt ` and `data` wherever they are
    ChunkScan,
}

/// Options for [`crate::decode_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub layout: HeaderLayout,
    /// Reject headers whose block align / byte rate disagree with the other fields
    pub validate_format: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            layout: HeaderLayout::Canonical,
            validate_format: false,
        }
    }
}

impl DecodeOptions {
    pub fn chunk_scan() -> Self {
        DecodeOptions {
            layout: HeaderLayout::ChunkScan,
            ..Default::default()
        }
    }

    pub const fn with_layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    pub const fn with_validation(mut self, validate_format: bool) -> Self {
        self.validate_format = validate_format;
        self
    }
}

/// Header summary of a WAV buffer, produced without copying the payload
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub fmt: FmtHeader,
    /// Payload size in bytes
    pub data_length: u32,
    /// Chunk ids in file order, after the RIFF/WAVE preamble
    pub available_chunks: Vec<ChunkID>,
}

impl ClipMetadata for ClipInfo {
    fn fmt_header(&self) -> FmtHeader {
        self.fmt
    }

    fn data_length(&self) -> u32 {
        self.data_length
    }
}

impl Display for ClipInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let duration = self.duration();
        if !f.alternate() {
            return write!(
                f,
                "{} | {} Hz, {} ch, {}-bit, {:.2} s",
                self.fmt.format_tag,
                self.fmt.sample_rate,
                self.fmt.channel_count,
                self.fmt.bits_per_sample,
                duration.as_secs_f32()
            );
        }

        let chunks: Vec<String> = self.available_chunks.iter().map(|c| c.to_string()).collect();
        writeln!(f, "Clip Info:")?;
        writeln!(f, "├─ Format: {:#}", self.fmt.format_tag)?;
        writeln!(f, "├─ Sample Rate: {} Hz", self.fmt.sample_rate)?;
        writeln!(f, "├─ Channels: {}", self.fmt.channel_count)?;
        writeln!(f, "├─ Bits per Sample: {}-bit", self.fmt.bits_per_sample)?;
        writeln!(f, "├─ Block Align: {} bytes", self.fmt.block_align)?;
        writeln!(f, "├─ Byte Rate: {} bytes/s", self.fmt.byte_rate)?;
        writeln!(f, "├─ Data Length: {} bytes", self.data_length)?;
        writeln!(f, "├─ Total Frames: {}", self.total_frames())?;
        writeln!(f, "├─ Chunks: {}", chunks.join(", "))?;
        writeln!(f, "└─ Duration: {:.2} s", duration.as_secs_f32())
    }
}
