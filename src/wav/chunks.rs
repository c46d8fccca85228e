use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{ErrorPosition, WavClipError, WavClipResult};

/// FourCC chunk identifier wrapper -- does not own the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkID {
    pub id: [u8; 4],
}

impl Display for ChunkID {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match core::str::from_utf8(&self.id) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(
                f,
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.id[0], self.id[1], self.id[2], self.id[3]
            ),
        }
    }
}

impl ChunkID {
    #[inline]
    pub const fn new(id: &[u8; 4]) -> Self {
        ChunkID { id: *id }
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.id
    }
}

/// Lightweight description of a RIFF/WAV sub-chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDesc {
    pub id: ChunkID,
    /// Offset of the chunk header
    pub offset: usize,
    /// Logical size of the chunk data (excluding header and padding)
    pub logical_size: usize,
    /// Total size including header and padding
    pub total_size: usize,
}

impl ChunkDesc {
    /// Returns the range of bytes containing the logical chunk data (no header, no padding)
    #[inline]
    pub const fn data_range(&self) -> std::ops::Range<usize> {
        let start = self.offset + 8;
        start..(start + self.logical_size)
    }
}

pub const RIFF_CHUNK: ChunkID = ChunkID::new(b"RIFF");
pub const WAVE_CHUNK: ChunkID = ChunkID::new(b"WAVE");
pub const FMT_CHUNK: ChunkID = ChunkID::new(b"fmt ");
pub const FACT_CHUNK: ChunkID = ChunkID::new(b"fact");
pub const DATA_CHUNK: ChunkID = ChunkID::new(b"data");

/// Walk the sub-chunks following the 12-byte RIFF/WAVE preamble.
///
/// Odd-sized chunks are followed by one pad byte. A trailing fragment shorter
/// than a chunk header is ignored; a chunk whose body runs past the end of the
/// buffer is reported as [`WavClipError::Truncated`].
pub fn scan_chunks(bytes: &[u8]) -> WavClipResult<Vec<ChunkDesc>> {
    match walk_chunks(bytes) {
        (chunks, None) => Ok(chunks),
        (_, Some(err)) => Err(err),
    }
}

/// Like [`scan_chunks`], but stops quietly at the first chunk that runs past
/// the end of the buffer and returns the chunks before it.
pub fn list_chunks(bytes: &[u8]) -> Vec<ChunkDesc> {
    let (chunks, overrun) = walk_chunks(bytes);
    if let Some(err) = overrun {
        log::trace!("chunk listing stopped early: {}", err);
    }
    chunks
}

fn walk_chunks(bytes: &[u8]) -> (Vec<ChunkDesc>, Option<WavClipError>) {
    let mut chunks = Vec::new();
    let mut offset = crate::wav::RIFF_PREAMBLE_SIZE;

    while offset + 8 <= bytes.len() {
        let id = ChunkID::new(&[
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]);
        let size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let padded = size + (size & 1);
        let total_size = 8 + padded;
        let body_end = offset + 8 + size;

        if body_end > bytes.len() {
            let err = WavClipError::truncated(
                body_end,
                bytes.len(),
                ErrorPosition::new(offset).with_description(format!("chunk '{}'", id)),
            );
            return (chunks, Some(err));
        }

        log::trace!("chunk '{}' at offset {} ({} bytes)", id, offset, size);
        chunks.push(ChunkDesc {
            id,
            offset,
            logical_size: size,
            total_size,
        });

        offset += total_size;
    }

    (chunks, None)
}
