//! Byte-level decode and encode of canonical PCM / Extensible WAV buffers.
//!
//! The canonical layout is the one [`encode`] produces:
//!
//! ```text
//! PCM                              Extensible
//! 0   RIFF <len + 36> WAVE         0   RIFF <len + 72> WAVE
//! 12  fmt  16 <16-byte body>       12  fmt  40 <16-byte body> <24-byte extension>
//! 36  data <len> <payload>         60  fact 4 <frame count>
//!                                  72  data <len> <payload>
//! ```
//!
//! [`decode`] reads header fields at these fixed offsets. Files with extra or
//! reordered chunks need [`HeaderLayout::ChunkScan`].

use std::{io::Write, ops::Range};

use crate::{
    error::{ErrorPosition, WavClipError, WavClipResult},
    types::{DecodeOptions, HeaderLayout},
    wav::{
        RIFF_PREAMBLE_SIZE,
        chunks::{ChunkDesc, ChunkID, DATA_CHUNK, FMT_CHUNK, RIFF_CHUNK, WAVE_CHUNK, scan_chunks},
        clip::AudioClip,
        fmt::FmtHeader,
    },
};

/// Offset of the fmt body in the canonical layout
const CANONICAL_FMT_OFFSET: usize = 20;

/// Read `N` bytes at `offset`, failing with [`WavClipError::Truncated`] when the buffer is too short.
pub(crate) fn read_field<const N: usize>(
    bytes: &[u8],
    offset: usize,
    what: &str,
) -> WavClipResult<[u8; N]> {
    let end = offset + N;
    bytes
        .get(offset..end)
        .and_then(|s| <[u8; N]>::try_from(s).ok())
        .ok_or_else(|| {
            WavClipError::truncated(
                end,
                bytes.len(),
                ErrorPosition::new(offset)
                    .with_description(format!("{} at byte offset {}", what, offset)),
            )
        })
}

fn check_preamble(bytes: &[u8]) -> WavClipResult<()> {
    if read_field::<4>(bytes, 0, "RIFF header")? != *RIFF_CHUNK.as_bytes() {
        return Err(WavClipError::invalid_container(
            "no RIFF header",
            ErrorPosition::new(0).with_description("RIFF header at start of buffer"),
        ));
    }
    if read_field::<4>(bytes, 8, "WAVE identifier")? != *WAVE_CHUNK.as_bytes() {
        return Err(WavClipError::invalid_container(
            "no RIFF header (missing WAVE identifier)",
            ErrorPosition::new(8).with_description("WAVE identifier after RIFF header"),
        ));
    }
    Ok(())
}

/// Header fields plus the payload range of a buffer, without copying the payload.
pub(crate) fn locate(
    bytes: &[u8],
    layout: HeaderLayout,
) -> WavClipResult<(FmtHeader, Range<usize>)> {
    check_preamble(bytes)?;
    match layout {
        HeaderLayout::Canonical => locate_canonical(bytes),
        HeaderLayout::ChunkScan => locate_scanned(bytes),
    }
}

fn locate_canonical(bytes: &[u8]) -> WavClipResult<(FmtHeader, Range<usize>)> {
    let fmt = FmtHeader::read_at(bytes, CANONICAL_FMT_OFFSET)?;
    let length_offset = fmt.format_tag.data_length_offset();
    let data_length = u32::from_le_bytes(read_field(bytes, length_offset, "data length")?);

    let start = fmt.format_tag.payload_offset();
    let end = start + data_length as usize;
    if end > bytes.len() {
        return Err(WavClipError::truncated(
            end,
            bytes.len(),
            ErrorPosition::new(start).with_description("sample payload"),
        ));
    }
    Ok((fmt, start..end))
}

fn locate_scanned(bytes: &[u8]) -> WavClipResult<(FmtHeader, Range<usize>)> {
    let chunks = scan_chunks(bytes)?;
    let find = |id: ChunkID, name: &str| -> WavClipResult<ChunkDesc> {
        chunks.iter().find(|c| c.id == id).cloned().ok_or_else(|| {
            WavClipError::invalid_container(
                format!(
                    "{} chunk not found, found chunks: {:?}",
                    name,
                    chunks.iter().map(|c| c.id.to_string()).collect::<Vec<_>>()
                ),
                ErrorPosition::new(RIFF_PREAMBLE_SIZE).with_description("chunk data section"),
            )
        })
    };

    let fmt_desc = find(FMT_CHUNK, "fmt")?;
    let fmt_range = fmt_desc.data_range();
    // Bound the fmt reads by the declared chunk size, not the whole buffer
    let fmt = FmtHeader::read_at(&bytes[..fmt_range.end], fmt_range.start)?;

    let data_desc = find(DATA_CHUNK, "data")?;
    Ok((fmt, data_desc.data_range()))
}

/// Decode a complete WAV buffer using the canonical fixed-offset layout.
pub fn decode(bytes: &[u8]) -> WavClipResult<AudioClip> {
    decode_with_options(bytes, DecodeOptions::default())
}

pub fn decode_with_options(bytes: &[u8], options: DecodeOptions) -> WavClipResult<AudioClip> {
    let (fmt, payload) = locate(bytes, options.layout)?;
    let clip = AudioClip::from_parts(fmt, bytes[payload].to_vec());

    if options.validate_format {
        clip.validate_format_consistency()?;
    }

    log::debug!(
        "decoded {} clip: {} ch, {} Hz, {}-bit, {} payload bytes",
        clip.format_tag,
        clip.channel_count,
        clip.sample_rate,
        clip.bits_per_sample,
        clip.data_length
    );
    Ok(clip)
}

/// Encode a clip into a new buffer in the canonical layout.
pub fn encode(clip: &AudioClip) -> WavClipResult<Vec<u8>> {
    let mut out = Vec::with_capacity(clip.encoded_len());
    encode_into(clip, &mut out)?;
    log::debug!("encoded {} clip into {} bytes", clip.format_tag, out.len());
    Ok(out)
}

/// Write a clip to `writer` in the canonical layout.
pub fn encode_into<W: Write>(clip: &AudioClip, mut writer: W) -> WavClipResult<()> {
    clip.check_length()?;

    let overhead = clip.format_tag.riff_overhead();
    let riff_size = clip
        .data_length
        .checked_add(overhead)
        .ok_or(WavClipError::PayloadTooLarge {
            len: clip.data_length as u64,
        })?;

    writer.write_all(RIFF_CHUNK.as_bytes())?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(WAVE_CHUNK.as_bytes())?;

    clip.fmt_header().write_chunks(&mut writer, clip.data_length)?;

    writer.write_all(DATA_CHUNK.as_bytes())?;
    writer.write_all(&clip.data_length.to_le_bytes())?;
    writer.write_all(&clip.data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::PCM_SUBFORMAT_GUID;

    fn pcm_clip(data: Vec<u8>) -> AudioClip {
        AudioClip::pcm(2, 44_100, 16, data).unwrap()
    }

    fn ext_clip(channels: u16, data: Vec<u8>) -> AudioClip {
        AudioClip::extensible(channels, 48_000, 16, data).unwrap()
    }

    fn le_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn le_u16(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    #[test]
    fn test_encode_pcm_layout() {
        let clip = pcm_clip((0..8).collect());
        let bytes = encode(&clip).unwrap();

        assert_eq!(bytes.len(), 44 + 8);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(le_u32(&bytes, 4), 8 + 36);
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(le_u32(&bytes, 16), 16);
        assert_eq!(le_u16(&bytes, 20), 0x0001);
        assert_eq!(le_u16(&bytes, 22), 2);
        assert_eq!(le_u32(&bytes, 24), 44_100);
        assert_eq!(le_u32(&bytes, 28), 176_400);
        assert_eq!(le_u16(&bytes, 32), 4);
        assert_eq!(le_u16(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(le_u32(&bytes, 40), 8);
        assert_eq!(&bytes[44..], &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_encode_extensible_layout() {
        let clip = ext_clip(2, vec![0u8; 40]);
        let bytes = encode(&clip).unwrap();

        assert_eq!(bytes.len(), 80 + 40);
        assert_eq!(le_u32(&bytes, 4), 40 + 72);
        assert_eq!(le_u32(&bytes, 16), 40);
        assert_eq!(le_u16(&bytes, 20), 0xFFFE);
        assert_eq!(le_u16(&bytes, 36), 22);
        assert_eq!(le_u16(&bytes, 38), 16);
        assert_eq!(le_u32(&bytes, 40), 0x0000_0003);
        assert_eq!(&bytes[44..60], &PCM_SUBFORMAT_GUID);
        assert_eq!(&bytes[60..64], b"fact");
        assert_eq!(le_u32(&bytes, 64), 4);
        assert_eq!(le_u32(&bytes, 68), 10);
        assert_eq!(&bytes[72..76], b"data");
        assert_eq!(le_u32(&bytes, 76), 40);
    }

    #[test]
    fn test_encode_channel_mask_six_channels() {
        let clip = ext_clip(6, vec![0u8; 24]);
        let bytes = encode(&clip).unwrap();
        assert_eq!(le_u32(&bytes, 40), 0x0000_003F);
        assert_eq!(le_u32(&bytes, 68), 2);
    }

    #[test]
    fn test_encode_unmapped_channel_count_writes_zero_mask() {
        let clip = ext_clip(3, vec![0u8; 12]);
        let bytes = encode(&clip).unwrap();
        assert_eq!(le_u32(&bytes, 40), 0);
        assert_eq!(decode(&bytes).unwrap(), clip);
    }

    #[test]
    fn test_encode_rejects_length_mismatch() {
        let mut clip = pcm_clip(vec![0u8; 8]);
        clip.data_length = 12;
        let err = encode(&clip).unwrap_err();
        assert!(matches!(
            err,
            WavClipError::LengthMismatch {
                declared: 12,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_roundtrip_pcm_and_extensible() {
        let pcm = pcm_clip((0..=255).collect());
        assert_eq!(decode(&encode(&pcm).unwrap()).unwrap(), pcm);

        let ext = ext_clip(8, (0..=255).cycle().take(1_024).collect());
        assert_eq!(decode(&encode(&ext).unwrap()).unwrap(), ext);
    }

    #[test]
    fn test_roundtrip_keeps_inconsistent_byte_rate() {
        let mut clip = pcm_clip(vec![9u8; 16]);
        clip.byte_rate = 12_345;
        let decoded = decode(&encode(&clip).unwrap()).unwrap();
        assert_eq!(decoded.byte_rate, 12_345);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let bytes = encode(&ext_clip(4, vec![7u8; 64])).unwrap();
        assert_eq!(decode(&bytes).unwrap(), decode(&bytes).unwrap());
    }

    #[test]
    fn test_decode_copies_payload() {
        let mut bytes = encode(&pcm_clip(vec![1, 2, 3, 4])).unwrap();
        let clip = decode(&bytes).unwrap();
        bytes.iter_mut().for_each(|b| *b = 0);
        drop(bytes);
        assert_eq!(clip.data, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_rejects_non_riff() {
        let mut bytes = encode(&pcm_clip(vec![0u8; 4])).unwrap();
        bytes[0..4].copy_from_slice(b"RIFX");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavClipError::InvalidContainer { .. }));
        assert!(err.to_string().contains("no RIFF header"));
    }

    #[test]
    fn test_decode_rejects_missing_wave() {
        let mut bytes = encode(&pcm_clip(vec![0u8; 4])).unwrap();
        bytes[8..12].copy_from_slice(b"AVI ");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavClipError::InvalidContainer { .. }));
        assert!(err.to_string().contains("no RIFF header"));
    }

    #[test]
    fn test_decode_rejects_unknown_format_tag() {
        let mut bytes = encode(&pcm_clip(vec![0u8; 4])).unwrap();
        bytes[20..22].copy_from_slice(&0x0003u16.to_le_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, WavClipError::UnsupportedFormat(0x0003)));
    }

    #[test]
    fn test_decode_short_buffers_are_truncated() {
        assert!(matches!(
            decode(&[]).unwrap_err(),
            WavClipError::Truncated { .. }
        ));
        assert!(matches!(
            decode(b"RIFF\0\0\0\0WAV").unwrap_err(),
            WavClipError::Truncated { .. }
        ));

        let bytes = encode(&pcm_clip(vec![0u8; 16])).unwrap();
        // Header intact, payload cut short
        let err = decode(&bytes[..50]).unwrap_err();
        match err {
            WavClipError::Truncated {
                needed, available, ..
            } => {
                assert_eq!(needed, 60);
                assert_eq!(available, 50);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Cut inside the fmt body
        assert!(matches!(
            decode(&bytes[..30]).unwrap_err(),
            WavClipError::Truncated { .. }
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let clip = pcm_clip(vec![5u8; 8]);
        let mut bytes = encode(&clip).unwrap();
        bytes.extend_from_slice(b"LIST\x04\0\0\0abcd");
        assert_eq!(decode(&bytes).unwrap(), clip);
    }

    #[test]
    fn test_chunk_scan_tolerates_extra_chunks() {
        let clip = pcm_clip((0..12).collect());
        let canonical = encode(&clip).unwrap();

        // Re-assemble with a LIST chunk between fmt and data
        let mut bytes = canonical[..36].to_vec();
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(b"INFOx\0");
        bytes.extend_from_slice(&canonical[36..]);

        let scanned = decode_with_options(&bytes, DecodeOptions::chunk_scan()).unwrap();
        assert_eq!(scanned, clip);
    }

    #[test]
    fn test_chunk_scan_reads_extensible() {
        let clip = ext_clip(6, vec![3u8; 36]);
        let bytes = encode(&clip).unwrap();
        let scanned = decode_with_options(&bytes, DecodeOptions::chunk_scan()).unwrap();
        assert_eq!(scanned, clip);
    }

    #[test]
    fn test_chunk_scan_requires_data_chunk() {
        let bytes = encode(&pcm_clip(vec![0u8; 4])).unwrap();
        let err = decode_with_options(&bytes[..36], DecodeOptions::chunk_scan()).unwrap_err();
        assert!(matches!(err, WavClipError::InvalidContainer { .. }));
        assert!(err.to_string().contains("data chunk not found"));
    }

    #[test]
    fn test_chunk_scan_bounds_fmt_by_chunk_size() {
        let canonical = encode(&pcm_clip(vec![0u8; 4])).unwrap();

        // A 12-byte fmt chunk: bits-per-sample lies outside the declared body
        let mut bytes = canonical[..12].to_vec();
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&12u32.to_le_bytes());
        bytes.extend_from_slice(&canonical[20..32]);
        bytes.extend_from_slice(&canonical[36..]);

        let err = decode_with_options(&bytes, DecodeOptions::chunk_scan()).unwrap_err();
        match err {
            WavClipError::Truncated { position, .. } => assert_eq!(position.offset, 32),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_validation_option() {
        let mut clip = pcm_clip(vec![0u8; 8]);
        clip.byte_rate = 1;
        let bytes = encode(&clip).unwrap();

        assert!(decode(&bytes).is_ok());
        let err = decode_with_options(&bytes, DecodeOptions::default().with_validation(true))
            .unwrap_err();
        assert!(err.to_string().contains("Byte rate 1 does not match"));
    }

    #[test]
    fn test_hound_reads_encoded_pcm() {
        let samples: Vec<i16> = (0..64).map(|i| (i * 97 - 3_000) as i16).collect();
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let bytes = encode(&pcm_clip(data)).unwrap();

        let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let read: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, samples);
    }

    #[test]
    fn test_decode_reads_hound_output() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [0i16, 1, -1, i16::MAX, i16::MIN] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let clip =
            decode_with_options(cursor.get_ref(), DecodeOptions::chunk_scan()).unwrap();
        assert_eq!(clip.channel_count, 1);
        assert_eq!(clip.sample_rate, 22_050);
        assert_eq!(clip.data_length, 10);
        assert_eq!(&clip.data[6..8], &i16::MAX.to_le_bytes());
    }
}
