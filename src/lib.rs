//! Decode, encode and concatenate WAV clips.
//!
//! Two format tags are supported: PCM (`0x0001`) and WAVE_FORMAT_EXTENSIBLE
//! (`0xFFFE`). A decoded [`AudioClip`] carries the fmt fields verbatim plus
//! an owned copy of the raw sample payload; nothing is converted.
//!
//! ```
//! use wav_clip_io::{AudioClip, append, decode, encode};
//!
//! let first = AudioClip::pcm(2, 44_100, 16, vec![0u8; 400])?;
//! let second = AudioClip::pcm(2, 44_100, 16, vec![1u8; 400])?;
//!
//! let mut clip = decode(&encode(&first)?)?;
//! append(&mut clip, &second)?;
//! assert_eq!(clip.data_length, 800);
//! # Ok::<(), wav_clip_io::WavClipError>(())
//! ```

// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms
#![allow(clippy::result_large_err)] // Allow large error types for comprehensive error handling
#![allow(clippy::missing_const_for_fn)] // Functions may need mutations in the future
#![allow(clippy::collapsible_if)] // Sometimes clearer to have separate conditions
#![allow(clippy::missing_panics_doc)] // Panics are converted to proper errors where needed
#![allow(clippy::needless_borrows_for_generic_args)] // Sometimes clearer with explicit borrows
#![allow(clippy::if_same_then_else)] // Similar blocks may diverge in the future
#![allow(clippy::unnecessary_cast)] // Explicit casts for clarity
#![allow(clippy::identity_op)] // Explicit operations for clarity

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::box_collection)] // Warns on boxed `Vec`, `String`, etc.
#![warn(clippy::vec_box)] // Avoids using `Vec<Box<T>>` when unnecessary
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`
#![warn(clippy::panic)] // Avoids using `panic!` in production code

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`

pub mod error;
pub mod traits;
pub mod types;
pub mod wav;

use std::io::{BufWriter, Read, Write};

pub use crate::{
    error::{ClipShape, ErrorPosition, WavClipError, WavClipResult},
    traits::ClipMetadata,
    types::{ClipInfo, DecodeOptions, HeaderLayout},
    wav::{AudioClip, FormatTag, decode, decode_with_options, encode, encode_into},
};

/// Largest buffer a RIFF size field can describe, including the 8-byte RIFF header
pub(crate) const MAX_WAV_SIZE: u64 = u32::MAX as u64 + 8;

// Public API

/// Append `other` to `target`; see [`AudioClip::append`].
pub fn append(target: &mut AudioClip, other: &AudioClip) -> WavClipResult<()> {
    target.append(other)
}

/// Decode `bytes` and append them to `target`; see [`AudioClip::append_bytes`].
pub fn append_bytes(target: &mut AudioClip, bytes: &[u8]) -> WavClipResult<()> {
    target.append_bytes(bytes)
}

/// Header summary of a buffer in the canonical layout
///
/// Performs the same checks as [`decode`] but does not copy the payload, and
/// additionally lists the chunks present in the buffer. The listing stops at
/// the first chunk that runs past the end of the buffer, so trailing bytes
/// that [`decode`] ignores never turn into an error here.
pub fn info(bytes: &[u8]) -> WavClipResult<ClipInfo> {
    info_with_options(bytes, DecodeOptions::default())
}

pub fn info_with_options(bytes: &[u8], options: DecodeOptions) -> WavClipResult<ClipInfo> {
    let (fmt, payload) = wav::codec::locate(bytes, options.layout)?;
    if options.validate_format {
        fmt.validate_format_consistency()?;
    }
    let available_chunks = wav::chunks::list_chunks(bytes)
        .into_iter()
        .map(|c| c.id)
        .collect();

    Ok(ClipInfo {
        fmt,
        data_length: payload.len() as u32,
        available_chunks,
    })
}

/// Buffer everything `reader` yields and decode it.
///
/// Inputs larger than a RIFF size field can describe are rejected without
/// being read to the end.
pub fn read_from<R: Read>(reader: R, options: DecodeOptions) -> WavClipResult<AudioClip> {
    let mut bytes = Vec::new();
    reader.take(MAX_WAV_SIZE + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_WAV_SIZE {
        return Err(WavClipError::PayloadTooLarge {
            len: bytes.len() as u64,
        });
    }
    decode_with_options(&bytes, options)
}

/// Encode `clip` to `writer` through a buffered writer and flush it.
pub fn write_to<W: Write>(clip: &AudioClip, writer: W) -> WavClipResult<()> {
    // Always buffer writes to avoid caller-dependent performance cliffs
    let mut writer = BufWriter::new(writer);
    encode_into(clip, &mut writer)?;
    writer.flush()?;
    Ok(())
}
