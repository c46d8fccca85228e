use std::time::Duration;

use crate::wav::{FormatTag, fmt::FmtHeader};

/// Header-derived queries shared by decoded clips and header-only summaries.
///
/// Implementors only provide the fmt fields and the payload length; frame
/// counts and durations are derived from those.
pub trait ClipMetadata {
    fn fmt_header(&self) -> FmtHeader;

    /// Payload size in bytes
    fn data_length(&self) -> u32;

    fn format_tag(&self) -> FormatTag {
        self.fmt_header().format_tag
    }

    fn num_channels(&self) -> u16 {
        self.fmt_header().channel_count
    }

    fn sample_rate(&self) -> u32 {
        self.fmt_header().sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.fmt_header().bits_per_sample
    }

    /// Complete sample frames in the payload; zero when block align is zero
    fn total_frames(&self) -> u32 {
        self.fmt_header().frames_for(self.data_length())
    }

    /// Samples across all channels
    fn total_samples(&self) -> u64 {
        self.total_frames() as u64 * self.num_channels() as u64
    }

    /// Playback length at the declared sample rate; zero when the rate is zero
    fn duration(&self) -> Duration {
        match self.sample_rate() {
            0 => Duration::ZERO,
            rate => Duration::from_secs_f64(self.total_frames() as f64 / rate as f64),
        }
    }
}
