//! Canonical audio types and decode/store front-end
//!
//! Everything downstream of the decoder works on one canonical shape:
//! interleaved f32 samples in `[-1, +1]` plus a [`TrackInfo`] describing
//! them. The decoder produces that shape from any supported container;
//! the store owns the one live copy.

pub mod decode;
pub mod store;

pub use decode::{decode_file, DecoderConfig};
pub use store::{SampleStore, TrackView};

use serde::Serialize;

/// STFT window size in samples
pub const WINDOW_SIZE: usize = 2048;

/// STFT hop size in samples (75% overlap)
pub const HOP_SIZE: usize = WINDOW_SIZE / 4;

/// Metadata for the currently loaded track
///
/// Serialized to the UI with these exact field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackInfo {
    /// Duration in seconds, derived from the final frame count
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (≥ 1)
    pub channels: usize,
}

/// Canonical decoded sample buffer
///
/// Samples are interleaved by channel and normalized to `[-1, +1]`.
/// Owned exclusively by the [`SampleStore`] once loaded; clones of it
/// double as the `get_audio_samples` transfer record and serialize
/// with these exact field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleBuffer {
    /// Interleaved f32 samples
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (≥ 1)
    pub channels: usize,
}

impl SampleBuffer {
    /// Number of frames (samples per channel).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frame_count() as f64 / f64::from(self.sample_rate)
        }
    }

    /// Arithmetic-mean mono mix of all channels.
    #[must_use]
    pub fn mono_mix(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }
        let scale = 1.0 / self.channels as f32;
        self.samples
            .chunks_exact(self.channels)
            .map(|frame| frame.iter().sum::<f32>() * scale)
            .collect()
    }

    /// Track metadata derived from this buffer.
    #[must_use]
    pub fn info(&self) -> TrackInfo {
        TrackInfo {
            duration: self.duration(),
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}
