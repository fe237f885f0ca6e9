//! Command surface
//!
//! The serializable boundary a UI transport speaks: a tagged [`Command`]
//! envelope in, a field-named [`Response`] record or a
//! `{kind, message}` error body out. Field names are part of the
//! contract — the visualization layer consumes them unchanged.
//!
//! In-process callers can skip this layer and use [`Phonoscope`]
//! directly; the semantics are identical.

use serde::{Deserialize, Serialize};

use crate::audio::{SampleBuffer, TrackInfo};
use crate::error::{PhonoscopeError, PhonoscopeResult};
use crate::forensics::ForensicReport;
use crate::spectrogram::Spectrogram;
use crate::Phonoscope;

/// One request from the UI
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Decode a file and make it the current track
    LoadAudio {
        /// Path of the audio file to decode
        path: String,
    },
    /// Compute a spectrogram of the current track
    ComputeSpectrogram {
        /// Upper frequency bound in Hz
        max_freq: f64,
    },
    /// Run the forensic battery over the current track
    AnalyzeForensics,
    /// Fetch the full interleaved sample buffer
    GetAudioSamples,
    /// Fetch one chunk of the interleaved samples
    GetAudioSamplesChunk {
        /// Zero-based chunk index
        chunk_index: usize,
        /// Chunk size in samples
        chunk_size: usize,
    },
    /// Total interleaved sample count, for sizing chunked transfers
    GetAudioSampleCount,
    /// Write a time range of the current track as 16-bit PCM
    ExportAudio {
        /// Destination path
        out_path: String,
        /// Range start in seconds
        start_s: f64,
        /// Range end in seconds (exclusive)
        end_s: f64,
    },
}

/// One successful command result
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `load_audio` result
    Track(TrackInfo),
    /// `compute_spectrogram` result
    Spectrogram(Spectrogram),
    /// `analyze_forensics` result
    Forensics(ForensicReport),
    /// `get_audio_samples` / chunk result
    Samples(SampleBuffer),
    /// `get_audio_sample_count` result
    Count(usize),
    /// Command with no payload (`export_audio`); serializes as null
    Empty,
}

/// Serializable error body for the transport
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    /// Stable machine-readable kind
    pub kind: &'static str,
    /// Human-readable message
    pub message: String,
}

impl From<&PhonoscopeError> for CommandError {
    fn from(err: &PhonoscopeError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Execute one command against the engine.
///
/// # Errors
/// Whatever the underlying operation reports; see [`PhonoscopeError`].
pub fn dispatch(engine: &Phonoscope, command: Command) -> PhonoscopeResult<Response> {
    match command {
        Command::LoadAudio { path } => engine
            .load_audio(std::path::Path::new(&path))
            .map(Response::Track),
        Command::ComputeSpectrogram { max_freq } => engine
            .compute_spectrogram(max_freq)
            .map(Response::Spectrogram),
        Command::AnalyzeForensics => engine.analyze_forensics().map(Response::Forensics),
        Command::GetAudioSamples => engine.audio_samples().map(Response::Samples),
        Command::GetAudioSamplesChunk {
            chunk_index,
            chunk_size,
        } => engine
            .audio_samples_chunk(chunk_index, chunk_size)
            .map(Response::Samples),
        Command::GetAudioSampleCount => engine.sample_count().map(Response::Count),
        Command::ExportAudio {
            out_path,
            start_s,
            end_s,
        } => engine
            .export_audio(std::path::Path::new(&out_path), start_s, end_s)
            .map(|()| Response::Empty),
    }
}
