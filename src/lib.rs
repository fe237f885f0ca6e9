//! # Phonoscope
//!
//! Audio forensics engine: the analysis core of a desktop forensics
//! workstation. Decodes recorded audio into a canonical sample buffer,
//! computes time–frequency spectrograms, runs a battery of forensic
//! analyses (power-grid hum, splice detection, clipping, SNR, dynamic
//! range), and exports selected ranges as uncompressed PCM.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phonoscope::Phonoscope;
//!
//! let engine = Phonoscope::new();
//! let info = engine.load_audio("interview.wav".as_ref())?;
//! let report = engine.analyze_forensics()?;
//! if report.enf_present {
//!     println!("mains hum at {} Hz", report.grid_freq);
//! }
//! engine.export_audio("clip.wav".as_ref(), 12.0, 14.5)?;
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): fan analysis loops out across a rayon pool
//! - `tracing`: pipeline span instrumentation
//!
//! ## Architecture
//!
//! file → decoder → sample store → {spectrogram, forensics, exporter},
//! all behind the synchronous command surface of [`Phonoscope`].
//! Commands run to completion and return a value; a failing command
//! never mutates the store.

#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod audio;
pub mod cli;
pub mod commands;
pub mod error;
pub mod export;
pub mod forensics;
pub mod parallel;
pub mod spectrogram;
pub mod trace;

use std::path::Path;

pub use audio::{DecoderConfig, SampleBuffer, SampleStore, TrackInfo};
pub use error::{PhonoscopeError, PhonoscopeResult};
pub use forensics::ForensicReport;
pub use spectrogram::{Spectrogram, SpectrogramEngine};

/// The audio forensics engine
///
/// Owns the single-slot [`SampleStore`], the cached STFT plan, and the
/// decoder configuration. One instance serves a whole process; every
/// UI command maps to one method here.
#[derive(Debug, Default)]
pub struct Phonoscope {
    store: SampleStore,
    spectrogram: SpectrogramEngine,
    decoder: DecoderConfig,
}

impl Phonoscope {
    /// Create an engine with the default decoder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an explicit decoder configuration.
    #[must_use]
    pub fn with_config(decoder: DecoderConfig) -> Self {
        Self {
            store: SampleStore::new(),
            spectrogram: SpectrogramEngine::new(),
            decoder,
        }
    }

    /// Decode `path` and make it the current track.
    ///
    /// On failure the previously loaded track (if any) stays current.
    ///
    /// # Errors
    /// `FileNotFound`, `UnsupportedFormat`, `MalformedInput`,
    /// `OutOfMemory`, or an I/O failure from the decoder.
    pub fn load_audio(&self, path: &Path) -> PhonoscopeResult<TrackInfo> {
        let (info, buffer) = audio::decode_file(path, &self.decoder)?;
        self.store.put(info, buffer);
        Ok(info)
    }

    /// Metadata of the current track.
    ///
    /// # Errors
    /// `NoTrack` if nothing is loaded.
    pub fn track_info(&self) -> PhonoscopeResult<TrackInfo> {
        self.store.info()
    }

    /// Spectrogram of the current track's mono mix up to `max_freq` Hz.
    ///
    /// # Errors
    /// `NoTrack`, or `InvalidParameter` for a non-positive `max_freq`.
    pub fn compute_spectrogram(&self, max_freq: f64) -> PhonoscopeResult<Spectrogram> {
        let view = self.store.read()?;
        self.spectrogram
            .compute(view.mono(), view.sample_rate(), max_freq)
    }

    /// Run the forensic battery over the current track.
    ///
    /// # Errors
    /// `NoTrack` if nothing is loaded.
    pub fn analyze_forensics(&self) -> PhonoscopeResult<ForensicReport> {
        let view = self.store.read()?;
        Ok(forensics::analyze(
            view.mono(),
            view.samples(),
            view.sample_rate(),
        ))
    }

    /// Interleaved samples of the current track as a transfer record.
    ///
    /// This clones the buffer; in-process consumers that can hold a
    /// short-lived borrow should go through [`Phonoscope::store`]
    /// instead, and process boundaries moving very large tracks should
    /// page through [`Phonoscope::audio_samples_chunk`].
    ///
    /// # Errors
    /// `NoTrack` if nothing is loaded.
    pub fn audio_samples(&self) -> PhonoscopeResult<SampleBuffer> {
        let view = self.store.read()?;
        Ok(SampleBuffer {
            samples: view.samples().to_vec(),
            sample_rate: view.sample_rate(),
            channels: view.channels(),
        })
    }

    /// Total interleaved sample count of the current track.
    ///
    /// # Errors
    /// `NoTrack` if nothing is loaded.
    pub fn sample_count(&self) -> PhonoscopeResult<usize> {
        let view = self.store.read()?;
        Ok(view.samples().len())
    }

    /// One chunk of the interleaved samples for paged transfer.
    ///
    /// Chunk `i` covers samples `[i·chunk_size, (i+1)·chunk_size)`,
    /// truncated at the end of the track.
    ///
    /// # Errors
    /// `NoTrack` if nothing is loaded; `InvalidParameter` for a zero
    /// chunk size or a chunk index past the end.
    pub fn audio_samples_chunk(
        &self,
        chunk_index: usize,
        chunk_size: usize,
    ) -> PhonoscopeResult<SampleBuffer> {
        if chunk_size == 0 {
            return Err(PhonoscopeError::InvalidParameter(
                "chunk_size must be positive".into(),
            ));
        }
        let view = self.store.read()?;
        let samples = view.samples();
        let start = chunk_index.saturating_mul(chunk_size);
        if start >= samples.len() {
            return Err(PhonoscopeError::InvalidParameter(format!(
                "chunk index {chunk_index} out of range"
            )));
        }
        let end = (start + chunk_size).min(samples.len());
        Ok(SampleBuffer {
            samples: samples[start..end].to_vec(),
            sample_rate: view.sample_rate(),
            channels: view.channels(),
        })
    }

    /// Export `[start_s, end_s)` of the current track as 16-bit PCM.
    ///
    /// # Errors
    /// `NoTrack`, `EmptyRange`, `Io`, or `PermissionDenied`.
    pub fn export_audio(&self, out_path: &Path, start_s: f64, end_s: f64) -> PhonoscopeResult<()> {
        let view = self.store.read()?;
        export::export_wav(&view, out_path, start_s, end_s)
    }

    /// Zero-copy access to the sample store for in-process consumers.
    #[must_use]
    pub fn store(&self) -> &SampleStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::PathBuf;

    fn write_sine_wav(dir: &Path, name: &str, freq: f64, seconds: f64, sample_rate: u32) -> PathBuf {
        let path = dir.join(name);
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).expect("create wav");
        let n = (seconds * f64::from(sample_rate)) as usize;
        for i in 0..n {
            let s = (2.0 * std::f64::consts::PI * freq * i as f64 / f64::from(sample_rate)).sin();
            writer
                .write_sample((s * 0.5 * 32_767.0) as i16)
                .expect("write");
        }
        writer.finalize().expect("finalize");
        path
    }

    #[test]
    fn test_fresh_engine_has_no_track() {
        let engine = Phonoscope::new();
        assert!(matches!(engine.track_info(), Err(PhonoscopeError::NoTrack)));
        assert!(matches!(
            engine.compute_spectrogram(8_000.0),
            Err(PhonoscopeError::NoTrack)
        ));
        assert!(matches!(
            engine.analyze_forensics(),
            Err(PhonoscopeError::NoTrack)
        ));
        assert!(matches!(
            engine.audio_samples(),
            Err(PhonoscopeError::NoTrack)
        ));
        assert!(matches!(
            engine.export_audio(Path::new("x.wav"), 0.0, 1.0),
            Err(PhonoscopeError::NoTrack)
        ));
    }

    #[test]
    fn test_load_then_query() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 440.0, 1.0, 8_000);

        let engine = Phonoscope::new();
        let info = engine.load_audio(&path).expect("load");
        assert_eq!(info.sample_rate, 8_000);
        assert_eq!(info.channels, 1);
        assert!((info.duration - 1.0).abs() < 1e-3);

        let samples = engine.audio_samples().expect("samples");
        assert_eq!(samples.samples.len(), 8_000);
        assert_eq!(engine.sample_count().expect("count"), 8_000);
    }

    #[test]
    fn test_failed_load_keeps_previous_track() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 440.0, 0.5, 8_000);

        let engine = Phonoscope::new();
        engine.load_audio(&path).expect("load");
        let before = engine.track_info().expect("info");

        let err = engine
            .load_audio(Path::new("/no/such/file.wav"))
            .expect_err("missing file");
        assert!(matches!(err, PhonoscopeError::FileNotFound(_)));
        assert_eq!(engine.track_info().expect("info"), before);
    }

    #[test]
    fn test_chunked_samples_cover_track() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 100.0, 0.5, 8_000);

        let engine = Phonoscope::new();
        engine.load_audio(&path).expect("load");

        let total = engine.sample_count().expect("count");
        let chunk_size = 1_000;
        let mut reassembled = Vec::new();
        let mut index = 0;
        while let Ok(chunk) = engine.audio_samples_chunk(index, chunk_size) {
            reassembled.extend(chunk.samples);
            index += 1;
        }
        assert_eq!(reassembled.len(), total);
        assert_eq!(reassembled, engine.audio_samples().expect("all").samples);
    }

    #[test]
    fn test_chunk_parameter_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 100.0, 0.1, 8_000);
        let engine = Phonoscope::new();
        engine.load_audio(&path).expect("load");

        assert!(matches!(
            engine.audio_samples_chunk(0, 0),
            Err(PhonoscopeError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.audio_samples_chunk(10_000, 1_000),
            Err(PhonoscopeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_spectrogram_over_loaded_track() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 440.0, 1.0, 8_000);
        let engine = Phonoscope::new();
        engine.load_audio(&path).expect("load");

        let spec = engine.compute_spectrogram(2_000.0).expect("spectrogram");
        assert!(!spec.data.is_empty());
        assert!((spec.max_freq - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_then_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_sine_wav(dir.path(), "tone.wav", 200.0, 2.0, 8_000);
        let engine = Phonoscope::new();
        engine.load_audio(&path).expect("load");

        let out = dir.path().join("slice.wav");
        engine.export_audio(&out, 0.5, 1.5).expect("export");

        let info = engine.load_audio(&out).expect("reload");
        assert_eq!(info.sample_rate, 8_000);
        assert_eq!(info.channels, 1);
        assert!((info.duration - 1.0).abs() <= 1.0 / 8_000.0);
    }

    #[test]
    fn test_memory_ceiling_leaves_store_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let small = write_sine_wav(dir.path(), "small.wav", 100.0, 0.1, 8_000);
        let big = write_sine_wav(dir.path(), "big.wav", 100.0, 2.0, 8_000);

        let engine = Phonoscope::with_config(DecoderConfig {
            max_track_bytes: 8_000, // 2000 samples
        });
        engine.load_audio(&small).expect("small fits");
        let before = engine.track_info().expect("info");

        let err = engine.load_audio(&big).expect_err("too big");
        assert!(matches!(err, PhonoscopeError::OutOfMemory { .. }));
        assert_eq!(engine.track_info().expect("info"), before);
    }
}
