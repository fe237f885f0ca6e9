//! Spectrogram computation
//!
//! Short-time Fourier transform over the mono mix: Hann-windowed
//! 2048-sample frames at 75% overlap, magnitudes in dB, truncated to a
//! caller-chosen maximum frequency. Frames are independent and fan out
//! across the worker pool; the output matrix is in frame order
//! regardless of completion order.
//!
//! # Algorithm
//!
//! For frame `m` starting at sample `m·H`:
//! 1. Multiply the frame by the precomputed Hann window
//! 2. Forward FFT of length `N = 2048`
//! 3. Magnitude of bins with center frequency ≤ `max_freq`
//! 4. `dB = 20·log10(max(|X|, 1e-10))`, floored at −200 dB

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::Serialize;

use crate::audio::{HOP_SIZE, WINDOW_SIZE};
use crate::error::{PhonoscopeError, PhonoscopeResult};
use crate::{parallel, trace};

/// Magnitude floor before log conversion, keeping dB finite.
const MAG_EPSILON: f32 = 1e-10;

/// Lowest representable magnitude in dB; NaN input lands here too.
const DB_FLOOR: f32 = -200.0;

/// Time-frequency magnitude matrix in dB
///
/// Outer index is the time frame, inner index the frequency bin.
/// Serialized to the UI with these exact field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrogram {
    /// Per-frame dB magnitudes; every row has identical length
    pub data: Vec<Vec<f32>>,
    /// Frame start times in seconds, one per row
    pub times: Vec<f64>,
    /// Effective maximum frequency in Hz (requested value clamped to Nyquist)
    pub max_freq: f64,
}

/// STFT engine with a precomputed window and a cached FFT plan
///
/// The plan and window are computed once and shared read-only across
/// frames within a call and across calls.
pub struct SpectrogramEngine {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl std::fmt::Debug for SpectrogramEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrogramEngine")
            .field("window_size", &WINDOW_SIZE)
            .field("hop_size", &HOP_SIZE)
            .finish()
    }
}

impl Default for SpectrogramEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrogramEngine {
    /// Create an engine, planning the FFT and precomputing the window.
    #[must_use]
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(WINDOW_SIZE);
        let window = hann_window(WINDOW_SIZE);
        Self { window, fft }
    }

    /// Compute the spectrogram of `mono` up to `max_freq` Hz.
    ///
    /// Signals shorter than one window yield an empty matrix and an
    /// empty time vector. `max_freq` above Nyquist clamps silently; the
    /// returned record carries the effective value, so requesting any
    /// frequency at or above Nyquist produces identical output.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `max_freq` is zero, negative, or not finite.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip(self, mono), fields(samples = mono.len()))
    )]
    pub fn compute(
        &self,
        mono: &[f32],
        sample_rate: u32,
        max_freq: f64,
    ) -> PhonoscopeResult<Spectrogram> {
        if !max_freq.is_finite() || max_freq <= 0.0 {
            return Err(PhonoscopeError::InvalidParameter(format!(
                "max_freq must be positive, got {max_freq}"
            )));
        }

        let nyquist = f64::from(sample_rate) / 2.0;
        let max_freq = max_freq.min(nyquist);

        if mono.len() < WINDOW_SIZE {
            return Ok(Spectrogram {
                data: Vec::new(),
                times: Vec::new(),
                max_freq,
            });
        }

        let n_frames = (mono.len() - WINDOW_SIZE) / HOP_SIZE + 1;

        // Bins with center frequency k·sr/N ≤ max_freq.
        let n_bins = ((max_freq * WINDOW_SIZE as f64 / f64::from(sample_rate)) as usize + 1)
            .min(WINDOW_SIZE / 2 + 1);

        let _stage = trace::enter(trace::Stage::StftFrames);
        let data = parallel::ordered_map(n_frames, |m| {
            self.frame_db(&mono[m * HOP_SIZE..m * HOP_SIZE + WINDOW_SIZE], n_bins)
        });
        let times = (0..n_frames)
            .map(|m| (m * HOP_SIZE) as f64 / f64::from(sample_rate))
            .collect();

        Ok(Spectrogram {
            data,
            times,
            max_freq,
        })
    }

    /// One windowed FFT frame converted to floored dB magnitudes.
    fn frame_db(&self, frame: &[f32], n_bins: usize) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(self.window.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        buffer
            .iter()
            .take(n_bins)
            .map(|c| {
                // NaN magnitudes fall through max() onto the epsilon,
                // landing on the −200 dB floor.
                let db = 20.0 * c.norm().max(MAG_EPSILON).log10();
                db.max(DB_FLOOR)
            })
            .collect()
    }
}

/// Hann window, `w[n] = 0.5·(1 − cos(2π·n/(N−1)))`.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f32 / (size - 1) as f32).cos()))
        .collect()
}
