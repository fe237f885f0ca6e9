//! Electrical network frequency detection
//!
//! Mains-powered equipment radiates its grid frequency (50 Hz in
//! Europe/Asia, 60 Hz in the Americas) into recordings. Presence of
//! that hum, and which grid produced it, is measured by comparing
//! narrow-band power at the candidate frequency against two side bands
//! a few hertz away.
//!
//! # Algorithm
//!
//! 1. Welch-averaged periodogram at ≤ 0.1 Hz resolution: Hann-windowed
//!    segments with 50% overlap, zero-padded to the FFT length when the
//!    signal is shorter than one segment, periodograms averaged.
//! 2. Per candidate `f`: band power over `[f−0.5, f+0.5]`, noise power
//!    as the mean of the 2 Hz-wide bands centred at `f±3`.
//! 3. `strength = 10·log10(band / sides)`; the winning candidate is
//!    present when its strength reaches 6 dB.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::{parallel, trace};

/// Grid frequencies under test, in Hz.
const CANDIDATE_GRIDS: [f64; 2] = [50.0, 60.0];

/// Half width of the signal band around the candidate, in Hz.
const BAND_HALF_WIDTH_HZ: f64 = 0.5;

/// Side band centres sit this far from the candidate, in Hz.
const SIDE_OFFSET_HZ: f64 = 3.0;

/// Half width of each side band, in Hz.
const SIDE_HALF_WIDTH_HZ: f64 = 1.0;

/// Strength at or above this declares the hum present.
const PRESENCE_THRESHOLD_DB: f64 = 6.0;

/// Periodogram bin spacing must be at least this fine.
const TARGET_RESOLUTION_HZ: f64 = 0.1;

/// Ceiling on averaged Welch segments; the hop widens on long tracks.
const MAX_SEGMENTS: usize = 32;

/// Outcome of the ENF scan
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EnfReading {
    /// Hum detected at or above the presence threshold
    pub present: bool,
    /// Strength of the winning candidate in dB (0 when nothing scored)
    pub strength_db: f64,
    /// Winning grid frequency in Hz; 0 until a candidate scores
    pub grid_freq: u32,
}

/// Scan the mono mix for 50/60 Hz mains hum.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(mono), fields(samples = mono.len()))
)]
pub(crate) fn detect_enf(mono: &[f32], sample_rate: u32) -> EnfReading {
    if mono.is_empty() || sample_rate == 0 {
        return EnfReading::default();
    }

    let n_fft = ((f64::from(sample_rate) / TARGET_RESOLUTION_HZ).ceil() as usize)
        .next_power_of_two();
    let spectrum = welch_power_spectrum(mono, n_fft);
    let bin_hz = f64::from(sample_rate) / n_fft as f64;
    let nyquist = f64::from(sample_rate) / 2.0;

    let mut best = EnfReading::default();
    for &freq in &CANDIDATE_GRIDS {
        let strength = band_strength_db(&spectrum, bin_hz, nyquist, freq);
        if strength > best.strength_db {
            best = EnfReading {
                present: false,
                strength_db: strength,
                grid_freq: freq as u32,
            };
        }
    }
    best.present = best.strength_db >= PRESENCE_THRESHOLD_DB;
    best
}

/// Welch-averaged power spectrum: first `n_fft/2 + 1` bins.
///
/// Segments fan out across the worker pool; on long tracks the hop
/// widens so at most [`MAX_SEGMENTS`] periodograms are averaged.
fn welch_power_spectrum(mono: &[f32], n_fft: usize) -> Vec<f64> {
    let _stage = trace::enter(trace::Stage::EnfPeriodogram);
    let seg_len = mono.len().min(n_fft);
    let span = mono.len() - seg_len;
    let hop = (seg_len / 2).max(1).max(span.div_ceil(MAX_SEGMENTS - 1).max(1));
    let n_segments = span / hop + 1;

    let window: Vec<f64> = (0..seg_len)
        .map(|n| {
            0.5 * (1.0
                - (2.0 * std::f64::consts::PI * n as f64 / (seg_len.max(2) - 1) as f64).cos())
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let n_bins = n_fft / 2 + 1;

    let spectra = parallel::ordered_map(n_segments, |s| {
        let start = s * hop;
        let segment = &mono[start..start + seg_len];
        let mut buffer = vec![Complex::new(0.0, 0.0); n_fft]; // zero padded
        for (slot, (&sample, &w)) in buffer.iter_mut().zip(segment.iter().zip(window.iter())) {
            *slot = Complex::new(f64::from(sample) * w, 0.0);
        }
        fft.process(&mut buffer);
        buffer
            .iter()
            .take(n_bins)
            .map(|c| c.norm_sqr())
            .collect::<Vec<f64>>()
    });

    let mut averaged = vec![0.0_f64; n_bins];
    for spectrum in &spectra {
        for (acc, &p) in averaged.iter_mut().zip(spectrum.iter()) {
            *acc += p;
        }
    }
    let scale = 1.0 / n_segments as f64;
    for v in &mut averaged {
        *v *= scale;
    }
    averaged
}

/// Band-over-sidebands strength at `freq`, in dB.
///
/// Powers are mean-per-bin so the 1 Hz signal band and the 2 Hz side
/// bands compare width-for-width. Candidates whose upper side band
/// reaches Nyquist are skipped; zero band power scores zero.
fn band_strength_db(spectrum: &[f64], bin_hz: f64, nyquist: f64, freq: f64) -> f64 {
    if freq + SIDE_OFFSET_HZ + SIDE_HALF_WIDTH_HZ >= nyquist {
        return 0.0;
    }
    let band = band_mean_power(
        spectrum,
        bin_hz,
        freq - BAND_HALF_WIDTH_HZ,
        freq + BAND_HALF_WIDTH_HZ,
    );
    if band <= 0.0 {
        return 0.0;
    }
    let below = band_mean_power(
        spectrum,
        bin_hz,
        freq - SIDE_OFFSET_HZ - SIDE_HALF_WIDTH_HZ,
        freq - SIDE_OFFSET_HZ + SIDE_HALF_WIDTH_HZ,
    );
    let above = band_mean_power(
        spectrum,
        bin_hz,
        freq + SIDE_OFFSET_HZ - SIDE_HALF_WIDTH_HZ,
        freq + SIDE_OFFSET_HZ + SIDE_HALF_WIDTH_HZ,
    );
    let sides = ((below + above) / 2.0).max(f64::MIN_POSITIVE);
    10.0 * (band / sides).log10()
}

/// Mean bin power over `[lo_hz, hi_hz]`.
fn band_mean_power(spectrum: &[f64], bin_hz: f64, lo_hz: f64, hi_hz: f64) -> f64 {
    let lo_bin = (lo_hz.max(0.0) / bin_hz).ceil() as usize;
    let hi_bin = ((hi_hz / bin_hz).floor() as usize).min(spectrum.len().saturating_sub(1));
    if lo_bin > hi_bin {
        return 0.0;
    }
    spectrum[lo_bin..=hi_bin].iter().sum::<f64>() / (hi_bin - lo_bin + 1) as f64
}
