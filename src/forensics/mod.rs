//! Forensic analysis battery
//!
//! Five analyses over the current track: mains-hum (ENF) detection,
//! splice detection, clipping, SNR, and dynamic range. Clipping counts
//! every channel of the interleaved buffer; the remaining analyses work
//! on the mono mix. The battery never fails on content — empty or
//! silent input yields a zeroed report.

mod enf;
mod metrics;
mod splice;

use serde::Serialize;

/// Forensic findings for one track
///
/// Serialized to the UI with these exact field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForensicReport {
    /// Power-grid hum detected at or above 6 dB over the side bands
    pub enf_present: bool,
    /// Strength of the winning hum candidate in dB
    pub enf_strength_db: f64,
    /// Winning grid frequency (50 or 60); 0 when nothing scored
    pub grid_freq: u32,
    /// Suspected edit points in seconds, strictly increasing
    pub splice_times: Vec<f64>,
    /// Median-split signal-to-noise ratio in dB, clamped to [0, 120]
    pub snr_db: f64,
    /// Peak-to-RMS ratio in dB, clamped to [0, 120]
    pub dynamic_range_db: f64,
    /// Any sample at or above the clip threshold
    pub has_clipping: bool,
    /// Clipped samples counted over all channels
    pub clipped_count: usize,
}

/// Run the full battery over one track.
///
/// `mono` is the mono mix, `interleaved` the canonical buffer with all
/// channels; both come from the same track.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(samples = interleaved.len()))
)]
#[must_use]
pub fn analyze(mono: &[f32], interleaved: &[f32], sample_rate: u32) -> ForensicReport {
    if mono.is_empty() {
        return ForensicReport::default();
    }

    let clipped_count = metrics::count_clipped(interleaved);
    let enf = enf::detect_enf(mono, sample_rate);

    ForensicReport {
        enf_present: enf.present,
        enf_strength_db: enf.strength_db,
        grid_freq: enf.grid_freq,
        splice_times: splice::detect_splices(mono, sample_rate),
        snr_db: metrics::snr_db(mono),
        dynamic_range_db: metrics::dynamic_range_db(mono),
        has_clipping: clipped_count > 0,
        clipped_count,
    }
}
