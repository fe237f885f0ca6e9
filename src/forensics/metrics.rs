//! Scalar quality metrics: clipping, SNR, dynamic range
//!
//! Clipping is counted over the interleaved buffer (every channel);
//! SNR and dynamic range work on the mono mix. All dB results are
//! clamped to `[0, 120]` and an all-zero signal yields zeros.

/// A sample at or above this magnitude counts as clipped.
pub(crate) const CLIP_THRESHOLD: f32 = 0.99;

/// Denominator floor keeping the dB ratios finite.
const POWER_FLOOR: f64 = 1e-12;

/// dB clamp range shared by SNR and dynamic range.
const DB_RANGE: (f64, f64) = (0.0, 120.0);

/// Count samples at or above the clip threshold, all channels.
pub(crate) fn count_clipped(interleaved: &[f32]) -> usize {
    interleaved
        .iter()
        .filter(|s| s.abs() >= CLIP_THRESHOLD)
        .count()
}

/// Median-split SNR estimate in dB, clamped to `[0, 120]`.
///
/// Signal power is the mean square over samples louder than the median
/// magnitude; noise power is the mean square over the quietest decile.
pub(crate) fn snr_db(mono: &[f32]) -> f64 {
    let n = mono.len();
    if n == 0 {
        return 0.0;
    }

    let mut mags: Vec<f32> = mono.iter().map(|s| s.abs()).collect();
    mags.sort_unstable_by(f32::total_cmp);
    let median = mags[n / 2];

    let decile = (n / 10).max(1);
    let noise = mags[..decile]
        .iter()
        .map(|&m| f64::from(m) * f64::from(m))
        .sum::<f64>()
        / decile as f64;

    let mut signal_sum = 0.0_f64;
    let mut signal_count = 0_usize;
    for &s in mono {
        if s.abs() > median {
            signal_sum += f64::from(s) * f64::from(s);
            signal_count += 1;
        }
    }
    // A flat signal has nothing above its median; the clamp turns the
    // resulting −∞ into 0.
    let signal = if signal_count == 0 {
        0.0
    } else {
        signal_sum / signal_count as f64
    };

    (10.0 * (signal / noise.max(POWER_FLOOR)).log10()).clamp(DB_RANGE.0, DB_RANGE.1)
}

/// Peak-to-RMS dynamic range in dB, clamped to `[0, 120]`.
pub(crate) fn dynamic_range_db(mono: &[f32]) -> f64 {
    if mono.is_empty() {
        return 0.0;
    }
    let peak = f64::from(mono.iter().fold(0.0_f32, |m, &s| m.max(s.abs())));
    let mean_square =
        mono.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>() / mono.len() as f64;
    let rms = mean_square.sqrt();

    (20.0 * (peak / rms.max(POWER_FLOOR)).log10()).clamp(DB_RANGE.0, DB_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, seconds: f64, sample_rate: u32, amplitude: f64) -> Vec<f32> {
        let n = (seconds * f64::from(sample_rate)) as usize;
        (0..n)
            .map(|i| {
                (amplitude
                    * (2.0 * std::f64::consts::PI * freq * i as f64 / f64::from(sample_rate)).sin())
                    as f32
            })
            .collect()
    }

    // =========================================================================
    // Clipping
    // =========================================================================

    #[test]
    fn test_no_clipping_below_threshold() {
        let signal = sine(440.0, 0.1, 8_000, 0.5);
        assert_eq!(count_clipped(&signal), 0);
    }

    #[test]
    fn test_clipping_counts_every_channel() {
        let interleaved = vec![1.0, 0.0, -1.0, 0.99, -0.99, 0.5];
        assert_eq!(count_clipped(&interleaved), 4);
    }

    #[test]
    fn test_square_wave_is_mostly_clipped() {
        let signal: Vec<f32> = (0..8_000)
            .map(|i| if (i / 100) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        assert!(count_clipped(&signal) >= (signal.len() * 9) / 10);
    }

    // =========================================================================
    // SNR
    // =========================================================================

    #[test]
    fn test_snr_zero_signal_is_zero() {
        assert_eq!(snr_db(&vec![0.0; 10_000]), 0.0);
    }

    #[test]
    fn test_snr_empty_signal_is_zero() {
        assert_eq!(snr_db(&[]), 0.0);
    }

    #[test]
    fn test_snr_clamped_to_range() {
        // A clean tone over a silent floor pushes the ratio to the clamp.
        let signal = sine(440.0, 0.5, 8_000, 0.9);
        let snr = snr_db(&signal);
        assert!((0.0..=120.0).contains(&snr));
    }

    #[test]
    fn test_snr_higher_for_cleaner_signal() {
        let mut noisy = sine(440.0, 0.5, 8_000, 0.5);
        for (i, s) in noisy.iter_mut().enumerate() {
            // Deterministic pseudo-noise at roughly −20 dBFS.
            let noise = (((i as u64 * 2_654_435_761) % 2_000) as f32 / 1_000.0 - 1.0) * 0.1;
            *s += noise;
        }
        let clean = sine(440.0, 0.5, 8_000, 0.5);
        assert!(snr_db(&clean) > snr_db(&noisy));
    }

    // =========================================================================
    // Dynamic range
    // =========================================================================

    #[test]
    fn test_dynamic_range_zero_signal_is_zero() {
        assert_eq!(dynamic_range_db(&vec![0.0; 1_000]), 0.0);
    }

    #[test]
    fn test_dynamic_range_empty_signal_is_zero() {
        assert_eq!(dynamic_range_db(&[]), 0.0);
    }

    #[test]
    fn test_dynamic_range_square_wave_near_zero() {
        // Full-scale square: peak == rms, so 0 dB.
        let signal: Vec<f32> = (0..4_000)
            .map(|i| if (i / 50) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let dr = dynamic_range_db(&signal);
        assert!(dr <= 3.0, "square wave dynamic range was {dr} dB");
    }

    #[test]
    fn test_dynamic_range_sine_is_about_3db() {
        // Sine peak/rms is √2 → 20·log10(√2) ≈ 3.01 dB.
        let signal = sine(100.0, 1.0, 8_000, 0.5);
        let dr = dynamic_range_db(&signal);
        assert!((dr - 3.01).abs() < 0.1, "sine dynamic range was {dr} dB");
    }

    #[test]
    fn test_dynamic_range_clamped() {
        // One lone spike in silence: huge peak/rms ratio, clamped at 120.
        let mut signal = vec![0.0_f32; 100_000];
        signal[500] = 1.0;
        let dr = dynamic_range_db(&signal);
        assert!((0.0..=120.0).contains(&dr));
    }
}
