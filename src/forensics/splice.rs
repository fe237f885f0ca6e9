//! Splice detection
//!
//! An edit boundary usually leaves a sample-level discontinuity. The
//! detector works on first differences of the mono mix: a sample is a
//! candidate when its |difference| exceeds the local mean by six local
//! standard deviations, measured over a sliding 100 ms window. Window
//! statistics come from prefix sums so the scan is O(n) and can fan out
//! across the worker pool in chunks.

use crate::{parallel, trace};

/// Candidate threshold in local standard deviations.
const THRESHOLD_SIGMA: f64 = 6.0;

/// Candidates closer than this collapse into one event.
const COALESCE_WINDOW_S: f64 = 0.050;

/// Events this close to either edge are decode artefacts, not splices.
const EDGE_GUARD_S: f64 = 0.010;

/// Samples per parallel scan chunk.
const SCAN_CHUNK: usize = 1 << 16;

/// Detect splice candidates in the mono mix.
///
/// Returns event timestamps in seconds, strictly increasing, each
/// within `[0, duration]`. Candidates within 50 ms of each other are
/// coalesced to the earliest one; events within 10 ms of either edge
/// are dropped.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(mono), fields(samples = mono.len()))
)]
pub(crate) fn detect_splices(mono: &[f32], sample_rate: u32) -> Vec<f64> {
    if mono.len() < 2 || sample_rate == 0 {
        return Vec::new();
    }

    let d: Vec<f32> = mono.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let n = d.len();

    // Prefix sums of |d| and |d|² for O(1) window statistics.
    let mut sum = vec![0.0_f64; n + 1];
    let mut sum_sq = vec![0.0_f64; n + 1];
    for (i, &v) in d.iter().enumerate() {
        let v = f64::from(v);
        sum[i + 1] = sum[i] + v;
        sum_sq[i + 1] = sum_sq[i] + v * v;
    }

    let window = (sample_rate as usize / 10).max(2); // 100 ms
    let half = window / 2;

    let _stage = trace::enter(trace::Stage::SpliceScan);
    let n_chunks = n.div_ceil(SCAN_CHUNK);
    let candidates: Vec<usize> = parallel::ordered_map(n_chunks, |c| {
        let lo = c * SCAN_CHUNK;
        let hi = ((c + 1) * SCAN_CHUNK).min(n);
        let mut found = Vec::new();
        for j in lo..hi {
            let a = j.saturating_sub(half);
            let b = (j + half + 1).min(n);
            let count = (b - a) as f64;
            let mean = (sum[b] - sum[a]) / count;
            let variance = ((sum_sq[b] - sum_sq[a]) / count - mean * mean).max(0.0);
            if f64::from(d[j]) > THRESHOLD_SIGMA.mul_add(variance.sqrt(), mean) {
                found.push(j);
            }
        }
        found
    })
    .into_iter()
    .flatten()
    .collect();

    // Coalesce runs of nearby candidates to the earliest one.
    let sr = f64::from(sample_rate);
    let mut events = Vec::new();
    let mut last_candidate = f64::NEG_INFINITY;
    for j in candidates {
        let t = (j + 1) as f64 / sr; // d[j] sits at sample j+1
        if t - last_candidate > COALESCE_WINDOW_S {
            events.push(t);
        }
        last_candidate = t;
    }

    let duration = mono.len() as f64 / sr;
    events.retain(|&t| t >= EDGE_GUARD_S && t <= duration - EDGE_GUARD_S);
    events
}
