//! Waveform export
//!
//! Writes a time range of the current track as a 16-bit signed PCM RIFF
//! file with the track's original sample rate and channel count. The
//! file is written to a temporary sibling and renamed into place on a
//! successful flush, so a failed export never leaves a truncated
//! destination and never disturbs an existing one.

use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::NamedTempFile;

use crate::audio::store::TrackView;
use crate::error::{PhonoscopeError, PhonoscopeResult};

/// Full-scale value for 16-bit quantization.
const FULL_SCALE: f32 = 32_767.0;

/// Export `[start_s, end_s)` of the current track to `out_path`.
///
/// The range is clipped to `[0, duration]`; sample indices are
/// `floor(t · sample_rate)`. Each sample is quantized as
/// `round(clamp(x, −1, +1) · 32767)`.
///
/// # Errors
///
/// * `EmptyRange` — the clipped range selects no samples
/// * `PermissionDenied` / `Io` — filesystem failures; the temporary is
///   removed and any existing destination left untouched
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(view), fields(out = %out_path.display()))
)]
pub fn export_wav(
    view: &TrackView<'_>,
    out_path: &Path,
    start_s: f64,
    end_s: f64,
) -> PhonoscopeResult<()> {
    let info = view.info();
    let channels = view.channels();
    let samples = view.samples();

    // NaN bounds fall to 0.0 through max() and land in EmptyRange.
    let start = start_s.max(0.0).min(info.duration);
    let end = end_s.max(0.0).min(info.duration);
    if end <= start {
        return Err(PhonoscopeError::EmptyRange { start_s, end_s });
    }

    let start_frame = (start * f64::from(info.sample_rate)).floor() as usize;
    let end_frame = (end * f64::from(info.sample_rate)).floor() as usize;
    if end_frame <= start_frame {
        return Err(PhonoscopeError::EmptyRange { start_s, end_s });
    }

    let lo = start_frame * channels;
    let hi = (end_frame * channels).min(samples.len());
    let selection = &samples[lo..hi];

    let parent = out_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(parent).map_err(|e| map_export_io(e, out_path))?;

    let spec = WavSpec {
        channels: channels as u16,
        sample_rate: info.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let file = tmp.reopen().map_err(|e| map_export_io(e, out_path))?;
    let mut writer =
        WavWriter::new(BufWriter::new(file), spec).map_err(|e| map_hound(e, out_path))?;

    for &sample in selection {
        writer
            .write_sample(quantize(sample))
            .map_err(|e| map_hound(e, out_path))?;
    }
    writer.finalize().map_err(|e| map_hound(e, out_path))?;

    // Atomic hand-over; the temporary vanishes on any earlier failure.
    tmp.persist(out_path)
        .map_err(|e| map_export_io(e.error, out_path))?;
    Ok(())
}

/// Quantize one sample to 16-bit full scale.
#[inline]
fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * FULL_SCALE).round() as i16
}

/// Export-side I/O mapping: permission failures keep their own kind,
/// everything else (including a missing output directory) is `Io`.
fn map_export_io(err: std::io::Error, path: &Path) -> PhonoscopeError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        PhonoscopeError::PermissionDenied(path.to_path_buf())
    } else {
        PhonoscopeError::Io(err)
    }
}

fn map_hound(err: hound::Error, path: &Path) -> PhonoscopeError {
    match err {
        hound::Error::IoError(io) => map_export_io(io, path),
        other => PhonoscopeError::Io(std::io::Error::other(other.to_string())),
    }
}
