//! Multi-format audio decoding via symphonia
//!
//! Converts any container/codec the linked symphonia registry supports
//! (WAV PCM/float, MP3, FLAC, Ogg Vorbis, MPEG-4/AAC) into the
//! canonical interleaved f32 buffer. The whole track is materialized in
//! memory; a configurable byte ceiling aborts oversized tracks before
//! the allocation happens.
//!
//! # Failure policy
//!
//! A corrupt packet anywhere in the stream fails the whole decode with
//! `MalformedInput` rather than silently dropping frames: for forensic
//! work a partially decoded track is worse than no track.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as SymphoniaBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::{SampleBuffer, TrackInfo};
use crate::error::{PhonoscopeError, PhonoscopeResult};

/// Default track memory ceiling: 2 GiB of f32 samples.
pub const DEFAULT_MAX_TRACK_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Decoder configuration
#[derive(Debug, Clone, Copy)]
pub struct DecoderConfig {
    /// Ceiling on the decoded track size in bytes; decoding fails with
    /// `OutOfMemory` before the buffer would grow past it.
    pub max_track_bytes: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_track_bytes: DEFAULT_MAX_TRACK_BYTES,
        }
    }
}

/// Decode an audio file into a canonical sample buffer plus metadata.
///
/// The first track with a recognized codec is selected; other tracks
/// are ignored. Channel layout is preserved (no downmix); integer PCM
/// is normalized by its full-scale value at the codec layer, float PCM
/// is clamped to `[-1, +1]` and non-finite samples are flushed to zero.
///
/// # Errors
///
/// * `FileNotFound` / `PermissionDenied` / `Io` — opening the file
/// * `UnsupportedFormat` — container or codec not recognized
/// * `MalformedInput` — corrupt frames, missing sample rate, or an
///   inconsistent stream
/// * `OutOfMemory` — track exceeds [`DecoderConfig::max_track_bytes`]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip(config), fields(path = %path.display()))
)]
pub fn decode_file(path: &Path, config: &DecoderConfig) -> PhonoscopeResult<(TrackInfo, SampleBuffer)> {
    let file = File::open(path).map_err(|e| PhonoscopeError::from_io(e, path))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => {
                PhonoscopeError::UnsupportedFormat(what.to_string())
            }
            other => PhonoscopeError::MalformedInput(other.to_string()),
        })?;

    let mut format = probed.format;

    // First decodable audio track; remaining tracks are ignored.
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PhonoscopeError::UnsupportedFormat("no decodable audio track".into()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PhonoscopeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut channels: Option<usize> = None;
    let mut conv: Option<SymphoniaBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            // End of stream is signalled as an unexpected EOF by the reader.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(PhonoscopeError::MalformedInput(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| PhonoscopeError::MalformedInput(e.to_string()))?;

        let spec = *decoded.spec();
        let ch = spec.channels.count();
        match channels {
            None => channels = Some(ch),
            Some(prev) if prev != ch => {
                return Err(PhonoscopeError::MalformedInput(
                    "channel layout changed mid-stream".into(),
                ));
            }
            Some(_) => {}
        }
        sample_rate = sample_rate.or(Some(spec.rate));

        let buf = conv.get_or_insert_with(|| SymphoniaBuffer::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);

        let projected = (samples.len() + buf.samples().len()) as u64 * 4;
        if projected > config.max_track_bytes {
            return Err(PhonoscopeError::OutOfMemory {
                required: projected,
                limit: config.max_track_bytes,
            });
        }

        samples.extend(buf.samples().iter().map(|&s| sanitize(s)));
    }

    let channels = channels
        .filter(|&c| c >= 1)
        .ok_or_else(|| PhonoscopeError::MalformedInput("no decodable audio frames".into()))?;
    let sample_rate = sample_rate
        .filter(|&r| r > 0)
        .ok_or_else(|| PhonoscopeError::MalformedInput("stream carries no sample rate".into()))?;

    let buffer = SampleBuffer {
        samples,
        sample_rate,
        channels,
    };
    Ok((buffer.info(), buffer))
}

/// Clamp finite samples to `[-1, +1]`; flush NaN/±∞ to silence.
#[inline]
fn sanitize(s: f32) -> f32 {
    if s.is_finite() {
        s.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
