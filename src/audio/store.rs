//! Single-slot sample store
//!
//! Process-lifetime container for the one current track. Writers
//! (decode) take exclusive access; readers (spectrogram, forensics,
//! export) share a read guard that borrows the buffer for the duration
//! of one command. Replacing the track drops the previous buffer and
//! its cached mono mix before `put` returns.

use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard};

use crate::audio::{SampleBuffer, TrackInfo};
use crate::error::{PhonoscopeError, PhonoscopeResult};

/// Guarded single-slot cache for the current decoded track
#[derive(Debug, Default)]
pub struct SampleStore {
    slot: RwLock<Option<Track>>,
}

#[derive(Debug)]
struct Track {
    info: TrackInfo,
    buffer: SampleBuffer,
    /// Lazily materialized arithmetic-mean mix; dies with the slot.
    mono: OnceLock<Vec<f32>>,
}

impl SampleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new track, replacing (and dropping) any previous one.
    ///
    /// Completes only after all in-flight readers have released their
    /// guards; the old buffer's memory is freed before this returns.
    pub fn put(&self, info: TrackInfo, buffer: SampleBuffer) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Track {
            info,
            buffer,
            mono: OnceLock::new(),
        });
    }

    /// Whether a track is currently loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Metadata of the current track.
    ///
    /// # Errors
    /// `NoTrack` if the store is empty.
    pub fn info(&self) -> PhonoscopeResult<TrackInfo> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .map(|t| t.info)
            .ok_or(PhonoscopeError::NoTrack)
    }

    /// Borrow a read view of the current track.
    ///
    /// The view holds the shared lock; drop it before issuing a `put`
    /// from the same thread.
    ///
    /// # Errors
    /// `NoTrack` if the store is empty.
    pub fn read(&self) -> PhonoscopeResult<TrackView<'_>> {
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            return Err(PhonoscopeError::NoTrack);
        }
        Ok(TrackView { guard })
    }
}

/// Shared read view of the loaded track
///
/// Borrows from the store; none of the returned slices may outlive it.
#[derive(Debug)]
pub struct TrackView<'a> {
    guard: RwLockReadGuard<'a, Option<Track>>,
}

impl TrackView<'_> {
    fn track(&self) -> &Track {
        // Checked at construction; absence here is a logic bug.
        self.guard.as_ref().expect("view constructed over a loaded track")
    }

    /// Track metadata.
    #[must_use]
    pub fn info(&self) -> TrackInfo {
        self.track().info
    }

    /// Interleaved samples, all channels.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.track().buffer.samples
    }

    /// Sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.track().buffer.sample_rate
    }

    /// Channel count.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.track().buffer.channels
    }

    /// Mono mix of the track.
    ///
    /// For mono tracks this borrows the canonical buffer directly; for
    /// multichannel tracks the mean mix is materialized once per track
    /// and cached until the next `put`.
    #[must_use]
    pub fn mono(&self) -> &[f32] {
        let track = self.track();
        if track.buffer.channels <= 1 {
            &track.buffer.samples
        } else {
            track.mono.get_or_init(|| track.buffer.mono_mix())
        }
    }
}
