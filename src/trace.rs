//! Pipeline stage instrumentation
//!
//! The engine's compute-heavy inner stages mark themselves with a
//! [`Stage`] span so a `tracing` subscriber can attribute time to the
//! STFT fan-out, the ENF periodogram, or the splice scan. Without the
//! `tracing` feature, [`enter`] collapses to nothing and the guard is a
//! zero-sized type.

/// Compute-heavy stages worth attributing time to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Windowed FFT frames of a spectrogram call
    StftFrames,
    /// Welch periodogram backing the ENF scan
    EnfPeriodogram,
    /// Windowed first-difference splice scan
    SpliceScan,
}

impl Stage {
    /// Span field value identifying the stage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StftFrames => "stft_frames",
            Self::EnfPeriodogram => "enf_periodogram",
            Self::SpliceScan => "splice_scan",
        }
    }
}

/// Guard holding a stage span open; the span closes on drop
pub struct StageGuard {
    #[cfg(feature = "tracing")]
    _entered: tracing::span::EnteredSpan,
}

/// Enter a stage span for the enclosing scope.
///
/// Bind the result for as long as the stage runs; when the `tracing`
/// feature is disabled this costs nothing.
#[must_use]
pub fn enter(stage: Stage) -> StageGuard {
    #[cfg(feature = "tracing")]
    {
        StageGuard {
            _entered: tracing::debug_span!("stage", stage = stage.name()).entered(),
        }
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = stage;
        StageGuard {}
    }
}
