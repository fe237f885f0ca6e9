//! Error types for phonoscope
//!
//! Every failure the engine can produce is one of three families:
//! input errors (the caller handed us something unusable), state errors
//! (a read against an empty store), and resource errors (I/O, memory).
//! Each variant carries a human-readable message via `Display` and a
//! stable machine-readable kind via [`PhonoscopeError::kind`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type PhonoscopeResult<T> = Result<T, PhonoscopeError>;

/// Errors that can occur during engine operations
#[derive(Debug, Error)]
pub enum PhonoscopeError {
    /// Input file does not exist
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Container or codec not recognized by the decoder
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Input recognized but undecodable (corrupt frames, missing stream parameters)
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Command parameter outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Export range is empty after clipping to the track duration
    #[error("empty range: [{start_s}, {end_s}) selects no samples")]
    EmptyRange {
        /// Requested range start in seconds
        start_s: f64,
        /// Requested range end in seconds
        end_s: f64,
    },

    /// Read against an empty sample store
    #[error("no track loaded")]
    NoTrack,

    /// Decoded track would exceed the configured byte ceiling
    #[error("track would exceed memory ceiling: {required} bytes > {limit} bytes")]
    OutOfMemory {
        /// Bytes the track would occupy
        required: u64,
        /// Configured ceiling in bytes
        limit: u64,
    },

    /// I/O error other than not-found / permission-denied
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),

    /// Filesystem permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
}

impl PhonoscopeError {
    /// Stable machine-readable kind for transport to a UI layer.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "file_not_found",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::MalformedInput(_) => "malformed_input",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::EmptyRange { .. } => "empty_range",
            Self::NoTrack => "no_track",
            Self::OutOfMemory { .. } => "out_of_memory",
            Self::Io(_) => "io_error",
            Self::PermissionDenied(_) => "permission_denied",
        }
    }

    /// Map an I/O error observed while touching `path` onto the taxonomy.
    ///
    /// Not-found and permission-denied get their own variants so the UI
    /// can distinguish them; everything else is a generic I/O failure.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}
