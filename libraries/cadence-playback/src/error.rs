//! Error types for playback sequencing

use cadence_core::TlId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Track passed to `play` is not in the tracklist
    #[error("Track {0} is not in the tracklist")]
    InvalidTrackReference(TlId),

    /// No backend is registered for the track's URI scheme
    #[error("No backend available for URI scheme {scheme:?}")]
    BackendUnavailable {
        /// Scheme that failed to resolve (empty when the URI has none)
        scheme: String,
    },

    /// Backend refused the call
    #[error("Backend rejected {operation} for {uri}")]
    BackendRejected {
        /// Operation name (`play`, `pause`, ...)
        operation: &'static str,
        /// URI of the track involved
        uri: String,
    },

    /// Tracklist move with an empty or out-of-bounds range or target
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
