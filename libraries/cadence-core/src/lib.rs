//! Cadence Core
//!
//! Shared types and collaborator traits for the Cadence playback engine.
//!
//! This crate defines the seams the sequencing engine talks through:
//! - **Domain Types**: `Track`, `TlTrack`, `TlId`, `PlaybackState`, `Direction`
//! - **Collaborator Traits**: `Tracklist`, `PlaybackBackend`, `BackendRegistry`, `Mixer`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! Nothing in here plays audio. Backends, playlists and mixers are provided
//! by the embedding application and handed to `cadence-playback`.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{TlId, TlTrack, Track};
//!
//! let track = Track::new("local:track:intro.flac").with_length(215_000);
//! let entry = TlTrack::new(TlId::new(1), track);
//!
//! assert_eq!(entry.track.uri_scheme().as_deref(), Some("local"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{BackendRegistry, Mixer, PlaybackBackend, Tracklist};
pub use types::{Direction, PlaybackState, TlId, TlTrack, Track};
