//! Collaborator traits for the Cadence playback engine
use crate::types::{TlId, TlTrack, Track};
use std::sync::Arc;

/// Ordered playlist the engine sequences over
///
/// Implementers own the entries and assign their ids. The engine only reads
/// through this trait, except for consume mode which removes finished
/// entries by id.
pub trait Tracklist: Send {
    /// All entries in playback order
    fn tl_tracks(&self) -> &[TlTrack];

    /// Remove the entry with the given id
    ///
    /// Returns the removed entry, or `None` if no entry had that id.
    fn remove(&mut self, tlid: TlId) -> Option<TlTrack>;

    /// Position of an entry, or `None` if it is not in the tracklist
    fn index_of(&self, tl_track: &TlTrack) -> Option<usize> {
        tl_track.position_in(self.tl_tracks())
    }

    /// Whether the entry is in the tracklist
    fn contains(&self, tl_track: &TlTrack) -> bool {
        self.index_of(tl_track).is_some()
    }

    /// Number of entries
    fn len(&self) -> usize {
        self.tl_tracks().len()
    }

    /// Whether the tracklist has no entries
    fn is_empty(&self) -> bool {
        self.tl_tracks().is_empty()
    }
}

/// Playback capability of a backend
///
/// Every call blocks until the backend has a definitive answer. The
/// returned flags mean accepted/refused; refusal is not an error and never
/// panics. Backends that run on their own thread are expected to block the
/// caller until the reply arrives.
pub trait PlaybackBackend: Send + Sync {
    /// Start playing a track from the beginning
    fn play(&self, track: &Track) -> bool;

    /// Pause the current track
    fn pause(&self) -> bool;

    /// Resume the current track
    fn resume(&self) -> bool;

    /// Stop playback
    fn stop(&self) -> bool;

    /// Seek to a position in milliseconds
    fn seek(&self, position_ms: u64) -> bool;

    /// Current position in milliseconds
    fn get_time_position(&self) -> u64;
}

impl<B: PlaybackBackend + ?Sized> PlaybackBackend for Arc<B> {
    fn play(&self, track: &Track) -> bool {
        (**self).play(track)
    }

    fn pause(&self) -> bool {
        (**self).pause()
    }

    fn resume(&self) -> bool {
        (**self).resume()
    }

    fn stop(&self) -> bool {
        (**self).stop()
    }

    fn seek(&self, position_ms: u64) -> bool {
        (**self).seek(position_ms)
    }

    fn get_time_position(&self) -> u64 {
        (**self).get_time_position()
    }
}

/// Maps URI schemes to playback backends
pub trait BackendRegistry: Send + Sync {
    /// Backend handling the given lowercase scheme, if any
    fn resolve(&self, uri_scheme: &str) -> Option<Arc<dyn PlaybackBackend>>;
}

/// Audio/volume collaborator
pub trait Mixer: Send {
    /// Current volume (0-100), `None` if unknown
    fn volume(&self) -> Option<u8>;

    /// Set volume (0-100)
    ///
    /// Returns whether the mixer accepted the change.
    fn set_volume(&mut self, volume: u8) -> bool;
}
