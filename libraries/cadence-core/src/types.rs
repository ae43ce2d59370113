//! Domain types shared by the playback engine and its collaborators

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Tracklist identifier
///
/// Assigned by the tracklist when a track is added. Stable for the lifetime
/// of the entry, so the same track added twice gets two different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TlId(u64);

impl TlId {
    /// Create a new tracklist ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playable track descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Track URI, the scheme selects the backend (`local:`, `spotify:`, ...)
    pub uri: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Track length in milliseconds, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

impl Track {
    /// Create a track with only a URI
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            length: None,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the length in milliseconds
    #[must_use]
    pub fn with_length(mut self, length_ms: u64) -> Self {
        self.length = Some(length_ms);
        self
    }

    /// Lowercase URI scheme, or `None` when the URI has no parseable scheme
    pub fn uri_scheme(&self) -> Option<String> {
        self.parsed_scheme().ok()
    }

    /// Lowercase URI scheme, failing with `CoreError::InvalidUri`
    pub fn parsed_scheme(&self) -> Result<String> {
        Url::parse(&self.uri)
            .map(|url| url.scheme().to_ascii_lowercase())
            .map_err(|_| CoreError::InvalidUri(self.uri.clone()))
    }
}

/// A tracklist entry: stable id plus the track it refers to
///
/// Immutable once created. Equality compares both halves, so two entries
/// for the same track are still distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TlTrack {
    /// Stable tracklist identifier
    pub tlid: TlId,

    /// Track descriptor
    pub track: Track,
}

impl TlTrack {
    /// Pair an id with a track
    pub fn new(tlid: TlId, track: Track) -> Self {
        Self { tlid, track }
    }

    /// Position of this entry in `tracks`
    pub fn position_in(&self, tracks: &[TlTrack]) -> Option<usize> {
        tracks.iter().position(|entry| entry == self)
    }
}

/// Playback state
///
/// ```text
/// Stopped -> Playing  (play)
/// Stopped -> Paused   (pause)
/// Playing -> Stopped  (stop)
/// Playing -> Paused   (pause)
/// Playing -> Playing  (play)
/// Paused  -> Playing  (resume)
/// Paused  -> Stopped  (stop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing playing
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

impl PlaybackState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which way to step when a track turns out to be unplayable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Continue with the next track
    #[default]
    Forward,

    /// Continue with the previous track
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_scheme_is_lowercased() {
        let track = Track::new("Spotify:track:abc");
        assert_eq!(track.uri_scheme().as_deref(), Some("spotify"));
    }

    #[test]
    fn file_uri_scheme() {
        let track = Track::new("file:///music/song.mp3");
        assert_eq!(track.uri_scheme().as_deref(), Some("file"));
    }

    #[test]
    fn uri_without_scheme_has_none() {
        let track = Track::new("/music/song.mp3");
        assert_eq!(track.uri_scheme(), None);
        assert_eq!(
            track.parsed_scheme(),
            Err(CoreError::InvalidUri("/music/song.mp3".to_string()))
        );
    }

    #[test]
    fn tl_tracks_with_same_track_differ_by_id() {
        let track = Track::new("dummy:a");
        let first = TlTrack::new(TlId::new(1), track.clone());
        let second = TlTrack::new(TlId::new(2), track);
        assert_ne!(first, second);
    }

    #[test]
    fn position_in_matches_by_id_and_track() {
        let track = Track::new("dummy:a");
        let tracks = vec![
            TlTrack::new(TlId::new(1), track.clone()),
            TlTrack::new(TlId::new(2), track.clone()),
        ];
        assert_eq!(tracks[1].position_in(&tracks), Some(1));
        assert_eq!(TlTrack::new(TlId::new(3), track).position_in(&tracks), None);
    }

    #[test]
    fn tlid_serializes_transparently() {
        let json = serde_json::to_string(&TlId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn playback_state_display() {
        assert_eq!(PlaybackState::Stopped.to_string(), "stopped");
        assert_eq!(PlaybackState::Playing.to_string(), "playing");
        assert_eq!(PlaybackState::Paused.to_string(), "paused");
        assert_eq!(PlaybackState::default(), PlaybackState::Stopped);
    }
}
