//! In-memory tracklist
//!
//! Ordered list of tracklist entries with stable ids. Every structural
//! change bumps `version` so frontends can tell when to re-read it.

use crate::error::{PlaybackError, Result};
use cadence_core::{TlId, TlTrack, Track, Tracklist};
use std::ops::Range;

/// Tracklist backed by a `Vec`
///
/// Ids start at 1 and are never reused, even after `clear`.
#[derive(Debug, Clone)]
pub struct MemoryTracklist {
    /// Entries in playback order
    tl_tracks: Vec<TlTrack>,

    /// Next id to hand out
    next_tlid: u64,

    /// Bumped on every structural change
    version: u64,
}

impl Default for MemoryTracklist {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTracklist {
    /// Create an empty tracklist
    pub fn new() -> Self {
        Self {
            tl_tracks: Vec::new(),
            next_tlid: 1,
            version: 0,
        }
    }

    /// Create a tracklist holding `tracks` in order
    pub fn with_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut tracklist = Self::new();
        tracklist.add(tracks, None);
        tracklist
    }

    /// Add tracks, at the end or before `at_position`
    ///
    /// Positions past the end append. Returns the new entries.
    pub fn add(
        &mut self,
        tracks: impl IntoIterator<Item = Track>,
        at_position: Option<usize>,
    ) -> Vec<TlTrack> {
        let added: Vec<TlTrack> = tracks
            .into_iter()
            .map(|track| {
                let tlid = TlId::new(self.next_tlid);
                self.next_tlid += 1;
                TlTrack::new(tlid, track)
            })
            .collect();

        if added.is_empty() {
            return added;
        }

        let position = at_position
            .unwrap_or(self.tl_tracks.len())
            .min(self.tl_tracks.len());
        self.tl_tracks
            .splice(position..position, added.iter().cloned());
        self.version += 1;
        added
    }

    /// Entry with the given id
    pub fn get(&self, tlid: TlId) -> Option<&TlTrack> {
        self.tl_tracks.iter().find(|entry| entry.tlid == tlid)
    }

    /// Entry at a position
    pub fn at(&self, position: usize) -> Option<&TlTrack> {
        self.tl_tracks.get(position)
    }

    /// Move entries in `range` so the block starts at `to`
    ///
    /// `to` is a position in the list with the block taken out.
    pub fn move_range(&mut self, range: Range<usize>, to: usize) -> Result<()> {
        let len = self.tl_tracks.len();
        if range.is_empty() || range.end > len {
            return Err(PlaybackError::InvalidMove(format!(
                "range {}..{} for {} tracks",
                range.start, range.end, len
            )));
        }
        let block_len = range.end - range.start;
        if to > len - block_len {
            return Err(PlaybackError::InvalidMove(format!(
                "target {} out of bounds",
                to
            )));
        }

        let block: Vec<TlTrack> = self.tl_tracks.drain(range).collect();
        self.tl_tracks.splice(to..to, block);
        self.version += 1;
        Ok(())
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        if !self.tl_tracks.is_empty() {
            self.tl_tracks.clear();
            self.version += 1;
        }
    }

    /// Change counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Plain tracks, in order
    pub fn tracks(&self) -> Vec<Track> {
        self.tl_tracks.iter().map(|entry| entry.track.clone()).collect()
    }
}

impl Tracklist for MemoryTracklist {
    fn tl_tracks(&self) -> &[TlTrack] {
        &self.tl_tracks
    }

    fn remove(&mut self, tlid: TlId) -> Option<TlTrack> {
        let index = self.tl_tracks.iter().position(|entry| entry.tlid == tlid)?;
        self.version += 1;
        Some(self.tl_tracks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(tracklist: &MemoryTracklist) -> Vec<String> {
        tracklist.tracks().into_iter().map(|t| t.uri).collect()
    }

    fn create_test_tracks(names: &[&str]) -> Vec<Track> {
        names.iter().map(|n| Track::new(format!("dummy:{}", n))).collect()
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut tracklist = MemoryTracklist::with_tracks(create_test_tracks(&["a", "b"]));
        assert_eq!(tracklist.at(0).unwrap().tlid, TlId::new(1));
        assert_eq!(tracklist.at(1).unwrap().tlid, TlId::new(2));

        tracklist.clear();
        let added = tracklist.add(create_test_tracks(&["c"]), None);
        assert_eq!(added[0].tlid, TlId::new(3));
    }

    #[test]
    fn add_at_position_inserts_before() {
        let mut tracklist = MemoryTracklist::with_tracks(create_test_tracks(&["a", "d"]));
        tracklist.add(create_test_tracks(&["b", "c"]), Some(1));
        assert_eq!(uris(&tracklist), vec!["dummy:a", "dummy:b", "dummy:c", "dummy:d"]);

        tracklist.add(create_test_tracks(&["e"]), Some(99));
        assert_eq!(tracklist.len(), 5);
        assert_eq!(tracklist.at(4).unwrap().track.uri, "dummy:e");
    }

    #[test]
    fn remove_by_id_bumps_version() {
        let mut tracklist = MemoryTracklist::with_tracks(create_test_tracks(&["a", "b"]));
        let version = tracklist.version();

        let removed = tracklist.remove(TlId::new(1)).unwrap();
        assert_eq!(removed.track.uri, "dummy:a");
        assert_eq!(tracklist.version(), version + 1);

        assert!(tracklist.remove(TlId::new(1)).is_none());
        assert_eq!(tracklist.version(), version + 1);
    }

    #[test]
    fn move_range_reorders_block() {
        let mut tracklist =
            MemoryTracklist::with_tracks(create_test_tracks(&["a", "b", "c", "d", "e"]));

        tracklist.move_range(0..2, 3).unwrap();
        assert_eq!(
            uris(&tracklist),
            vec!["dummy:c", "dummy:d", "dummy:e", "dummy:a", "dummy:b"]
        );

        assert!(tracklist.move_range(2..2, 0).is_err());
        assert!(tracklist.move_range(0..1, 5).is_err());
    }

    #[test]
    fn membership_follows_identity() {
        let tracklist = MemoryTracklist::with_tracks(create_test_tracks(&["a", "a"]));
        let first = tracklist.at(0).unwrap().clone();
        let second = tracklist.at(1).unwrap().clone();

        assert_eq!(tracklist.index_of(&first), Some(0));
        assert_eq!(tracklist.index_of(&second), Some(1));

        let stranger = TlTrack::new(TlId::new(42), Track::new("dummy:a"));
        assert!(!tracklist.contains(&stranger));
    }

    #[test]
    fn empty_add_is_not_a_change() {
        let mut tracklist = MemoryTracklist::new();
        assert!(tracklist.add(Vec::new(), None).is_empty());
        assert_eq!(tracklist.version(), 0);
        assert!(tracklist.is_empty());
    }
}
