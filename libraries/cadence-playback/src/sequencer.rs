//! Track sequencing
//!
//! Decides which tracklist entry follows the current one for an explicit
//! `next`, an explicit `previous`, and the natural end of a track. The only
//! state it keeps is the shuffle order; positions are always recomputed
//! from the live tracklist.

use crate::options::PlaybackOptions;
use crate::shuffle::ShuffleOrder;
use cadence_core::TlTrack;

/// Computes next/previous/end-of-track candidates
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    shuffle: ShuffleOrder,
}

impl Sequencer {
    /// Create a sequencer with an entropy-seeded shuffle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequencer with a deterministic shuffle
    pub fn with_seed(seed: u64) -> Self {
        Self {
            shuffle: ShuffleOrder::with_seed(seed),
        }
    }

    /// Shuffle state, read-only
    pub fn shuffle(&self) -> &ShuffleOrder {
        &self.shuffle
    }

    /// Shuffle state, for eviction and forced regeneration
    pub fn shuffle_mut(&mut self) -> &mut ShuffleOrder {
        &mut self.shuffle
    }

    /// Position of `current` in `tracks`
    ///
    /// `None` when there is no current track or it has left the tracklist.
    pub fn current_index(tracks: &[TlTrack], current: Option<&TlTrack>) -> Option<usize> {
        current?.position_in(tracks)
    }

    /// Entry an explicit `next` would switch to
    pub fn track_at_next(
        &mut self,
        tracks: &[TlTrack],
        current: Option<&TlTrack>,
        options: PlaybackOptions,
    ) -> Option<TlTrack> {
        self.following(tracks, current, options, false)
    }

    /// Entry played when the current track ends naturally
    ///
    /// Same as [`track_at_next`](Self::track_at_next) except that
    /// `repeat` + `single` loops the current track.
    pub fn track_at_eot(
        &mut self,
        tracks: &[TlTrack],
        current: Option<&TlTrack>,
        options: PlaybackOptions,
    ) -> Option<TlTrack> {
        self.following(tracks, current, options, true)
    }

    /// Entry an explicit `previous` would switch to
    ///
    /// In repeat, consume and random mode this is the current track itself.
    pub fn track_at_previous(
        tracks: &[TlTrack],
        current: Option<&TlTrack>,
        options: PlaybackOptions,
    ) -> Option<TlTrack> {
        if options.previous_is_current() {
            return current.cloned();
        }

        match Self::current_index(tracks, current) {
            None | Some(0) => None,
            Some(index) => tracks.get(index - 1).cloned(),
        }
    }

    fn following(
        &mut self,
        tracks: &[TlTrack],
        current: Option<&TlTrack>,
        options: PlaybackOptions,
        end_of_track: bool,
    ) -> Option<TlTrack> {
        if tracks.is_empty() {
            return None;
        }

        // An exhausted order without repeat is the end of the random pass
        if options.random {
            self.shuffle.refill(tracks, options.repeat);
            return self.shuffle.peek().cloned();
        }

        let Some(current) = current else {
            return tracks.first().cloned();
        };

        // A current track that has left the tracklist restarts from the top
        let index = Self::current_index(tracks, Some(current));

        if options.repeat {
            if end_of_track && options.single {
                return match index {
                    Some(index) => tracks.get(index).cloned(),
                    None => tracks.first().cloned(),
                };
            }
            let next = index.map_or(0, |index| (index + 1) % tracks.len());
            return tracks.get(next).cloned();
        }

        match index {
            Some(index) => tracks.get(index + 1).cloned(),
            None => tracks.first().cloned(),
        }
    }
}
