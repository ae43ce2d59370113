//! Shuffle order for random mode
//!
//! A regenerable Fisher-Yates permutation of the tracklist, consumed one
//! entry at a time as tracks start playing or get skipped.

use cadence_core::TlTrack;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Shuffled playing order used while `random` is on
///
/// `first_shuffle` distinguishes "never shuffled since the tracklist last
/// changed" from "one full random pass already played out". Only the former
/// (or `repeat`) allows an empty order to be regenerated.
#[derive(Debug, Clone)]
pub struct ShuffleOrder {
    /// Remaining entries, next to play first
    order: Vec<TlTrack>,

    /// No permutation generated since startup or the last reset
    first_shuffle: bool,

    rng: StdRng,
}

impl Default for ShuffleOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleOrder {
    /// Create an empty order seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty order with a fixed seed
    ///
    /// Two orders with the same seed produce the same permutations for the
    /// same inputs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            order: Vec::new(),
            first_shuffle: true,
            rng,
        }
    }

    /// Replace the random source with a seeded one
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Generate a fresh permutation of every entry in `tracks`
    pub fn regenerate(&mut self, tracks: &[TlTrack]) {
        debug!("Shuffling {} tracks", tracks.len());
        self.order = tracks.to_vec();
        self.order.shuffle(&mut self.rng);
        self.first_shuffle = false;
    }

    /// Regenerate if the order is empty and regeneration is allowed
    ///
    /// Allowed when `repeat` is on or no permutation has been generated since
    /// the last reset. Returns whether a new permutation was generated.
    pub fn refill(&mut self, tracks: &[TlTrack], repeat: bool) -> bool {
        if !self.order.is_empty() || !(repeat || self.first_shuffle) {
            return false;
        }
        self.regenerate(tracks);
        true
    }

    /// Next entry in shuffled order, without consuming it
    pub fn peek(&self) -> Option<&TlTrack> {
        self.order.first()
    }

    /// Evict an entry, returning whether it was present
    pub fn remove(&mut self, tl_track: &TlTrack) -> bool {
        match self.order.iter().position(|entry| entry == tl_track) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the entry is still waiting to be played
    pub fn contains(&self, tl_track: &TlTrack) -> bool {
        self.order.contains(tl_track)
    }

    /// Forget the current permutation and allow a fresh first shuffle
    pub fn reset(&mut self) {
        self.order.clear();
        self.first_shuffle = true;
    }

    /// Whether no permutation has been generated since the last reset
    pub fn is_first_shuffle(&self) -> bool {
        self.first_shuffle
    }

    /// Remaining entries, next to play first
    pub fn remaining(&self) -> &[TlTrack] {
        &self.order
    }

    /// Number of remaining entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no entries remain
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{TlId, Track};
    use std::collections::HashSet;

    fn create_test_tracks(count: u64) -> Vec<TlTrack> {
        (1..=count)
            .map(|i| TlTrack::new(TlId::new(i), Track::new(format!("dummy:track{}", i))))
            .collect()
    }

    #[test]
    fn regenerate_contains_every_track_once() {
        let tracks = create_test_tracks(20);
        let mut order = ShuffleOrder::with_seed(7);

        order.regenerate(&tracks);

        let ids: HashSet<TlId> = order.remaining().iter().map(|t| t.tlid).collect();
        assert_eq!(ids.len(), 20);
        assert_eq!(order.len(), 20);
        assert!(!order.is_first_shuffle());
    }

    #[test]
    fn same_seed_same_permutation() {
        let tracks = create_test_tracks(10);
        let mut first = ShuffleOrder::with_seed(42);
        let mut second = ShuffleOrder::with_seed(42);

        first.regenerate(&tracks);
        second.regenerate(&tracks);

        assert_eq!(first.remaining(), second.remaining());
    }

    #[test]
    fn refill_only_first_time_without_repeat() {
        let tracks = create_test_tracks(3);
        let mut order = ShuffleOrder::with_seed(1);

        assert!(order.refill(&tracks, false));
        for track in &tracks {
            assert!(order.remove(track));
        }
        assert!(order.is_empty());

        // One pass played out: no regeneration without repeat
        assert!(!order.refill(&tracks, false));
        assert!(order.is_empty());

        // Repeat always allows a new pass
        assert!(order.refill(&tracks, true));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn refill_leaves_non_empty_order_alone() {
        let tracks = create_test_tracks(4);
        let mut order = ShuffleOrder::with_seed(3);
        order.regenerate(&tracks);
        order.remove(&tracks[0]);

        assert!(!order.refill(&tracks, true));
        assert_eq!(order.len(), 3);
        assert!(!order.contains(&tracks[0]));
    }

    #[test]
    fn reset_restores_first_shuffle() {
        let tracks = create_test_tracks(2);
        let mut order = ShuffleOrder::with_seed(5);
        order.regenerate(&tracks);

        order.reset();

        assert!(order.is_empty());
        assert!(order.is_first_shuffle());
        assert!(order.refill(&tracks, false));
    }

    #[test]
    fn remove_missing_entry_is_false() {
        let tracks = create_test_tracks(2);
        let mut order = ShuffleOrder::with_seed(9);
        order.regenerate(&tracks[..1]);

        assert!(!order.remove(&tracks[1]));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn empty_tracklist_shuffle() {
        let mut order = ShuffleOrder::with_seed(11);
        assert!(order.refill(&[], false));
        assert!(order.peek().is_none());
        assert!(!order.is_first_shuffle());
    }
}
