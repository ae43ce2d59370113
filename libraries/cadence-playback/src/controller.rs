//! Playback controller - the playback state machine
//!
//! Owns the playback state, the current tracklist entry and the mode flags.
//! Asks the [`Sequencer`] what comes next, resolves a backend by URI scheme,
//! issues one blocking backend call at a time, and reports every change to
//! the registered listeners.
//!
//! Unplayable tracks are skipped in the direction the caller asked for,
//! trying each tracklist entry at most once. When every candidate fails,
//! playback settles into `Stopped` with no current track.

use crate::{
    config::PlaybackConfig,
    error::{PlaybackError, Result},
    events::{ChannelListener, Listeners, PlaybackEvent, PlaybackListener},
    options::{PlaybackOption, PlaybackOptions},
    sequencer::Sequencer,
    tracklist::MemoryTracklist,
};
use cadence_core::{
    BackendRegistry, Direction, Mixer, PlaybackBackend, PlaybackState, TlId, TlTrack, Track,
    Tracklist,
};
use crossbeam_channel::Receiver;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Playback state machine over a tracklist and a set of backends
pub struct PlaybackController<T: Tracklist = MemoryTracklist> {
    /// Entries to sequence over
    tracklist: T,

    /// Scheme to backend lookup
    backends: Arc<dyn BackendRegistry>,

    /// Volume collaborator, if any
    mixer: Option<Box<dyn Mixer>>,

    /// Event sinks
    listeners: Listeners,

    /// Next/previous/end-of-track policy and the shuffle order
    sequencer: Sequencer,

    /// consume/random/repeat/single
    options: PlaybackOptions,

    state: PlaybackState,

    /// Playing or selected entry
    current: Option<TlTrack>,

    /// Volume used when no mixer is attached
    fallback_volume: Option<u8>,
}

impl<T: Tracklist> fmt::Debug for PlaybackController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("options", &self.options)
            .field("tracks", &self.tracklist.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<T: Tracklist> PlaybackController<T> {
    /// Create a stopped controller with all options off
    pub fn new(tracklist: T, backends: Arc<dyn BackendRegistry>) -> Self {
        Self::with_config(tracklist, backends, &PlaybackConfig::default())
    }

    /// Create a stopped controller with initial options, volume and shuffle seed
    ///
    /// Applying the initial options does not emit `options_changed`.
    pub fn with_config(
        tracklist: T,
        backends: Arc<dyn BackendRegistry>,
        config: &PlaybackConfig,
    ) -> Self {
        let sequencer = match config.shuffle_seed {
            Some(seed) => Sequencer::with_seed(seed),
            None => Sequencer::new(),
        };

        Self {
            tracklist,
            backends,
            mixer: None,
            listeners: Listeners::new(),
            sequencer,
            options: config.options,
            state: PlaybackState::Stopped,
            current: None,
            fallback_volume: config.volume.map(|volume| volume.min(100)),
        }
    }

    /// Register an event listener
    pub fn add_listener(&mut self, listener: Arc<dyn PlaybackListener>) {
        self.listeners.add(listener);
    }

    /// Register a channel listener and return its receiving end
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        self.add_listener(Arc::new(ChannelListener::new(event_tx)));
        event_rx
    }

    /// Attach a volume collaborator
    pub fn set_mixer(&mut self, mixer: Box<dyn Mixer>) {
        self.mixer = Some(mixer);
    }

    // ===== Tracklist =====

    /// The tracklist being sequenced
    pub fn tracklist(&self) -> &T {
        &self.tracklist
    }

    /// Mutate the tracklist, then react to the change
    ///
    /// The shuffle order is thrown away, and playback stops if the current
    /// entry did not survive the edit.
    pub fn edit_tracklist<R>(&mut self, edit: impl FnOnce(&mut T) -> R) -> R {
        let result = edit(&mut self.tracklist);
        self.on_tracklist_change();
        result
    }

    /// Tell the controller the tracklist changed structurally
    pub fn on_tracklist_change(&mut self) {
        debug!("Tracklist changed, resetting shuffle");
        self.sequencer.shuffle_mut().reset();

        let current_gone = match &self.current {
            Some(current) => !self.tracklist.contains(current),
            None => true,
        };
        if self.tracklist.is_empty() || current_gone {
            self.stop(true);
        }
    }

    // ===== Options =====

    /// Snapshot of the mode flags
    pub fn options(&self) -> PlaybackOptions {
        self.options
    }

    /// Whether finished tracks are removed from the tracklist
    pub fn consume(&self) -> bool {
        self.options.consume
    }

    /// Whether tracks are picked from a shuffled order
    pub fn random(&self) -> bool {
        self.options.random
    }

    /// Whether the tracklist loops
    pub fn repeat(&self) -> bool {
        self.options.repeat
    }

    /// Whether playback stops (or loops, with repeat) after the current track
    pub fn single(&self) -> bool {
        self.options.single
    }

    /// Set a mode flag
    ///
    /// Emits `options_changed` before the new value takes effect, and only
    /// if the value actually changes. Returns whether it changed.
    pub fn set_option(&mut self, option: PlaybackOption, value: bool) -> bool {
        if self.options.get(option) == value {
            return false;
        }
        self.emit(PlaybackEvent::OptionsChanged);
        self.options.replace(option, value);
        info!("Option {} set to {}", option, value);
        true
    }

    /// Set `consume`, returning whether it changed
    pub fn set_consume(&mut self, value: bool) -> bool {
        self.set_option(PlaybackOption::Consume, value)
    }

    /// Set `random`, returning whether it changed
    pub fn set_random(&mut self, value: bool) -> bool {
        self.set_option(PlaybackOption::Random, value)
    }

    /// Set `repeat`, returning whether it changed
    pub fn set_repeat(&mut self, value: bool) -> bool {
        self.set_option(PlaybackOption::Repeat, value)
    }

    /// Set `single`, returning whether it changed
    pub fn set_single(&mut self, value: bool) -> bool {
        self.set_option(PlaybackOption::Single, value)
    }

    /// Reseed the shuffle and discard the current order
    ///
    /// The next random pick regenerates the order from the seed.
    pub fn reseed_shuffle(&mut self, seed: u64) {
        let shuffle = self.sequencer.shuffle_mut();
        shuffle.reseed(seed);
        shuffle.reset();
    }

    // ===== Queries =====

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Playing or selected entry
    pub fn current_tl_track(&self) -> Option<&TlTrack> {
        self.current.as_ref()
    }

    /// Track of the playing or selected entry
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref().map(|current| &current.track)
    }

    /// Id of the playing or selected entry
    pub fn current_tlid(&self) -> Option<TlId> {
        self.current.as_ref().map(|current| current.tlid)
    }

    /// Position of the current entry in the tracklist
    pub fn tracklist_position(&self) -> Option<usize> {
        Sequencer::current_index(self.tracklist.tl_tracks(), self.current.as_ref())
    }

    /// Entry `next()` would switch to
    ///
    /// Takes `&mut self` because random mode may have to (re)generate the
    /// shuffle order to answer.
    pub fn tl_track_at_next(&mut self) -> Option<TlTrack> {
        self.sequencer
            .track_at_next(self.tracklist.tl_tracks(), self.current.as_ref(), self.options)
    }

    /// Track `next()` would switch to
    pub fn track_at_next(&mut self) -> Option<Track> {
        self.tl_track_at_next().map(|entry| entry.track)
    }

    /// Entry `previous()` would switch to
    pub fn tl_track_at_previous(&self) -> Option<TlTrack> {
        Sequencer::track_at_previous(
            self.tracklist.tl_tracks(),
            self.current.as_ref(),
            self.options,
        )
    }

    /// Track `previous()` would switch to
    pub fn track_at_previous(&self) -> Option<Track> {
        self.tl_track_at_previous().map(|entry| entry.track)
    }

    /// Entry played when the current track ends on its own
    pub fn tl_track_at_eot(&mut self) -> Option<TlTrack> {
        self.sequencer
            .track_at_eot(self.tracklist.tl_tracks(), self.current.as_ref(), self.options)
    }

    /// Track played when the current track ends on its own
    pub fn track_at_eot(&mut self) -> Option<Track> {
        self.tl_track_at_eot().map(|entry| entry.track)
    }

    /// Position in the current track in milliseconds, 0 without a backend
    pub fn time_position(&self) -> u64 {
        self.current_backend()
            .map_or(0, |backend| backend.get_time_position())
    }

    /// Shuffle order not yet played, in playback order
    pub fn shuffled_remaining(&self) -> &[TlTrack] {
        self.sequencer.shuffle().remaining()
    }

    // ===== Volume =====

    /// Volume (0-100), from the mixer or the fallback value
    pub fn volume(&self) -> Option<u8> {
        match &self.mixer {
            Some(mixer) => mixer.volume(),
            None => self.fallback_volume,
        }
    }

    /// Set the volume, clamped to 0-100
    ///
    /// Without a mixer the value is only remembered. Returns whether it
    /// was accepted.
    pub fn set_volume(&mut self, volume: u8) -> bool {
        let volume = volume.min(100);
        match &mut self.mixer {
            Some(mixer) => mixer.set_volume(volume),
            None => {
                self.fallback_volume = Some(volume);
                true
            }
        }
    }

    // ===== Transport =====

    /// Play an entry, or carry on with the current one
    ///
    /// With `Some(entry)`, the entry must be in the tracklist. With `None`:
    /// a paused controller resumes, an existing current entry is replayed,
    /// and otherwise the next (`Forward`) or previous (`Backward`) entry is
    /// picked. Unplayable entries are skipped in `direction`.
    ///
    /// # Errors
    /// `InvalidTrackReference` if `tl_track` is not in the tracklist.
    pub fn play(&mut self, tl_track: Option<TlTrack>, direction: Direction) -> Result<()> {
        if let Some(tl_track) = tl_track {
            if !self.tracklist.contains(&tl_track) {
                return Err(PlaybackError::InvalidTrackReference(tl_track.tlid));
            }
            self.start(tl_track, direction);
            return Ok(());
        }

        if self.state == PlaybackState::Paused {
            self.resume();
            return Ok(());
        }

        self.play_current(direction);
        Ok(())
    }

    /// Pause playback
    ///
    /// Pauses even without a backend for the current track. A backend that
    /// refuses leaves the state untouched.
    pub fn pause(&mut self) {
        if let Some(backend) = self.current_backend() {
            if !backend.pause() {
                warn!("Backend refused to pause {}", self.current_uri());
                return;
            }
        }

        self.set_state(PlaybackState::Paused);
        if let Some(current) = &self.current {
            self.emit(PlaybackEvent::TrackPlaybackPaused {
                track: current.track.clone(),
                time_position: self.time_position(),
            });
        }
    }

    /// Resume playback if paused
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }

        let Some(backend) = self.current_backend() else {
            debug!("No backend to resume {}", self.current_uri());
            return;
        };
        if !backend.resume() {
            warn!("Backend refused to resume {}", self.current_uri());
            return;
        }

        self.set_state(PlaybackState::Playing);
        if let Some(current) = &self.current {
            self.emit(PlaybackEvent::TrackPlaybackResumed {
                track: current.track.clone(),
                time_position: self.time_position(),
            });
        }
    }

    /// Stop playback, optionally forgetting the current entry
    ///
    /// The entry is cleared even if the backend refuses to stop.
    pub fn stop(&mut self, clear_current: bool) {
        self.halt(true);
        if clear_current {
            self.current = None;
        }
    }

    /// Seek in the current track
    ///
    /// Starts or resumes playback first if needed. Negative positions clamp
    /// to 0. A position past the end of a track with known length skips to
    /// the next entry and reports success.
    pub fn seek(&mut self, position_ms: i64) -> bool {
        if self.tracklist.is_empty() {
            return false;
        }

        match self.state {
            PlaybackState::Stopped => self.play_current(Direction::Forward),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Playing => {}
        }

        let Some(current) = self.current.clone() else {
            return false;
        };

        let position_ms = u64::try_from(position_ms).unwrap_or(0);
        if current.track.length.is_some_and(|length| position_ms > length) {
            debug!("Seek past end of {}, skipping", current.track.uri);
            self.next();
            return true;
        }

        let Some(backend) = self.current_backend() else {
            return false;
        };
        if !backend.seek(position_ms) {
            warn!("Backend refused to seek {} to {}ms", current.track.uri, position_ms);
            return false;
        }

        self.emit(PlaybackEvent::Seeked {
            time_position: position_ms,
        });
        true
    }

    /// Switch to the next entry, keeping the playing/paused state
    ///
    /// Stops and clears the current entry when there is nothing next.
    pub fn next(&mut self) {
        match self.tl_track_at_next() {
            Some(next) => {
                self.announce_track_ended();
                self.change_track(Some(next), Direction::Forward);
            }
            None => self.stop(true),
        }
    }

    /// Switch to the previous entry, keeping the playing/paused state
    pub fn previous(&mut self) {
        self.announce_track_ended();
        let previous = self.tl_track_at_previous();
        self.change_track(previous, Direction::Backward);
    }

    /// Make `tl_track` current without changing the playing/paused state
    ///
    /// The old track is stopped without a second `track_playback_ended`;
    /// callers announce the end themselves.
    pub fn change_track(&mut self, tl_track: Option<TlTrack>, direction: Direction) {
        let old_state = self.state;
        self.halt(false);
        self.current = tl_track;

        match old_state {
            PlaybackState::Playing => self.play_current(direction),
            PlaybackState::Paused => {
                // The backend has to be playing the new track before it can pause it
                self.play_current(direction);
                if self.state == PlaybackState::Playing {
                    self.pause();
                }
            }
            PlaybackState::Stopped => {}
        }
    }

    /// Tell the controller the current track finished on its own
    pub fn on_end_of_track(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        let finished = self.current.clone();

        match self.tl_track_at_eot() {
            Some(next) => {
                self.announce_track_ended();
                self.start(next, Direction::Forward);
            }
            None => self.stop(true),
        }

        if self.options.consume {
            if let Some(finished) = finished {
                if self.tracklist.remove(finished.tlid).is_some() {
                    debug!("Consumed {}", finished.track.uri);
                    self.on_tracklist_change();
                }
            }
        }
    }

    // ===== Internals =====

    /// Replay the current entry, or pick one in `direction`
    fn play_current(&mut self, direction: Direction) {
        let target = match self.current.clone() {
            Some(current) => Some(current),
            None => self.step(direction),
        };

        match target {
            Some(target) => self.start(target, direction),
            None => debug!("Nothing to play"),
        }
    }

    fn step(&mut self, direction: Direction) -> Option<TlTrack> {
        match direction {
            Direction::Forward => self.tl_track_at_next(),
            Direction::Backward => self.tl_track_at_previous(),
        }
    }

    /// Step in `direction` to an entry not yet in `tried`
    ///
    /// A regenerated shuffle can lead with an entry that already failed;
    /// in random mode those are evicted and stepped over.
    fn step_untried(&mut self, direction: Direction, tried: &[TlId]) -> Option<TlTrack> {
        for _ in 0..=tried.len() {
            let next = self.step(direction)?;
            if !tried.contains(&next.tlid) {
                return Some(next);
            }
            if !self.options.random {
                return None;
            }
            self.sequencer.shuffle_mut().remove(&next);
        }
        None
    }

    /// Start `first`, skipping unplayable entries in `direction`
    fn start(&mut self, first: TlTrack, direction: Direction) {
        let budget = self.tracklist.len().max(1);
        let mut tried: Vec<TlId> = Vec::with_capacity(budget);
        let mut candidate = first;

        loop {
            tried.push(candidate.tlid);
            self.current = Some(candidate.clone());
            self.set_state(PlaybackState::Playing);

            match self.start_backend(&candidate.track) {
                Ok(()) => {
                    self.evict_current_from_shuffle();
                    self.emit(PlaybackEvent::TrackPlaybackStarted {
                        track: candidate.track,
                    });
                    return;
                }
                Err(e) => {
                    warn!("Skipping unplayable track {}: {}", candidate.track.uri, e);
                    if self.options.random {
                        self.sequencer.shuffle_mut().remove(&candidate);
                    }
                }
            }

            if tried.len() >= budget {
                break;
            }
            match self.step_untried(direction, &tried) {
                Some(next) => candidate = next,
                None => break,
            }
        }

        warn!("No playable track found after {} attempt(s)", tried.len());
        self.current = None;
        self.set_state(PlaybackState::Stopped);
    }

    fn start_backend(&self, track: &Track) -> Result<()> {
        let backend = self.backend_for(track)?;
        if backend.play(track) {
            Ok(())
        } else {
            Err(PlaybackError::BackendRejected {
                operation: "play",
                uri: track.uri.clone(),
            })
        }
    }

    /// Stop the backend and move to `Stopped`
    ///
    /// Does nothing if the backend refuses.
    fn halt(&mut self, announce: bool) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        if let Some(backend) = self.current_backend() {
            if !backend.stop() {
                warn!("Backend refused to stop {}", self.current_uri());
                return;
            }
        }

        if announce {
            self.announce_track_ended();
        }
        self.set_state(PlaybackState::Stopped);
    }

    fn evict_current_from_shuffle(&mut self) {
        if !self.options.random {
            return;
        }
        if let Some(current) = &self.current {
            self.sequencer.shuffle_mut().remove(current);
        }
    }

    fn backend_for(&self, track: &Track) -> Result<Arc<dyn PlaybackBackend>> {
        let scheme = track
            .uri_scheme()
            .ok_or_else(|| PlaybackError::BackendUnavailable {
                scheme: String::new(),
            })?;
        self.backends
            .resolve(&scheme)
            .ok_or(PlaybackError::BackendUnavailable { scheme })
    }

    fn current_backend(&self) -> Option<Arc<dyn PlaybackBackend>> {
        let current = self.current.as_ref()?;
        self.backend_for(&current.track).ok()
    }

    fn current_uri(&self) -> &str {
        self.current
            .as_ref()
            .map_or("<none>", |current| current.track.uri.as_str())
    }

    fn set_state(&mut self, new_state: PlaybackState) {
        let old_state = self.state;
        if old_state == new_state {
            return;
        }
        debug!("Changing state: {} -> {}", old_state, new_state);
        self.state = new_state;
        self.emit(PlaybackEvent::PlaybackStateChanged {
            old_state,
            new_state,
        });
    }

    fn announce_track_ended(&self) {
        let Some(current) = &self.current else {
            return;
        };
        self.emit(PlaybackEvent::TrackPlaybackEnded {
            track: current.track.clone(),
            time_position: self.time_position(),
        });
    }

    fn emit(&self, event: PlaybackEvent) {
        debug!("Triggering {} event", event.name());
        self.listeners.send(&event);
    }
}
