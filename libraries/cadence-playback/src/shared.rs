//! Thread-safe controller handle
//!
//! The controller itself assumes one caller at a time. `SharedController`
//! puts the whole state machine behind a single mutex so that frontends on
//! different threads see each command as one atomic step.

use crate::controller::PlaybackController;
use crate::error::Result;
use crate::tracklist::MemoryTracklist;
use cadence_core::{Direction, PlaybackState, TlTrack, Tracklist};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to a controller shared between threads
pub struct SharedController<T: Tracklist = MemoryTracklist> {
    inner: Arc<Mutex<PlaybackController<T>>>,
}

impl<T: Tracklist> Clone for SharedController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Tracklist> std::fmt::Debug for SharedController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedController").field(&*self.lock()).finish()
    }
}

impl<T: Tracklist> SharedController<T> {
    /// Wrap a controller
    pub fn new(controller: PlaybackController<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run `f` with exclusive access to the controller
    ///
    /// Everything `f` does happens as one step relative to other handles.
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaybackController<T>) -> R) -> R {
        f(&mut self.lock())
    }

    /// See [`PlaybackController::play`]
    pub fn play(&self, tl_track: Option<TlTrack>, direction: Direction) -> Result<()> {
        self.with(|controller| controller.play(tl_track, direction))
    }

    /// See [`PlaybackController::pause`]
    pub fn pause(&self) {
        self.with(PlaybackController::pause);
    }

    /// See [`PlaybackController::resume`]
    pub fn resume(&self) {
        self.with(PlaybackController::resume);
    }

    /// See [`PlaybackController::stop`]
    pub fn stop(&self, clear_current: bool) {
        self.with(|controller| controller.stop(clear_current));
    }

    /// See [`PlaybackController::next`]
    pub fn next(&self) {
        self.with(PlaybackController::next);
    }

    /// See [`PlaybackController::previous`]
    pub fn previous(&self) {
        self.with(PlaybackController::previous);
    }

    /// See [`PlaybackController::seek`]
    pub fn seek(&self, position_ms: i64) -> bool {
        self.with(|controller| controller.seek(position_ms))
    }

    /// See [`PlaybackController::on_end_of_track`]
    pub fn on_end_of_track(&self) {
        self.with(PlaybackController::on_end_of_track);
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.lock().state()
    }

    /// Copy of the current entry
    pub fn current_tl_track(&self) -> Option<TlTrack> {
        self.lock().current_tl_track().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackController<T>> {
        // A panic mid-command leaves the last consistent state behind
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
