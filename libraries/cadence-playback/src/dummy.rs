//! Headless backend for tests and dry runs
//!
//! Plays nothing. Keeps a time position, remembers the last track it was
//! asked to play, and can be told to refuse any operation.

use cadence_core::{PlaybackBackend, Track};
use std::collections::HashSet;
use std::sync::Mutex;

/// URI scheme conventionally used for the dummy backend
pub const DUMMY_SCHEME: &str = "dummy";

/// Calls received by a [`DummyBackend`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `play` calls
    pub play: usize,
    /// `pause` calls
    pub pause: usize,
    /// `resume` calls
    pub resume: usize,
    /// `stop` calls
    pub stop: usize,
    /// `seek` calls
    pub seek: usize,
}

#[derive(Debug, Default)]
struct DummyState {
    current_uri: Option<String>,
    time_position: u64,
    unplayable: HashSet<String>,
    refuse_pause: bool,
    refuse_resume: bool,
    refuse_stop: bool,
    refuse_seek: bool,
    calls: CallCounts,
}

/// Backend that accepts everything unless told otherwise
#[derive(Debug, Default)]
pub struct DummyBackend {
    state: Mutex<DummyState>,
}

impl DummyBackend {
    /// Create a backend that accepts every call
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to play these URIs
    #[must_use]
    pub fn with_unplayable<I, S>(self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_state(|state| state.unplayable.extend(uris.into_iter().map(Into::into)));
        self
    }

    /// Mark a URI as unplayable after construction
    pub fn set_unplayable(&self, uri: impl Into<String>) {
        let uri = uri.into();
        self.with_state(|state| {
            state.unplayable.insert(uri);
        });
    }

    /// Refuse or accept `pause`
    pub fn set_refuse_pause(&self, refuse: bool) {
        self.with_state(|state| state.refuse_pause = refuse);
    }

    /// Refuse or accept `resume`
    pub fn set_refuse_resume(&self, refuse: bool) {
        self.with_state(|state| state.refuse_resume = refuse);
    }

    /// Refuse or accept `stop`
    pub fn set_refuse_stop(&self, refuse: bool) {
        self.with_state(|state| state.refuse_stop = refuse);
    }

    /// Refuse or accept `seek`
    pub fn set_refuse_seek(&self, refuse: bool) {
        self.with_state(|state| state.refuse_seek = refuse);
    }

    /// Pretend playback has advanced to `position_ms`
    pub fn set_time_position(&self, position_ms: u64) {
        self.with_state(|state| state.time_position = position_ms);
    }

    /// URI of the last track accepted by `play`, cleared by `stop`
    pub fn current_uri(&self) -> Option<String> {
        self.with_state(|state| state.current_uri.clone())
    }

    /// Calls received so far
    pub fn calls(&self) -> CallCounts {
        self.with_state(|state| state.calls)
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DummyState) -> R) -> R {
        // A panicking test thread must not wedge every later call
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state)
    }
}

impl PlaybackBackend for DummyBackend {
    fn play(&self, track: &Track) -> bool {
        self.with_state(|state| {
            state.calls.play += 1;
            if state.unplayable.contains(&track.uri) {
                return false;
            }
            state.current_uri = Some(track.uri.clone());
            state.time_position = 0;
            true
        })
    }

    fn pause(&self) -> bool {
        self.with_state(|state| {
            state.calls.pause += 1;
            !state.refuse_pause
        })
    }

    fn resume(&self) -> bool {
        self.with_state(|state| {
            state.calls.resume += 1;
            !state.refuse_resume
        })
    }

    fn stop(&self) -> bool {
        self.with_state(|state| {
            state.calls.stop += 1;
            if state.refuse_stop {
                return false;
            }
            state.current_uri = None;
            true
        })
    }

    fn seek(&self, position_ms: u64) -> bool {
        self.with_state(|state| {
            state.calls.seek += 1;
            if state.refuse_seek {
                return false;
            }
            state.time_position = position_ms;
            true
        })
    }

    fn get_time_position(&self) -> u64 {
        self.with_state(|state| state.time_position)
    }
}
