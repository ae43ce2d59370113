//! Shared helpers for the integration tests

#![allow(dead_code)]

use cadence_core::{PlaybackBackend, TlTrack, Track};
use cadence_playback::{
    DummyBackend, MemoryTracklist, PlaybackController, PlaybackEvent, SchemeRegistry,
};
use crossbeam_channel::Receiver;
use std::sync::Arc;

/// Default track length for generated tracks
pub const TRACK_LENGTH_MS: u64 = 180_000;

/// `dummy:` tracks with a known length
pub fn create_test_tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|name| {
            Track::new(format!("dummy:{}", name))
                .with_name(name.to_uppercase())
                .with_length(TRACK_LENGTH_MS)
        })
        .collect()
}

/// Registry with `backend` under the `dummy` scheme
pub fn registry_with(backend: Arc<dyn PlaybackBackend>) -> Arc<SchemeRegistry> {
    Arc::new(SchemeRegistry::new().with_backend(["dummy"], backend))
}

/// Controller over `names`, seeded shuffle, dummy backend
pub struct Harness {
    pub controller: PlaybackController,
    pub backend: Arc<DummyBackend>,
    pub events: Receiver<PlaybackEvent>,
}

impl Harness {
    pub fn new(names: &[&str]) -> Self {
        init_tracing();
        let backend = Arc::new(DummyBackend::new());
        let tracklist = MemoryTracklist::with_tracks(create_test_tracks(names));
        let mut controller = PlaybackController::new(tracklist, registry_with(backend.clone()));
        controller.reseed_shuffle(42);
        let events = controller.subscribe();
        Self {
            controller,
            backend,
            events,
        }
    }

    /// Entry at a tracklist position
    pub fn entry(&self, position: usize) -> TlTrack {
        self.controller
            .tracklist()
            .at(position)
            .cloned()
            .expect("position within tracklist")
    }

    /// Events emitted since the last drain
    pub fn drain(&self) -> Vec<PlaybackEvent> {
        self.events.try_iter().collect()
    }

    /// Names of events emitted since the last drain
    pub fn drain_names(&self) -> Vec<&'static str> {
        self.drain().iter().map(PlaybackEvent::name).collect()
    }

    /// URI of the current track
    pub fn current_uri(&self) -> Option<String> {
        self.controller.current_track().map(|track| track.uri.clone())
    }
}

/// Install a test subscriber once; `RUST_LOG=debug` shows controller traces
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
