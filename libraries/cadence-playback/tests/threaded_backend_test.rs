//! Controller driving a backend that lives on its own thread

mod common;

use cadence_core::{Direction, PlaybackState, Track};
use cadence_playback::{
    DummyBackend, MemoryTracklist, PlaybackController, PlaybackEvent, SchemeRegistry,
    SharedController, ThreadedBackend,
};
use std::sync::Arc;
use std::thread;

fn threaded_setup(
    names: &[&str],
    dummy: Arc<DummyBackend>,
) -> PlaybackController {
    let threaded = ThreadedBackend::spawn(dummy).expect("spawn backend worker");
    let registry = SchemeRegistry::new().with_backend(["dummy"], Arc::new(threaded));
    PlaybackController::new(
        MemoryTracklist::with_tracks(common::create_test_tracks(names)),
        Arc::new(registry),
    )
}

#[test]
fn playback_through_worker_thread() {
    common::init_tracing();
    let dummy = Arc::new(DummyBackend::new().with_unplayable(["dummy:b"]));
    let mut controller = threaded_setup(&["a", "b", "c"], Arc::clone(&dummy));

    controller.play(None, Direction::Forward).unwrap();
    assert_eq!(dummy.current_uri().as_deref(), Some("dummy:a"));

    controller.next();
    assert_eq!(controller.current_track().unwrap().uri, "dummy:c");
    assert_eq!(dummy.current_uri().as_deref(), Some("dummy:c"));

    assert!(controller.seek(12_345));
    assert_eq!(controller.time_position(), 12_345);
}

#[test]
fn shared_controller_across_threads_with_threaded_backend() {
    let dummy = Arc::new(DummyBackend::new());
    let mut controller = threaded_setup(&["a", "b", "c", "d"], Arc::clone(&dummy));
    controller.set_repeat(true);
    let events = controller.subscribe();
    let shared = SharedController::new(controller);

    shared.play(None, Direction::Forward).unwrap();

    let frontends: Vec<_> = (0..3)
        .map(|_| {
            let handle = shared.clone();
            thread::spawn(move || {
                for _ in 0..4 {
                    handle.next();
                }
            })
        })
        .collect();
    for frontend in frontends {
        frontend.join().unwrap();
    }

    // 12 skips over four tracks with repeat lands back on the first
    assert_eq!(shared.state(), PlaybackState::Playing);
    assert_eq!(
        shared.current_tl_track().map(|entry| entry.track.uri),
        Some("dummy:a".to_string())
    );

    let started = events
        .try_iter()
        .filter(|event| matches!(event, PlaybackEvent::TrackPlaybackStarted { .. }))
        .count();
    assert_eq!(started, 13);
    assert_eq!(dummy.calls().play, 13);
}

#[test]
fn unknown_scheme_next_to_threaded_backend() {
    let dummy = Arc::new(DummyBackend::new());
    let mut controller = threaded_setup(&[], Arc::clone(&dummy));
    controller.edit_tracklist(|tracklist| {
        tracklist.add(
            [
                Track::new("nope:1"),
                Track::new("not a uri"),
                Track::new("dummy:ok"),
            ],
            None,
        );
    });

    controller.play(None, Direction::Forward).unwrap();

    assert_eq!(controller.current_track().unwrap().uri, "dummy:ok");
    assert_eq!(dummy.calls().play, 1);
}
