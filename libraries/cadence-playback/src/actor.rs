//! Backend on its own worker thread
//!
//! [`ThreadedBackend`] moves a backend onto a dedicated thread and talks to
//! it over a channel. Every call sends one request and blocks until that
//! request is answered, so the controller never has two backend calls in
//! flight at once.

use cadence_core::{PlaybackBackend, Track};
use crossbeam_channel::{bounded, unbounded, Sender};
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Requests sent to the worker thread
enum BackendRequest {
    Play(Track, Sender<bool>),
    Pause(Sender<bool>),
    Resume(Sender<bool>),
    Stop(Sender<bool>),
    Seek(u64, Sender<bool>),
    TimePosition(Sender<u64>),
}

impl BackendRequest {
    fn name(&self) -> &'static str {
        match self {
            Self::Play(..) => "play",
            Self::Pause(_) => "pause",
            Self::Resume(_) => "resume",
            Self::Stop(_) => "stop",
            Self::Seek(..) => "seek",
            Self::TimePosition(_) => "get_time_position",
        }
    }
}

/// Blocking handle to a backend running on a worker thread
///
/// If the worker has died (the backend panicked), every call reads as
/// refused and the time position as 0. Dropping the handle shuts the
/// worker down and waits for it.
pub struct ThreadedBackend {
    request_tx: Option<Sender<BackendRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ThreadedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadedBackend")
            .field("running", &self.is_running())
            .finish()
    }
}

impl ThreadedBackend {
    /// Move `backend` onto a new worker thread
    pub fn spawn<B>(backend: B) -> io::Result<Self>
    where
        B: PlaybackBackend + 'static,
    {
        let (request_tx, request_rx) = unbounded::<BackendRequest>();

        let worker = thread::Builder::new()
            .name("cadence-backend".to_string())
            .spawn(move || {
                debug!("Backend worker started");
                for request in request_rx.iter() {
                    match request {
                        BackendRequest::Play(track, reply) => {
                            reply.send(backend.play(&track)).ok();
                        }
                        BackendRequest::Pause(reply) => {
                            reply.send(backend.pause()).ok();
                        }
                        BackendRequest::Resume(reply) => {
                            reply.send(backend.resume()).ok();
                        }
                        BackendRequest::Stop(reply) => {
                            reply.send(backend.stop()).ok();
                        }
                        BackendRequest::Seek(position_ms, reply) => {
                            reply.send(backend.seek(position_ms)).ok();
                        }
                        BackendRequest::TimePosition(reply) => {
                            reply.send(backend.get_time_position()).ok();
                        }
                    }
                }
                debug!("Backend worker stopped");
            })?;

        Ok(Self {
            request_tx: Some(request_tx),
            worker: Some(worker),
        })
    }

    /// Whether the worker thread is still alive
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    fn call<T: Default>(&self, make: impl FnOnce(Sender<T>) -> BackendRequest) -> T {
        let Some(request_tx) = &self.request_tx else {
            return T::default();
        };

        let (reply_tx, reply_rx) = bounded(1);
        let request = make(reply_tx);
        let operation = request.name();

        if request_tx.send(request).is_err() {
            warn!("Backend worker is gone, {} not delivered", operation);
            return T::default();
        }

        match reply_rx.recv() {
            Ok(value) => value,
            Err(_) => {
                warn!("Backend worker died during {}", operation);
                T::default()
            }
        }
    }
}

impl PlaybackBackend for ThreadedBackend {
    fn play(&self, track: &Track) -> bool {
        let track = track.clone();
        self.call(|reply| BackendRequest::Play(track, reply))
    }

    fn pause(&self) -> bool {
        self.call(BackendRequest::Pause)
    }

    fn resume(&self) -> bool {
        self.call(BackendRequest::Resume)
    }

    fn stop(&self) -> bool {
        self.call(BackendRequest::Stop)
    }

    fn seek(&self, position_ms: u64) -> bool {
        self.call(|reply| BackendRequest::Seek(position_ms, reply))
    }

    fn get_time_position(&self) -> u64 {
        self.call(BackendRequest::TimePosition)
    }
}

impl Drop for ThreadedBackend {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.request_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Backend worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyBackend;
    use std::sync::Arc;

    struct PanickingBackend;

    impl PlaybackBackend for PanickingBackend {
        fn play(&self, _track: &Track) -> bool {
            panic!("decoder exploded");
        }

        fn pause(&self) -> bool {
            true
        }

        fn resume(&self) -> bool {
            true
        }

        fn stop(&self) -> bool {
            true
        }

        fn seek(&self, _position_ms: u64) -> bool {
            true
        }

        fn get_time_position(&self) -> u64 {
            5
        }
    }

    #[test]
    fn calls_reach_the_backend() {
        let dummy = Arc::new(DummyBackend::new().with_unplayable(["dummy:bad"]));
        let threaded = ThreadedBackend::spawn(Arc::clone(&dummy)).unwrap();

        assert!(threaded.play(&Track::new("dummy:good")));
        assert!(!threaded.play(&Track::new("dummy:bad")));
        assert!(threaded.seek(1_500));
        assert_eq!(threaded.get_time_position(), 1_500);
        assert!(threaded.pause());
        assert!(threaded.resume());
        assert!(threaded.stop());

        assert_eq!(dummy.calls().play, 2);
        assert_eq!(dummy.calls().stop, 1);
    }

    #[test]
    fn dead_worker_refuses_everything() {
        let threaded = ThreadedBackend::spawn(PanickingBackend).unwrap();
        assert_eq!(threaded.get_time_position(), 5);

        assert!(!threaded.play(&Track::new("dummy:a")));
        assert!(!threaded.pause());
        assert_eq!(threaded.get_time_position(), 0);
    }

    #[test]
    fn drop_joins_the_worker() {
        let dummy = Arc::new(DummyBackend::new());
        let threaded = ThreadedBackend::spawn(Arc::clone(&dummy)).unwrap();
        assert!(threaded.is_running());
        drop(threaded);

        // Worker released its clone on exit
        assert_eq!(Arc::strong_count(&dummy), 1);
    }
}
