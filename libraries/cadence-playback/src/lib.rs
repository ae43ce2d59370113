//! Cadence - Playback Sequencing
//!
//! The playback state machine behind an MPD-style player: which track plays
//! next, what state playback is in, and which backend gets the commands.
//!
//! This crate provides:
//! - Stopped/playing/paused state machine with event notifications
//! - Next/previous/end-of-track sequencing under repeat, single, random and consume
//! - Shuffle order that is regenerated per pass and reset on tracklist edits
//! - Skipping of unplayable tracks in either direction, bounded by the tracklist
//! - Backend dispatch by URI scheme
//! - Config loading (TOML file + `CADENCE_*` environment)
//!
//! # Architecture
//!
//! `cadence-playback` plays no audio. Tracklists, backends and mixers are
//! the traits from `cadence-core`; this crate ships in-memory and headless
//! implementations of them ([`MemoryTracklist`], [`DummyBackend`]) plus a
//! wrapper that runs any backend on its own thread ([`ThreadedBackend`]).
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_core::{Direction, PlaybackState, Track};
//! use cadence_playback::{DummyBackend, MemoryTracklist, PlaybackController, SchemeRegistry};
//! use std::sync::Arc;
//!
//! let registry = SchemeRegistry::new().with_backend(["dummy"], Arc::new(DummyBackend::new()));
//! let tracklist = MemoryTracklist::with_tracks([
//!     Track::new("dummy:intro").with_length(90_000),
//!     Track::new("dummy:theme").with_length(240_000),
//! ]);
//!
//! let mut controller = PlaybackController::new(tracklist, Arc::new(registry));
//! controller.play(None, Direction::Forward).unwrap();
//! assert_eq!(controller.state(), PlaybackState::Playing);
//!
//! controller.next();
//! assert_eq!(controller.current_track().unwrap().uri, "dummy:theme");
//! ```
//!
//! # Example: Listening for Events
//!
//! ```rust
//! use cadence_core::Direction;
//! use cadence_playback::{PlaybackController, PlaybackEvent, SchemeRegistry, MemoryTracklist};
//! use std::sync::Arc;
//!
//! let mut controller =
//!     PlaybackController::new(MemoryTracklist::new(), Arc::new(SchemeRegistry::new()));
//! let events = controller.subscribe();
//!
//! controller.set_repeat(true);
//! assert_eq!(events.try_recv().unwrap(), PlaybackEvent::OptionsChanged);
//! ```

mod actor;
mod config;
mod controller;
mod dummy;
mod error;
mod events;
mod options;
mod registry;
mod sequencer;
mod shared;
mod shuffle;
mod tracklist;

// Public exports
pub use actor::ThreadedBackend;
pub use self::config::{PlaybackConfig, ENV_PREFIX};
pub use controller::PlaybackController;
pub use dummy::{CallCounts, DummyBackend, DUMMY_SCHEME};
pub use error::{PlaybackError, Result};
pub use events::{ChannelListener, Listeners, PlaybackEvent, PlaybackListener};
pub use options::{PlaybackOption, PlaybackOptions};
pub use registry::SchemeRegistry;
pub use sequencer::Sequencer;
pub use shared::SharedController;
pub use shuffle::ShuffleOrder;
pub use tracklist::MemoryTracklist;
