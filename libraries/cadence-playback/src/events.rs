//! Playback Events
//!
//! Fire-and-forget notifications for frontends. Events are delivered to
//! every registered listener synchronously, in emission order:
//! - Track lifecycle (started, paused, resumed, ended)
//! - State changes (stopped/playing/paused)
//! - Option changes (consume/random/repeat/single)
//! - Seeks

use cadence_core::{PlaybackState, Track};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A track started playing
    TrackPlaybackStarted {
        /// The track that started
        track: Track,
    },

    /// A track stopped being the one playing
    TrackPlaybackEnded {
        /// The track that ended
        track: Track,
        /// Position at which it ended, in milliseconds
        time_position: u64,
    },

    /// The current track was paused
    TrackPlaybackPaused {
        /// The paused track
        track: Track,
        /// Position at which it was paused, in milliseconds
        time_position: u64,
    },

    /// The current track was resumed
    TrackPlaybackResumed {
        /// The resumed track
        track: Track,
        /// Position at which it resumed, in milliseconds
        time_position: u64,
    },

    /// Playback state changed
    PlaybackStateChanged {
        /// State before the change
        old_state: PlaybackState,
        /// State after the change
        new_state: PlaybackState,
    },

    /// One of consume/random/repeat/single changed
    OptionsChanged,

    /// The current track was seeked
    Seeked {
        /// New position in milliseconds
        time_position: u64,
    },
}

impl PlaybackEvent {
    /// Event name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrackPlaybackStarted { .. } => "track_playback_started",
            Self::TrackPlaybackEnded { .. } => "track_playback_ended",
            Self::TrackPlaybackPaused { .. } => "track_playback_paused",
            Self::TrackPlaybackResumed { .. } => "track_playback_resumed",
            Self::PlaybackStateChanged { .. } => "playback_state_changed",
            Self::OptionsChanged => "options_changed",
            Self::Seeked { .. } => "seeked",
        }
    }
}

/// Receives playback events
///
/// Called on the controller's thread while it holds its own state, so
/// implementations should hand the event off and return quickly.
pub trait PlaybackListener: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &PlaybackEvent);
}

impl<F> PlaybackListener for F
where
    F: Fn(&PlaybackEvent) + Send + Sync,
{
    fn on_event(&self, event: &PlaybackEvent) {
        self(event);
    }
}

/// Forwards events into a channel
///
/// A disconnected receiver silently drops events.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<PlaybackEvent>,
}

impl ChannelListener {
    /// Create a listener that sends into `sender`
    pub fn new(sender: Sender<PlaybackEvent>) -> Self {
        Self { sender }
    }
}

impl PlaybackListener for ChannelListener {
    fn on_event(&self, event: &PlaybackEvent) {
        self.sender.send(event.clone()).ok();
    }
}

/// Ordered set of listeners the controller broadcasts to
#[derive(Clone, Default)]
pub struct Listeners {
    listeners: Vec<Arc<dyn PlaybackListener>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

impl Listeners {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, listener: Arc<dyn PlaybackListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to every listener, in registration order
    pub fn send(&self, event: &PlaybackEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}
