//! Playback mode flags

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four independent playback modes
///
/// All default to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Remove tracks from the tracklist once they have finished playing
    pub consume: bool,

    /// Pick tracks from a shuffled order instead of tracklist order
    pub random: bool,

    /// Loop the tracklist; together with `single`, loop the current track
    pub repeat: bool,

    /// Stop after the current track unless `repeat` is also on
    pub single: bool,
}

/// Names one of the flags in [`PlaybackOptions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackOption {
    /// `consume` flag
    Consume,
    /// `random` flag
    Random,
    /// `repeat` flag
    Repeat,
    /// `single` flag
    Single,
}

impl PlaybackOption {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consume => "consume",
            Self::Random => "random",
            Self::Repeat => "repeat",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for PlaybackOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PlaybackOptions {
    /// Read a flag
    pub fn get(&self, option: PlaybackOption) -> bool {
        match option {
            PlaybackOption::Consume => self.consume,
            PlaybackOption::Random => self.random,
            PlaybackOption::Repeat => self.repeat,
            PlaybackOption::Single => self.single,
        }
    }

    /// Write a flag, returning whether its value changed
    pub fn replace(&mut self, option: PlaybackOption, value: bool) -> bool {
        let slot = match option {
            PlaybackOption::Consume => &mut self.consume,
            PlaybackOption::Random => &mut self.random,
            PlaybackOption::Repeat => &mut self.repeat,
            PlaybackOption::Single => &mut self.single,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Any mode in which "previous" means "the current track again"
    pub(crate) fn previous_is_current(&self) -> bool {
        self.repeat || self.consume || self.random
    }
}
