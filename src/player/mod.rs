mod backend_rodio;
mod controller;
mod core;
mod engine;
mod error;
mod handle;

pub use backend_rodio::RodioEngine;
pub use controller::{PlaybackController, PlaybackSession};
pub use engine::{EngineError, EngineEvent, MediaEngine, MediaHandle};
pub use error::PlayerError;
pub use handle::{PlayerHandle, PlayerOptions};

use crate::domain::{MediaInfo, RadioStation, Track};
use std::{sync::Arc, time::Duration};

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

pub enum PlayerCommand {
    LoadTrack(Arc<Track>),
    Next,
    Previous,
    TogglePlayback,
    CycleStation,
    Seek(Duration),
    SetVolume(f32),
    Stop,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TrackStarted(Arc<Track>),
    StationStarted(Arc<RadioStation>),
    TransportChanged(TransportState),
    PositionChanged {
        position: Duration,
        duration: Option<Duration>,
    },
    VolumeChanged(f32),
    Stopped,
    Error(PlayerError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Idle,
    PlayingLocal(Arc<Track>),
    PausedLocal(Arc<Track>),
    PlayingRadio(Arc<RadioStation>),
    PausedRadio(Arc<RadioStation>),
}

impl PlaybackState {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::PlayingLocal(_) | Self::PausedLocal(_))
    }

    pub fn is_radio(&self) -> bool {
        matches!(self, Self::PlayingRadio(_) | Self::PausedRadio(_))
    }

    pub fn transport(&self) -> TransportState {
        match self {
            Self::Idle => TransportState::Idle,
            Self::PlayingLocal(_) | Self::PlayingRadio(_) => TransportState::Playing,
            Self::PausedLocal(_) | Self::PausedRadio(_) => TransportState::Paused,
        }
    }

    /// Metadata of whatever is loaded, local or radio
    pub fn now_playing(&self) -> Option<&dyn MediaInfo> {
        match self {
            Self::Idle => None,
            Self::PlayingLocal(t) | Self::PausedLocal(t) => Some(t.as_ref()),
            Self::PlayingRadio(s) | Self::PausedRadio(s) => Some(s.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Playing,
    Paused,
}
